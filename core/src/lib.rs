//! Mine placement and player-visible board state for Minesweeper.
//!
//! A [`MineLayout`] knows where the mines are, a [`BoardState`] tracks what the player has
//! uncovered or marked on top of it. Rendering, input and timing are left to the caller.

#![no_std]

extern crate alloc;

pub use board::*;
pub use cell::*;
pub use config::*;
pub use error::*;
pub use layout::*;
pub use snapshot::*;
pub use types::*;

mod board;
mod cell;
mod config;
mod error;
mod layout;
mod snapshot;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of uncovering a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UncoverOutcome {
    NoChange,
    Revealed,
    Won,
    HitMine,
}

impl UncoverOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        use UncoverOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Won => true,
            HitMine => true,
        }
    }

    /// `false` only when a mine was hit
    pub const fn is_safe(self) -> bool {
        !matches!(self, Self::HitMine)
    }
}
