use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must have at least one row and one column")]
    InvalidSize,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Unknown cell status code {0}")]
    InvalidStatusCode(i8),
    #[error("Malformed snapshot: {0}")]
    Snapshot(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
