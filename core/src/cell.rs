use serde::{Deserialize, Serialize};

use crate::*;

/// What the player sees on one cell.
///
/// `Covered`, `Flagged` and `Questioned` are the covered states the player cycles through, the
/// rest are uncovered. `RevealedMine`, `WrongFlag` and `Detonated` only appear after a mine was
/// hit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellStatus {
    #[default]
    Covered,
    Flagged,
    Questioned,
    AdjacentCount(u8),
    // these are only used to show the result after a mine was hit:
    RevealedMine,
    WrongFlag,
    Detonated,
}

impl CellStatus {
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged | Self::Questioned)
    }

    pub const fn is_uncovered(self) -> bool {
        !self.is_covered()
    }

    /// Next state of the mark cycle `Covered -> Flagged -> Questioned -> Covered`.
    pub const fn next_mark(self) -> Option<Self> {
        use CellStatus::*;
        match self {
            Covered => Some(Flagged),
            Flagged => Some(Questioned),
            Questioned => Some(Covered),
            _ => None,
        }
    }

    /// Compact numeric code: negative values are covered states, `0..=8` adjacent counts, then
    /// `9` revealed mine, `10` wrong flag and `11` detonated mine.
    pub const fn code(self) -> i8 {
        use CellStatus::*;
        match self {
            Covered => -1,
            Flagged => -2,
            Questioned => -3,
            AdjacentCount(count) => count as i8,
            RevealedMine => 9,
            WrongFlag => 10,
            Detonated => 11,
        }
    }
}

impl TryFrom<i8> for CellStatus {
    type Error = GameError;

    fn try_from(code: i8) -> Result<Self> {
        use CellStatus::*;
        Ok(match code {
            -1 => Covered,
            -2 => Flagged,
            -3 => Questioned,
            0..=8 => AdjacentCount(code as u8),
            9 => RevealedMine,
            10 => WrongFlag,
            11 => Detonated,
            _ => return Err(GameError::InvalidStatusCode(code)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_covered() {
        assert_eq!(CellStatus::default(), CellStatus::Covered);
    }

    #[test]
    fn covered_category() {
        use CellStatus::*;
        for status in [Covered, Flagged, Questioned] {
            assert!(status.is_covered());
        }
        for status in [AdjacentCount(0), AdjacentCount(8), RevealedMine, WrongFlag, Detonated] {
            assert!(status.is_uncovered());
        }
    }

    #[test]
    fn mark_cycle_returns_to_covered() {
        let mut status = CellStatus::Covered;
        for _ in 0..3 {
            status = status.next_mark().unwrap();
        }
        assert_eq!(status, CellStatus::Covered);
        assert_eq!(CellStatus::AdjacentCount(2).next_mark(), None);
        assert_eq!(CellStatus::WrongFlag.next_mark(), None);
    }

    #[test]
    fn codes_match_their_status() {
        for code in -3i8..=11 {
            assert_eq!(CellStatus::try_from(code).unwrap().code(), code);
        }
        assert_eq!(
            CellStatus::try_from(12i8),
            Err(GameError::InvalidStatusCode(12))
        );
        assert_eq!(
            CellStatus::try_from(-4i8),
            Err(GameError::InvalidStatusCode(-4))
        );
    }
}
