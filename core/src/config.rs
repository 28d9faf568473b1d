use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

/// Dimensions and intended mine count of a generated layout.
///
/// A config built through [`GameConfig::new`] always satisfies `rows > 0`, `cols > 0` and
/// `mines * 3 < rows * cols`. Rejection sampling during population relies on that density bound
/// to stay cheap, so it is enforced here rather than in the sampler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.size;
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidSize);
        }
        if self.mines > self.mine_limit() {
            return Err(GameError::TooManyMines);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_total(self.size)
    }

    /// Largest mine count strictly below a third of the cells.
    pub const fn mine_limit(&self) -> CellCount {
        let total = self.total_cells();
        if total == 0 {
            0
        } else {
            (total - 1) / 3
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| GameError::Snapshot(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| GameError::Snapshot(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(GameConfig::new((0, 5), 0), Err(GameError::InvalidSize));
        assert_eq!(GameConfig::new((5, 0), 0), Err(GameError::InvalidSize));
    }

    #[test]
    fn mine_limit_is_strictly_below_a_third() {
        // 9 cells: 3 mines would be exactly a third
        let config = GameConfig::new((3, 3), 2).unwrap();
        assert_eq!(config.mine_limit(), 2);
        assert_eq!(GameConfig::new((3, 3), 3), Err(GameError::TooManyMines));

        // 10 cells: 3 < 10 / 3.0
        assert!(GameConfig::new((2, 5), 3).is_ok());
        assert_eq!(GameConfig::new((2, 5), 4), Err(GameError::TooManyMines));
    }

    #[test]
    fn tiny_boards_allow_no_mines() {
        assert!(GameConfig::new((1, 1), 0).is_ok());
        assert_eq!(GameConfig::new((1, 1), 1), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((1, 3), 1), Err(GameError::TooManyMines));
    }

    #[test]
    fn json_round_trip_validates() {
        let config = GameConfig::new((16, 30), 99).unwrap();
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json), Ok(config));

        let bad = r#"{"size":[4,4],"mines":10}"#;
        assert_eq!(GameConfig::from_json(bad), Err(GameError::TooManyMines));
        assert!(matches!(
            GameConfig::from_json("{"),
            Err(GameError::Snapshot(_))
        ));
    }
}
