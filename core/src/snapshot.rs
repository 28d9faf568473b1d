use alloc::string::{String, ToString};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::shape_of;
use crate::*;

/// Serialized form of a [`BoardState`], including the layout it covers.
///
/// Converting back into a board checks that the grids agree in shape and recounts the covered
/// cells, so a snapshot never smuggles in an inconsistent counter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub layout: MineLayout,
    pub cells: Array2<CellStatus>,
    pub detonated: Option<Coord2>,
}

impl From<BoardState> for Snapshot {
    fn from(board: BoardState) -> Self {
        let (layout, cells, detonated) = board.into_parts();
        Self {
            layout,
            cells,
            detonated,
        }
    }
}

impl TryFrom<Snapshot> for BoardState {
    type Error = GameError;

    fn try_from(snapshot: Snapshot) -> Result<Self> {
        BoardState::from_parts(snapshot.layout, snapshot.cells, snapshot.detonated)
    }
}

fn json_error(err: serde_json::Error) -> GameError {
    GameError::Snapshot(err.to_string())
}

impl BoardState {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(json_error)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(json_error)?;
        snapshot.try_into()
    }
}

impl MineLayout {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(json_error)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(json).map_err(json_error)?;
        if layout.total_cells() == 0 || shape_of(layout.mine_mask()).is_none() {
            return Err(GameError::InvalidSize);
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played_board() -> BoardState {
        let layout = MineLayout::from_mine_coords((4, 5), &[(0, 4), (3, 0)]).unwrap();
        let mut board = BoardState::new(layout);
        board.cycle_mark((0, 4)).unwrap();
        board.cycle_mark((2, 2)).unwrap();
        board.cycle_mark((2, 2)).unwrap();
        board.uncover((0, 0)).unwrap();
        board
    }

    #[test]
    fn board_json_round_trip() {
        let board = played_board();
        let json = board.to_json().unwrap();
        let restored = BoardState::from_json(&json).unwrap();
        assert_eq!(restored, board);
        assert_eq!(restored.covered_count(), board.covered_count());
    }

    #[test]
    fn lost_board_round_trips() {
        let mut board = played_board();
        board.uncover((3, 0)).unwrap();
        let restored = BoardState::from_json(&board.to_json().unwrap()).unwrap();
        assert_eq!(restored.detonated(), Some((3, 0)));
        assert_eq!(restored, board);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let board = played_board();
        let mut snapshot = Snapshot::from(board);
        snapshot.cells = Array2::default((2, 2));
        assert_eq!(
            BoardState::try_from(snapshot),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn detonation_must_point_at_detonated_cell() {
        let mut snapshot = Snapshot::from(played_board());
        snapshot.detonated = Some((3, 0));
        assert_eq!(
            BoardState::try_from(snapshot.clone()),
            Err(GameError::InvalidBoardShape)
        );
        snapshot.detonated = Some((9, 9));
        assert_eq!(
            BoardState::try_from(snapshot),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn missing_detonation_marker_is_rejected() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut board = BoardState::new(layout);
        board.uncover((0, 0)).unwrap();

        let json = board.to_json().unwrap();
        let edited = json.replace("\"detonated\":[0,0]", "\"detonated\":null");
        assert_ne!(edited, json);
        assert_eq!(
            BoardState::from_json(&edited),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn detonated_cell_must_hold_a_mine() {
        let mut snapshot = Snapshot::from(played_board());
        snapshot.cells[[1, 1]] = CellStatus::Detonated;
        snapshot.detonated = Some((1, 1));
        assert_eq!(
            BoardState::try_from(snapshot),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn adjacency_counts_above_eight_are_rejected() {
        let layout = MineLayout::from_mine_coords((1, 2), &[]).unwrap();
        let json = BoardState::new(layout).to_json().unwrap();
        let edited = json.replacen("\"Covered\"", "{\"AdjacentCount\":200}", 1);
        assert_ne!(edited, json);
        assert_eq!(
            BoardState::from_json(&edited),
            Err(GameError::InvalidBoardShape)
        );

        let mut snapshot = Snapshot::from(played_board());
        snapshot.cells[[3, 4]] = CellStatus::AdjacentCount(9);
        assert_eq!(
            BoardState::try_from(snapshot),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn layout_json_keeps_intended_mine_count() {
        let mut layout = MineLayout::new_empty(6, 6, 5).unwrap();
        layout.populate_seeded((0, 0), 3).unwrap();
        layout.clear();
        let restored = MineLayout::from_json(&layout.to_json().unwrap()).unwrap();
        assert_eq!(restored.mine_count(), 5);
        assert_eq!(restored.actual_mine_count(), 0);
    }

    #[test]
    fn garbage_is_a_snapshot_error() {
        assert!(matches!(
            BoardState::from_json("[1, 2"),
            Err(GameError::Snapshot(_))
        ));
    }
}
