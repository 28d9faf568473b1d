use alloc::collections::VecDeque;
use core::fmt;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::shape_of;
use crate::*;

/// The player-visible side of a game, bound to the [`MineLayout`] it covers.
///
/// The board only reads the layout. Callers that want to move mines (for example to make the
/// first click safe) go through [`BoardState::layout_mut`] or [`BoardState::uncover_first`].
///
/// Win detection compares the number of covered cells with `layout.mine_count()`, so it is only
/// reliable while the layout really holds that many mines. Keeping them in sync after
/// [`MineLayout::clear`] is up to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Snapshot", try_from = "Snapshot")]
pub struct BoardState {
    layout: MineLayout,
    board: Array2<CellStatus>,
    covered_count: CellCount,
    detonated: Option<Coord2>,
}

impl BoardState {
    pub fn new(layout: MineLayout) -> Self {
        let size = layout.size();
        if layout.awaiting_population() {
            log::debug!(
                "Board bound to a layout with {} mines still to place",
                layout.mine_count()
            );
        } else if layout.actual_mine_count() != layout.mine_count() {
            log::warn!(
                "Board bound to a layout holding {} mines instead of {}, win detection will be off",
                layout.actual_mine_count(),
                layout.mine_count()
            );
        }
        Self {
            covered_count: layout.total_cells(),
            board: Array2::default(size.to_nd_index()),
            detonated: None,
            layout,
        }
    }

    /// Rebuilds a board from its parts, recomputing the covered counter.
    ///
    /// Rejects adjacency counts above 8, detonated cells without a mine, and a detonation
    /// marker that disagrees with the grid.
    pub(crate) fn from_parts(
        layout: MineLayout,
        board: Array2<CellStatus>,
        detonated: Option<Coord2>,
    ) -> Result<Self> {
        if shape_of(layout.mine_mask()).is_none() || layout.total_cells() == 0 {
            return Err(GameError::InvalidSize);
        }
        if board.dim() != layout.mine_mask().dim() {
            return Err(GameError::InvalidBoardShape);
        }
        let mut any_detonated = false;
        for ((row, col), &status) in board.indexed_iter() {
            match status {
                CellStatus::AdjacentCount(count) if count > 8 => {
                    return Err(GameError::InvalidBoardShape);
                }
                // a detonated cell is always a mine
                CellStatus::Detonated => {
                    if !layout[(row as Coord, col as Coord)] {
                        return Err(GameError::InvalidBoardShape);
                    }
                    any_detonated = true;
                }
                _ => {}
            }
        }
        match detonated {
            Some(coords) => {
                let coords = layout.validate_coords(coords)?;
                if board[coords.to_nd_index()] != CellStatus::Detonated {
                    return Err(GameError::InvalidBoardShape);
                }
            }
            None if any_detonated => return Err(GameError::InvalidBoardShape),
            None => {}
        }
        let covered_count = board.iter().filter(|status| status.is_covered()).count() as CellCount;
        Ok(Self {
            layout,
            board,
            covered_count,
            detonated,
        })
    }

    pub(crate) fn into_parts(self) -> (MineLayout, Array2<CellStatus>, Option<Coord2>) {
        (self.layout, self.board, self.detonated)
    }

    /// Covers every cell again and forgets any detonation, the layout stays as it is.
    pub fn reset(&mut self) {
        self.board.fill(CellStatus::Covered);
        self.covered_count = self.layout.total_cells();
        self.detonated = None;
        log::debug!("Board {:?} reset", self.size());
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    /// Mutable access to the layout, call [`BoardState::reset`] after moving mines.
    pub fn layout_mut(&mut self) -> &mut MineLayout {
        &mut self.layout
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn status(&self, coords: Coord2) -> Result<CellStatus> {
        let coords = self.layout.validate_coords(coords)?;
        Ok(self.board[coords.to_nd_index()])
    }

    pub fn is_uncovered(&self, coords: Coord2) -> Result<bool> {
        Ok(self.status(coords)?.is_uncovered())
    }

    pub fn covered_count(&self) -> CellCount {
        self.covered_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.board
            .iter()
            .filter(|&&status| status == CellStatus::Flagged)
            .count() as CellCount
    }

    /// How many mines have not been flagged yet, negative when there are more flags than mines.
    pub fn mines_remaining(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged_count() as isize)
    }

    /// The mine that ended the game, if any.
    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn is_detonated(&self) -> bool {
        self.detonated.is_some()
    }

    pub fn is_won(&self) -> bool {
        !self.is_detonated() && self.covered_count == self.layout.mine_count()
    }

    pub fn game_over(&self) -> bool {
        self.is_detonated() || self.covered_count == self.layout.mine_count()
    }

    /// Cycles a covered cell through `Covered -> Flagged -> Questioned -> Covered`.
    pub fn cycle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        let cell = &mut self.board[coords.to_nd_index()];

        Ok(match cell.next_mark() {
            Some(next) => {
                *cell = next;
                MarkOutcome::Changed
            }
            None => MarkOutcome::NoChange,
        })
    }

    /// Uncovers a cell.
    ///
    /// A mine ends the game: the cell becomes [`CellStatus::Detonated`], unflagged mines are
    /// shown and wrong flags exposed. Otherwise the zero-adjacency region around the cell is
    /// opened together with its numbered border. Flagged and questioned cells are never opened
    /// by the flood and stop it from spreading through them.
    pub fn uncover(&mut self, coords: Coord2) -> Result<UncoverOutcome> {
        use UncoverOutcome::*;

        let coords = self.layout.validate_coords(coords)?;

        if self.layout[coords] {
            self.detonate(coords);
            return Ok(HitMine);
        }

        if self.flood_fill(coords) == 0 {
            Ok(NoChange)
        } else if self.is_won() {
            log::debug!("All safe cells uncovered, last one at {:?}", coords);
            Ok(Won)
        } else {
            Ok(Revealed)
        }
    }

    /// Moves the mines out of the way of `coords`, then uncovers `coords`.
    ///
    /// Flags and question marks placed before the first click are kept. Anything already
    /// uncovered or a previous detonation belongs to the old mines and is covered again.
    pub fn uncover_first<R: Rng + ?Sized>(
        &mut self,
        coords: Coord2,
        rng: &mut R,
    ) -> Result<UncoverOutcome> {
        self.layout.populate(coords, rng)?;
        self.cover_uncovered();
        self.uncover(coords)
    }

    fn cover_uncovered(&mut self) {
        for cell in self.board.iter_mut() {
            if cell.is_uncovered() {
                *cell = match *cell {
                    CellStatus::WrongFlag => CellStatus::Flagged,
                    _ => CellStatus::Covered,
                };
            }
        }
        self.covered_count = self.layout.total_cells();
        self.detonated = None;
    }

    /// Opens `start` and, through zero-adjacency cells, everything reachable from it.
    ///
    /// Only plain covered cells are visited, which keeps every cell to one visit per call.
    fn flood_fill(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            // skip flagged, questioned or already opened cells
            if self.board[coords.to_nd_index()] != CellStatus::Covered {
                continue;
            }

            let count = self.layout.count_adjacent(coords);
            self.board[coords.to_nd_index()] = CellStatus::AdjacentCount(count);
            self.covered_count -= 1;
            opened += 1;
            log::trace!("Uncovered {:?}, adjacent mines: {}", coords, count);

            if count == 0 {
                to_visit.extend(
                    self.layout
                        .iter_neighbors(coords)
                        .filter(|&pos| self.board[pos.to_nd_index()] == CellStatus::Covered),
                );
            }
        }

        opened
    }

    fn detonate(&mut self, coords: Coord2) {
        use CellStatus::*;

        log::debug!("Mine hit at {:?}", coords);
        self.set_uncovered(coords, Detonated);
        self.detonated = Some(coords);

        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let pos = (row, col);
                let status = self.board[pos.to_nd_index()];
                match (self.layout[pos], status) {
                    (true, Flagged | Detonated) => {}
                    (true, _) => self.set_uncovered(pos, RevealedMine),
                    (false, Flagged) => self.set_uncovered(pos, WrongFlag),
                    (false, _) => {}
                }
            }
        }
    }

    fn set_uncovered(&mut self, coords: Coord2, status: CellStatus) {
        let cell = &mut self.board[coords.to_nd_index()];
        if cell.is_covered() {
            self.covered_count -= 1;
        }
        *cell = status;
    }
}

/// Row-major dump of the status codes, one line per row.
impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.board.rows().into_iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for (col, status) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", status.code())?;
            }
        }
        Ok(())
    }
}
