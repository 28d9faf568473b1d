use alloc::{format, vec::Vec};
use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::shape_of;
use crate::*;

/// Where the mines are.
///
/// `mine_count` is the *intended* number of mines. For layouts built from a grid it is the number
/// of mines in that grid; for layouts built with [`MineLayout::new_empty`] it only matches the
/// grid after [`MineLayout::populate`], and stops matching again after [`MineLayout::clear`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        if mine_mask.is_empty() || shape_of(&mine_mask).is_none() {
            return Err(GameError::InvalidSize);
        }
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .map_err(|_| GameError::InvalidSize)?;
        log::debug!(
            "Layout from grid {:?} with {} mines",
            mine_mask.dim(),
            mine_count
        );
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    /// Builds a layout from row slices, every row must have the same length.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.iter().any(|row| row.as_ref().len() != cols) {
            return Err(GameError::InvalidBoardShape);
        }
        let mine_mask = Array2::from_shape_fn((rows.len(), cols), |(row, col)| {
            rows[row].as_ref()[col]
        });
        Self::from_mine_mask(mine_mask)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    /// An empty layout that will hold `mines` mines once populated.
    pub fn new_empty(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        Self::from_config(GameConfig::new((rows, cols), mines)?)
    }

    pub fn from_config(config: GameConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Empty layout {:?}, {} mines to place",
            config.size,
            config.mines
        );
        Ok(Self {
            mine_mask: Array2::default(config.size.to_nd_index()),
            mine_count: config.mines,
        })
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    /// Replaces all mines with `mine_count()` freshly sampled ones, none of them at `exclude`.
    ///
    /// Cells are sampled uniformly and resampled on collision with a placed mine or the excluded
    /// cell. That is only cheap while mines stay sparse, which the density bound of
    /// [`GameConfig`] guarantees for generated layouts. Layouts built from a denser grid are
    /// still accepted as long as a free cell is left.
    pub fn populate<R: Rng + ?Sized>(&mut self, exclude: Coord2, rng: &mut R) -> Result<()> {
        let exclude = self.validate_coords(exclude)?;
        if self.mine_count >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }
        if self.mine_count > self.game_config().mine_limit() {
            log::warn!(
                "Populating a dense layout, {} mines in {} cells",
                self.mine_count,
                self.total_cells()
            );
        }

        self.clear();

        let (rows, cols) = self.size();
        let mut placed: CellCount = 0;
        let mut rejected: u64 = 0;
        while placed < self.mine_count {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if coords == exclude || self[coords] {
                rejected += 1;
                continue;
            }
            self[coords] = true;
            placed += 1;
        }

        log::debug!(
            "Placed {} mines avoiding {:?}, {} samples rejected",
            placed,
            exclude,
            rejected
        );
        Ok(())
    }

    pub fn populate_seeded(&mut self, exclude: Coord2, seed: u64) -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.populate(exclude, &mut rng)
    }

    /// Removes every mine, `mine_count()` is left alone.
    pub fn clear(&mut self) {
        self.mine_mask.fill(false);
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_range(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn in_range(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = self.size();
        row < rows && col < cols
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        // dimensions are checked against `Coord` on construction
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        cell_total(self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Number of mines currently in the grid, which may differ from `mine_count()`.
    pub fn actual_mine_count(&self) -> CellCount {
        self.iter_mines().count() as CellCount
    }

    /// Out-of-range coordinates simply have no mine.
    pub fn has_mine(&self, coords: Coord2) -> bool {
        self.in_range(coords) && self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> Result<u8> {
        let coords = self.validate_coords(coords)?;
        Ok(self.count_adjacent(coords))
    }

    pub(crate) fn count_adjacent(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }

    /// Whether this layout is still waiting for [`MineLayout::populate`] to place its mines.
    pub fn awaiting_population(&self) -> bool {
        self.mine_count > 0 && self.iter_mines().next().is_none()
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub(crate) fn mine_mask(&self) -> &Array2<bool> {
        &self.mine_mask
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.size())
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.mine_mask[coords.to_nd_index()]
    }
}

/// Row-major dump, `*` for a mine and `.` for an empty cell, one line per row.
impl fmt::Display for MineLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.mine_mask.rows().into_iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for &is_mine in row {
                f.write_str(if is_mine { "*" } else { "." })?;
            }
        }
        Ok(())
    }
}

impl FromStr for MineLayout {
    type Err = GameError;

    fn from_str(dump: &str) -> Result<Self> {
        let rows = dump
            .lines()
            .map(|line| {
                line.trim()
                    .chars()
                    .map(|ch| match ch {
                        '*' => Ok(true),
                        '.' => Ok(false),
                        other => Err(GameError::Snapshot(format!(
                            "unexpected character {other:?} in layout dump"
                        ))),
                    })
                    .collect::<Result<Vec<bool>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(&rows)
    }
}
