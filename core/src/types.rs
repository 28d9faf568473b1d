use ndarray::Array2;

/// Row or column index, also used for row/column counts.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`, both starting from zero.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a `rows x cols` grid, cannot overflow since both axes are `u16`.
pub const fn cell_total((rows, cols): Coord2) -> CellCount {
    rows as CellCount * cols as CellCount
}

/// Shape of an `Array2` as `(rows, cols)`, `None` when an axis does not fit in [`Coord`].
pub(crate) fn shape_of<T>(array: &Array2<T>) -> Option<Coord2> {
    let (rows, cols) = array.dim();
    Some((rows.try_into().ok()?, cols.try_into().ok()?))
}

/// Cells touching `center` on a `rows x cols` grid, in row-major order.
///
/// Walks the clipped 3x3 block around the center and skips the center itself, so edge and
/// corner cells yield 5 and 3 neighbours. A center outside the grid yields nothing.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    next: Option<Coord2>,
    first_col: Coord,
    last: Coord2,
}

impl Neighbors {
    pub fn new(center: Coord2, (rows, cols): Coord2) -> Self {
        let (row, col) = center;
        let in_grid = row < rows && col < cols;
        let first = (row.saturating_sub(1), col.saturating_sub(1));
        let last = (
            row.saturating_add(1).min(rows.saturating_sub(1)),
            col.saturating_add(1).min(cols.saturating_sub(1)),
        );
        Self {
            center,
            next: in_grid.then_some(first),
            first_col: first.1,
            last,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (row, col) = self.next?;
            self.next = if col < self.last.1 {
                Some((row, col + 1))
            } else if row < self.last.0 {
                Some((row + 1, self.first_col))
            } else {
                None
            };

            if (row, col) != self.center {
                return Some((row, col));
            }
        }
    }
}
