/// The top-left pixel of a square region in an [`Image`](crate::Image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    /// Row, counted down from the top edge.
    pub row: usize,

    /// Column, counted right from the left edge.
    pub col: usize,
}

impl Coordinate {
    /// The top-left corner of the whole image.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// A new coordinate moved down by `rows` and right by `cols`.
    pub const fn offset(self, rows: usize, cols: usize) -> Self {
        Self {
            row: self.row + rows,
            col: self.col + cols,
        }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}
