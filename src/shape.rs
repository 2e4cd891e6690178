use std::fmt;

use super::error::{GResult, SeqError};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> GResult<Shape> {
        // either 0 x 0 or both axes non-zero, and the element count must fit
        if (rows == 0) != (cols == 0) || rows.checked_mul(cols).is_none() {
            return Err(SeqError::InvalidDimensions { rows, cols });
        }
        Ok(Shape { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn elem_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn transposed(&self) -> Shape {
        Shape {
            rows: self.cols,
            cols: self.rows,
        }
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    // (row, col) is 1-based. Only the flattened offset is checked against the
    // element count, so an overlong column wraps onto the next row.
    pub(crate) fn flat_index(&self, row: usize, col: usize) -> GResult<usize> {
        let len = self.elem_count();
        let idx = isize::try_from(row)
            .ok()
            .zip(isize::try_from(col).ok())
            .zip(isize::try_from(self.cols).ok())
            .and_then(|((r, c), n)| (r - 1).checked_mul(n)?.checked_add(c - 1));
        match idx {
            Some(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
            Some(i) => Err(SeqError::OutOfRange { index: i, len }),
            None => Err(SeqError::OutOfRange {
                index: isize::MAX,
                len,
            }),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
