use thiserror::Error;

use crate::shape::Shape;

pub type GResult<T> = Result<T, SeqError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeqError {
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: isize, len: usize },
    #[error("invalid dimensions {rows}x{cols}: rows and columns must be both zero or both non-zero")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("dimension mismatch in {op}: {lhs} vs {rhs}")]
    DimensionMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },
    #[error("invalid capacity {0}: must be at least 1")]
    InvalidCapacity(usize),
    #[error("invalid growth factor {0}: must be finite and greater than 1")]
    InvalidGrowthFactor(f64),
}

impl SeqError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        SeqError::OutOfRange {
            index: isize::try_from(index).unwrap_or(isize::MAX),
            len,
        }
    }
}
