use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use log::debug;

use crate::error::{GResult, SeqError};
use crate::method::Scalar;
use crate::sequence::GrowableSequence;
use crate::shape::Shape;

#[derive(Clone)]
pub struct Matrix<T> {
    shape: Shape,
    elems: GrowableSequence<T>,
}

impl<T: Scalar> Matrix<T> {
    pub fn new(rows: usize, cols: usize) -> GResult<Self> {
        let shape = Shape::new(rows, cols)?;
        debug!("new matrix {}", shape);
        Ok(Self::zeros(shape))
    }

    pub fn from_rows<const C: usize>(rows: &[[T; C]]) -> GResult<Self> {
        let mut m = Self::new(rows.len(), C)?;
        for (dst, src) in m.elems.iter_mut().zip(rows.iter().flatten()) {
            *dst = *src;
        }
        Ok(m)
    }

    fn zeros(shape: Shape) -> Self {
        let mut elems = GrowableSequence::new();
        elems.resize(shape.elem_count());
        Self { shape, elems }
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn columns(&self) -> usize {
        self.shape.cols()
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn as_slice(&self) -> &[T] {
        self.elems.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.elems.as_mut_slice()
    }

    /// Element at 1-based `(row, col)`. Only the flattened position is
    /// checked, so `(1, columns() + 1)` reads `(2, 1)`.
    pub fn at(&self, row: usize, col: usize) -> GResult<&T> {
        let idx = self.shape.flat_index(row, col)?;
        self.elems.element_at(idx)
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> GResult<&mut T> {
        let idx = self.shape.flat_index(row, col)?;
        self.elems.element_at_mut(idx)
    }

    pub fn transpose(&self) -> Self {
        let (s, ts) = (self.shape, self.shape.transposed());
        let mut mt = Self::zeros(ts);
        let src = self.as_slice();
        let dst = mt.as_mut_slice();
        for i in 0..s.rows() {
            for j in 0..s.cols() {
                dst[ts.offset(j, i)] = src[s.offset(i, j)];
            }
        }
        mt
    }

    pub fn pos(&self) -> Self {
        self.clone()
    }

    pub fn try_add_assign(&mut self, rhs: &Self) -> GResult<&mut Self> {
        self.check_same_shape("add", rhs)?;
        for (x, &y) in self.elems.iter_mut().zip(rhs.elems.iter()) {
            *x = *x + y;
        }
        Ok(self)
    }

    pub fn try_sub_assign(&mut self, rhs: &Self) -> GResult<&mut Self> {
        self.check_same_shape("sub", rhs)?;
        for (x, &y) in self.elems.iter_mut().zip(rhs.elems.iter()) {
            *x = *x - y;
        }
        Ok(self)
    }

    pub fn try_add(&self, rhs: &Self) -> GResult<Self> {
        let mut mr = self.clone();
        mr.try_add_assign(rhs)?;
        Ok(mr)
    }

    pub fn try_sub(&self, rhs: &Self) -> GResult<Self> {
        let mut mr = self.clone();
        mr.try_sub_assign(rhs)?;
        Ok(mr)
    }

    pub fn try_mul(&self, rhs: &Self) -> GResult<Self> {
        if self.columns() != rhs.rows() {
            return Err(SeqError::DimensionMismatch {
                op: "mul",
                lhs: self.shape,
                rhs: rhs.shape,
            });
        }
        let rs = Shape::new(self.rows(), rhs.columns())?;
        let mut mr = Self::zeros(rs);
        let (a, b) = (self.as_slice(), rhs.as_slice());
        let dst = mr.as_mut_slice();
        for i in 0..rs.rows() {
            for j in 0..rs.cols() {
                let mut val = T::zero();
                for k in 0..self.columns() {
                    val = val + a[self.shape.offset(i, k)] * b[rhs.shape.offset(k, j)];
                }
                dst[rs.offset(i, j)] = val;
            }
        }
        Ok(mr)
    }

    pub fn take(&mut self) -> Self {
        Self {
            shape: mem::take(&mut self.shape),
            elems: self.elems.take(),
        }
    }

    fn check_same_shape(&self, op: &'static str, rhs: &Self) -> GResult<()> {
        if self.shape != rhs.shape {
            return Err(SeqError::DimensionMismatch {
                op,
                lhs: self.shape,
                rhs: rhs.shape,
            });
        }
        Ok(())
    }
}

impl<T: Scalar> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.as_slice() == other.as_slice()
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.at(row, col) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        match self.at_mut(row, col) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: Scalar> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.as_slice().chunks_exact(self.columns().max(1)))
            .finish()
    }
}

impl<T: Scalar> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.as_slice().chunks_exact(self.columns().max(1)) {
            for x in row {
                write!(f, "{}\t", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
