use std::ops::Neg;

use crate::error::GResult;
use crate::method::Scalar;
use crate::Matrix;

// Element-wise ops. An owned left operand is updated in place and returned.
macro_rules! impl_binary_op {
    ($trt:ident, $mth:ident, $assign:ident) => {
        impl<T: Scalar> std::ops::$trt<&Matrix<T>> for Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(mut self, rhs: &Matrix<T>) -> Self::Output {
                self.$assign(rhs)?;
                Ok(self)
            }
        }

        impl<T: Scalar> std::ops::$trt<Matrix<T>> for Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(self, rhs: Matrix<T>) -> Self::Output {
                std::ops::$trt::$mth(self, &rhs)
            }
        }

        impl<T: Scalar> std::ops::$trt<&Matrix<T>> for &Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(self, rhs: &Matrix<T>) -> Self::Output {
                std::ops::$trt::$mth(self.clone(), rhs)
            }
        }

        impl<T: Scalar> std::ops::$trt<Matrix<T>> for &Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(self, rhs: Matrix<T>) -> Self::Output {
                std::ops::$trt::$mth(self.clone(), &rhs)
            }
        }
    };
}

macro_rules! impl_product_op {
    ($trt:ident, $mth:ident, $f:ident) => {
        impl<T: Scalar> std::ops::$trt<&Matrix<T>> for &Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(self, rhs: &Matrix<T>) -> Self::Output {
                self.$f(rhs)
            }
        }

        impl<T: Scalar> std::ops::$trt<Matrix<T>> for &Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(self, rhs: Matrix<T>) -> Self::Output {
                self.$f(&rhs)
            }
        }

        impl<T: Scalar> std::ops::$trt<&Matrix<T>> for Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(self, rhs: &Matrix<T>) -> Self::Output {
                self.$f(rhs)
            }
        }

        impl<T: Scalar> std::ops::$trt<Matrix<T>> for Matrix<T> {
            type Output = GResult<Matrix<T>>;
            fn $mth(self, rhs: Matrix<T>) -> Self::Output {
                self.$f(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, try_add_assign); // +
impl_binary_op!(Sub, sub, try_sub_assign); // -
impl_product_op!(Mul, mul, try_mul); // *

fn negate<T: Scalar + Neg<Output = T>>(m: &mut Matrix<T>) {
    for x in m.as_mut_slice() {
        *x = -*x;
    }
}

/// `-&mut m` negates `m` itself and returns a copy of the result.
impl<T: Scalar + Neg<Output = T>> Neg for &mut Matrix<T> {
    type Output = Matrix<T>;
    fn neg(self) -> Matrix<T> {
        negate(self);
        self.clone()
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for Matrix<T> {
    type Output = Matrix<T>;
    fn neg(mut self) -> Matrix<T> {
        negate(&mut self);
        self
    }
}
