use std::fmt::{Debug, Display};

use half::f16;
use num_traits::Num;

pub trait Scalar: Num + Copy + Default + PartialEq + Display + Debug {}

macro_rules! impl_scalar {
    ($($e:ident),*) => {
        $(impl Scalar for $e {})*
    };
}

impl_scalar!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl Scalar for f16 {}
