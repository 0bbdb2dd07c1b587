use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use crate::dual_vec::DualVec;
use crate::float::Float;

// ──────────────────────────────────────────────
//  DualVec<F, N> operators
// ──────────────────────────────────────────────

impl<F: Float, const N: usize> Add for DualVec<F, N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        DualVec {
            re: self.re + rhs.re,
            eps: std::array::from_fn(|k| self.eps[k] + rhs.eps[k]),
        }
    }
}

impl<F: Float, const N: usize> Sub for DualVec<F, N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        DualVec {
            re: self.re - rhs.re,
            eps: std::array::from_fn(|k| self.eps[k] - rhs.eps[k]),
        }
    }
}

impl<F: Float, const N: usize> Mul for DualVec<F, N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        DualVec {
            re: self.re * rhs.re,
            eps: std::array::from_fn(|k| self.re * rhs.eps[k] + self.eps[k] * rhs.re),
        }
    }
}

impl<F: Float, const N: usize> Div for DualVec<F, N> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = F::one() / rhs.re;
        DualVec {
            re: self.re * inv,
            eps: std::array::from_fn(|k| (self.eps[k] * rhs.re - self.re * rhs.eps[k]) * inv * inv),
        }
    }
}

impl<F: Float, const N: usize> Neg for DualVec<F, N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        DualVec {
            re: -self.re,
            eps: std::array::from_fn(|k| -self.eps[k]),
        }
    }
}

impl<F: Float, const N: usize> Rem for DualVec<F, N> {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        DualVec {
            re: self.re % rhs.re,
            eps: self.eps,
        }
    }
}

impl<F: Float, const N: usize> AddAssign for DualVec<F, N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float, const N: usize> SubAssign for DualVec<F, N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Float, const N: usize> MulAssign for DualVec<F, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<F: Float, const N: usize> DivAssign for DualVec<F, N> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<F: Float, const N: usize> RemAssign for DualVec<F, N> {
    #[inline]
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl<F: Float, const N: usize> PartialEq for DualVec<F, N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re
    }
}

impl<F: Float, const N: usize> PartialOrd for DualVec<F, N> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.re.partial_cmp(&other.re)
    }
}
