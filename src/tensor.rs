//! Fixed-dimension tensor algebra over AD-generic scalars.
//!
//! [`Vec3`] and [`Mat3`] are plain component arrays generic over
//! [`Scalar`], so every operation — contraction, trace, determinant,
//! symmetric/deviatoric split, matrix log/exp — propagates dual components
//! through ordinary arithmetic. [`Tensor4`] holds the rank-4 derivative of a
//! rank-2 output with respect to a rank-2 input, extracted from a nine-lane
//! dual evaluation.
//!
//! Domain errors (a logarithm of a non-positive mean eigenvalue, an inverse
//! of a singular tensor) follow the scalar arithmetic's IEEE behavior: the
//! result goes non-finite and it is the caller's job to notice.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

use num_traits::NumCast;

use crate::float::Float;
use crate::scalar::Scalar;

/// Terms kept in the truncated `log(I + X)` series. Elastic stretches in the
/// intended regime keep ‖X‖ well below 0.1, where 12 terms reach round-off.
const LOG_SERIES_TERMS: usize = 12;
/// Terms kept in the truncated `exp(X)` series.
const EXP_SERIES_TERMS: usize = 12;

/// A vector in three dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3<T>(pub [T; 3]);

/// A rank-2 tensor in three dimensions, row-major.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mat3<T>(pub [[T; 3]; 3]);

/// A rank-4 tensor in three dimensions: the derivative of a rank-2 output
/// with respect to a rank-2 input, `self[i][j][k][l] = ∂out_ij/∂in_kl`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tensor4<F>(pub [[[[F; 3]; 3]; 3]; 3]);

// ──────────────────────────────────────────────
//  Vec3
// ──────────────────────────────────────────────

impl<T: Scalar> Vec3<T> {
    #[inline]
    pub fn zero() -> Self {
        Vec3([T::zero(); 3])
    }

    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        Vec3(std::array::from_fn(&mut f))
    }

    #[inline]
    pub fn dot(&self, rhs: &Vec3<T>) -> T {
        self.0[0] * rhs.0[0] + self.0[1] * rhs.0[1] + self.0[2] * rhs.0[2]
    }

    #[inline]
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    /// Outer product `a ⊗ b`.
    #[inline]
    pub fn outer(&self, rhs: &Vec3<T>) -> Mat3<T> {
        Mat3::from_fn(|i, j| self.0[i] * rhs.0[j])
    }
}

impl<T> Index<usize> for Vec3<T> {
    type Output = T;
    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.0[i]
    }
}

impl<T> IndexMut<usize> for Vec3<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.0[i]
    }
}

impl<T: Scalar> Add for Vec3<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Vec3::from_fn(|i| self.0[i] + rhs.0[i])
    }
}

impl<T: Scalar> Sub for Vec3<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Vec3::from_fn(|i| self.0[i] - rhs.0[i])
    }
}

impl<T: Scalar> Neg for Vec3<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Vec3::from_fn(|i| -self.0[i])
    }
}

impl<T: Scalar> Mul<T> for Vec3<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Vec3::from_fn(|i| self.0[i] * rhs)
    }
}

// ──────────────────────────────────────────────
//  Mat3
// ──────────────────────────────────────────────

impl<T> Mat3<T> {
    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        Mat3(std::array::from_fn(|i| std::array::from_fn(|j| f(i, j))))
    }
}

impl<T: Scalar> Mat3<T> {
    #[inline]
    pub fn zero() -> Self {
        Mat3([[T::zero(); 3]; 3])
    }

    #[inline]
    pub fn identity() -> Self {
        Mat3::from_fn(|i, j| if i == j { T::one() } else { T::zero() })
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Mat3::from_fn(|i, j| self.0[j][i])
    }

    #[inline]
    pub fn trace(&self) -> T {
        self.0[0][0] + self.0[1][1] + self.0[2][2]
    }

    pub fn det(&self) -> T {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Symmetric part, `(A + Aᵀ)/2`.
    #[inline]
    pub fn sym(&self) -> Self {
        let half: T = NumCast::from(0.5).unwrap();
        (*self + self.transpose()) * half
    }

    /// Deviatoric part, `A − tr(A)/3 · I`.
    #[inline]
    pub fn dev(&self) -> Self {
        let third: T = NumCast::from(1.0 / 3.0).unwrap();
        *self - Mat3::identity() * (self.trace() * third)
    }

    /// Full contraction `A : B = Σ A_ij B_ij`.
    pub fn inner(&self, rhs: &Mat3<T>) -> T {
        let mut sum = T::zero();
        for i in 0..3 {
            for j in 0..3 {
                sum = sum + self.0[i][j] * rhs.0[i][j];
            }
        }
        sum
    }

    /// Frobenius norm.
    #[inline]
    pub fn norm(&self) -> T {
        self.inner(self).sqrt()
    }

    /// Inverse via the adjugate. Singular input propagates as Inf/NaN.
    pub fn inverse(&self) -> Self {
        let m = &self.0;
        let inv_det = T::one() / self.det();
        let cof = |r1: usize, c1: usize, r2: usize, c2: usize| {
            m[r1][c1] * m[r2][c2] - m[r1][c2] * m[r2][c1]
        };
        Mat3([
            [
                cof(1, 1, 2, 2) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                cof(0, 1, 1, 2) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                cof(0, 0, 2, 2) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                cof(1, 0, 2, 1) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                cof(0, 0, 1, 1) * inv_det,
            ],
        ])
    }
}

impl<T> Index<usize> for Mat3<T> {
    type Output = [T; 3];
    #[inline]
    fn index(&self, i: usize) -> &[T; 3] {
        &self.0[i]
    }
}

impl<T> IndexMut<usize> for Mat3<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut [T; 3] {
        &mut self.0[i]
    }
}

impl<T: Scalar> Add for Mat3<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Mat3::from_fn(|i, j| self.0[i][j] + rhs.0[i][j])
    }
}

impl<T: Scalar> Sub for Mat3<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Mat3::from_fn(|i, j| self.0[i][j] - rhs.0[i][j])
    }
}

impl<T: Scalar> Neg for Mat3<T> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Mat3::from_fn(|i, j| -self.0[i][j])
    }
}

impl<T: Scalar> AddAssign for Mat3<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Scalar> SubAssign for Mat3<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Matrix product.
impl<T: Scalar> Mul for Mat3<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Mat3::from_fn(|i, j| {
            self.0[i][0] * rhs.0[0][j] + self.0[i][1] * rhs.0[1][j] + self.0[i][2] * rhs.0[2][j]
        })
    }
}

/// Matrix-vector product.
impl<T: Scalar> Mul<Vec3<T>> for Mat3<T> {
    type Output = Vec3<T>;
    fn mul(self, rhs: Vec3<T>) -> Vec3<T> {
        Vec3::from_fn(|i| {
            self.0[i][0] * rhs.0[0] + self.0[i][1] * rhs.0[1] + self.0[i][2] * rhs.0[2]
        })
    }
}

/// Scalar multiply (scalar on the right).
impl<T: Scalar> Mul<T> for Mat3<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Mat3::from_fn(|i, j| self.0[i][j] * rhs)
    }
}

/// Lift a primal tensor into an AD scalar type as a constant (zero tangents).
#[inline]
pub fn lift<T: Scalar>(m: &Mat3<T::Float>) -> Mat3<T> {
    Mat3::from_fn(|i, j| T::from_f(m.0[i][j]))
}

/// `det(A + I) − 1`, expanded in the invariants of `A` so that small
/// displacement gradients do not cancel against the leading 1.
pub fn det_a_plus_i_m1<T: Scalar>(a: &Mat3<T>) -> T {
    let half: T = NumCast::from(0.5).unwrap();
    let t1 = a.trace();
    let t2 = (*a * *a).trace();
    t1 + (t1 * t1 - t2) * half + a.det()
}

/// Logarithm of a symmetric positive-definite tensor near a spherical state.
///
/// Factors out the mean eigenvalue `c = tr(A)/3` (whose scalar `ln` carries
/// the IEEE domain behavior for degenerate input) and sums the alternating
/// series for `log(I + X)` on the remainder. Accurate to round-off for
/// spectral radius of `X` below ~0.1 — the elastic-strain regime of the
/// material models in this crate.
pub fn log_sym<T: Scalar>(a: &Mat3<T>) -> Mat3<T> {
    let third: T = NumCast::from(1.0 / 3.0).unwrap();
    let c = a.trace() * third;
    let x = *a * c.recip() - Mat3::identity();

    let mut power = x;
    let mut acc = x;
    for k in 2..=LOG_SERIES_TERMS {
        power = power * x;
        let coeff: T = NumCast::from(1.0 / k as f64).unwrap();
        if k % 2 == 0 {
            acc -= power * coeff;
        } else {
            acc += power * coeff;
        }
    }
    acc + Mat3::identity() * c.ln()
}

/// Exponential of a small tensor by truncated power series.
pub fn exp_sym<T: Scalar>(a: &Mat3<T>) -> Mat3<T> {
    let mut term = *a;
    let mut acc = Mat3::identity() + *a;
    for k in 2..=EXP_SERIES_TERMS {
        let coeff: T = NumCast::from(1.0 / k as f64).unwrap();
        term = term * *a * coeff;
        acc += term;
    }
    acc
}

// ──────────────────────────────────────────────
//  Tensor4
// ──────────────────────────────────────────────

impl<F: Float> Tensor4<F> {
    #[inline]
    pub fn zero() -> Self {
        Tensor4([[[[F::zero(); 3]; 3]; 3]; 3])
    }

    #[inline]
    pub fn from_fn(mut f: impl FnMut(usize, usize, usize, usize) -> F) -> Self {
        Tensor4(std::array::from_fn(|i| {
            std::array::from_fn(|j| std::array::from_fn(|k| std::array::from_fn(|l| f(i, j, k, l))))
        }))
    }

    /// Contraction over the trailing index pair: `C_ij = Σ_kl T_ijkl M_kl`.
    pub fn double_dot(&self, m: &Mat3<F>) -> Mat3<F> {
        Mat3::from_fn(|i, j| {
            let mut sum = F::zero();
            for k in 0..3 {
                for l in 0..3 {
                    sum = sum + self.0[i][j][k][l] * m.0[k][l];
                }
            }
            sum
        })
    }
}
