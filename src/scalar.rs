//! The [`Scalar`] trait for writing AD-generic numeric code.
//!
//! Constitutive models and step residuals are written once as
//! `fn f<T: Scalar>(x: T) -> T` and evaluate transparently on plain `f64`,
//! `Dual<f64>` (one tangent direction), or `DualVec<f64, N>` (N directions).

use std::fmt::{Debug, Display};

use num_traits::FromPrimitive;

use crate::dual::Dual;
use crate::dual_vec::DualVec;
use crate::float::Float;

/// The central trait for AD-generic numeric code.
///
/// Material models constrain to `T: Scalar<Float = f64>`: parameters stay
/// plain floats (lifted with [`from_f`](Scalar::from_f)) while the kinematic
/// input decides whether tangents are carried.
pub trait Scalar:
    num_traits::Float
    + num_traits::FloatConst
    + FromPrimitive
    + Copy
    + Default
    + Debug
    + Display
    + Send
    + 'static
{
    /// The underlying primitive float type.
    type Float: Float;

    /// Lift a plain float to this scalar (constant — zero derivative).
    fn from_f(val: Self::Float) -> Self;

    /// Extract the primal value.
    fn value(&self) -> Self::Float;
}

impl Scalar for f32 {
    type Float = f32;

    #[inline]
    fn from_f(val: f32) -> Self {
        val
    }

    #[inline]
    fn value(&self) -> f32 {
        *self
    }
}

impl Scalar for f64 {
    type Float = f64;

    #[inline]
    fn from_f(val: f64) -> Self {
        val
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }
}

impl<F: Float> Scalar for Dual<F> {
    type Float = F;

    #[inline]
    fn from_f(val: F) -> Self {
        Dual::constant(val)
    }

    #[inline]
    fn value(&self) -> F {
        self.re
    }
}

impl<F: Float, const N: usize> Scalar for DualVec<F, N> {
    type Float = F;

    #[inline]
    fn from_f(val: F) -> Self {
        DualVec::constant(val)
    }

    #[inline]
    fn value(&self) -> F {
        self.re
    }
}
