use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for the scalar field underlying the dual types.
///
/// Bundles the numeric and utility traits needed throughout pangolin.
/// Implemented by the primitive floats (`f32`, `f64`) and, to allow nesting
/// for Hessian-vector products, by [`Dual`](crate::Dual) itself.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
}

impl Float for f32 {}
impl Float for f64 {}

// Nesting: Dual<Dual<F>> computes second-order directional derivatives.
impl<F: Float> Float for crate::dual::Dual<F> {}
