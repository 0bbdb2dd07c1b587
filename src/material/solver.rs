//! Scalar nonlinear solve for the return mapping, with implicit-function
//! tangent recovery.
//!
//! The consistency condition is solved on primal values only; the derivative
//! of the converged unknown with respect to seeded inputs is recovered by
//! re-evaluating the residual once with dual-valued arguments and applying a
//! single correction step. The Newton iteration itself is never
//! differentiated.

use crate::dual::Dual;
use crate::scalar::Scalar;

use super::MaterialError;

/// Iteration cap for the local Newton solve.
pub(crate) const MAX_ITERATIONS: usize = 25;

/// Solve `f(x) = 0` on the bracket `[lo, hi]` by Newton iteration with
/// bisection fallback, starting from `x0`.
///
/// `f` is evaluated on a one-lane dual variable, so each iterate gets the
/// exact local derivative. Requires `f(lo) ≥ 0 ≥ f(hi)` (the residual is
/// monotonically decreasing across the bracket, as the consistency condition
/// is in the plastic-strain increment).
///
/// Returns `(root, f'(root))`.
pub(crate) fn solve_scalar(
    f: impl Fn(Dual<f64>) -> Dual<f64>,
    x0: f64,
    lo: f64,
    hi: f64,
    tol: f64,
) -> Result<(f64, f64), MaterialError> {
    let mut lo = lo;
    let mut hi = hi;
    let mut x = x0.clamp(lo, hi);
    let mut r = f(Dual::variable(x));

    for _ in 0..MAX_ITERATIONS {
        if r.re.abs() <= tol {
            return Ok((x, r.eps));
        }

        // Shrink the bracket around the sign change.
        if r.re > 0.0 {
            lo = x;
        } else {
            hi = x;
        }

        let newton = x - r.re / r.eps;
        x = if newton > lo && newton < hi && newton.is_finite() {
            newton
        } else {
            0.5 * (lo + hi)
        };
        r = f(Dual::variable(x));
    }

    Err(MaterialError::ReturnMappingFailed {
        iterations: MAX_ITERATIONS,
        residual: r.re.abs(),
    })
}

/// One implicit-function correction step: given the converged primal root
/// `x*`, the residual slope `∂f/∂x` there, and the residual re-evaluated at
/// `x*` with dual-valued inputs (whose tangent is `∂f/∂inputs · input
/// tangents`), produce the dual-valued root
///
/// `x(T) = x* − f(x*; inputs) / (∂f/∂x)`.
///
/// The primal part is an extra Newton polish; the tangent part is exactly the
/// implicit derivative `−(∂f/∂inputs · u̇)/(∂f/∂x)`.
#[inline]
pub(crate) fn implicit_correct<T: Scalar<Float = f64>>(
    x_star: f64,
    slope: f64,
    residual_at_root: T,
) -> T {
    T::from_f(x_star) - residual_at_root / T::from_f(slope)
}
