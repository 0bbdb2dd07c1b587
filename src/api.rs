//! Seeding and extraction entry points for dual-valued evaluations.

use crate::dual::Dual;
use crate::dual_vec::DualVec;
use crate::float::Float;
use crate::scalar::Scalar;
use crate::tensor::{Mat3, Tensor4};

/// Seed a rank-2 input with the nine-lane identity: component `(i, j)` gets a
/// unit tangent in lane `3i + j`. Evaluating a tensor function on the result
/// carries its full Jacobian, recovered with [`get_gradient`].
pub fn make_dual<F: Float>(m: &Mat3<F>) -> Mat3<DualVec<F, 9>> {
    Mat3::from_fn(|i, j| DualVec::with_tangent(m.0[i][j], 3 * i + j))
}

/// Extract the primal part of a dual-valued tensor.
pub fn get_value<T: Scalar>(m: &Mat3<T>) -> Mat3<T::Float> {
    Mat3::from_fn(|i, j| m.0[i][j].value())
}

/// Extract the rank-4 Jacobian from a nine-lane evaluation seeded by
/// [`make_dual`]: `out[i][j][k][l] = ∂f_ij/∂x_kl`.
pub fn get_gradient<F: Float>(m: &Mat3<DualVec<F, 9>>) -> Tensor4<F> {
    Tensor4::from_fn(|i, j, k, l| m.0[i][j].eps[3 * k + l])
}

/// Seed a rank-2 input with a single tangent direction `v`; the output's
/// `eps` components are the directional derivative `f'(x)·v`.
pub fn seed_direction<F: Float>(x: &Mat3<F>, v: &Mat3<F>) -> Mat3<Dual<F>> {
    Mat3::from_fn(|i, j| Dual::new(x.0[i][j], v.0[i][j]))
}

/// Jacobian-vector product (forward mode) on flat slices: `(f(x), J·v)`.
pub fn jvp<F: Float>(f: impl Fn(&[Dual<F>]) -> Vec<Dual<F>>, x: &[F], v: &[F]) -> (Vec<F>, Vec<F>) {
    assert_eq!(x.len(), v.len(), "x and v must have the same length");
    let inputs: Vec<Dual<F>> = x
        .iter()
        .zip(v.iter())
        .map(|(&xi, &vi)| Dual::new(xi, vi))
        .collect();
    let outputs = f(&inputs);
    let values = outputs.iter().map(|d| d.re).collect();
    let tangents = outputs.iter().map(|d| d.eps).collect();
    (values, tangents)
}

/// Full Jacobian of `f : R^n → R^m` by one forward pass per input variable.
///
/// Returns `(f(x), J)` where `J[i][j] = ∂f_i/∂x_j`.
pub fn jacobian<F: Float>(
    f: impl Fn(&[Dual<F>]) -> Vec<Dual<F>>,
    x: &[F],
) -> (Vec<F>, Vec<Vec<F>>) {
    let n = x.len();

    // First pass to get output dimension and values.
    let const_inputs: Vec<Dual<F>> = x.iter().map(|&xi| Dual::constant(xi)).collect();
    let const_outputs = f(&const_inputs);
    let m = const_outputs.len();
    let values: Vec<F> = const_outputs.iter().map(|d| d.re).collect();

    // One forward pass per input variable.
    let mut jac = vec![vec![F::zero(); n]; m];
    for j in 0..n {
        let inputs: Vec<Dual<F>> = x
            .iter()
            .enumerate()
            .map(|(k, &xi)| {
                if k == j {
                    Dual::variable(xi)
                } else {
                    Dual::constant(xi)
                }
            })
            .collect();
        let outputs = f(&inputs);
        for (row, out) in jac.iter_mut().zip(outputs.iter()) {
            row[j] = out.eps;
        }
    }

    (values, jac)
}
