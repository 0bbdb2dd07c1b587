//! Shared test drivers: finite differences, a uniaxial stress test rig, and
//! a backward-Euler forward recorder for the adjoint tests.

#![allow(dead_code)]

use nalgebra::{DMatrix, DVector};
use pangolin::adjoint::{StepResidual, Trajectory};
use pangolin::material::Material;
use pangolin::{Dual, Mat3};

/// Central finite difference: (f(x+h) - f(x-h)) / 2h.
pub fn finite_diff(f: impl Fn(f64) -> f64, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x - h)) / (2.0 * h)
}

/// One committed step of the uniaxial stress rig.
pub struct UniaxialSample<S> {
    pub time: f64,
    pub strain: Mat3<f64>,
    pub stress: Mat3<f64>,
    pub state: S,
}

/// Drive a prescribed axial strain history under a uniaxial stress
/// constraint: per step, solve for the (equal) transverse normal strains so
/// the lateral stress vanishes, then commit the step to the history.
///
/// The transverse solve is a scalar Newton iteration whose derivative comes
/// from seeding both lateral entries of the input with a unit tangent.
pub fn uniaxial_stress_test<M: Material>(
    material: &M,
    state: &mut M::State,
    max_time: f64,
    steps: usize,
    axial_strain: impl Fn(f64) -> f64,
) -> Vec<UniaxialSample<M::State>> {
    let mut samples = Vec::with_capacity(steps);
    let mut transverse = 0.0_f64;

    for step in 1..=steps {
        let time = max_time * step as f64 / steps as f64;
        let axial = axial_strain(time);

        for _ in 0..40 {
            let h = Mat3::from_fn(|i, j| {
                if i != j {
                    Dual::constant(0.0)
                } else if i == 0 {
                    Dual::constant(axial)
                } else {
                    Dual::new(transverse, 1.0)
                }
            });
            let mut trial = state.clone();
            let sigma = material.stress(&mut trial, &h).expect("trial evaluation failed");
            let lateral = sigma[1][1];
            if lateral.re.abs() <= 1e-13 * (1.0 + sigma[0][0].re.abs()) {
                break;
            }
            transverse -= lateral.re / lateral.eps;
        }

        let h = Mat3::from_fn(|i, j| {
            if i != j {
                0.0
            } else if i == 0 {
                axial
            } else {
                transverse
            }
        });
        let stress = material.stress(state, &h).expect("commit evaluation failed");
        samples.push(UniaxialSample {
            time,
            strain: h,
            stress,
            state: state.clone(),
        });
    }
    samples
}

/// Run the forward pass for an implicit step relation: per step, Newton on
/// `r(u, u_prev) = 0` with the Jacobian from dual-seeded residual columns,
/// then advance the internal state and append to the trajectory.
pub fn record_forward<R: StepResidual>(
    model: &R,
    u0: DVector<f64>,
    internal0: R::Internal,
    params: &DVector<f64>,
    dts: &[f64],
) -> Trajectory<R::Internal> {
    let n = model.dim();
    let p_slice: Vec<f64> = params.iter().copied().collect();
    let mut trajectory = Trajectory::new(u0.clone(), internal0.clone());
    let mut u_prev = u0;
    let mut internal = internal0;

    for &dt in dts {
        let mut u = u_prev.clone();
        for _ in 0..50 {
            let prev_d: Vec<Dual<f64>> = u_prev.iter().map(|&v| Dual::constant(v)).collect();
            let p_d: Vec<Dual<f64>> = p_slice.iter().map(|&v| Dual::constant(v)).collect();
            let u_vec: Vec<f64> = u.iter().copied().collect();
            let (r, jac) = pangolin::jacobian(
                |ud| {
                    model
                        .residual(ud, &prev_d, &internal, &p_d, dt)
                        .expect("residual evaluation failed")
                },
                &u_vec,
            );
            let norm = r.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm <= 1e-12 {
                break;
            }
            let j = DMatrix::from_fn(n, n, |row, col| jac[row][col]);
            let rhs = DVector::from_vec(r);
            let delta = j.lu().solve(&rhs).expect("singular Jacobian in forward solve");
            u -= delta;
        }

        let u_slice: Vec<f64> = u.iter().copied().collect();
        let prev_slice: Vec<f64> = u_prev.iter().copied().collect();
        internal = model
            .advance_internal(&u_slice, &prev_slice, &internal, dt)
            .expect("internal state update failed");
        trajectory.push_step(dt, u.clone(), internal.clone());
        u_prev = u;
    }
    trajectory
}

/// Time-integrated quadratic objective, `Σ_i ½ dt_i ‖u_i‖²` over steps 1..N.
pub fn quadratic_qoi<S>(trajectory: &Trajectory<S>) -> f64 {
    (1..=trajectory.num_steps())
        .map(|i| 0.5 * trajectory.dt(i) * trajectory.state(i).dot(trajectory.state(i)))
        .sum()
}
