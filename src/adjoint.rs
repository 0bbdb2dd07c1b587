//! Reverse-time adjoint sweep over a recorded forward trajectory.
//!
//! The forward pass records, per step, the step size, the end-of-step state
//! vector, and a snapshot of the per-point internal state entering the next
//! step. [`AdjointSweep`] then walks the steps in strict reverse order: at
//! step `i` it linearizes the step relation `r(u_i, u_{i−1}, p) = 0` by
//! dual-seeded evaluations against the retained snapshot, solves the
//! transposed system for the costate through a caller-supplied linear solver,
//! and accumulates parameter-gradient contributions. When the cursor reaches
//! step zero the carried costate is the initial-condition sensitivity.
//!
//! The trajectory is borrowed immutably for the lifetime of the sweep, so the
//! append-only-then-frozen invariant is enforced by the borrow checker.

use std::fmt;

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::dual::Dual;
use crate::material::MaterialError;
use crate::scalar::Scalar;

/// The implicit relation governing one time step,
/// `r(u_i, u_{i−1}, internal_{i−1}, p; dt) = 0`.
///
/// Written once, generically over [`Scalar`]: the forward solve evaluates it
/// on `f64`, the adjoint sweep re-evaluates it with dual-seeded inputs to
/// obtain exact Jacobian columns — including through any return-mapping
/// solve inside a constitutive evaluation.
pub trait StepResidual: Sync {
    /// Internal-state snapshot consumed read-only by each step's relation.
    type Internal: Clone + Send + Sync;

    /// Number of state unknowns.
    fn dim(&self) -> usize;

    /// Number of parameters carried for sensitivity accumulation.
    fn num_params(&self) -> usize;

    /// Evaluate the step residual.
    fn residual<T: Scalar<Float = f64>>(
        &self,
        state: &[T],
        previous: &[T],
        internal: &Self::Internal,
        params: &[T],
        dt: f64,
    ) -> Result<Vec<T>, MaterialError>;

    /// Advance the internal state across one converged step.
    ///
    /// The default is a no-op for relations without history. Implementations
    /// with history must return the updated record — the trajectory carries
    /// it to the next step and to the backward sweep, so state threading is
    /// end-to-end.
    fn advance_internal(
        &self,
        state: &[f64],
        previous: &[f64],
        internal: &Self::Internal,
        dt: f64,
    ) -> Result<Self::Internal, MaterialError> {
        let _ = (state, previous, dt);
        Ok(internal.clone())
    }
}

/// One retained forward step.
#[derive(Clone, Debug)]
pub struct StepRecord<S> {
    /// Step size.
    pub dt: f64,
    /// End-of-step state vector.
    pub state: DVector<f64>,
    /// Internal-state snapshot after this step.
    pub internal: S,
}

/// Append-only record of a forward trajectory: the initial state plus one
/// [`StepRecord`] per step taken.
#[derive(Clone, Debug)]
pub struct Trajectory<S = ()> {
    initial_state: DVector<f64>,
    initial_internal: S,
    steps: Vec<StepRecord<S>>,
}

impl<S> Trajectory<S> {
    pub fn new(initial_state: DVector<f64>, initial_internal: S) -> Self {
        Trajectory {
            initial_state,
            initial_internal,
            steps: Vec::new(),
        }
    }

    /// Append one step. Only valid during the forward pass; a sweep holds the
    /// trajectory by shared reference, so appends are impossible mid-sweep.
    pub fn push_step(&mut self, dt: f64, state: DVector<f64>, internal: S) {
        self.steps.push(StepRecord {
            dt,
            state,
            internal,
        });
    }

    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// State at step `step`; index 0 is the initial state.
    pub fn state(&self, step: usize) -> &DVector<f64> {
        if step == 0 {
            &self.initial_state
        } else {
            &self.steps[step - 1].state
        }
    }

    /// Internal-state snapshot at step `step`; index 0 is the initial record.
    pub fn internal(&self, step: usize) -> &S {
        if step == 0 {
            &self.initial_internal
        } else {
            &self.steps[step - 1].internal
        }
    }

    /// Step size of step `step` (1-based, matching [`state`](Self::state)).
    pub fn dt(&self, step: usize) -> f64 {
        self.steps[step - 1].dt
    }
}

/// Errors raised by the adjoint controller.
#[derive(Clone, Debug, PartialEq)]
pub enum AdjointError {
    /// `reverse_step` called with the cursor already at step zero.
    SweepExhausted,
    /// A finalized quantity was read before the sweep reached step zero.
    SweepIncomplete {
        /// Steps still to be reversed.
        remaining: usize,
    },
    /// A supplied vector does not match the field it perturbs.
    ShapeMismatch {
        expected: usize,
        got: usize,
    },
    /// The delegated transposed solve reported a singular system.
    LinearSolveFailed {
        step: usize,
    },
    /// A constitutive evaluation inside a linearization failed.
    Evaluation(MaterialError),
}

impl fmt::Display for AdjointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjointError::SweepExhausted => {
                write!(f, "reverse step requested past the start of the trajectory")
            }
            AdjointError::SweepIncomplete { remaining } => {
                write!(
                    f,
                    "sweep has {} steps remaining; sensitivities are not final",
                    remaining
                )
            }
            AdjointError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected length {}, got {}", expected, got)
            }
            AdjointError::LinearSolveFailed { step } => {
                write!(f, "transposed linear solve failed at step {}", step)
            }
            AdjointError::Evaluation(err) => write!(f, "evaluation failed: {}", err),
        }
    }
}

impl std::error::Error for AdjointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdjointError::Evaluation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MaterialError> for AdjointError {
    fn from(err: MaterialError) -> Self {
        AdjointError::Evaluation(err)
    }
}

/// Direct LU solver for the transposed systems, for callers without their own
/// linear-solve infrastructure.
pub fn lu_solver() -> impl FnMut(&DMatrix<f64>, &DVector<f64>) -> Option<DVector<f64>> {
    |matrix, rhs| matrix.clone().lu().solve(rhs)
}

/// The reverse-order state machine accumulating gradients of a
/// time-integrated objective.
pub struct AdjointSweep<'a, R: StepResidual, L> {
    model: &'a R,
    trajectory: &'a Trajectory<R::Internal>,
    params: DVector<f64>,
    solve: L,
    cursor: usize,
    costate: DVector<f64>,
    carry: DVector<f64>,
    step_param_sensitivity: DVector<f64>,
    param_sensitivity: DVector<f64>,
}

impl<'a, R, L> AdjointSweep<'a, R, L>
where
    R: StepResidual,
    L: FnMut(&DMatrix<f64>, &DVector<f64>) -> Option<DVector<f64>>,
{
    /// Start a sweep at the final step of the trajectory.
    ///
    /// `params` are the parameter values the forward pass ran with; `solve`
    /// performs the transposed linear solves (see [`lu_solver`]).
    pub fn new(
        model: &'a R,
        trajectory: &'a Trajectory<R::Internal>,
        params: DVector<f64>,
        solve: L,
    ) -> Result<Self, AdjointError> {
        let dim = model.dim();
        if params.len() != model.num_params() {
            return Err(AdjointError::ShapeMismatch {
                expected: model.num_params(),
                got: params.len(),
            });
        }
        for step in 0..=trajectory.num_steps() {
            let state = trajectory.state(step);
            if state.len() != dim {
                return Err(AdjointError::ShapeMismatch {
                    expected: dim,
                    got: state.len(),
                });
            }
        }
        Ok(AdjointSweep {
            model,
            trajectory,
            params,
            solve,
            cursor: trajectory.num_steps(),
            costate: DVector::zeros(dim),
            carry: DVector::zeros(dim),
            step_param_sensitivity: DVector::zeros(model.num_params()),
            param_sensitivity: DVector::zeros(model.num_params()),
        })
    }

    /// Index of the step the next `reverse_step` call will process.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Costate solved at the most recent reverse step.
    pub fn costate(&self) -> &DVector<f64> {
        &self.costate
    }

    /// Process one step in reverse.
    ///
    /// `load` is the adjoint load for the current step: the gradient of the
    /// step-local objective contribution with respect to that step's state.
    /// Steps must be consumed in strict reverse order; calling past step zero
    /// is a contract violation.
    pub fn reverse_step(&mut self, load: &DVector<f64>) -> Result<(), AdjointError> {
        if self.cursor == 0 {
            return Err(AdjointError::SweepExhausted);
        }
        let dim = self.model.dim();
        if load.len() != dim {
            return Err(AdjointError::ShapeMismatch {
                expected: dim,
                got: load.len(),
            });
        }

        let step = self.cursor;
        let state = self.trajectory.state(step);
        let previous = self.trajectory.state(step - 1);
        let internal = self.trajectory.internal(step - 1);
        let dt = self.trajectory.dt(step);

        let (d_state, d_previous, d_params) =
            linearize(self.model, state, previous, internal, &self.params, dt)?;

        let rhs = load + &self.carry;
        let costate = (self.solve)(&d_state.transpose(), &rhs)
            .ok_or(AdjointError::LinearSolveFailed { step })?;

        self.carry = -(d_previous.transpose() * &costate);
        self.step_param_sensitivity = -(d_params.transpose() * &costate);
        self.param_sensitivity += &self.step_param_sensitivity;
        self.costate = costate;
        self.cursor -= 1;
        Ok(())
    }

    /// Parameter-gradient contribution of the most recent reverse step, for
    /// callers that accumulate externally.
    pub fn step_parameter_sensitivity(&self) -> &DVector<f64> {
        &self.step_param_sensitivity
    }

    /// Running parameter-gradient accumulator.
    pub fn parameter_sensitivity(&self) -> &DVector<f64> {
        &self.param_sensitivity
    }

    /// Gradient of the objective with respect to the initial state.
    ///
    /// Finalized only once the sweep has consumed every step.
    pub fn initial_condition_sensitivity(&self) -> Result<&DVector<f64>, AdjointError> {
        if self.cursor != 0 {
            return Err(AdjointError::SweepIncomplete {
                remaining: self.cursor,
            });
        }
        Ok(&self.carry)
    }
}

/// Assemble ∂r/∂u_i, ∂r/∂u_{i−1}, and ∂r/∂p at a retained snapshot, one
/// dual-seeded residual evaluation per column. Columns are independent, so
/// they run in parallel across points of the seeding index.
fn linearize<R: StepResidual>(
    model: &R,
    state: &DVector<f64>,
    previous: &DVector<f64>,
    internal: &R::Internal,
    params: &DVector<f64>,
    dt: f64,
) -> Result<(DMatrix<f64>, DMatrix<f64>, DMatrix<f64>), AdjointError> {
    let n = model.dim();
    let np = model.num_params();

    let columns: Result<Vec<Vec<f64>>, MaterialError> = (0..2 * n + np)
        .into_par_iter()
        .map(|var| {
            let seed = |values: &DVector<f64>, offset: usize| -> Vec<Dual<f64>> {
                values
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| {
                        if offset + j == var {
                            Dual::variable(v)
                        } else {
                            Dual::constant(v)
                        }
                    })
                    .collect()
            };
            let u = seed(state, 0);
            let u_prev = seed(previous, n);
            let p = seed(params, 2 * n);
            let residual = model.residual(&u, &u_prev, internal, &p, dt)?;
            Ok(residual.iter().map(|d| d.eps).collect())
        })
        .collect();
    let columns = columns?;

    let d_state = DMatrix::from_fn(n, n, |row, col| columns[col][row]);
    let d_previous = DMatrix::from_fn(n, n, |row, col| columns[n + col][row]);
    let d_params = DMatrix::from_fn(n, np, |row, col| columns[2 * n + col][row]);
    Ok((d_state, d_previous, d_params))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay;

    impl StepResidual for Decay {
        type Internal = ();

        fn dim(&self) -> usize {
            1
        }

        fn num_params(&self) -> usize {
            1
        }

        // Backward Euler for du/dt = -p·u.
        fn residual<T: Scalar<Float = f64>>(
            &self,
            state: &[T],
            previous: &[T],
            _internal: &(),
            params: &[T],
            dt: f64,
        ) -> Result<Vec<T>, MaterialError> {
            Ok(vec![
                (state[0] - previous[0]) * T::from_f(1.0 / dt) + params[0] * state[0],
            ])
        }
    }

    fn record_two_steps() -> Trajectory<()> {
        // u_{i} = u_{i-1} / (1 + p dt), p = 2, dt = 0.1, u0 = 1.
        let p = 2.0;
        let dt = 0.1;
        let mut trajectory = Trajectory::new(DVector::from_element(1, 1.0), ());
        let u1 = 1.0 / (1.0 + p * dt);
        let u2 = u1 / (1.0 + p * dt);
        trajectory.push_step(dt, DVector::from_element(1, u1), ());
        trajectory.push_step(dt, DVector::from_element(1, u2), ());
        trajectory
    }

    #[test]
    fn strict_reverse_order_contract() {
        let model = Decay;
        let trajectory = record_two_steps();
        let mut sweep =
            AdjointSweep::new(&model, &trajectory, DVector::from_element(1, 2.0), lu_solver())
                .unwrap();

        assert_eq!(sweep.cursor(), 2);
        assert!(matches!(
            sweep.initial_condition_sensitivity(),
            Err(AdjointError::SweepIncomplete { remaining: 2 })
        ));

        let bad_load = DVector::zeros(3);
        assert!(matches!(
            sweep.reverse_step(&bad_load),
            Err(AdjointError::ShapeMismatch { expected: 1, got: 3 })
        ));

        let load = DVector::zeros(1);
        sweep.reverse_step(&load).unwrap();
        sweep.reverse_step(&load).unwrap();
        assert_eq!(sweep.cursor(), 0);
        assert!(matches!(
            sweep.reverse_step(&load),
            Err(AdjointError::SweepExhausted)
        ));
        assert!(sweep.initial_condition_sensitivity().is_ok());
    }

    #[test]
    fn linear_decay_terminal_objective_gradient() {
        // J = u_N: loads are [0, ..., 0, 1]. For the backward Euler decay,
        // u_N = u_0 / (1 + p dt)^N, so dJ/du_0 = 1/(1 + p dt)^N.
        let model = Decay;
        let trajectory = record_two_steps();
        let mut sweep =
            AdjointSweep::new(&model, &trajectory, DVector::from_element(1, 2.0), lu_solver())
                .unwrap();

        sweep.reverse_step(&DVector::from_element(1, 1.0)).unwrap();
        sweep.reverse_step(&DVector::zeros(1)).unwrap();

        let expected: f64 = 1.0 / (1.0_f64 + 2.0 * 0.1).powi(2);
        let grad = sweep.initial_condition_sensitivity().unwrap();
        assert!((grad[0] - expected).abs() < 1e-12);
    }
}
