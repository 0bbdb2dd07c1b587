//! Constitutive models for history-dependent material response.
//!
//! Every model is written once, generically over [`Scalar`], against the
//! tensor algebra in [`crate::tensor`]. Calling [`Material::stress`] with a
//! plain `f64` input gives the physical response; calling it with an input
//! seeded by [`make_dual`](crate::api::make_dual) additionally gives the
//! exact material tangent, including through the implicit return-mapping
//! solve of the plastic models.
//!
//! Internal state is owned by the caller and borrowed for the duration of one
//! call. History updates are written from primal values only, so a seeded
//! evaluation leaves exactly the same state behind as an unseeded one.

mod elastic;
mod hardening;
mod j2;
mod j2_finite;
mod solver;

pub use elastic::{LinearElastic, NeoHookean};
pub use hardening::{HardeningLaw, PowerLawHardening, VoceHardening};
pub use j2::{J2SmallStrain, J2State};
pub use j2_finite::{FiniteJ2State, J2FiniteStrain};

use std::fmt;

use crate::scalar::Scalar;
use crate::tensor::Mat3;

/// Errors raised by a constitutive evaluation.
///
/// Non-convergence of the local return-mapping solve is fatal for the
/// evaluation point: accepting an unconverged plastic state would corrupt all
/// downstream history and gradients, so it must surface as an error rather
/// than a stale value.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialError {
    /// The return-mapping Newton iteration hit its cap before the consistency
    /// residual met tolerance.
    ReturnMappingFailed {
        /// Iterations performed.
        iterations: usize,
        /// Residual magnitude at the last iterate.
        residual: f64,
    },
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::ReturnMappingFailed {
                iterations,
                residual,
            } => {
                write!(
                    f,
                    "return mapping failed to converge after {} iterations (residual {:e})",
                    iterations, residual
                )
            }
        }
    }
}

impl std::error::Error for MaterialError {}

/// A material model: maps a kinematic input and the point's history to a
/// stress response, updating the history in place.
///
/// For the small-strain models the input is the displacement gradient and the
/// output the Cauchy stress; the finite-deformation models also take the
/// displacement gradient (`F = I + du_dx`) and report Cauchy stress with the
/// Kirchhoff-to-Cauchy determinant correction applied.
pub trait Material {
    /// Per-point history record. `Default` is the pristine (unloaded) state.
    type State: Clone + Default + PartialEq + Send;

    /// Evaluate the stress response and advance the history.
    fn stress<T: Scalar<Float = f64>>(
        &self,
        state: &mut Self::State,
        du_dx: &Mat3<T>,
    ) -> Result<Mat3<T>, MaterialError>;
}
