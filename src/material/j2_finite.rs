//! Finite-deformation J2 plasticity.
//!
//! Multiplicative decomposition `F = Fe · Fp` with the inverse plastic
//! deformation tracked in state, logarithmic (Hencky) elastic strain, and an
//! exponential-map flow update. In log-strain space the return mapping is the
//! same radial return as the small-strain model, so the exact uniaxial
//! solution of small-strain plasticity carries over with log strain in place
//! of linear strain and Kirchhoff stress as the conjugate output.
//!
//! The elastic strain is assumed small (metal plasticity): the matrix log and
//! exp run through the range-reduced series in [`crate::tensor`].

use crate::api::get_value;
use crate::scalar::Scalar;
use crate::tensor::{det_a_plus_i_m1, exp_sym, lift, log_sym, Mat3};

use super::hardening::HardeningLaw;
use super::j2::radial_return;
use super::{Material, MaterialError};

/// History record for [`J2FiniteStrain`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiniteJ2State {
    /// Accumulated equivalent plastic strain.
    pub eqps: f64,
    /// Inverse plastic deformation, `Fp⁻¹`. Unimodular: the flow rule is
    /// isochoric, so plastic deformation preserves volume.
    pub fp_inv: Mat3<f64>,
}

impl Default for FiniteJ2State {
    fn default() -> Self {
        FiniteJ2State {
            eqps: 0.0,
            fp_inv: Mat3::identity(),
        }
    }
}

/// Finite-deformation J2 plasticity with Hencky elasticity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct J2FiniteStrain<H: HardeningLaw> {
    /// Young's modulus.
    pub youngs_modulus: f64,
    /// Poisson's ratio.
    pub poisson_ratio: f64,
    /// Hardening law giving the flow stress.
    pub hardening: H,
    /// Mass density (carried for the surrounding physics; unused here).
    pub density: f64,
}

impl<H: HardeningLaw> J2FiniteStrain<H> {
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poisson_ratio))
    }

    pub fn bulk_modulus(&self) -> f64 {
        self.youngs_modulus / (3.0 * (1.0 - 2.0 * self.poisson_ratio))
    }
}

impl<H: HardeningLaw> Material for J2FiniteStrain<H> {
    type State = FiniteJ2State;

    fn stress<T: Scalar<Float = f64>>(
        &self,
        state: &mut FiniteJ2State,
        du_dx: &Mat3<T>,
    ) -> Result<Mat3<T>, MaterialError> {
        let g = self.shear_modulus();
        let k = self.bulk_modulus();
        let sqrt_3_2 = T::from_f(1.5f64.sqrt());

        // Elastic predictor: freeze plastic flow and measure the trial
        // elastic Hencky strain from the left Cauchy-Green tensor.
        let f = Mat3::identity() + *du_dx;
        let fe_trial = f * lift::<T>(&state.fp_inv);
        let be_trial = fe_trial * fe_trial.transpose();
        let strain_trial = log_sym(&be_trial) * T::from_f(0.5);

        let volumetric = T::from_f(k) * strain_trial.trace();
        let s_trial = strain_trial.dev() * T::from_f(2.0 * g);
        let q_trial = s_trial.norm() * sqrt_3_2;

        let kirchhoff = if q_trial.value() <= self.hardening.flow_stress(state.eqps) {
            s_trial + Mat3::identity() * volumetric
        } else {
            let de = radial_return(q_trial, state.eqps, 3.0 * g, &self.hardening)?;
            let direction = s_trial * (T::from_f(1.5) / q_trial);
            let s = s_trial - direction * (T::from_f(2.0 * g) * de);

            // Exponential-map update: Fp ← exp(Δeqps·N)·Fp, i.e.
            // Fp⁻¹ ← Fp⁻¹·exp(−Δeqps·N). N is deviatoric, so the update is
            // volume-preserving.
            let increment = get_value(&direction) * (-de.value());
            state.fp_inv = state.fp_inv * exp_sym(&increment);
            state.eqps += de.value();

            s + Mat3::identity() * volumetric
        };

        // Report Cauchy stress: Kirchhoff over the Jacobian determinant.
        let jac = det_a_plus_i_m1(du_dx) + T::one();
        Ok(kirchhoff * jac.recip())
    }
}
