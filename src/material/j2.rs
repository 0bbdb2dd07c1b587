//! Small-strain J2 plasticity with radial-return mapping.

use crate::api::get_value;
use crate::dual::Dual;
use crate::scalar::Scalar;
use crate::tensor::{lift, Mat3};

use super::hardening::HardeningLaw;
use super::solver::{implicit_correct, solve_scalar};
use super::{Material, MaterialError};

/// History record for [`J2SmallStrain`].
///
/// `eqps` is monotonically non-decreasing; `plastic_strain` is trace-free
/// (the flow rule is deviatoric). The pristine state is all zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct J2State {
    /// Accumulated equivalent plastic strain.
    pub eqps: f64,
    /// Plastic strain tensor.
    pub plastic_strain: Mat3<f64>,
}

/// Small-strain J2 plasticity: additive elastic/plastic strain split,
/// von Mises yield surface, associated (radial-return) flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct J2SmallStrain<H: HardeningLaw> {
    /// Young's modulus.
    pub youngs_modulus: f64,
    /// Poisson's ratio.
    pub poisson_ratio: f64,
    /// Hardening law giving the flow stress.
    pub hardening: H,
    /// Mass density (carried for the surrounding physics; unused here).
    pub density: f64,
}

impl<H: HardeningLaw> J2SmallStrain<H> {
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poisson_ratio))
    }

    pub fn bulk_modulus(&self) -> f64 {
        self.youngs_modulus / (3.0 * (1.0 - 2.0 * self.poisson_ratio))
    }
}

/// Radial return in deviatoric-stress space, shared by the small-strain and
/// finite-deformation models: given the trial von Mises stress `q` and the
/// old accumulated plastic strain, solve the consistency condition
///
/// `q − 3G·Δeqps − σ_f(eqps_old + Δeqps) = 0`
///
/// for the plastic-strain increment. The solve runs on primal values; the
/// returned increment carries the implicit tangent of the seeded inputs.
pub(crate) fn radial_return<T, H>(
    q_trial: T,
    eqps_old: f64,
    three_g: f64,
    hardening: &H,
) -> Result<T, MaterialError>
where
    T: Scalar<Float = f64>,
    H: HardeningLaw,
{
    let q = q_trial.value();
    let residual = |de: Dual<f64>| {
        Dual::constant(q) - Dual::constant(three_g) * de
            - hardening.flow_stress(Dual::constant(eqps_old) + de)
    };

    // The residual is positive at zero increment (the trial state is outside
    // the surface) and negative at q/3G, so the root is bracketed.
    let (de_star, slope) = solve_scalar(residual, 0.0, 0.0, q / three_g, 1e-12 * q)?;

    let residual_t = q_trial
        - T::from_f(three_g) * T::from_f(de_star)
        - hardening.flow_stress(T::from_f(eqps_old + de_star));
    Ok(implicit_correct(de_star, slope, residual_t))
}

impl<H: HardeningLaw> Material for J2SmallStrain<H> {
    type State = J2State;

    fn stress<T: Scalar<Float = f64>>(
        &self,
        state: &mut J2State,
        du_dx: &Mat3<T>,
    ) -> Result<Mat3<T>, MaterialError> {
        let g = self.shear_modulus();
        let k = self.bulk_modulus();
        let sqrt_3_2 = T::from_f(1.5f64.sqrt());

        let strain = du_dx.sym();
        let volumetric = Mat3::identity() * (T::from_f(k) * strain.trace());

        // Elastic predictor against the previous plastic strain.
        let s_trial = (strain - lift::<T>(&state.plastic_strain)).dev() * T::from_f(2.0 * g);
        let q_trial = s_trial.norm() * sqrt_3_2;

        if q_trial.value() <= self.hardening.flow_stress(state.eqps) {
            // Inside (or on) the yield surface: accept the trial state.
            return Ok(s_trial + volumetric);
        }

        // Plastic corrector.
        let de = radial_return(q_trial, state.eqps, 3.0 * g, &self.hardening)?;
        let direction = s_trial * (T::from_f(1.5) / q_trial);
        let s = s_trial - direction * (T::from_f(2.0 * g) * de);

        state.eqps += de.value();
        state.plastic_strain += get_value(&direction) * de.value();

        Ok(s + volumetric)
    }
}
