//! Hardening laws: flow stress as a function of accumulated plastic strain.

use crate::scalar::Scalar;

/// A hardening law gives the flow (yield) stress at a given accumulated
/// equivalent plastic strain. Written generically so the return mapping can
/// differentiate through it — both for its own local Newton iteration and for
/// the implicit tangent of a seeded evaluation.
pub trait HardeningLaw: Copy + Send + Sync {
    /// Flow stress at accumulated equivalent plastic strain `eqps`.
    fn flow_stress<T: Scalar<Float = f64>>(&self, eqps: T) -> T;
}

/// Power-law hardening: `σ_f = σ_y (1 + eqps/ε₀)^(1/n)`.
///
/// With `n = 1` and `ε₀ = σ_y/H` this reduces to linear hardening with
/// modulus `H`, which has a closed-form uniaxial solution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerLawHardening {
    /// Initial yield stress.
    pub sigma_y: f64,
    /// Hardening exponent.
    pub n: f64,
    /// Reference plastic strain.
    pub eps0: f64,
}

impl HardeningLaw for PowerLawHardening {
    fn flow_stress<T: Scalar<Float = f64>>(&self, eqps: T) -> T {
        let base = T::one() + eqps / T::from_f(self.eps0);
        T::from_f(self.sigma_y) * base.powf(T::from_f(1.0 / self.n))
    }
}

/// Voce saturation hardening:
/// `σ_f = σ_sat − (σ_sat − σ_y) exp(−eqps/ε₀)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoceHardening {
    /// Initial yield stress.
    pub sigma_y: f64,
    /// Saturation stress.
    pub sigma_sat: f64,
    /// Reference strain controlling how fast the law saturates.
    pub strain_constant: f64,
}

impl HardeningLaw for VoceHardening {
    fn flow_stress<T: Scalar<Float = f64>>(&self, eqps: T) -> T {
        let decay = (-eqps / T::from_f(self.strain_constant)).exp();
        T::from_f(self.sigma_sat) - T::from_f(self.sigma_sat - self.sigma_y) * decay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dual::Dual;

    #[test]
    fn power_law_reduces_to_linear_for_unit_exponent() {
        let h = PowerLawHardening {
            sigma_y: 0.01,
            n: 1.0,
            eps0: 1.0,
        };
        let eqps: f64 = 0.25;
        let expected = 0.01 * (1.0 + eqps);
        assert!((h.flow_stress(eqps) - expected).abs() < 1e-15);
    }

    #[test]
    fn voce_slope_decays() {
        let h = VoceHardening {
            sigma_y: 1.0,
            sigma_sat: 2.0,
            strain_constant: 0.1,
        };
        let d0 = h.flow_stress(Dual::variable(0.0)).eps;
        let d1 = h.flow_stress(Dual::variable(0.5)).eps;
        assert!(d0 > d1);
        assert!(d1 > 0.0);
    }
}
