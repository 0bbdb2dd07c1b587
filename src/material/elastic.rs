//! Closed-form elastic models.

use crate::scalar::Scalar;
use crate::tensor::{det_a_plus_i_m1, Mat3};

use super::{Material, MaterialError};

/// Small-strain isotropic linear elasticity:
/// `σ = λ tr(ε) I + 2G ε` with `ε = sym(du_dx)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearElastic {
    /// Young's modulus.
    pub youngs_modulus: f64,
    /// Poisson's ratio.
    pub poisson_ratio: f64,
    /// Mass density (carried for the surrounding physics; unused here).
    pub density: f64,
}

impl LinearElastic {
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poisson_ratio))
    }

    pub fn lame_lambda(&self) -> f64 {
        let e = self.youngs_modulus;
        let nu = self.poisson_ratio;
        e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu))
    }
}

impl Material for LinearElastic {
    type State = ();

    fn stress<T: Scalar<Float = f64>>(
        &self,
        _state: &mut (),
        du_dx: &Mat3<T>,
    ) -> Result<Mat3<T>, MaterialError> {
        let strain = du_dx.sym();
        let volumetric = Mat3::identity() * (T::from_f(self.lame_lambda()) * strain.trace());
        Ok(volumetric + strain * T::from_f(2.0 * self.shear_modulus()))
    }
}

/// Compressible neo-Hookean elasticity, reported as Cauchy stress:
/// `σ = (G (B − I) + λ ln(J) I) / J` with `B = F Fᵀ`, `J = det F`.
///
/// `ln J` is evaluated as `log1p(det(du_dx + I) − 1)` so small deformations
/// do not lose precision to cancellation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeoHookean {
    /// Young's modulus.
    pub youngs_modulus: f64,
    /// Poisson's ratio.
    pub poisson_ratio: f64,
    /// Mass density (carried for the surrounding physics; unused here).
    pub density: f64,
}

impl NeoHookean {
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poisson_ratio))
    }

    pub fn lame_lambda(&self) -> f64 {
        let e = self.youngs_modulus;
        let nu = self.poisson_ratio;
        e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu))
    }
}

impl Material for NeoHookean {
    type State = ();

    fn stress<T: Scalar<Float = f64>>(
        &self,
        _state: &mut (),
        du_dx: &Mat3<T>,
    ) -> Result<Mat3<T>, MaterialError> {
        let f = Mat3::identity() + *du_dx;
        let b = f * f.transpose();
        let j_m1 = det_a_plus_i_m1(du_dx);
        let jac = j_m1 + T::one();
        let log_j = j_m1.ln_1p();

        let deviatoric = (b - Mat3::identity()) * T::from_f(self.shear_modulus());
        let volumetric = Mat3::identity() * (T::from_f(self.lame_lambda()) * log_j);
        Ok((deviatoric + volumetric) * jac.recip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{get_gradient, make_dual};
    use crate::tensor::Mat3;

    #[test]
    fn stress_free_at_rest() {
        let nh = NeoHookean {
            youngs_modulus: 10.0,
            poisson_ratio: 0.3,
            density: 1.0,
        };
        let sigma = nh.stress(&mut (), &Mat3::<f64>::zero()).unwrap();
        assert!(sigma.norm() < 1e-14);

        let le = LinearElastic {
            youngs_modulus: 10.0,
            poisson_ratio: 0.3,
            density: 1.0,
        };
        let sigma = le.stress(&mut (), &Mat3::<f64>::zero()).unwrap();
        assert!(sigma.norm() < 1e-14);
    }

    #[test]
    fn neo_hookean_tangent_matches_finite_differences() {
        let nh = NeoHookean {
            youngs_modulus: 10.0,
            poisson_ratio: 0.3,
            density: 1.0,
        };
        let h = Mat3([
            [0.05, -0.02, 0.01],
            [0.03, 0.08, -0.01],
            [0.0, 0.02, -0.04],
        ]);
        let dh = Mat3([[0.6, 0.1, -0.3], [0.2, -0.5, 0.4], [0.1, 0.3, 0.2]]);

        let tangent = get_gradient(&nh.stress(&mut (), &make_dual(&h)).unwrap());
        let dual_directional = tangent.double_dot(&dh);

        let eps = 1e-6;
        let probe = |sign: f64| {
            let input = Mat3::from_fn(|i, j| h[i][j] + sign * eps * dh[i][j]);
            nh.stress(&mut (), &input).unwrap()
        };
        let plus = probe(1.0);
        let minus = probe(-1.0);
        let fd = Mat3::from_fn(|i, j| (plus[i][j] - minus[i][j]) / (2.0 * eps));

        assert!((dual_directional - fd).norm() < 1e-7 * fd.norm());
    }

    #[test]
    fn linear_elastic_uniaxial_strain() {
        let le = LinearElastic {
            youngs_modulus: 1.0,
            poisson_ratio: 0.25,
            density: 1.0,
        };
        let mut h = Mat3::<f64>::zero();
        h[0][0] = 1e-3;
        let sigma = le.stress(&mut (), &h).unwrap();
        let lambda = le.lame_lambda();
        let two_g = 2.0 * le.shear_modulus();
        assert!((sigma[0][0] - (lambda + two_g) * 1e-3).abs() < 1e-15);
        assert!((sigma[1][1] - lambda * 1e-3).abs() < 1e-15);
        assert!(sigma[0][1].abs() < 1e-15);
    }
}
