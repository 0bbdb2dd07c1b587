use approx::assert_relative_eq;
use pangolin::material::{
    HardeningLaw, J2SmallStrain, J2State, Material, PowerLawHardening, VoceHardening,
};
use pangolin::{get_gradient, make_dual, Dual, Mat3};

mod common;
use common::uniaxial_stress_test;

fn power_law_material() -> J2SmallStrain<PowerLawHardening> {
    J2SmallStrain {
        youngs_modulus: 1.0,
        poisson_ratio: 0.25,
        hardening: PowerLawHardening {
            sigma_y: 0.1,
            n: 2.0,
            eps0: 0.01,
        },
        density: 1.0,
    }
}

#[test]
fn power_law_hardening_works_with_duals() {
    let hardening = PowerLawHardening {
        sigma_y: 1.0,
        n: 2.0,
        eps0: 0.01,
    };
    let flow = hardening.flow_stress(Dual::variable(0.1));
    assert!(flow.re > 1.0);
    assert!(flow.eps > 0.0);
}

#[test]
fn voce_hardening_derivative_matches_finite_difference() {
    let hardening = VoceHardening {
        sigma_y: 0.5,
        sigma_sat: 1.5,
        strain_constant: 0.05,
    };
    let eqps = 0.02;
    let flow = hardening.flow_stress(Dual::variable(eqps));
    let expected = common::finite_diff(|e| hardening.flow_stress(e), eqps, 1e-7);
    assert_relative_eq!(flow.eps, expected, max_relative = 1e-6);
}

#[test]
fn satisfies_consistency() {
    let du_dx = Mat3([
        [0.7551559, 0.3129729, 0.12388372],
        [0.548188, 0.8851279, 0.30576992],
        [0.82008433, 0.95633745, 0.3566252],
    ]);
    let material = power_law_material();
    let mut state = J2State::default();
    let stress = material.stress(&mut state, &du_dx).unwrap();

    // The updated stress sits on the updated yield surface.
    let mises = 1.5_f64.sqrt() * stress.dev().norm();
    let flow = material.hardening.flow_stress(state.eqps);
    assert!((mises - flow).abs() <= 1e-9 * mises);

    // Elastic/plastic decomposition: dev σ = 2G·dev(sym(du_dx) − εp).
    let two_g = material.youngs_modulus / (1.0 + material.poisson_ratio);
    let s = (du_dx.sym() - state.plastic_strain).dev() * two_g;
    assert!((s - stress.dev()).norm() / s.norm() < 1e-9);
}

#[test]
fn uniaxial_matches_bilinear_solution() {
    let e = 1.0;
    let nu = 0.25;
    let sigma_y = 0.01;
    let hi = e / 100.0;
    let material = J2SmallStrain {
        youngs_modulus: e,
        poisson_ratio: nu,
        hardening: PowerLawHardening {
            sigma_y,
            n: 1.0,
            eps0: sigma_y / hi,
        },
        density: 1.0,
    };

    let mut state = J2State::default();
    let history = uniaxial_stress_test(&material, &mut state, 2.0, 3, |t| sigma_y / e * t);

    let stress_exact = |eps: f64| {
        if eps < sigma_y / e {
            e * eps
        } else {
            e / (e + hi) * (sigma_y + hi * eps)
        }
    };
    let plastic_strain_exact = |eps: f64| {
        if eps < sigma_y / e {
            0.0
        } else {
            (e * eps - sigma_y) / (e + hi)
        }
    };

    for sample in &history {
        let eps = sample.strain[0][0];
        let sigma = sample.stress[0][0];
        let pe = sample.state.plastic_strain[0][0];
        assert!((sigma - stress_exact(eps)).abs() <= 1e-9 * stress_exact(eps).abs());
        assert!((pe - plastic_strain_exact(eps)).abs() <= 1e-9 * plastic_strain_exact(eps).abs() + 1e-12);
    }
}

#[test]
fn accumulated_plastic_strain_is_monotone() {
    let material = power_law_material();
    let mut state = J2State::default();
    let mut previous_eqps = 0.0;

    // Load, unload, reload — eqps may stall but never decrease.
    let amplitudes = [0.0, 0.4, 0.8, 0.3, 0.0, 0.6, 1.2, 0.9];
    for &a in &amplitudes {
        let du_dx = Mat3([[0.0, a, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        material.stress(&mut state, &du_dx).unwrap();
        assert!(state.eqps >= previous_eqps);
        previous_eqps = state.eqps;
    }
}

#[test]
fn elastic_branch_leaves_history_untouched() {
    let material = power_law_material();
    let mut state = J2State::default();
    let du_dx = Mat3([
        [0.01, 0.002, 0.0],
        [0.002, -0.005, 0.001],
        [0.0, 0.001, 0.003],
    ]);
    let before = state;
    material.stress(&mut state, &du_dx).unwrap();
    assert_eq!(state, before);
}

#[test]
fn seeded_evaluation_updates_history_identically() {
    let material = power_law_material();
    let du_dx = Mat3([
        [0.3, 0.05, 0.0],
        [0.05, -0.1, 0.02],
        [0.0, 0.02, 0.15],
    ]);

    let mut plain_state = J2State::default();
    material.stress(&mut plain_state, &du_dx).unwrap();

    let mut dual_state = J2State::default();
    material.stress(&mut dual_state, &make_dual(&du_dx)).unwrap();

    assert_eq!(plain_state, dual_state);
}

#[test]
fn plastic_tangent_matches_finite_differences() {
    let material = power_law_material();
    let du_dx = Mat3([
        [0.30, 0.05, 0.01],
        [0.05, -0.12, 0.02],
        [0.01, 0.02, 0.18],
    ]);
    let direction = Mat3([
        [0.3, 0.4, 1.6],
        [2.0, 0.2, 0.3],
        [0.1, 1.7, 0.3],
    ]);

    let mut state = J2State::default();
    let stress_and_tangent = material.stress(&mut state, &make_dual(&du_dx)).unwrap();
    let tangent = get_gradient(&stress_and_tangent);
    assert!(state.eqps > 1e-3, "probe must be yielding");

    let epsilon = 1e-6;
    let probe = |sign: f64| {
        let h = Mat3::from_fn(|i, j| du_dx[i][j] + sign * epsilon * direction[i][j]);
        let mut fresh = J2State::default();
        let sigma = material.stress(&mut fresh, &h).unwrap();
        assert!(fresh.eqps > 1e-3, "probe left the yielding branch");
        sigma
    };
    let plus = probe(1.0);
    let minus = probe(-1.0);

    let dual_directional = tangent.double_dot(&direction);
    let fd_directional = Mat3::from_fn(|i, j| (plus[i][j] - minus[i][j]) / (2.0 * epsilon));
    assert!((dual_directional - fd_directional).norm() < 1e-5 * fd_directional.norm());
}
