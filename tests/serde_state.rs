//! Byte-faithful persistence of internal-state records (feature `serde`).

#![cfg(feature = "serde")]

use pangolin::material::{
    FiniteJ2State, J2FiniteStrain, J2SmallStrain, J2State, Material, PowerLawHardening,
};
use pangolin::Mat3;

#[test]
fn j2_state_roundtrips_exactly() {
    let material = J2SmallStrain {
        youngs_modulus: 1.0,
        poisson_ratio: 0.25,
        hardening: PowerLawHardening {
            sigma_y: 0.05,
            n: 2.0,
            eps0: 0.01,
        },
        density: 1.0,
    };
    let mut state = J2State::default();
    let du_dx = Mat3([[0.2, 0.05, 0.0], [0.05, -0.1, 0.01], [0.0, 0.01, 0.08]]);
    material.stress(&mut state, &du_dx).unwrap();
    assert!(state.eqps > 0.0);

    let encoded = serde_json::to_string(&state).unwrap();
    let decoded: J2State = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, state);
}

#[test]
fn finite_j2_state_roundtrips_exactly() {
    let material = J2FiniteStrain {
        youngs_modulus: 1.0,
        poisson_ratio: 0.25,
        hardening: PowerLawHardening {
            sigma_y: 0.01,
            n: 1.0,
            eps0: 1.0,
        },
        density: 1.0,
    };
    let mut state = FiniteJ2State::default();
    let du_dx = Mat3([[0.03, 0.0, 0.0], [0.0, -0.012, 0.0], [0.0, 0.0, -0.012]]);
    material.stress(&mut state, &du_dx).unwrap();
    assert!(state.eqps > 0.0);

    let encoded = serde_json::to_string(&state).unwrap();
    let decoded: FiniteJ2State = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, state);
}
