use pangolin::material::{J2SmallStrain, J2State, Material, MaterialError, PowerLawHardening};
use pangolin::store::StateStore;
use pangolin::Mat3;

fn material() -> J2SmallStrain<PowerLawHardening> {
    J2SmallStrain {
        youngs_modulus: 1.0,
        poisson_ratio: 0.25,
        hardening: PowerLawHardening {
            sigma_y: 0.05,
            n: 2.0,
            eps0: 0.01,
        },
        density: 1.0,
    }
}

fn inputs(points: usize) -> Vec<Mat3<f64>> {
    (0..points)
        .map(|p| {
            let a = 0.02 + 0.01 * p as f64;
            Mat3([[a, 0.3 * a, 0.0], [0.3 * a, -0.4 * a, 0.0], [0.0, 0.0, 0.1 * a]])
        })
        .collect()
}

#[test]
fn parallel_forward_step_matches_sequential() {
    let material = material();
    let kin = inputs(64);

    let mut sequential = StateStore::new(kin.len(), J2State::default());
    let responses_seq = sequential
        .evaluate(&kin, |state, input| material.stress(state, input))
        .unwrap();

    let mut parallel = StateStore::new(kin.len(), J2State::default());
    let responses_par = parallel
        .evaluate_par(&kin, |state, input| material.stress(state, input))
        .unwrap();

    assert_eq!(sequential, parallel);
    for (a, b) in responses_seq.iter().zip(responses_par.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn state_advances_across_steps_per_point() {
    let material = material();
    let kin = inputs(8);
    let mut store = StateStore::new(kin.len(), J2State::default());

    store
        .evaluate_par(&kin, |state, input| material.stress(state, input))
        .unwrap();
    let after_first = store.snapshot();

    // A second, larger step hardens every yielding point further.
    let kin2: Vec<Mat3<f64>> = kin.iter().map(|h| Mat3::from_fn(|i, j| 2.0 * h[i][j])).collect();
    store
        .evaluate_par(&kin2, |state, input| material.stress(state, input))
        .unwrap();

    for (point, old) in after_first.iter().enumerate() {
        assert!(store.get(point).eqps >= old.eqps);
    }
}

#[test]
fn parallel_step_propagates_point_failure() {
    // A non-finite input makes the trial von Mises stress NaN; the yield
    // comparison then keeps the elastic branch, so force a failure through a
    // synthetic evaluator instead.
    let kin = vec![1.0_f64; 16];
    let mut store = StateStore::new(kin.len(), 0.0_f64);
    let result: Result<Vec<f64>, MaterialError> = store.evaluate_par(&kin, |state, &input| {
        if *state == 0.0 && input == 1.0 {
            Err(MaterialError::ReturnMappingFailed {
                iterations: 25,
                residual: 1.0,
            })
        } else {
            Ok(input)
        }
    });
    assert!(result.is_err());
}

#[test]
fn snapshot_restore_roundtrip() {
    let material = material();
    let kin = inputs(8);
    let mut store = StateStore::new(kin.len(), J2State::default());
    store
        .evaluate(&kin, |state, input| material.stress(state, input))
        .unwrap();

    let checkpoint = store.snapshot();
    let kin2: Vec<Mat3<f64>> = kin.iter().map(|h| Mat3::from_fn(|i, j| 3.0 * h[i][j])).collect();
    store
        .evaluate(&kin2, |state, input| material.stress(state, input))
        .unwrap();
    assert_ne!(store.snapshot(), checkpoint);

    store.restore(&checkpoint);
    assert_eq!(store.snapshot(), checkpoint);
}
