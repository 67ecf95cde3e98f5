use ising_core::RngHandle;
use ising_mcmc::{accept, acceptance_probability};
use proptest::prelude::*;

#[test]
fn downhill_moves_always_accept() {
    let mut rng = RngHandle::from_seed(3);
    for delta in [-5.0, -0.1, 0.0] {
        assert_eq!(acceptance_probability(delta, 1.0), 1.0);
        assert!((0..100).all(|_| accept(delta, 1.0, &mut rng)));
    }
}

#[test]
fn uphill_acceptance_frequency_matches_boltzmann_factor() {
    let mut rng = RngHandle::from_seed(0xDEADBEEF);
    let delta = 1.0;
    let temperature = 1.5;
    let trials = 200_000;
    let accepted = (0..trials)
        .filter(|_| accept(delta, temperature, &mut rng))
        .count();
    let frequency = accepted as f64 / trials as f64;
    let expected = (-delta / temperature).exp();
    assert!(
        (frequency - expected).abs() < 0.01,
        "frequency {frequency} vs {expected}"
    );
}

proptest! {
    #[test]
    fn acceptance_ratio_is_the_boltzmann_ratio(delta in 0.0f64..20.0, temperature in 0.1f64..10.0) {
        let forward = acceptance_probability(delta, temperature);
        let backward = acceptance_probability(-delta, temperature);
        let ratio = forward / backward;
        prop_assert!((ratio - (-delta / temperature).exp()).abs() < 1e-12);
    }
}
