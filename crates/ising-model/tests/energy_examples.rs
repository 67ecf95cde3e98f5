mod common;

use common::{assert_close, ring};
use ising_core::rng::RngHandle;
use ising_core::SpinConfiguration;
use proptest::prelude::*;

#[test]
fn eight_site_ring_configuration_energy() {
    let ham = ring(8, 1.0, 0.1);
    let config = SpinConfiguration::from_bits(&[0, 0, 0, 0, 0, 0, 1, 1]).unwrap();
    assert_close(ham.energy(&config).unwrap(), 3.6, 1e-12);
}

#[test]
fn index_106_decodes_and_scores() {
    let ham = ring(8, 1.0, 0.1);
    let config = SpinConfiguration::from_index(8, 106).unwrap();
    assert_eq!(config.bits(), &[0, 1, 1, 0, 1, 0, 1, 0]);
    assert_close(ham.energy(&config).unwrap(), -4.0, 1e-12);
}

#[test]
fn energy_is_deterministic() {
    let ham = ring(12, 0.7, -0.3);
    let mut config = SpinConfiguration::new(12).unwrap();
    config.randomize(5, &mut RngHandle::from_seed(11)).unwrap();
    let first = ham.energy(&config).unwrap();
    for _ in 0..10 {
        assert_eq!(ham.energy(&config).unwrap(), first);
    }
}

#[test]
fn local_field_feeds_the_delta() {
    let ham = ring(4, 1.0, 0.5);
    let config = SpinConfiguration::from_bits(&[1, 0, 1, 1]).unwrap();
    // site 1 is down with both neighbors up: h = 1 + 1 + 0.5
    assert_close(ham.local_field(&config, 1).unwrap(), 2.5, 1e-12);
    assert_close(ham.energy_delta(&config, 1).unwrap(), 5.0, 1e-12);
}

proptest! {
    #[test]
    fn delta_matches_full_recomputation(
        bits in prop::collection::vec(0u8..=1, 3..14),
        coupling in -2.0f64..2.0,
        field in -1.5f64..1.5,
        site_seed in any::<usize>(),
    ) {
        let n = bits.len();
        let ham = ring(n, coupling, field);
        let mut config = SpinConfiguration::from_bits(&bits).unwrap();
        let site = site_seed % n;
        let before = ham.energy(&config).unwrap();
        let delta = ham.energy_delta(&config, site).unwrap();
        config.flip(site).unwrap();
        let after = ham.energy(&config).unwrap();
        prop_assert!((after - before - delta).abs() < 1e-9);
    }

    #[test]
    fn delta_matches_on_irregular_graphs(
        seed in any::<u64>(),
        weights in prop::collection::vec(-1.0f64..1.0, 6),
    ) {
        // star centred on site 0 plus a chord between sites 2 and 5
        let mut triples = Vec::new();
        for (leaf, &w) in (1..6).zip(&weights) {
            triples.push((0, leaf, w));
            triples.push((leaf, 0, w));
        }
        triples.push((2, 5, weights[5]));
        triples.push((5, 2, weights[5]));
        let ham = ising_model::Hamiltonian::from_couplings(6, &triples, vec![0.2; 6]).unwrap();
        let mut config = SpinConfiguration::new(6).unwrap();
        config.randomize(3, &mut RngHandle::from_seed(seed)).unwrap();
        for site in 0..6 {
            let before = ham.energy(&config).unwrap();
            let delta = ham.energy_delta(&config, site).unwrap();
            config.flip(site).unwrap();
            prop_assert!((ham.energy(&config).unwrap() - before - delta).abs() < 1e-9);
        }
    }
}
