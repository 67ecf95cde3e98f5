#![allow(dead_code)]

use ising_model::{Hamiltonian, Neighbor};

/// Periodic chain with uniform coupling and field.
pub fn ring(n: usize, coupling: f64, field: f64) -> Hamiltonian {
    let adjacency = (0..n)
        .map(|site| {
            vec![
                Neighbor::new((site + 1) % n, coupling),
                Neighbor::new((site + n - 1) % n, coupling),
            ]
        })
        .collect();
    Hamiltonian::build(adjacency, vec![field; n]).unwrap()
}

/// Open chain with uniform coupling and field.
pub fn chain(n: usize, coupling: f64, field: f64) -> Hamiltonian {
    let mut triples = Vec::new();
    for site in 0..n.saturating_sub(1) {
        triples.push((site, site + 1, coupling));
        triples.push((site + 1, site, coupling));
    }
    Hamiltonian::from_couplings(n, &triples, vec![field; n]).unwrap()
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual}"
    );
}
