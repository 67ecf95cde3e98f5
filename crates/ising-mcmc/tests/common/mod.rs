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
