#![deny(missing_docs)]

//! Ising Hamiltonian over an arbitrary coupling graph and exact thermodynamic
//! averages by full enumeration of small spin spaces.

/// Exhaustive canonical-ensemble enumeration.
pub mod exact;
/// Energy functional and incremental flip deltas.
pub mod hamiltonian;

pub use exact::{
    exact_averages, BoltzmannSums, ExactEnumerator, ThermoAverages, MAX_ENUMERATION_SITES,
    MAX_ENUMERATION_WORKERS,
};
pub use hamiltonian::{Edge, Hamiltonian, Neighbor};
