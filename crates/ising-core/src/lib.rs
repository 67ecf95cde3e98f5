#![deny(missing_docs)]
#![doc = "Core data types for the Ising engine: binary spin configurations, the shared error taxonomy and the deterministic RNG handle."]

pub mod errors;
pub mod rng;
pub mod spins;

pub use errors::{check_temperature, ErrorInfo, IsingError};
pub use rng::{derive_substream_seed, RngHandle};
pub use spins::{spin_value, SpinConfiguration, MAX_INDEX_SITES};
