use ising_core::{derive_substream_seed, RngHandle};

/// Derives the deterministic seed of the chain at grid position `chain_index`.
pub fn chain_seed(master_seed: u64, chain_index: usize) -> u64 {
    derive_substream_seed(master_seed, chain_index as u64)
}

/// RNG handle for the chain at grid position `chain_index`.
pub fn chain_rng(master_seed: u64, chain_index: usize) -> RngHandle {
    RngHandle::from_seed(chain_seed(master_seed, chain_index))
}
