use ising_core::errors::{ErrorInfo, IsingError};
use ising_core::SpinConfiguration;
use ising_model::Hamiltonian;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RunConfig;
use crate::determinism;
use crate::kernel::{self, RunSummary};

/// Result of one chain of a temperature scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanPoint {
    /// Position in the temperature grid.
    pub index: usize,
    /// Temperature of the chain.
    pub temperature: f64,
    /// Seed the chain's RNG was created from.
    pub seed: u64,
    /// Chain output.
    pub summary: RunSummary,
}

/// Runs one independent chain per grid temperature.
///
/// Chains share the read-only hamiltonian and nothing else. Chain `k` starts
/// from a copy of `initial` and draws from seed `chain_seed(master_seed, k)`,
/// so the points are identical for every `scan.concurrency`. Points come back
/// in grid order.
pub fn temperature_scan(
    config: &RunConfig,
    hamiltonian: &Hamiltonian,
    initial: &SpinConfiguration,
) -> Result<Vec<ScanPoint>, IsingError> {
    config.validate()?;
    let temperatures = config.scan.grid.temperatures();
    let master_seed = config.seed_policy.master_seed;
    info!(
        chains = temperatures.len(),
        concurrency = config.scan.concurrency,
        sweeps = config.sweeps,
        "starting temperature scan"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.scan.concurrency)
        .build()
        .map_err(|err| IsingError::Execution(ErrorInfo::new("thread-pool", err.to_string())))?;

    let points: Vec<ScanPoint> = pool.install(|| {
        temperatures
            .par_iter()
            .enumerate()
            .map(|(index, &temperature)| -> Result<ScanPoint, IsingError> {
                let seed = determinism::chain_seed(master_seed, index);
                let mut rng = determinism::chain_rng(master_seed, index);
                let summary =
                    kernel::run_chain(config, temperature, hamiltonian, initial, &mut rng)?;
                Ok(ScanPoint {
                    index,
                    temperature,
                    seed,
                    summary,
                })
            })
            .collect::<Result<Vec<_>, IsingError>>()
    })?;

    info!(chains = points.len(), "temperature scan finished");
    Ok(points)
}
