//! Exact canonical-ensemble averages by exhaustive enumeration of `2^N` states.

use ising_core::errors::{check_temperature, ErrorInfo, IsingError};
use ising_core::SpinConfiguration;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hamiltonian::Hamiltonian;

/// Largest site count accepted by [`ExactEnumerator::averages`].
pub const MAX_ENUMERATION_SITES: usize = 30;

/// Upper bound on the worker threads of one enumeration.
pub const MAX_ENUMERATION_WORKERS: usize = 256;

/// Thermodynamic averages at a fixed temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermoAverages {
    /// Temperature the averages were taken at.
    pub temperature: f64,
    /// Mean energy `<E>`.
    pub energy: f64,
    /// Mean magnetization `<M>`.
    pub magnetization: f64,
    /// Heat capacity `(<E^2> - <E>^2) / T^2`.
    pub heat_capacity: f64,
    /// Magnetic susceptibility `(<M^2> - <M>^2) / T`.
    pub susceptibility: f64,
    /// Natural log of the partition function.
    pub log_partition: f64,
}

impl ThermoAverages {
    /// Helmholtz free energy `-T ln Z`.
    pub fn free_energy(&self) -> f64 {
        -self.temperature * self.log_partition
    }
}

/// Boltzmann-weighted sums relative to the lowest energy seen so far.
///
/// Weights are `exp(-(E - reference) / T) <= 1`, so nothing overflows; when a
/// lower energy arrives the existing sums are rescaled to the new reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoltzmannSums {
    reference: f64,
    weight: f64,
    energy: f64,
    energy_sq: f64,
    magnetization: f64,
    magnetization_sq: f64,
}

impl Default for BoltzmannSums {
    fn default() -> Self {
        Self {
            reference: f64::INFINITY,
            weight: 0.0,
            energy: 0.0,
            energy_sq: 0.0,
            magnetization: 0.0,
            magnetization_sq: 0.0,
        }
    }
}

impl BoltzmannSums {
    /// True until the first state has been pushed.
    pub fn is_empty(&self) -> bool {
        self.weight == 0.0
    }

    /// Adds one state with energy `energy` and magnetization `magnetization`.
    pub fn push(&mut self, energy: f64, magnetization: f64, beta: f64) {
        if energy < self.reference {
            self.rebase(energy, beta);
        }
        let w = (-(energy - self.reference) * beta).exp();
        self.weight += w;
        self.energy += w * energy;
        self.energy_sq += w * energy * energy;
        self.magnetization += w * magnetization;
        self.magnetization_sq += w * magnetization * magnetization;
    }

    /// Folds `other` into `self`, aligning both to the lower reference.
    pub fn merge(&mut self, other: &BoltzmannSums, beta: f64) {
        if other.is_empty() {
            return;
        }
        if other.reference < self.reference {
            self.rebase(other.reference, beta);
        }
        let scale = (-(other.reference - self.reference) * beta).exp();
        self.weight += scale * other.weight;
        self.energy += scale * other.energy;
        self.energy_sq += scale * other.energy_sq;
        self.magnetization += scale * other.magnetization;
        self.magnetization_sq += scale * other.magnetization_sq;
    }

    fn rebase(&mut self, reference: f64, beta: f64) {
        if !self.is_empty() {
            let scale = (-(self.reference - reference) * beta).exp();
            self.weight *= scale;
            self.energy *= scale;
            self.energy_sq *= scale;
            self.magnetization *= scale;
            self.magnetization_sq *= scale;
        }
        self.reference = reference;
    }

    /// Normalizes the sums into averages at `temperature`.
    pub fn finish(&self, temperature: f64) -> ThermoAverages {
        let energy = self.energy / self.weight;
        let energy_sq = self.energy_sq / self.weight;
        let magnetization = self.magnetization / self.weight;
        let magnetization_sq = self.magnetization_sq / self.weight;
        ThermoAverages {
            temperature,
            energy,
            magnetization,
            heat_capacity: ((energy_sq - energy * energy) / (temperature * temperature)).max(0.0),
            susceptibility: ((magnetization_sq - magnetization * magnetization) / temperature)
                .max(0.0),
            log_partition: self.weight.ln() - self.reference / temperature,
        }
    }
}

/// Exhaustive enumerator over every configuration of a small system.
#[derive(Debug, Clone)]
pub struct ExactEnumerator {
    workers: usize,
}

impl Default for ExactEnumerator {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl ExactEnumerator {
    /// Sequential enumerator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerator that splits the index range across `workers` threads,
    /// clamped to `1..=MAX_ENUMERATION_WORKERS`.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.clamp(1, MAX_ENUMERATION_WORKERS),
        }
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Exact `<E>`, `<M>`, heat capacity and susceptibility at `temperature`.
    ///
    /// Costs `O(2^N * edges)`; `n_sites` must match the hamiltonian and stay at
    /// or below [`MAX_ENUMERATION_SITES`].
    pub fn averages(
        &self,
        hamiltonian: &Hamiltonian,
        n_sites: usize,
        temperature: f64,
    ) -> Result<ThermoAverages, IsingError> {
        check_temperature(temperature)?;
        if n_sites != hamiltonian.n_sites() {
            return Err(IsingError::DimensionMismatch(
                ErrorInfo::new("enumeration-sites", "site count differs from hamiltonian")
                    .with_context("requested", n_sites)
                    .with_context("hamiltonian", hamiltonian.n_sites()),
            ));
        }
        if n_sites > MAX_ENUMERATION_SITES {
            return Err(IsingError::InvalidSize(
                ErrorInfo::new("enumeration-ceiling", "too many sites for exhaustive enumeration")
                    .with_context("n_sites", n_sites)
                    .with_context("max", MAX_ENUMERATION_SITES)
                    .with_hint("use the metropolis sampler for large systems"),
            ));
        }

        let beta = 1.0 / temperature;
        let total = 1u64 << n_sites;
        debug!(n_sites, temperature, workers = self.workers, "enumerating configurations");

        let sums = if self.workers == 1 {
            accumulate_block(hamiltonian, n_sites, 0, total, beta)?
        } else {
            let blocks = block_bounds(total, (self.workers as u64).saturating_mul(4));
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .map_err(|err| {
                    IsingError::Execution(ErrorInfo::new("thread-pool", err.to_string()))
                })?;
            let partials: Vec<BoltzmannSums> = pool.install(|| {
                blocks
                    .par_iter()
                    .map(|&(start, end)| accumulate_block(hamiltonian, n_sites, start, end, beta))
                    .collect::<Result<Vec<_>, IsingError>>()
            })?;
            // Merge in block order so the rounding does not depend on scheduling.
            partials
                .iter()
                .fold(BoltzmannSums::default(), |mut acc, partial| {
                    acc.merge(partial, beta);
                    acc
                })
        };

        let averages = sums.finish(temperature);
        debug!(
            energy = averages.energy,
            magnetization = averages.magnetization,
            "enumeration complete"
        );
        Ok(averages)
    }
}

/// Sequential exact averages; see [`ExactEnumerator::averages`].
pub fn exact_averages(
    hamiltonian: &Hamiltonian,
    n_sites: usize,
    temperature: f64,
) -> Result<ThermoAverages, IsingError> {
    ExactEnumerator::new().averages(hamiltonian, n_sites, temperature)
}

fn accumulate_block(
    hamiltonian: &Hamiltonian,
    n_sites: usize,
    start: u64,
    end: u64,
    beta: f64,
) -> Result<BoltzmannSums, IsingError> {
    let mut config = SpinConfiguration::new(n_sites)?;
    let mut sums = BoltzmannSums::default();
    for index in start..end {
        config.set_index(index)?;
        let energy = hamiltonian.energy(&config)?;
        sums.push(energy, config.magnetization(), beta);
    }
    Ok(sums)
}

fn block_bounds(total: u64, blocks: u64) -> Vec<(u64, u64)> {
    let blocks = blocks.clamp(1, total);
    let size = total.div_ceil(blocks);
    (0..blocks)
        .map(|block| (block * size, ((block + 1) * size).min(total)))
        .filter(|(start, end)| start < end)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_cover_the_range_once() {
        let bounds = block_bounds(64, 12);
        assert_eq!(bounds.first().unwrap().0, 0);
        assert_eq!(bounds.last().unwrap().1, 64);
        for pair in bounds.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(block_bounds(2, 16), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn rebasing_keeps_ratios() {
        let beta = 0.5;
        let mut ascending = BoltzmannSums::default();
        let mut descending = BoltzmannSums::default();
        for energy in [-4.0, -2.0, 0.0, 3.0] {
            ascending.push(energy, 1.0, beta);
        }
        for energy in [3.0, 0.0, -2.0, -4.0] {
            descending.push(energy, 1.0, beta);
        }
        let a = ascending.finish(2.0);
        let b = descending.finish(2.0);
        assert!((a.energy - b.energy).abs() < 1e-12);
        assert!((a.log_partition - b.log_partition).abs() < 1e-12);
    }

    #[test]
    fn huge_energies_do_not_overflow() {
        let mut sums = BoltzmannSums::default();
        sums.push(-5000.0, 2.0, 1.0);
        sums.push(-4999.0, -2.0, 1.0);
        let averages = sums.finish(1.0);
        assert!(averages.energy.is_finite());
        let p_low = 1.0 / (1.0 + (-1.0f64).exp());
        let expected = -5000.0 * p_low - 4999.0 * (1.0 - p_low);
        assert!((averages.energy - expected).abs() < 1e-9);
    }
}
