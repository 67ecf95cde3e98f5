use ising_core::errors::{check_temperature, ErrorInfo, IsingError};
use ising_core::{spin_value, RngHandle, SpinConfiguration};
use ising_model::Hamiltonian;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{check_burn_in, RunConfig};
use crate::metrics::{AcceptanceStats, ObservableSeries, SeriesRecorder};

/// Summary returned to callers after a chain completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Temperature the chain ran at.
    pub temperature: f64,
    /// Total sweeps executed.
    pub sweeps: usize,
    /// Sweeps excluded from the series.
    pub burn_in: usize,
    /// Running-mean observables, `sweeps - burn_in` entries each.
    pub series: ObservableSeries,
    /// Single-site proposal statistics over the whole run.
    pub acceptance: AcceptanceStats,
    /// Energy of the final state, tracked incrementally.
    pub final_energy: f64,
    /// Magnetization of the final state.
    pub final_magnetization: f64,
    /// Configuration at the end of the run.
    pub final_state: SpinConfiguration,
}

/// Metropolis acceptance probability `min(1, exp(-delta / T))`.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta <= 0.0 {
        1.0
    } else {
        (-delta / temperature).exp()
    }
}

/// Metropolis criterion: downhill moves always pass, uphill moves pass iff
/// `u < exp(-delta / T)` for `u` uniform in `[0, 1)`.
///
/// No random number is consumed for downhill moves.
pub fn accept(delta: f64, temperature: f64, rng: &mut RngHandle) -> bool {
    delta <= 0.0 || rng.gen::<f64>() < (-delta / temperature).exp()
}

/// Running totals of the chain state carried between sweeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainState {
    /// Current total energy.
    pub energy: f64,
    /// Current total magnetization.
    pub magnetization: f64,
}

/// Single-site Metropolis sampler bound to one hamiltonian and temperature.
#[derive(Debug, Clone, Copy)]
pub struct MetropolisSampler<'h> {
    hamiltonian: &'h Hamiltonian,
    temperature: f64,
}

impl<'h> MetropolisSampler<'h> {
    /// Binds a sampler; fails on a non-positive temperature.
    pub fn new(hamiltonian: &'h Hamiltonian, temperature: f64) -> Result<Self, IsingError> {
        check_temperature(temperature)?;
        Ok(Self {
            hamiltonian,
            temperature,
        })
    }

    /// Temperature the sampler draws at.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Visits sites `0..N` once, flipping each with the Metropolis criterion.
    ///
    /// `chain` is updated by the accepted deltas; the energy is never recomputed.
    pub fn sweep(
        &self,
        state: &mut SpinConfiguration,
        chain: &mut ChainState,
        stats: &mut AcceptanceStats,
        rng: &mut RngHandle,
    ) -> Result<(), IsingError> {
        for site in 0..state.n_sites() {
            let delta = self.hamiltonian.energy_delta(state, site)?;
            let accepted = accept(delta, self.temperature, rng);
            stats.record(accepted);
            if accepted {
                let spin = spin_value(state.bits()[site]);
                state.flip(site)?;
                chain.energy += delta;
                chain.magnetization -= 2.0 * spin;
            }
        }
        Ok(())
    }

    /// Runs `sweeps` sweeps from `state`, recording running means after `burn_in`.
    ///
    /// All inputs are validated before `state` is touched.
    pub fn run(
        &self,
        state: &mut SpinConfiguration,
        sweeps: usize,
        burn_in: usize,
        rng: &mut RngHandle,
    ) -> Result<RunSummary, IsingError> {
        check_burn_in(sweeps, burn_in)?;
        let mut chain = ChainState {
            energy: self.hamiltonian.energy(state)?,
            magnetization: state.magnetization(),
        };
        debug!(
            temperature = self.temperature,
            sweeps,
            burn_in,
            n_sites = state.n_sites(),
            "starting metropolis chain"
        );

        let mut stats = AcceptanceStats::default();
        let mut recorder = SeriesRecorder::with_capacity(sweeps - burn_in);
        for step in 0..sweeps {
            self.sweep(state, &mut chain, &mut stats, rng)?;
            if step >= burn_in {
                recorder.record(chain.energy, chain.magnetization);
            }
        }

        debug!(
            acceptance_rate = stats.rate(),
            final_energy = chain.energy,
            "metropolis chain finished"
        );
        Ok(RunSummary {
            temperature: self.temperature,
            sweeps,
            burn_in,
            series: recorder.finish(),
            acceptance: stats,
            final_energy: chain.energy,
            final_magnetization: chain.magnetization,
            final_state: state.clone(),
        })
    }
}

/// Runs a Metropolis chain at `temperature`, mutating `state` in place.
pub fn run(
    hamiltonian: &Hamiltonian,
    state: &mut SpinConfiguration,
    temperature: f64,
    sweeps: usize,
    burn_in: usize,
    rng: &mut RngHandle,
) -> Result<RunSummary, IsingError> {
    MetropolisSampler::new(hamiltonian, temperature)?.run(state, sweeps, burn_in, rng)
}

/// Runs one chain as described by `config`, starting from a copy of `initial`.
///
/// The chain draws from `RngHandle::from_seed(config.seed_policy.master_seed)`,
/// which also randomizes the start when `initial_up` is set.
pub fn run_with_config(
    config: &RunConfig,
    hamiltonian: &Hamiltonian,
    initial: &SpinConfiguration,
) -> Result<RunSummary, IsingError> {
    config.validate()?;
    let mut rng = RngHandle::from_seed(config.seed_policy.master_seed);
    run_chain(config, config.temperature, hamiltonian, initial, &mut rng)
}

pub(crate) fn run_chain(
    config: &RunConfig,
    temperature: f64,
    hamiltonian: &Hamiltonian,
    initial: &SpinConfiguration,
    rng: &mut RngHandle,
) -> Result<RunSummary, IsingError> {
    if initial.n_sites() != hamiltonian.n_sites() {
        return Err(IsingError::DimensionMismatch(
            ErrorInfo::new("config-sites", "initial state size differs from hamiltonian")
                .with_context("hamiltonian", hamiltonian.n_sites())
                .with_context("config", initial.n_sites()),
        ));
    }
    let sampler = MetropolisSampler::new(hamiltonian, temperature)?;
    let mut state = initial.clone();
    if let Some(up) = config.initial_up {
        state.randomize(up, rng)?;
    }
    sampler.run(&mut state, config.sweeps, config.burn_in, rng)
}
