#![deny(missing_docs)]

//! Deterministic single-site Metropolis sampling for Ising hamiltonians.

/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic per-chain seed derivation.
pub mod determinism;
/// Metropolis criterion, sweep and public `run` entry points.
pub mod kernel;
/// Running-mean series and acceptance bookkeeping.
pub mod metrics;
/// Independent chains over a temperature grid.
pub mod scan;

pub use config::{RunConfig, ScanConfig, SeedPolicy, TemperatureGrid};
pub use kernel::{
    accept, acceptance_probability, run, run_with_config, ChainState, MetropolisSampler,
    RunSummary,
};
pub use metrics::{AcceptanceStats, ObservableEstimate, ObservableSeries, SeriesRecorder};
pub use scan::{temperature_scan, ScanPoint};
