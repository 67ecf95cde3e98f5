use ising_core::errors::{check_temperature, ErrorInfo, IsingError};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a Metropolis run or temperature scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total number of sweeps, burn-in included.
    pub sweeps: usize,
    /// Number of initial sweeps excluded from the running averages.
    #[serde(default)]
    pub burn_in: usize,
    /// Temperature of a single run.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// When set, the starting state is randomized with exactly this many up spins.
    #[serde(default)]
    pub initial_up: Option<usize>,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Temperature scan settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

fn default_temperature() -> f64 {
    1.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sweeps: 1000,
            burn_in: 100,
            temperature: default_temperature(),
            initial_up: None,
            seed_policy: SeedPolicy::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, IsingError> {
        let config: RunConfig = serde_yaml::from_str(yaml)
            .map_err(|err| IsingError::Config(ErrorInfo::new("config-parse", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, IsingError> {
        serde_yaml::to_string(self)
            .map_err(|err| IsingError::Config(ErrorInfo::new("config-encode", err.to_string())))
    }

    /// Checks sweep bounds and every temperature the config can produce.
    pub fn validate(&self) -> Result<(), IsingError> {
        check_burn_in(self.sweeps, self.burn_in)?;
        check_temperature(self.temperature)?;
        let temperatures = self.scan.grid.temperatures();
        if temperatures.is_empty() {
            return Err(IsingError::Config(ErrorInfo::new(
                "empty-grid",
                "temperature grid produces no temperatures",
            )));
        }
        for temperature in temperatures {
            check_temperature(temperature)?;
        }
        if self.scan.concurrency == 0 {
            return Err(IsingError::Config(ErrorInfo::new(
                "scan-concurrency",
                "scan concurrency must be at least one",
            )));
        }
        Ok(())
    }
}

/// Rejects a burn-in longer than the run.
pub fn check_burn_in(sweeps: usize, burn_in: usize) -> Result<(), IsingError> {
    if burn_in <= sweeps {
        return Ok(());
    }
    Err(IsingError::DimensionMismatch(
        ErrorInfo::new("burn-in", "burn-in exceeds the number of sweeps")
            .with_context("sweeps", sweeps)
            .with_context("burn_in", burn_in),
    ))
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional free-form label carried alongside the seed.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Settings for running one independent chain per temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Temperatures to visit.
    #[serde(default)]
    pub grid: TemperatureGrid,
    /// Worker threads used for the scan.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    1
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            grid: TemperatureGrid::default(),
            concurrency: default_concurrency(),
        }
    }
}

/// Supported temperature grid constructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TemperatureGrid {
    /// `steps` evenly spaced temperatures from `start` to `stop` inclusive.
    Linear {
        /// First temperature.
        start: f64,
        /// Last temperature.
        stop: f64,
        /// Number of grid points.
        steps: usize,
    },
    /// `count` temperatures `base * ratio^k`.
    Geometric {
        /// Coldest temperature.
        base: f64,
        /// Multiplicative spacing between neighbours.
        ratio: f64,
        /// Number of grid points.
        count: usize,
    },
    /// Explicit list, used as given.
    Manual {
        /// Ordered temperatures.
        temperatures: Vec<f64>,
    },
}

impl Default for TemperatureGrid {
    fn default() -> Self {
        TemperatureGrid::Linear {
            start: 0.5,
            stop: 4.0,
            steps: 8,
        }
    }
}

impl TemperatureGrid {
    /// Expands the grid into its temperatures, in order.
    pub fn temperatures(&self) -> Vec<f64> {
        match self {
            TemperatureGrid::Linear { start, stop, steps } => match *steps {
                0 => Vec::new(),
                1 => vec![*start],
                steps => {
                    let spacing = (stop - start) / (steps - 1) as f64;
                    (0..steps).map(|k| start + spacing * k as f64).collect()
                }
            },
            TemperatureGrid::Geometric { base, ratio, count } => {
                let mut temperatures = Vec::with_capacity(*count);
                let mut temperature = *base;
                for _ in 0..*count {
                    temperatures.push(temperature);
                    temperature *= ratio;
                }
                temperatures
            }
            TemperatureGrid::Manual { temperatures } => temperatures.clone(),
        }
    }
}
