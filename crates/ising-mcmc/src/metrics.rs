use serde::{Deserialize, Serialize};

/// Post burn-in observables, each entry a cumulative running mean.
///
/// Entry `t` is the mean over all recorded sweeps up to and including `t`, so
/// the last element is the run's estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservableSeries {
    /// Running mean of the energy.
    pub energy: Vec<f64>,
    /// Running mean of the magnetization.
    pub magnetization: Vec<f64>,
    /// Running mean of the squared energy.
    pub energy_sq: Vec<f64>,
    /// Running mean of the squared magnetization.
    pub magnetization_sq: Vec<f64>,
}

/// Final running means of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservableEstimate {
    /// Mean energy.
    pub energy: f64,
    /// Mean magnetization.
    pub magnetization: f64,
    /// Mean squared energy.
    pub energy_sq: f64,
    /// Mean squared magnetization.
    pub magnetization_sq: f64,
}

impl ObservableEstimate {
    /// Heat capacity estimate `(<E^2> - <E>^2) / T^2`.
    pub fn heat_capacity(&self, temperature: f64) -> f64 {
        ((self.energy_sq - self.energy * self.energy) / (temperature * temperature)).max(0.0)
    }

    /// Susceptibility estimate `(<M^2> - <M>^2) / T`.
    pub fn susceptibility(&self, temperature: f64) -> f64 {
        ((self.magnetization_sq - self.magnetization * self.magnetization) / temperature).max(0.0)
    }
}

impl ObservableSeries {
    /// Number of recorded sweeps.
    pub fn len(&self) -> usize {
        self.energy.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// Running means after the last recorded sweep.
    pub fn last(&self) -> Option<ObservableEstimate> {
        Some(ObservableEstimate {
            energy: *self.energy.last()?,
            magnetization: *self.magnetization.last()?,
            energy_sq: *self.energy_sq.last()?,
            magnetization_sq: *self.magnetization_sq.last()?,
        })
    }
}

/// Accumulates post burn-in samples into running-mean series.
#[derive(Debug, Default)]
pub struct SeriesRecorder {
    count: usize,
    energy: f64,
    magnetization: f64,
    energy_sq: f64,
    magnetization_sq: f64,
    series: ObservableSeries,
}

impl SeriesRecorder {
    /// Creates a recorder sized for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            series: ObservableSeries {
                energy: Vec::with_capacity(capacity),
                magnetization: Vec::with_capacity(capacity),
                energy_sq: Vec::with_capacity(capacity),
                magnetization_sq: Vec::with_capacity(capacity),
            },
            ..Self::default()
        }
    }

    /// Records one sample and appends the updated running means.
    pub fn record(&mut self, energy: f64, magnetization: f64) {
        self.count += 1;
        self.energy += energy;
        self.magnetization += magnetization;
        self.energy_sq += energy * energy;
        self.magnetization_sq += magnetization * magnetization;

        let n = self.count as f64;
        self.series.energy.push(self.energy / n);
        self.series.magnetization.push(self.magnetization / n);
        self.series.energy_sq.push(self.energy_sq / n);
        self.series.magnetization_sq.push(self.magnetization_sq / n);
    }

    /// Returns the recorded series.
    pub fn finish(self) -> ObservableSeries {
        self.series
    }
}

/// Proposal bookkeeping for single-site flips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceStats {
    /// Flips proposed.
    pub proposed: u64,
    /// Flips accepted.
    pub accepted: u64,
}

impl AcceptanceStats {
    /// Records one proposal.
    pub fn record(&mut self, accepted: bool) {
        self.proposed += 1;
        if accepted {
            self.accepted += 1;
        }
    }

    /// Fraction of accepted proposals (0 when none were made).
    pub fn rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}
