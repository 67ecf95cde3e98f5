//! Binary spin configurations with array and integer views.

use std::fmt;

use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, IsingError};
use crate::rng::RngHandle;

/// Largest site count whose configurations fit the `u64` integer view.
pub const MAX_INDEX_SITES: usize = 64;

/// Maps a stored bit to its physical spin: `0 -> -1`, `1 -> +1`.
///
/// Every energy, energy delta and magnetization computation in the engine goes
/// through this function.
#[inline]
pub fn spin_value(bit: u8) -> f64 {
    if bit == 0 {
        -1.0
    } else {
        1.0
    }
}

/// Fixed-length sequence of binary spins.
///
/// Site `0` is the most significant bit of the integer view, so the index reads
/// the bit array left to right: `[0, 1, 1, 0, 1, 0, 1, 0]` is index `106`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SpinConfiguration {
    bits: Vec<u8>,
}

impl SpinConfiguration {
    /// Allocates `n_sites` sites, all spin down.
    pub fn new(n_sites: usize) -> Result<Self, IsingError> {
        if n_sites == 0 {
            return Err(IsingError::InvalidSize(
                ErrorInfo::new("empty-configuration", "a configuration needs at least one site")
                    .with_context("n_sites", n_sites),
            ));
        }
        Ok(Self {
            bits: vec![0; n_sites],
        })
    }

    /// Builds a configuration directly from a 0/1 array.
    pub fn from_bits(values: &[u8]) -> Result<Self, IsingError> {
        let mut config = Self::new(values.len())?;
        config.set_config(values)?;
        Ok(config)
    }

    /// Builds an `n_sites` configuration from its integer index.
    pub fn from_index(n_sites: usize, index: u64) -> Result<Self, IsingError> {
        let mut config = Self::new(n_sites)?;
        config.set_index(index)?;
        Ok(config)
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.bits.len()
    }

    /// Replaces every bit with `values`.
    pub fn set_config(&mut self, values: &[u8]) -> Result<(), IsingError> {
        if values.len() != self.bits.len() {
            return Err(IsingError::DimensionMismatch(
                ErrorInfo::new("config-length", "spin array length differs from site count")
                    .with_context("expected", self.bits.len())
                    .with_context("actual", values.len()),
            ));
        }
        if let Some(site) = values.iter().position(|&value| value > 1) {
            return Err(IsingError::InvalidValue(
                ErrorInfo::new("spin-value", "spin entries must be 0 or 1")
                    .with_context("site", site)
                    .with_context("value", values[site]),
            ));
        }
        self.bits.copy_from_slice(values);
        Ok(())
    }

    /// Decodes `index` into the bit array, site 0 being the most significant bit.
    pub fn set_index(&mut self, index: u64) -> Result<(), IsingError> {
        let n = self.bits.len();
        if n < MAX_INDEX_SITES && index >> n != 0 {
            return Err(IsingError::IndexOutOfRange(
                ErrorInfo::new("config-index", "index must lie in [0, 2^N)")
                    .with_context("index", index)
                    .with_context("n_sites", n),
            ));
        }
        for (site, bit) in self.bits.iter_mut().enumerate() {
            let shift = n - 1 - site;
            *bit = if shift < MAX_INDEX_SITES {
                ((index >> shift) & 1) as u8
            } else {
                0
            };
        }
        Ok(())
    }

    /// Sets exactly `up_count` sites up, uniformly over all C(N, up_count) arrangements.
    pub fn randomize(&mut self, up_count: usize, rng: &mut RngHandle) -> Result<(), IsingError> {
        let n = self.bits.len();
        if up_count > n {
            return Err(IsingError::DimensionMismatch(
                ErrorInfo::new("up-count", "up-spin count must lie in [0, N]")
                    .with_context("up_count", up_count)
                    .with_context("n_sites", n),
            ));
        }
        self.bits.fill(0);
        for site in index::sample(rng, n, up_count) {
            self.bits[site] = 1;
        }
        Ok(())
    }

    /// Toggles the bit at `site`.
    #[inline]
    pub fn flip(&mut self, site: usize) -> Result<(), IsingError> {
        let n = self.bits.len();
        let bit = self.bits.get_mut(site).ok_or_else(|| {
            IsingError::IndexOutOfRange(
                ErrorInfo::new("site-index", "site id outside the configuration")
                    .with_context("site", site)
                    .with_context("n_sites", n),
            )
        })?;
        *bit ^= 1;
        Ok(())
    }

    /// Read-only view of the bit array.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Owned copy of the bit array.
    pub fn to_array(&self) -> Vec<u8> {
        self.bits.clone()
    }

    /// Integer whose binary expansion (site 0 most significant) equals the bits.
    pub fn to_index(&self) -> Result<u64, IsingError> {
        if self.bits.len() > MAX_INDEX_SITES {
            return Err(IsingError::InvalidSize(
                ErrorInfo::new("index-width", "integer view limited to 64 sites")
                    .with_context("n_sites", self.bits.len()),
            ));
        }
        Ok(self
            .bits
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
    }

    /// Physical spin values in site order.
    pub fn spins(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.bits.iter().map(|&bit| spin_value(bit))
    }

    /// Number of up sites.
    pub fn up_count(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit == 1).count()
    }

    /// Total magnetization `N_up - N_down`.
    pub fn magnetization(&self) -> f64 {
        self.spins().sum()
    }
}

impl TryFrom<Vec<u8>> for SpinConfiguration {
    type Error = IsingError;

    fn try_from(bits: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bits(&bits)
    }
}

impl From<SpinConfiguration> for Vec<u8> {
    fn from(config: SpinConfiguration) -> Self {
        config.bits
    }
}

impl fmt::Display for SpinConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}
