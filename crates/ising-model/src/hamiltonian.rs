//! Pairwise Ising energy functional over a frozen, symmetric adjacency snapshot.
//!
//! The energy of a configuration is
//! `E = sum_{(i,j)} J_ij s_i s_j + sum_i mu_i s_i`, where every undirected
//! coupling is counted once and `s_i = ±1` comes from [`spin_value`].

use std::cmp::Ordering;

use ising_core::errors::{ErrorInfo, IsingError};
use ising_core::{spin_value, SpinConfiguration};
use serde::{Deserialize, Serialize};

/// One entry of a site's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Neighboring site id.
    pub site: usize,
    /// Coupling constant `J_ij`.
    pub coupling: f64,
}

impl Neighbor {
    /// Creates an adjacency entry.
    pub fn new(site: usize, coupling: f64) -> Self {
        Self { site, coupling }
    }
}

/// Undirected coupling with `low < high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Smaller endpoint.
    pub low: usize,
    /// Larger endpoint.
    pub high: usize,
    /// Coupling constant shared by both directions.
    pub coupling: f64,
}

impl Edge {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.low
            .cmp(&other.low)
            .then(self.high.cmp(&other.high))
            .then(self.coupling.total_cmp(&other.coupling))
    }
}

/// Immutable Ising Hamiltonian.
///
/// Built once from externally supplied graph data and shared read-only by the
/// enumerator and any number of concurrently running chains.
#[derive(Debug, Clone, PartialEq)]
pub struct Hamiltonian {
    adjacency: Vec<Vec<Neighbor>>,
    field: Vec<f64>,
    edges: Vec<Edge>,
}

impl Hamiltonian {
    /// Validates and freezes an adjacency list and per-site fields.
    ///
    /// Every `(i, j, J)` entry must be mirrored by a `(j, i, J)` entry with the
    /// identical coupling.
    pub fn build(adjacency: Vec<Vec<Neighbor>>, field: Vec<f64>) -> Result<Self, IsingError> {
        let n = adjacency.len();
        if n == 0 {
            return Err(IsingError::InvalidSize(ErrorInfo::new(
                "empty-hamiltonian",
                "a hamiltonian needs at least one site",
            )));
        }
        if field.len() != n {
            return Err(IsingError::DimensionMismatch(
                ErrorInfo::new("field-length", "field length differs from adjacency length")
                    .with_context("adjacency", n)
                    .with_context("field", field.len()),
            ));
        }
        if let Some(site) = field.iter().position(|mu| !mu.is_finite()) {
            return Err(IsingError::InvalidValue(
                ErrorInfo::new("field-value", "local fields must be finite")
                    .with_context("site", site),
            ));
        }

        let mut forward = Vec::new();
        let mut backward = Vec::new();
        for (site, neighbors) in adjacency.iter().enumerate() {
            for neighbor in neighbors {
                validate_neighbor(site, neighbor, n)?;
                // -0.0 + 0.0 is +0.0, so both zeros sort and compare alike
                let coupling = neighbor.coupling + 0.0;
                if site < neighbor.site {
                    forward.push(Edge {
                        low: site,
                        high: neighbor.site,
                        coupling,
                    });
                } else {
                    backward.push(Edge {
                        low: neighbor.site,
                        high: site,
                        coupling,
                    });
                }
            }
        }
        forward.sort_by(Edge::cmp_key);
        backward.sort_by(Edge::cmp_key);
        check_symmetry(&forward, &backward)?;

        Ok(Self {
            adjacency,
            field,
            edges: forward,
        })
    }

    /// Builds from a symmetric list of `(site, neighbor, coupling)` triples.
    pub fn from_couplings(
        n_sites: usize,
        triples: &[(usize, usize, f64)],
        field: Vec<f64>,
    ) -> Result<Self, IsingError> {
        let mut adjacency = vec![Vec::new(); n_sites];
        for &(site, neighbor, coupling) in triples {
            let list = adjacency.get_mut(site).ok_or_else(|| {
                IsingError::DimensionMismatch(
                    ErrorInfo::new("coupling-site", "coupling references a missing site")
                        .with_context("site", site)
                        .with_context("n_sites", n_sites),
                )
            })?;
            list.push(Neighbor::new(neighbor, coupling));
        }
        Self::build(adjacency, field)
    }

    /// Number of sites.
    pub fn n_sites(&self) -> usize {
        self.adjacency.len()
    }

    /// Adjacency list of `site`, if it exists.
    pub fn neighbors(&self, site: usize) -> Option<&[Neighbor]> {
        self.adjacency.get(site).map(Vec::as_slice)
    }

    /// Per-site local fields.
    pub fn field(&self) -> &[f64] {
        &self.field
    }

    /// Undirected couplings, each counted once.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Energy of `config`, in O(edges + N).
    pub fn energy(&self, config: &SpinConfiguration) -> Result<f64, IsingError> {
        self.check_config(config)?;
        let bits = config.bits();
        let coupling_term: f64 = self
            .edges
            .iter()
            .map(|edge| edge.coupling * spin_value(bits[edge.low]) * spin_value(bits[edge.high]))
            .sum();
        let field_term: f64 = self
            .field
            .iter()
            .zip(bits)
            .map(|(mu, &bit)| mu * spin_value(bit))
            .sum();
        Ok(coupling_term + field_term)
    }

    /// Effective field `sum_j J_ij s_j + mu_i` acting on `site`.
    pub fn local_field(&self, config: &SpinConfiguration, site: usize) -> Result<f64, IsingError> {
        self.check_config(config)?;
        self.check_site(site)?;
        Ok(self.local_field_at(config.bits(), site))
    }

    /// Energy change if `site` were flipped, in O(degree).
    ///
    /// `delta = -2 s_i (sum_j J_ij s_j + mu_i)` with `s_i` the pre-flip spin.
    pub fn energy_delta(&self, config: &SpinConfiguration, site: usize) -> Result<f64, IsingError> {
        self.check_config(config)?;
        self.check_site(site)?;
        let bits = config.bits();
        Ok(-2.0 * spin_value(bits[site]) * self.local_field_at(bits, site))
    }

    #[inline]
    fn local_field_at(&self, bits: &[u8], site: usize) -> f64 {
        self.adjacency[site]
            .iter()
            .map(|neighbor| neighbor.coupling * spin_value(bits[neighbor.site]))
            .sum::<f64>()
            + self.field[site]
    }

    fn check_config(&self, config: &SpinConfiguration) -> Result<(), IsingError> {
        if config.n_sites() == self.n_sites() {
            return Ok(());
        }
        Err(IsingError::DimensionMismatch(
            ErrorInfo::new("config-sites", "configuration size differs from hamiltonian")
                .with_context("hamiltonian", self.n_sites())
                .with_context("config", config.n_sites()),
        ))
    }

    fn check_site(&self, site: usize) -> Result<(), IsingError> {
        if site < self.n_sites() {
            return Ok(());
        }
        Err(IsingError::IndexOutOfRange(
            ErrorInfo::new("site-index", "site id outside the hamiltonian")
                .with_context("site", site)
                .with_context("n_sites", self.n_sites()),
        ))
    }
}

fn validate_neighbor(site: usize, neighbor: &Neighbor, n: usize) -> Result<(), IsingError> {
    if neighbor.site >= n {
        return Err(IsingError::DimensionMismatch(
            ErrorInfo::new("neighbor-id", "neighbor id outside the adjacency")
                .with_context("site", site)
                .with_context("neighbor", neighbor.site)
                .with_context("n_sites", n),
        ));
    }
    if neighbor.site == site {
        return Err(IsingError::InvalidValue(
            ErrorInfo::new("self-coupling", "a site cannot couple to itself")
                .with_context("site", site),
        ));
    }
    if !neighbor.coupling.is_finite() {
        return Err(IsingError::InvalidValue(
            ErrorInfo::new("coupling-value", "couplings must be finite")
                .with_context("site", site)
                .with_context("neighbor", neighbor.site),
        ));
    }
    Ok(())
}

// Both slices are sorted; any difference means some entry lacks its mirror.
fn check_symmetry(forward: &[Edge], backward: &[Edge]) -> Result<(), IsingError> {
    let mismatch = forward
        .iter()
        .zip(backward)
        .find(|(a, b)| a.cmp_key(b) != Ordering::Equal)
        .map(|(a, b)| if a.cmp_key(b) == Ordering::Less { *a } else { *b })
        .or_else(|| match forward.len().cmp(&backward.len()) {
            Ordering::Greater => Some(forward[backward.len()]),
            Ordering::Less => Some(backward[forward.len()]),
            Ordering::Equal => None,
        });
    match mismatch {
        None => Ok(()),
        Some(edge) => Err(IsingError::AsymmetricCoupling(
            ErrorInfo::new("coupling-symmetry", "coupling has no matching reverse entry")
                .with_context("low", edge.low)
                .with_context("high", edge.high)
                .with_context("coupling", edge.coupling)
                .with_hint("list every coupling under both of its endpoints"),
        )),
    }
}
