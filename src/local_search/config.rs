//! Local search and iterated local search configuration.

use serde::{Deserialize, Serialize};

use super::Neighborhood;

/// Configuration of the variable neighborhood descent.
///
/// # Examples
///
/// ```
/// use u_gvrp::local_search::{Neighborhood, SearchConfig};
///
/// let config = SearchConfig::default()
///     .with_neighborhoods(vec![Neighborhood::Shift, Neighborhood::Swap])
///     .with_check_invariants(true);
/// assert_eq!(config.neighborhoods.len(), 2);
/// assert!(config.check_invariants);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Neighborhood levels, tried in order.
    pub neighborhoods: Vec<Neighborhood>,
    /// Validate the solution after each descent and log violations.
    pub check_invariants: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            neighborhoods: Neighborhood::ALL.to_vec(),
            check_invariants: false,
        }
    }
}

impl SearchConfig {
    /// Sets the neighborhood levels.
    pub fn with_neighborhoods(mut self, neighborhoods: Vec<Neighborhood>) -> Self {
        self.neighborhoods = neighborhoods;
        self
    }

    /// Enables or disables the post-descent invariant check.
    pub fn with_check_invariants(mut self, check: bool) -> Self {
        self.check_invariants = check;
        self
    }
}

/// Configuration parameters for Iterated Local Search.
///
/// # Examples
///
/// ```
/// use u_gvrp::local_search::IlsConfig;
///
/// let config = IlsConfig::default()
///     .with_perturbation_fraction(0.1)
///     .with_min_perturbation(3)
///     .with_seed(7);
/// assert_eq!(config.perturbation_count(10), 3);
/// assert_eq!(config.perturbation_count(100), 10);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlsConfig {
    /// Descent configuration.
    pub search: SearchConfig,
    /// Perturbation moves per iteration, as a fraction of the cluster count.
    pub perturbation_fraction: f64,
    /// Lower bound on perturbation moves per iteration.
    pub min_perturbation: usize,
    /// Random seed (None for default seed).
    pub seed: Option<u64>,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            perturbation_fraction: 0.25,
            min_perturbation: 1,
            seed: None,
        }
    }
}

impl IlsConfig {
    /// Sets the descent configuration.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Sets the perturbation fraction.
    pub fn with_perturbation_fraction(mut self, fraction: f64) -> Self {
        self.perturbation_fraction = fraction;
        self
    }

    /// Sets the minimum number of perturbation moves.
    pub fn with_min_perturbation(mut self, n: usize) -> Self {
        self.min_perturbation = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of perturbation moves for an instance with `num_clusters` clusters.
    pub fn perturbation_count(&self, num_clusters: usize) -> usize {
        let scaled = (self.perturbation_fraction.max(0.0) * num_clusters as f64).round() as usize;
        scaled.max(self.min_perturbation)
    }
}
