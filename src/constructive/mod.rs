//! Constructive heuristics for building initial GVRP solutions.
//!
//! - [`sweep`] - Polar-angle scan with insertion repair (Gillett & Miller, 1974), O(n log n + m²n)

mod sweep;

use std::fmt;

use crate::models::ClusterId;

pub use sweep::sweep;

/// Result type of the constructive heuristics.
pub type Result<T> = std::result::Result<T, ConstructionError>;

/// Failure to build a solution visiting every cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// No route could take the cluster, even after moving another
    /// customer out of the way.
    Unplaced {
        /// The cluster left out.
        cluster: ClusterId,
        /// Its demand.
        demand: i32,
    },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::Unplaced { cluster, demand } => write!(
                f,
                "cluster {} (demand {}) does not fit in any route",
                cluster, demand
            ),
        }
    }
}

impl std::error::Error for ConstructionError {}
