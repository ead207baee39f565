//! Incremental local search for the GVRP.
//!
//! Move operators are methods on [`Route`](crate::models::Route): each one
//! computes its cost delta in O(1) from neighbor distances, optionally
//! refuses non-improving moves, and repairs the route's representative
//! cache after applying.
//!
//! - [`relocate`] - Shift of one visit within a route or between routes
//! - [`swap`] - Exchange of two visits within a route or between routes
//! - [`two_opt`] - Intra-route segment reversal
//! - [`or_opt`] - Intra-route block relocation
//! - [`exchange`] - Inter-route 2-opt* tail exchange
//!
//! On top of the operators, [`LocalSearch`] runs a variable neighborhood
//! descent over candidate lists and [`IteratedLocalSearch`] alternates
//! perturbation and descent until a caller predicate says stop.

mod config;
mod descent;
pub mod exchange;
mod ils;
mod neighborhood;
pub mod or_opt;
pub mod relocate;
pub mod swap;
pub mod two_opt;

pub use config::{IlsConfig, SearchConfig};
pub use descent::LocalSearch;
pub use ils::{IlsResult, IlsStats, IteratedLocalSearch};
pub use neighborhood::{Move, Neighborhood};
