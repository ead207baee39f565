//! Domain model types for generalized vehicle routing.
//!
//! Provides the core abstractions: customers grouped into clusters, the
//! immutable problem instance, routes of cluster representatives with
//! incremental distance caches, and solutions with invariant checking.

mod cluster;
mod customer;
mod instance;
mod route;
mod solution;

pub use cluster::{Cluster, ClusterId};
pub use customer::{Customer, DEPOT};
pub use instance::{Instance, InstanceBuilder, InstanceError, DEFAULT_CANDIDATE_SIZE};
pub use route::{Route, RouteSummary, Visit};
pub use solution::{Solution, Violation, ViolationType};
