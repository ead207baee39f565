//! # u-gvrp
//!
//! Incremental local search for the Generalized Vehicle Routing Problem
//! (GVRP): customers are partitioned into clusters, and a solution visits
//! exactly one customer of every cluster with a capacitated fleet.
//!
//! Each route caches, for every member of its visited clusters, the
//! shortest path length from the depot and to the depot through the
//! route's cluster sequence. Move operators evaluate their cost delta in
//! O(1) and repair only the affected part of the cache; representatives are
//! reselected along the cached shortest path after every improving move.
//!
//! ## Modules
//!
//! - [`models`] - Domain model types (Customer, Cluster, Instance, Route, Solution)
//! - [`distance`] - Rounded Euclidean distance matrix and candidate lists
//! - [`constructive`] - Sweep construction with insertion repair
//! - [`local_search`] - Move operators, variable neighborhood descent, Iterated Local Search
//! - [`io`] - GVRP instance file reader
//!
//! ## Example
//!
//! ```
//! use u_gvrp::constructive::sweep;
//! use u_gvrp::io::parse_instance;
//! use u_gvrp::local_search::{IlsConfig, IteratedLocalSearch};
//!
//! let text = "\
//! NAME : demo
//! DIMENSION : 5
//! VEHICLES : 1
//! GVRP_SETS : 2
//! CAPACITY : 10
//! EDGE_WEIGHT_TYPE : EUC_2D
//! NODE_COORD_SECTION
//! 1 0 0
//! 2 30 40
//! 3 3 4
//! 4 -3 4
//! 5 -30 40
//! GVRP_SET_SECTION
//! 1 2 3 -1
//! 2 4 5 -1
//! DEMAND_SECTION
//! 1 1
//! 2 1
//! EOF
//! ";
//! let instance = parse_instance(text).unwrap();
//! let initial = sweep(&instance).unwrap();
//!
//! let ils = IteratedLocalSearch::new(&instance, IlsConfig::default().with_seed(7));
//! let mut rounds = 0;
//! let result = ils.run(initial, |_| {
//!     rounds += 1;
//!     rounds <= 10
//! });
//! // Depot -> (3, 4) -> (-3, 4) -> depot.
//! assert_eq!(result.best_cost, 16);
//! ```

pub mod constructive;
pub mod distance;
pub mod io;
pub mod local_search;
pub mod models;
