//! Solution and violation types.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::{ClusterId, Instance, Route, RouteSummary};

/// A type of invariant violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationType {
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// A route visits nothing.
    EmptyRoute {
        /// Route index.
        route_index: usize,
    },
    /// A customer is visited more than once.
    DuplicateCustomer {
        /// Customer visited twice.
        customer_id: usize,
    },
    /// A cluster has more than one representative.
    DuplicateCluster {
        /// Cluster represented twice.
        cluster: ClusterId,
    },
    /// A cluster has no representative.
    MissingCluster {
        /// Cluster nobody visits.
        cluster: ClusterId,
    },
    /// The membership index disagrees with route contents.
    OwnershipMismatch {
        /// Customer concerned.
        customer_id: usize,
        /// Route that actually visits the customer, if any.
        expected: Option<usize>,
        /// Route recorded in the index, if any.
        actual: Option<usize>,
    },
    /// A route's incremental cost differs from its recomputed cost.
    StaleCost {
        /// Route index.
        route_index: usize,
        /// Cost held by the route.
        cached: i64,
        /// Cost recomputed edge by edge.
        actual: i64,
    },
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationType::CapacityExceeded {
                route_index,
                load,
                capacity,
            } => write!(
                f,
                "route {} carries {} over capacity {}",
                route_index, load, capacity
            ),
            ViolationType::EmptyRoute { route_index } => write!(f, "route {} is empty", route_index),
            ViolationType::DuplicateCustomer { customer_id } => {
                write!(f, "customer C{} is visited more than once", customer_id)
            }
            ViolationType::DuplicateCluster { cluster } => {
                write!(f, "cluster {} has more than one representative", cluster)
            }
            ViolationType::MissingCluster { cluster } => {
                write!(f, "cluster {} has no representative", cluster)
            }
            ViolationType::OwnershipMismatch {
                customer_id,
                expected,
                actual,
            } => write!(
                f,
                "customer C{} is in route {:?} but indexed under {:?}",
                customer_id, expected, actual
            ),
            ViolationType::StaleCost {
                route_index,
                cached,
                actual,
            } => write!(
                f,
                "route {} cost is {} but recomputes to {}",
                route_index, cached, actual
            ),
        }
    }
}

/// An invariant violation in a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// A fixed set of routes, one per vehicle, plus the customer → route index.
///
/// The index is the single source of truth for route membership. Cloning
/// deep-copies routes and index, so a clone can be searched without
/// touching the original.
///
/// # Examples
///
/// ```
/// use u_gvrp::models::{Instance, Solution};
///
/// let instance = Instance::builder()
///     .cluster(1, &[(3, 4)])
///     .cluster(1, &[(6, 8)])
///     .fleet(2)
///     .capacity(5)
///     .build()
///     .unwrap();
///
/// let mut sol = Solution::new(&instance);
/// assert!(sol.insert(0, 1, &instance));
/// assert!(sol.insert(1, 2, &instance));
/// assert_eq!(sol.route_of(2), Some(1));
/// assert_eq!(sol.cost(), 10 + 20);
/// assert!(sol.is_valid(&instance));
/// ```
#[derive(Debug, Clone)]
pub struct Solution {
    routes: Vec<Route>,
    owner: HashMap<usize, usize>,
}

impl Solution {
    /// Creates one empty route per vehicle.
    pub fn new(instance: &Instance) -> Self {
        let routes = (0..instance.fleet())
            .map(|id| Route::new(id, instance.capacity()))
            .collect();
        Self {
            routes,
            owner: HashMap::new(),
        }
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route at `index`.
    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    /// Number of routes (the fleet size).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of routes visiting at least one cluster.
    pub fn num_used_routes(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Route currently visiting `customer_id`.
    pub fn route_of(&self, customer_id: usize) -> Option<usize> {
        self.owner.get(&customer_id).copied()
    }

    /// Returns `true` if `customer_id` is a representative somewhere.
    pub fn is_visited(&self, customer_id: usize) -> bool {
        self.owner.contains_key(&customer_id)
    }

    /// Number of representatives across all routes.
    pub fn num_visited(&self) -> usize {
        self.owner.len()
    }

    /// Appends `customer_id` to route `route_index`.
    ///
    /// Returns `false` if the customer is already visited, its cluster is
    /// already visited in any route, or the demand does not fit.
    pub fn insert(&mut self, route_index: usize, customer_id: usize, instance: &Instance) -> bool {
        let pos = self.routes[route_index].len();
        self.insert_at(route_index, pos, customer_id, instance)
    }

    /// Inserts `customer_id` at position `pos` of route `route_index`.
    pub fn insert_at(
        &mut self,
        route_index: usize,
        pos: usize,
        customer_id: usize,
        instance: &Instance,
    ) -> bool {
        if self.is_visited(customer_id) {
            return false;
        }
        let cluster = instance.cluster_of(customer_id);
        if self.routes.iter().any(|r| r.contains_cluster(cluster)) {
            return false;
        }
        if !self.routes[route_index].insert(pos, customer_id, instance) {
            return false;
        }
        self.owner.insert(customer_id, route_index);
        true
    }

    /// Removes `customer_id` from whichever route visits it.
    pub fn remove(&mut self, customer_id: usize, instance: &Instance) -> bool {
        let Some(route_index) = self.owner.remove(&customer_id) else {
            return false;
        };
        self.routes[route_index].remove_customer(customer_id, instance)
    }

    /// Total travel distance, the sum of the routes' O(1) costs.
    pub fn cost(&self) -> i64 {
        self.routes.iter().map(Route::cost).sum()
    }

    /// Total travel distance recomputed edge by edge.
    pub fn recompute_cost(&self, instance: &Instance) -> i64 {
        self.routes.iter().map(|r| r.recompute_cost(instance)).sum()
    }

    /// Reselects the representatives of route `route_index` along a
    /// shortest path and updates the membership index.
    ///
    /// Returns the cost change (zero or negative).
    pub fn select_representatives(&mut self, route_index: usize, instance: &Instance) -> i64 {
        let route = &mut self.routes[route_index];
        let before = route.cost();
        for (old, new) in route.find_shortest_path(instance) {
            self.owner.remove(&old);
            self.owner.insert(new, route_index);
        }
        self.routes[route_index].cost() - before
    }

    /// Checks every solution invariant and reports what is broken.
    pub fn validate(&self, instance: &Instance) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();
        let mut represented: HashMap<ClusterId, usize> = HashMap::new();

        for (route_index, route) in self.routes.iter().enumerate() {
            if route.is_empty() {
                violations.push(Violation::new(ViolationType::EmptyRoute { route_index }));
            }
            let load: i32 = route.visits().iter().map(|v| v.demand).sum();
            if load > route.capacity() {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    route_index,
                    load,
                    capacity: route.capacity(),
                }));
            }
            let actual = route.recompute_cost(instance);
            if actual != route.cost() {
                violations.push(Violation::new(ViolationType::StaleCost {
                    route_index,
                    cached: route.cost(),
                    actual,
                }));
            }
            for v in route.visits() {
                if !seen.insert(v.customer_id) {
                    violations.push(Violation::new(ViolationType::DuplicateCustomer {
                        customer_id: v.customer_id,
                    }));
                }
                *represented.entry(instance.cluster_of(v.customer_id)).or_insert(0) += 1;
                let indexed = self.route_of(v.customer_id);
                if indexed != Some(route_index) {
                    violations.push(Violation::new(ViolationType::OwnershipMismatch {
                        customer_id: v.customer_id,
                        expected: Some(route_index),
                        actual: indexed,
                    }));
                }
            }
        }

        for cluster in instance.clusters() {
            match represented.get(&cluster.id()).copied().unwrap_or(0) {
                0 => violations.push(Violation::new(ViolationType::MissingCluster {
                    cluster: cluster.id(),
                })),
                1 => {}
                _ => violations.push(Violation::new(ViolationType::DuplicateCluster {
                    cluster: cluster.id(),
                })),
            }
        }

        let mut stale: Vec<(usize, usize)> = self
            .owner
            .iter()
            .filter(|(c, _)| !seen.contains(*c))
            .map(|(&c, &r)| (c, r))
            .collect();
        stale.sort_unstable();
        for (customer_id, r) in stale {
            violations.push(Violation::new(ViolationType::OwnershipMismatch {
                customer_id,
                expected: None,
                actual: Some(r),
            }));
        }

        violations
    }

    /// Returns `true` if [`validate`](Self::validate) finds nothing.
    pub fn is_valid(&self, instance: &Instance) -> bool {
        self.validate(instance).is_empty()
    }

    /// Structural comparison: same representative sequence in every route.
    pub fn same_routes(&self, other: &Solution) -> bool {
        self.routes.len() == other.routes.len()
            && self
                .routes
                .iter()
                .zip(&other.routes)
                .all(|(a, b)| a.visits() == b.visits())
    }

    /// Serializable snapshot of every route.
    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes.iter().map(Route::summary).collect()
    }

    pub(crate) fn route_mut(&mut self, index: usize) -> &mut Route {
        &mut self.routes[index]
    }

    /// Mutable access to two distinct routes.
    ///
    /// # Panics
    ///
    /// Panics if `a == b`.
    pub(crate) fn routes_pair_mut(&mut self, a: usize, b: usize) -> (&mut Route, &mut Route) {
        assert_ne!(a, b, "routes must differ");
        if a < b {
            let (left, right) = self.routes.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.routes.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Records `customer_id` as visited by `route_index`.
    pub(crate) fn set_owner(&mut self, customer_id: usize, route_index: usize) {
        self.owner.insert(customer_id, route_index);
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, route) in self.routes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", route)?;
        }
        Ok(())
    }
}
