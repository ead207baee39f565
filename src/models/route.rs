//! Route, visit and route summary types.
//!
//! A route stores one representative customer per visited cluster and two
//! layered shortest-path caches over the members of those clusters:
//!
//! - `from_left[c]`: shortest distance from the depot to member `c`,
//!   walking through one member of every earlier position.
//! - `from_right[c]`: shortest distance from member `c` back to the depot,
//!   walking through one member of every later position.
//!
//! A structural change to positions `start..end` invalidates `from_right`
//! on `0..end` and `from_left` on `start..len`; [`Route::refresh`] repairs
//! exactly those layers. Representative selection then reads the caches to
//! pick the members lying on a shortest path.
//!
//! # Complexity
//!
//! Refreshing a span costs O(sum of |layer_i| × |layer_i+1|) over the
//! affected layer pairs. [`Route::cost`] is O(1).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ClusterId, Instance, DEPOT};

/// A single visit: the representative customer of one cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Representative customer ID.
    pub customer_id: usize,
    /// Cluster the customer represents.
    pub cluster: ClusterId,
    /// Demand delivered at this visit (the cluster's demand).
    pub demand: i32,
}

impl Visit {
    /// Creates the visit of `customer_id`, taking cluster and demand from the instance.
    pub fn of(customer_id: usize, instance: &Instance) -> Self {
        let cluster = instance.cluster_of(customer_id);
        Self {
            customer_id,
            cluster,
            demand: instance.cluster(cluster).demand(),
        }
    }
}

/// Serializable snapshot of a route for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route identifier.
    pub id: usize,
    /// Travel distance of the current representative sequence.
    pub cost: i64,
    /// Total demand carried.
    pub load: i32,
    /// Representative customer IDs in visiting order.
    pub trajectory: Vec<usize>,
}

/// An ordered sequence of cluster representatives served by one vehicle.
///
/// The route starts and ends at the depot, which is not stored in `visits`.
///
/// # Examples
///
/// ```
/// use u_gvrp::models::{Instance, Route};
///
/// let instance = Instance::builder()
///     .depot(0, 0)
///     .cluster(2, &[(0, 10), (0, 30)])
///     .cluster(3, &[(10, 10)])
///     .capacity(10)
///     .build()
///     .unwrap();
///
/// let mut route = Route::new(0, instance.capacity());
/// assert!(route.push(2, &instance)); // far member of the first cluster
/// assert!(route.push(3, &instance));
/// assert_eq!(route.load(), 5);
/// assert_eq!(route.cost(), 30 + 22 + 14);
///
/// // Reselecting representatives swaps in the nearer member.
/// let changes = route.find_shortest_path(&instance);
/// assert_eq!(changes, vec![(2, 1)]);
/// assert_eq!(route.cost(), 10 + 10 + 14);
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    pub(crate) id: usize,
    pub(crate) capacity: i32,
    pub(crate) load: i32,
    pub(crate) visits: Vec<Visit>,
    pub(crate) from_left: HashMap<usize, i64>,
    pub(crate) from_right: HashMap<usize, i64>,
    /// Shortest cost over every choice of representatives.
    pub(crate) shortest: i64,
    /// Cost of the current representative sequence.
    pub(crate) cost: i64,
}

impl Route {
    /// Creates an empty route.
    pub fn new(id: usize, capacity: i32) -> Self {
        Self {
            id,
            capacity,
            load: 0,
            visits: Vec::new(),
            from_left: HashMap::new(),
            from_right: HashMap::new(),
            shortest: 0,
            cost: 0,
        }
    }

    /// Route identifier (its index in the owning solution).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Total demand of the visited clusters.
    pub fn load(&self) -> i32 {
        self.load
    }

    /// Capacity still available.
    pub fn residual_capacity(&self) -> i32 {
        self.capacity - self.load
    }

    /// Visits in order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of visited clusters.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// Returns `true` if the route visits nothing.
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Representative customer at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    pub fn customer_at(&self, pos: usize) -> usize {
        self.visits[pos].customer_id
    }

    /// Representative customer IDs in visiting order.
    pub fn customer_ids(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.customer_id).collect()
    }

    /// Position of `customer_id`, if it is a representative here.
    pub fn position(&self, customer_id: usize) -> Option<usize> {
        self.visits.iter().position(|v| v.customer_id == customer_id)
    }

    /// Returns `true` if some member of `cluster` is visited here.
    pub fn contains_cluster(&self, cluster: ClusterId) -> bool {
        self.visits.iter().any(|v| v.cluster == cluster)
    }

    /// Travel distance of the current representative sequence, in O(1).
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Shortest achievable cost for the current cluster order, choosing the
    /// best member per position.
    pub fn shortest_cost(&self) -> i64 {
        self.shortest
    }

    /// Recomputes the travel distance by summing consecutive edges.
    pub fn recompute_cost(&self, instance: &Instance) -> i64 {
        let mut prev = DEPOT;
        let mut total = 0;
        for v in &self.visits {
            total += instance.distance(prev, v.customer_id);
            prev = v.customer_id;
        }
        total + instance.distance(prev, DEPOT)
    }

    /// Cached shortest distance from the depot to member `customer_id`.
    pub fn dist_from_left(&self, customer_id: usize) -> Option<i64> {
        self.from_left.get(&customer_id).copied()
    }

    /// Cached shortest distance from member `customer_id` to the depot.
    pub fn dist_from_right(&self, customer_id: usize) -> Option<i64> {
        self.from_right.get(&customer_id).copied()
    }

    /// Number of cached members.
    pub fn cache_len(&self) -> usize {
        self.from_left.len()
    }

    /// Returns `true` if neither cache holds an entry.
    pub fn is_cache_empty(&self) -> bool {
        self.from_left.is_empty() && self.from_right.is_empty()
    }

    /// Appends `customer_id` at the end of the route.
    ///
    /// Returns `false` (and changes nothing) if its cluster is already
    /// visited here or its demand does not fit.
    pub fn push(&mut self, customer_id: usize, instance: &Instance) -> bool {
        self.insert(self.visits.len(), customer_id, instance)
    }

    /// Inserts `customer_id` so that it ends up at position `pos`.
    ///
    /// Returns `false` (and changes nothing) if its cluster is already
    /// visited here or its demand does not fit.
    ///
    /// # Panics
    ///
    /// Panics if `pos > self.len()`.
    pub fn insert(&mut self, pos: usize, customer_id: usize, instance: &Instance) -> bool {
        assert!(pos <= self.visits.len(), "insert position out of range");
        let visit = Visit::of(customer_id, instance);
        if self.contains_cluster(visit.cluster) || self.load + visit.demand > self.capacity {
            return false;
        }
        let x = self.prev_of(pos);
        let y = self.at_or_depot(pos);
        self.cost += instance.distance(x, customer_id) + instance.distance(customer_id, y)
            - instance.distance(x, y);
        self.load += visit.demand;
        self.visits.insert(pos, visit);
        self.refresh(pos, pos + 1, instance);
        true
    }

    /// Removes the representative `customer_id` and its cluster's cache entries.
    ///
    /// Returns `false` if the customer is not a representative here.
    pub fn remove_customer(&mut self, customer_id: usize, instance: &Instance) -> bool {
        let Some(pos) = self.position(customer_id) else {
            return false;
        };
        let a = self.prev_of(pos);
        let b = self.next_of(pos);
        self.cost -= instance.distance(a, customer_id) + instance.distance(customer_id, b)
            - instance.distance(a, b);
        let visit = self.visits.remove(pos);
        self.load -= visit.demand;
        self.forget(visit.cluster, instance);
        self.refresh(pos, pos, instance);
        true
    }

    /// Chooses, for every position, the member of its cluster lying on a
    /// shortest depot-to-depot path, keeping the current representative
    /// whenever it already does.
    ///
    /// Returns the `(old, new)` customer pairs that changed. Afterwards
    /// [`cost`](Self::cost) equals [`shortest_cost`](Self::shortest_cost).
    pub fn find_shortest_path(&mut self, instance: &Instance) -> Vec<(usize, usize)> {
        let mut changes = Vec::new();
        let mut prev = DEPOT;
        let mut target = self.shortest;
        for i in 0..self.visits.len() {
            let current = self.visits[i].customer_id;
            let mut chosen = current;
            let mut best = instance.distance(prev, current) + self.from_right[&current];
            for &c in instance.cluster(self.visits[i].cluster).members() {
                let through = instance.distance(prev, c) + self.from_right[&c];
                if through < best {
                    chosen = c;
                    best = through;
                }
            }
            debug_assert_eq!(best, target, "stale route cache");
            if chosen != current {
                self.visits[i].customer_id = chosen;
                changes.push((current, chosen));
            }
            target = self.from_right[&chosen];
            prev = chosen;
        }
        self.cost = self.shortest;
        changes
    }

    /// Serializable snapshot.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            id: self.id,
            cost: self.cost,
            load: self.load,
            trajectory: self.customer_ids(),
        }
    }

    /// Customer before position `pos`, or the depot.
    #[inline]
    pub(crate) fn prev_of(&self, pos: usize) -> usize {
        if pos == 0 {
            DEPOT
        } else {
            self.visits[pos - 1].customer_id
        }
    }

    /// Customer after position `pos`, or the depot.
    #[inline]
    pub(crate) fn next_of(&self, pos: usize) -> usize {
        self.at_or_depot(pos + 1)
    }

    /// Customer at `pos`, or the depot past the end.
    #[inline]
    pub(crate) fn at_or_depot(&self, pos: usize) -> usize {
        self.visits.get(pos).map_or(DEPOT, |v| v.customer_id)
    }

    /// Drops the cache entries of every member of `cluster`.
    pub(crate) fn forget(&mut self, cluster: ClusterId, instance: &Instance) {
        for c in instance.cluster(cluster).members() {
            self.from_left.remove(c);
            self.from_right.remove(c);
        }
    }

    /// Repairs the caches after positions `start..end` changed.
    ///
    /// Positions before `start` and from `end` on must hold the same
    /// cluster sequence as before the change (indices may have shifted).
    pub(crate) fn refresh(&mut self, start: usize, end: usize, instance: &Instance) {
        let len = self.visits.len();
        if len == 0 {
            self.from_left.clear();
            self.from_right.clear();
            self.shortest = 0;
            self.cost = 0;
            return;
        }

        for i in (0..end.min(len)).rev() {
            let layer = instance.cluster(self.visits[i].cluster).members();
            let next = if i + 1 < len {
                Some(instance.cluster(self.visits[i + 1].cluster).members())
            } else {
                None
            };
            for &c in layer {
                let d = match next {
                    None => instance.distance(c, DEPOT),
                    Some(next) => next.iter().fold(i64::MAX, |acc, n| {
                        acc.min(instance.distance(c, *n) + self.from_right[n])
                    }),
                };
                self.from_right.insert(c, d);
            }
        }

        for i in start..len {
            let layer = instance.cluster(self.visits[i].cluster).members();
            let prev = if i > 0 {
                Some(instance.cluster(self.visits[i - 1].cluster).members())
            } else {
                None
            };
            for &c in layer {
                let d = match prev {
                    None => instance.distance(DEPOT, c),
                    Some(prev) => prev.iter().fold(i64::MAX, |acc, p| {
                        acc.min(self.from_left[p] + instance.distance(*p, c))
                    }),
                };
                self.from_left.insert(c, d);
            }
        }

        self.shortest = instance
            .cluster(self.visits[0].cluster)
            .members()
            .iter()
            .fold(i64::MAX, |acc, c| {
                acc.min(instance.distance(DEPOT, *c) + self.from_right[c])
            });
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R{} = {{ cost = {}, cap = {}, trajectory = [",
            self.id, self.cost, self.load
        )?;
        for (i, v) in self.visits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "C{}({},d={})", v.customer_id, v.cluster, v.demand)?;
        }
        write!(f, "] }}")
    }
}
