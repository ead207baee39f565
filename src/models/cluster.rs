//! Customer clusters ("sets") and their identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identifier of a cluster, also its index in [`Instance::clusters`](super::Instance::clusters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub usize);

impl ClusterId {
    /// Index of this cluster in the instance's cluster list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A group of interchangeable customers; exactly one member is visited.
///
/// Demand belongs to the cluster, not to individual members: whichever
/// member is chosen as representative carries it.
///
/// Two clusters compare equal when their ids are equal. Use
/// [`Cluster::same_members`] to compare contents.
///
/// # Examples
///
/// ```
/// use u_gvrp::models::{Cluster, ClusterId};
///
/// let a = Cluster::new(ClusterId(0), 10, vec![1, 2]);
/// let b = Cluster::new(ClusterId(0), 15, vec![3]);
/// assert_eq!(a, b);
/// assert!(!a.same_members(&b));
/// ```
#[derive(Debug, Clone)]
pub struct Cluster {
    id: ClusterId,
    demand: i32,
    members: Vec<usize>,
}

impl Cluster {
    /// Creates a cluster with the given member customer IDs.
    pub fn new(id: ClusterId, demand: i32, members: Vec<usize>) -> Self {
        Self {
            id,
            demand,
            members,
        }
    }

    /// Cluster identifier.
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Demand delivered when any member of the cluster is visited.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Member customer IDs, in insertion order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the cluster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if `customer_id` belongs to this cluster.
    pub fn contains(&self, customer_id: usize) -> bool {
        self.members.contains(&customer_id)
    }

    /// Structural comparison: same demand and same member set.
    pub fn same_members(&self, other: &Cluster) -> bool {
        if self.demand != other.demand || self.members.len() != other.members.len() {
            return false;
        }
        let mut a = self.members.clone();
        let mut b = other.members.clone();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }

    pub(crate) fn push_member(&mut self, customer_id: usize) {
        if !self.members.contains(&customer_id) {
            self.members.push(customer_id);
        }
    }

    pub(crate) fn set_demand(&mut self, demand: i32) {
        self.demand = demand;
    }
}

impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Cluster {}

impl Hash for Cluster {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
