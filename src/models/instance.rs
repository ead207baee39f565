//! Problem instance: customers, clusters, fleet and precomputed distances.

use std::fmt;

use super::{Cluster, ClusterId, Customer, DEPOT};
use crate::distance::{CandidateLists, DistanceMatrix};

/// Default candidate list size.
pub const DEFAULT_CANDIDATE_SIZE: usize = 20;

/// Reasons an instance cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The customer list is empty or its first entry is not the depot.
    MissingDepot,
    /// `customers[index]` does not carry id `index`.
    CustomerIdMismatch { index: usize, id: usize },
    /// `clusters[index]` does not carry id `index`.
    ClusterIdMismatch { index: usize, id: ClusterId },
    /// A cluster lists a customer id that does not exist.
    UnknownCustomer { cluster: ClusterId, customer_id: usize },
    /// A customer and the cluster listing it disagree on membership.
    MembershipMismatch { customer_id: usize },
    /// A cluster has no members.
    EmptyCluster { cluster: ClusterId },
    /// A cluster demand is negative.
    NegativeDemand { cluster: ClusterId, demand: i32 },
    /// A single cluster does not fit in an empty vehicle.
    DemandExceedsCapacity {
        cluster: ClusterId,
        demand: i32,
        capacity: i32,
    },
    /// The fleet has no vehicles.
    EmptyFleet,
    /// Vehicle capacity is not positive.
    InvalidCapacity { capacity: i32 },
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::MissingDepot => write!(f, "first customer must be the depot"),
            InstanceError::CustomerIdMismatch { index, id } => {
                write!(f, "customer at index {} has id {}", index, id)
            }
            InstanceError::ClusterIdMismatch { index, id } => {
                write!(f, "cluster at index {} has id {}", index, id)
            }
            InstanceError::UnknownCustomer {
                cluster,
                customer_id,
            } => write!(f, "cluster {} lists unknown customer C{}", cluster, customer_id),
            InstanceError::MembershipMismatch { customer_id } => write!(
                f,
                "customer C{} is not a member of exactly the cluster it references",
                customer_id
            ),
            InstanceError::EmptyCluster { cluster } => write!(f, "cluster {} is empty", cluster),
            InstanceError::NegativeDemand { cluster, demand } => {
                write!(f, "cluster {} has negative demand {}", cluster, demand)
            }
            InstanceError::DemandExceedsCapacity {
                cluster,
                demand,
                capacity,
            } => write!(
                f,
                "cluster {} demand {} exceeds vehicle capacity {}",
                cluster, demand, capacity
            ),
            InstanceError::EmptyFleet => write!(f, "fleet must have at least one vehicle"),
            InstanceError::InvalidCapacity { capacity } => {
                write!(f, "vehicle capacity must be positive, got {}", capacity)
            }
        }
    }
}

impl std::error::Error for InstanceError {}

/// An immutable GVRP instance.
///
/// Customer ids are dense (`0` is the depot) and cluster ids are the
/// clusters' indices. The distance matrix and candidate lists are built
/// once, at construction.
///
/// # Examples
///
/// ```
/// use u_gvrp::models::{ClusterId, Instance};
///
/// let instance = Instance::builder()
///     .depot(0, 0)
///     .cluster(4, &[(10, 0), (0, 10)])
///     .cluster(6, &[(10, 10)])
///     .fleet(1)
///     .capacity(10)
///     .build()
///     .unwrap();
///
/// assert_eq!(instance.num_customers(), 3);
/// assert_eq!(instance.num_clusters(), 2);
/// assert_eq!(instance.cluster_of(3), ClusterId(1));
/// assert_eq!(instance.distances().distance_from_depot(1), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    customers: Vec<Customer>,
    clusters: Vec<Cluster>,
    distances: DistanceMatrix,
    candidates: CandidateLists,
    fleet: usize,
    capacity: i32,
}

impl Instance {
    /// Validates the data and precomputes distances and candidate lists.
    pub fn new(
        name: impl Into<String>,
        customers: Vec<Customer>,
        clusters: Vec<Cluster>,
        fleet: usize,
        capacity: i32,
        candidate_size: usize,
    ) -> Result<Self, InstanceError> {
        validate(&customers, &clusters, fleet, capacity)?;
        let distances = DistanceMatrix::from_customers(&customers);
        let candidates = CandidateLists::new(&distances, candidate_size);
        Ok(Self {
            name: name.into(),
            customers,
            clusters,
            distances,
            candidates,
            fleet,
            capacity,
        })
    }

    /// Starts an [`InstanceBuilder`].
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::default()
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All locations (index 0 = depot).
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// The customer with the given id.
    pub fn customer(&self, id: usize) -> &Customer {
        &self.customers[id]
    }

    /// The depot.
    pub fn depot(&self) -> &Customer {
        &self.customers[DEPOT]
    }

    /// Number of customers, excluding the depot.
    pub fn num_customers(&self) -> usize {
        self.customers.len() - 1
    }

    /// All clusters, indexed by [`ClusterId`].
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// The cluster with the given id.
    pub fn cluster(&self, id: ClusterId) -> &Cluster {
        &self.clusters[id.index()]
    }

    /// Number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Cluster of a (non-depot) customer.
    ///
    /// # Panics
    ///
    /// Panics when called with the depot.
    pub fn cluster_of(&self, customer_id: usize) -> ClusterId {
        self.customers[customer_id]
            .cluster()
            .unwrap_or_else(|| panic!("C{} has no cluster", customer_id))
    }

    /// Demand carried by visiting `customer_id` (its cluster's demand).
    pub fn demand_of(&self, customer_id: usize) -> i32 {
        self.cluster(self.cluster_of(customer_id)).demand()
    }

    /// Precomputed distances.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Shorthand for `self.distances().distance(a, b)`.
    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> i64 {
        self.distances.distance(a, b)
    }

    /// Precomputed candidate lists.
    pub fn candidates(&self) -> &CandidateLists {
        &self.candidates
    }

    /// Number of vehicles.
    pub fn fleet(&self) -> usize {
        self.fleet
    }

    /// Capacity of every vehicle.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Sum of all cluster demands.
    pub fn total_demand(&self) -> i64 {
        self.clusters.iter().map(|c| c.demand() as i64).sum()
    }
}

fn validate(
    customers: &[Customer],
    clusters: &[Cluster],
    fleet: usize,
    capacity: i32,
) -> Result<(), InstanceError> {
    match customers.first() {
        Some(depot) if depot.is_depot() => {}
        _ => return Err(InstanceError::MissingDepot),
    }
    if fleet == 0 {
        return Err(InstanceError::EmptyFleet);
    }
    if capacity <= 0 {
        return Err(InstanceError::InvalidCapacity { capacity });
    }
    for (index, c) in customers.iter().enumerate() {
        if c.id() != index {
            return Err(InstanceError::CustomerIdMismatch { index, id: c.id() });
        }
        if index != DEPOT {
            // Non-depot customers must name an existing cluster that lists them.
            let listed = c
                .cluster()
                .and_then(|id| clusters.get(id.index()))
                .is_some_and(|cl| cl.contains(index));
            if !listed {
                return Err(InstanceError::MembershipMismatch { customer_id: index });
            }
        }
    }
    for (index, cluster) in clusters.iter().enumerate() {
        if cluster.id().index() != index {
            return Err(InstanceError::ClusterIdMismatch {
                index,
                id: cluster.id(),
            });
        }
        if cluster.is_empty() {
            return Err(InstanceError::EmptyCluster {
                cluster: cluster.id(),
            });
        }
        if cluster.demand() < 0 {
            return Err(InstanceError::NegativeDemand {
                cluster: cluster.id(),
                demand: cluster.demand(),
            });
        }
        if cluster.demand() > capacity {
            return Err(InstanceError::DemandExceedsCapacity {
                cluster: cluster.id(),
                demand: cluster.demand(),
                capacity,
            });
        }
        for &m in cluster.members() {
            let Some(member) = customers.get(m) else {
                return Err(InstanceError::UnknownCustomer {
                    cluster: cluster.id(),
                    customer_id: m,
                });
            };
            if member.cluster() != Some(cluster.id()) {
                return Err(InstanceError::MembershipMismatch { customer_id: m });
            }
        }
    }
    Ok(())
}

/// Incremental builder for [`Instance`].
///
/// Customers get consecutive ids in the order they are added, starting at 1.
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    name: String,
    depot: (i32, i32),
    customers: Vec<Customer>,
    clusters: Vec<Cluster>,
    fleet: usize,
    capacity: i32,
    candidate_size: usize,
}

impl Default for InstanceBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            depot: (0, 0),
            customers: Vec::new(),
            clusters: Vec::new(),
            fleet: 1,
            capacity: i32::MAX,
            candidate_size: DEFAULT_CANDIDATE_SIZE,
        }
    }
}

impl InstanceBuilder {
    /// Sets the instance name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the depot position.
    pub fn depot(mut self, x: i32, y: i32) -> Self {
        self.depot = (x, y);
        self
    }

    /// Adds a cluster with the given demand and one new customer per position.
    pub fn cluster(mut self, demand: i32, positions: &[(i32, i32)]) -> Self {
        let id = ClusterId(self.clusters.len());
        self.clusters.push(Cluster::new(id, demand, Vec::new()));
        for &(x, y) in positions {
            self = self.customer(x, y, id);
        }
        self
    }

    /// Adds one customer to `cluster`, creating empty clusters up to it.
    pub fn customer(mut self, x: i32, y: i32, cluster: ClusterId) -> Self {
        while self.clusters.len() <= cluster.index() {
            let id = ClusterId(self.clusters.len());
            self.clusters.push(Cluster::new(id, 0, Vec::new()));
        }
        let id = self.customers.len() + 1;
        self.customers.push(Customer::new(id, x, y, cluster));
        self.clusters[cluster.index()].push_member(id);
        self
    }

    /// Sets the demand of an existing cluster.
    ///
    /// # Panics
    ///
    /// Panics if the cluster was not added yet.
    pub fn demand(mut self, cluster: ClusterId, demand: i32) -> Self {
        self.clusters[cluster.index()].set_demand(demand);
        self
    }

    /// Sets the number of vehicles.
    pub fn fleet(mut self, fleet: usize) -> Self {
        self.fleet = fleet;
        self
    }

    /// Sets the vehicle capacity.
    pub fn capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the candidate list size `k`.
    pub fn candidate_size(mut self, k: usize) -> Self {
        self.candidate_size = k;
        self
    }

    /// Validates and builds the instance.
    pub fn build(self) -> Result<Instance, InstanceError> {
        let mut customers = Vec::with_capacity(self.customers.len() + 1);
        customers.push(Customer::depot(self.depot.0, self.depot.1));
        customers.extend(self.customers);
        Instance::new(
            self.name,
            customers,
            self.clusters,
            self.fleet,
            self.capacity,
            self.candidate_size,
        )
    }
}
