//! Sweep constructive heuristic.
//!
//! # Algorithm
//!
//! Sorts customers by polar angle relative to the depot and sweeps through
//! them. The first customer met for each cluster becomes its representative;
//! the others are skipped. Routes are filled in fleet order, and the next
//! route is opened as soon as a cluster does not fit in the current one.
//!
//! Clusters still unplaced when the fleet runs out go through an insertion
//! repair, highest demand first: append to the first route with enough
//! residual capacity, or else move one customer out of a route with at
//! least two visits into another route so that the cluster fits.
//!
//! # Complexity
//!
//! O(n log n) for the sweep, n = customers. The repair is O(m × n) per
//! leftover cluster, m = fleet size.
//!
//! # Reference
//!
//! Gillett, B.E. & Miller, L.R. (1974). "A Heuristic Algorithm for the
//! Vehicle-Dispatch Problem", *Operations Research* 22(2), 340-349.

use std::collections::HashSet;

use super::{ConstructionError, Result};
use crate::models::{ClusterId, Instance, Solution};

/// Constructs a GVRP solution using the sweep heuristic.
///
/// Every cluster is visited exactly once. Routes left unused when the
/// fleet is larger than needed stay empty.
///
/// # Errors
///
/// Returns [`ConstructionError::Unplaced`] if some cluster fits in no
/// route even after the repair.
///
/// # Examples
///
/// ```
/// use u_gvrp::constructive::sweep;
/// use u_gvrp::models::Instance;
///
/// let instance = Instance::builder()
///     .cluster(1, &[(10, 0), (40, 40)])
///     .cluster(1, &[(0, 10)])
///     .cluster(1, &[(-10, 0)])
///     .cluster(1, &[(0, -10), (-30, -40)])
///     .fleet(2)
///     .capacity(3)
///     .build()
///     .unwrap();
///
/// let solution = sweep(&instance).unwrap();
/// assert!(solution.is_valid(&instance));
/// assert_eq!(solution.route(0).customer_ids(), vec![6, 1, 3]);
/// assert_eq!(solution.route(1).customer_ids(), vec![4]);
/// ```
pub fn sweep(instance: &Instance) -> Result<Solution> {
    let depot = instance.depot();
    let mut angle_order: Vec<(usize, f64)> = instance.customers()[1..]
        .iter()
        .map(|c| (c.id(), c.angle_from(depot)))
        .collect();
    angle_order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut solution = Solution::new(instance);
    let mut placed: HashSet<ClusterId> = HashSet::new();
    let mut leftovers: Vec<usize> = Vec::new();
    let mut route = 0;

    for &(cid, _) in &angle_order {
        let cluster = instance.cluster_of(cid);
        if !placed.insert(cluster) {
            continue;
        }
        while route < solution.num_routes() && !solution.insert(route, cid, instance) {
            route += 1;
        }
        if route == solution.num_routes() {
            leftovers.push(cid);
        }
    }

    if !leftovers.is_empty() {
        log::warn!(
            "sweep: fleet exhausted with {} clusters unplaced, repairing",
            leftovers.len()
        );
    }
    leftovers.sort_by_key(|&c| std::cmp::Reverse(instance.demand_of(c)));
    for cid in leftovers {
        repair_insert(&mut solution, cid, instance)?;
    }

    log::debug!(
        "sweep: {} routes used, cost {}",
        solution.num_used_routes(),
        solution.cost()
    );
    Ok(solution)
}

/// Places `cid` in a route with room, relocating one customer if needed.
fn repair_insert(solution: &mut Solution, cid: usize, instance: &Instance) -> Result<()> {
    let demand = instance.demand_of(cid);
    if let Some(r) = route_with_room(solution, demand, None) {
        solution.insert(r, cid, instance);
        return Ok(());
    }

    for donor in 0..solution.num_routes() {
        let donor_route = solution.route(donor);
        if donor_route.len() < 2 {
            continue;
        }
        let residual = donor_route.residual_capacity();
        for moved in donor_route.customer_ids() {
            let moved_demand = instance.demand_of(moved);
            if residual + moved_demand < demand {
                continue;
            }
            let Some(target) = route_with_room(solution, moved_demand, Some(donor)) else {
                continue;
            };
            log::warn!(
                "sweep: moving customer {} from route {} to route {} to fit cluster {}",
                moved,
                donor,
                target,
                instance.cluster_of(cid)
            );
            solution.remove(moved, instance);
            solution.insert(target, moved, instance);
            solution.insert(donor, cid, instance);
            return Ok(());
        }
    }

    let cluster = instance.cluster_of(cid);
    log::warn!("sweep: cluster {} (demand {}) cannot be placed", cluster, demand);
    Err(ConstructionError::Unplaced { cluster, demand })
}

fn route_with_room(solution: &Solution, demand: i32, skip: Option<usize>) -> Option<usize> {
    solution
        .routes()
        .iter()
        .enumerate()
        .find(|&(i, r)| Some(i) != skip && r.residual_capacity() >= demand)
        .map(|(i, _)| i)
}
