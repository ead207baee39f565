//! Candidate lists ("gamma sets"): the k nearest neighbors of each customer.
//!
//! Local search only pairs a customer with the members of its candidate
//! list, which bounds the neighbor scan to O(k) instead of O(n).

use super::DistanceMatrix;

/// Precomputed k-nearest-neighbor lists, one per customer.
///
/// The depot is neither given a list nor listed as anybody's neighbor.
/// Each list is sorted by ascending distance; ties keep ascending id order.
///
/// # Examples
///
/// ```
/// use u_gvrp::models::{ClusterId, Customer};
/// use u_gvrp::distance::{CandidateLists, DistanceMatrix};
///
/// let customers = vec![
///     Customer::depot(0, 0),
///     Customer::new(1, 1, 0, ClusterId(0)),
///     Customer::new(2, 5, 0, ClusterId(1)),
///     Customer::new(3, 2, 0, ClusterId(2)),
/// ];
/// let dm = DistanceMatrix::from_customers(&customers);
/// let gamma = CandidateLists::new(&dm, 2);
/// assert_eq!(gamma.neighbors(1), &[3, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CandidateLists {
    k: usize,
    lists: Vec<Vec<usize>>,
}

impl CandidateLists {
    /// Builds candidate lists of (at most) `k` neighbors for every customer.
    pub fn new(distances: &DistanceMatrix, k: usize) -> Self {
        let n = distances.size();
        let mut lists = Vec::with_capacity(n);
        lists.push(Vec::new()); // depot

        for i in 1..n {
            let mut others: Vec<usize> = (1..n).filter(|&j| j != i).collect();
            // Stable: equal distances stay in ascending id order.
            others.sort_by_key(|&j| distances.distance(i, j));
            others.truncate(k);
            lists.push(others);
        }

        Self { k, lists }
    }

    /// Configured list size.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Neighbors of `customer_id`, nearest first.
    ///
    /// # Panics
    ///
    /// Panics if `customer_id` is out of range.
    pub fn neighbors(&self, customer_id: usize) -> &[usize] {
        &self.lists[customer_id]
    }

    /// Length of the longest list.
    pub fn max_len(&self) -> usize {
        self.lists.iter().map(Vec::len).max().unwrap_or(0)
    }
}
