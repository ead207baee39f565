//! Dense integer distance matrix.

use crate::models::{Customer, DEPOT};

/// A dense n×n integer distance matrix stored in row-major order.
///
/// Row and column 0 hold the depot. Distances are Euclidean, rounded half
/// up, and the matrix is symmetric with a zero diagonal.
///
/// # Examples
///
/// ```
/// use u_gvrp::models::{ClusterId, Customer};
/// use u_gvrp::distance::DistanceMatrix;
///
/// let customers = vec![
///     Customer::depot(0, 0),
///     Customer::new(1, 3, 4, ClusterId(0)),
///     Customer::new(2, 6, 8, ClusterId(1)),
/// ];
/// let dm = DistanceMatrix::from_customers(&customers);
/// assert_eq!(dm.distance(1, 2), 5);
/// assert_eq!(dm.distance_from_depot(2), 10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<i64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the matrix from customer coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `customers[i].id() != i` for some `i`.
    pub fn from_customers(customers: &[Customer]) -> Self {
        let n = customers.len();
        let mut data = vec![0; n * n];
        for i in 0..n {
            assert_eq!(customers[i].id(), i, "customer ids must be dense and ordered");
            for j in (i + 1)..n {
                let d = customers[i].distance_to(&customers[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { data, size: n }
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`, the
    /// grid is not symmetric or the diagonal is not zero.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        let dm = Self { data, size };
        if !dm.is_symmetric() || (0..size).any(|i| dm.distance(i, i) != 0) {
            return None;
        }
        Some(dm)
    }

    /// Returns the distance between customers `a` and `b`.
    ///
    /// # Panics
    ///
    /// Panics if either id is out of range.
    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> i64 {
        assert!(a < self.size && b < self.size, "customer id out of range");
        self.data[a * self.size + b]
    }

    /// Returns the distance between the depot and customer `a`.
    #[inline]
    pub fn distance_from_depot(&self, a: usize) -> i64 {
        self.distance(DEPOT, a)
    }

    /// Number of locations in this matrix (customers plus depot).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `d[i][j] == d[j][i]` for every pair.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.distance(i, j) != self.distance(j, i) {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the customer nearest to `from` for which `is_visited` is false.
    ///
    /// The depot and `from` itself are never returned. Ties go to the lower
    /// id. Returns `None` when every customer is visited. This is a linear
    /// scan meant for constructive heuristics.
    pub fn closest_unvisited<F>(&self, from: usize, mut is_visited: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        let mut best: Option<(usize, i64)> = None;
        for c in 1..self.size {
            if c == from || is_visited(c) {
                continue;
            }
            let d = self.distance(from, c);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((c, d));
            }
        }
        best.map(|(c, _)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClusterId;

    fn sample_customers() -> Vec<Customer> {
        vec![
            Customer::depot(0, 0),
            Customer::new(1, 3, 4, ClusterId(0)),
            Customer::new(2, 0, 8, ClusterId(1)),
        ]
    }

    #[test]
    fn test_from_customers() {
        let dm = DistanceMatrix::from_customers(&sample_customers());
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.distance(0, 1), 5);
        assert_eq!(dm.distance(0, 2), 8);
        assert_eq!(dm.distance(0, 0), 0);
        // (3,4) -> (0,8): sqrt(9 + 16) = 5
        assert_eq!(dm.distance(1, 2), 5);
    }

    #[test]
    fn test_depot_distance() {
        let dm = DistanceMatrix::from_customers(&sample_customers());
        assert_eq!(dm.distance_from_depot(1), dm.distance(1, 0));
        assert_eq!(dm.distance_from_depot(2), 8);
    }

    #[test]
    fn test_symmetric_zero_diagonal() {
        let dm = DistanceMatrix::from_customers(&sample_customers());
        assert!(dm.is_symmetric());
        for i in 0..dm.size() {
            assert_eq!(dm.distance(i, i), 0);
        }
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0, 5, 5, 0]).expect("valid");
        assert_eq!(dm.distance(0, 1), 5);
        assert_eq!(dm.distance(1, 0), 5);
    }

    #[test]
    fn test_from_data_rejects_bad_grid() {
        assert!(DistanceMatrix::from_data(2, vec![0, 1, 2]).is_none());
        assert!(DistanceMatrix::from_data(2, vec![0, 1, 2, 0]).is_none());
        assert!(DistanceMatrix::from_data(2, vec![1, 1, 1, 0]).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        let dm = DistanceMatrix::from_customers(&sample_customers());
        dm.distance(0, 3);
    }

    #[test]
    fn test_closest_unvisited() {
        let dm = DistanceMatrix::from_customers(&sample_customers());
        // From depot: customer 1 at 5, customer 2 at 8
        assert_eq!(dm.closest_unvisited(0, |_| false), Some(1));
        assert_eq!(dm.closest_unvisited(0, |c| c == 1), Some(2));
        assert_eq!(dm.closest_unvisited(0, |_| true), None);
        // Never returns itself
        assert_eq!(dm.closest_unvisited(1, |_| false), Some(2));
    }
}
