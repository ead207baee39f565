//! Customer (and depot) locations.

use super::ClusterId;

/// Customer ID reserved for the depot.
pub const DEPOT: usize = 0;

/// A customer location (or the depot) in a generalized routing problem.
///
/// Customer 0 is the depot. Every other customer belongs to exactly one
/// cluster, referenced by [`ClusterId`] (lookup only, the cluster is owned
/// by the [`Instance`](super::Instance)).
///
/// # Examples
///
/// ```
/// use u_gvrp::models::{ClusterId, Customer};
///
/// let depot = Customer::depot(35, 35);
/// assert_eq!(depot.id(), 0);
/// assert!(depot.cluster().is_none());
///
/// let c = Customer::new(1, 41, 49, ClusterId(0));
/// assert_eq!(c.cluster(), Some(ClusterId(0)));
/// assert_eq!(depot.distance_to(&c), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: usize,
    x: i32,
    y: i32,
    cluster: Option<ClusterId>,
}

impl Customer {
    /// Creates a customer belonging to `cluster`.
    pub fn new(id: usize, x: i32, y: i32, cluster: ClusterId) -> Self {
        Self {
            id,
            x,
            y,
            cluster: Some(cluster),
        }
    }

    /// Creates the depot at the given coordinates (id = 0, no cluster).
    pub fn depot(x: i32, y: i32) -> Self {
        Self {
            id: DEPOT,
            x,
            y,
            cluster: None,
        }
    }

    /// Customer ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Cluster this customer belongs to (`None` for the depot).
    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }

    /// Returns `true` for the depot.
    pub fn is_depot(&self) -> bool {
        self.cluster.is_none()
    }

    /// Euclidean distance to another customer, rounded half up.
    pub fn distance_to(&self, other: &Customer) -> i64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        ((dx * dx + dy * dy).sqrt() + 0.5).floor() as i64
    }

    /// Polar angle of this customer as seen from `origin`.
    pub fn angle_from(&self, origin: &Customer) -> f64 {
        let dx = self.x as f64 - origin.x as f64;
        let dy = self.y as f64 - origin.y as f64;
        dy.atan2(dx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_new() {
        let c = Customer::new(3, 10, 20, ClusterId(1));
        assert_eq!(c.id(), 3);
        assert_eq!(c.x(), 10);
        assert_eq!(c.y(), 20);
        assert_eq!(c.cluster(), Some(ClusterId(1)));
        assert!(!c.is_depot());
    }

    #[test]
    fn test_customer_depot() {
        let d = Customer::depot(35, 35);
        assert_eq!(d.id(), DEPOT);
        assert!(d.is_depot());
    }

    #[test]
    fn test_distance_exact() {
        let a = Customer::depot(0, 0);
        let b = Customer::new(1, 3, 4, ClusterId(0));
        assert_eq!(a.distance_to(&b), 5);
    }

    #[test]
    fn test_distance_rounds_half_up() {
        let a = Customer::depot(0, 0);
        // sqrt(2) = 1.414 -> 1
        assert_eq!(a.distance_to(&Customer::new(1, 1, 1, ClusterId(0))), 1);
        // sqrt(5) = 2.236 -> 2
        assert_eq!(a.distance_to(&Customer::new(2, 1, 2, ClusterId(0))), 2);
        // sqrt(8) = 2.828 -> 3
        assert_eq!(a.distance_to(&Customer::new(3, 2, 2, ClusterId(0))), 3);
        // sqrt(20) = 4.472 -> 4
        assert_eq!(a.distance_to(&Customer::new(4, 2, 4, ClusterId(0))), 4);
    }

    #[test]
    fn test_distance_far_apart_coordinates() {
        let a = Customer::new(1, i32::MIN, 0, ClusterId(0));
        let b = Customer::new(2, i32::MAX, 0, ClusterId(0));
        assert_eq!(a.distance_to(&b), u32::MAX as i64);
        assert_eq!(b.distance_to(&a), u32::MAX as i64);
        assert!((b.angle_from(&a) - 0.0).abs() < 1e-12);
        assert!((a.angle_from(&b) - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Customer::new(1, 1, 2, ClusterId(0));
        let b = Customer::new(2, 4, 6, ClusterId(1));
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn test_angle_from() {
        let d = Customer::depot(0, 0);
        let east = Customer::new(1, 1, 0, ClusterId(0));
        let north = Customer::new(2, 0, 1, ClusterId(0));
        assert!(east.angle_from(&d).abs() < 1e-12);
        assert!((north.angle_from(&d) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
