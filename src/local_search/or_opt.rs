//! Intra-route Or-opt move: relocate a block of consecutive visits.
//!
//! # Algorithm
//!
//! The block `r[p..=q]` is cut out between `x = r[p-1]` and `y = r[q+1]`
//! and reinserted, in the same orientation, between `r[z]` and
//! `w = r[z+1]` for some `z > q`:
//!
//! ```text
//! delta = d(x, y) + d(r[z], r[p]) + d(r[q], w) - d(x, r[p]) - d(r[q], y) - d(r[z], w)
//! ```
//!
//! # Complexity
//!
//! O(1) delta evaluation; O(z - p) rotation plus cache repair.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::models::{Instance, Route};

impl Route {
    /// Moves the block of visits `p..=q` to just after position `z`.
    ///
    /// Returns the applied cost delta, or `None` when nothing changed: the
    /// block is not ordered (`p > q`), `z` does not lie after it, or
    /// `only_improve` is set and the move would not shorten the route.
    ///
    /// # Panics
    ///
    /// Panics if `z` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_gvrp::models::{Instance, Route};
    ///
    /// let instance = Instance::builder()
    ///     .cluster(1, &[(10, 0)])
    ///     .cluster(1, &[(20, 0)])
    ///     .cluster(1, &[(30, 0)])
    ///     .cluster(1, &[(40, 0)])
    ///     .build()
    ///     .unwrap();
    /// let mut route = Route::new(0, 10);
    /// for c in [3, 4, 1, 2] {
    ///     route.push(c, &instance);
    /// }
    /// assert_eq!(route.intra_or_opt(0, 1, 3, &instance, true), Some(-20));
    /// assert_eq!(route.customer_ids(), vec![1, 2, 3, 4]);
    /// ```
    pub fn intra_or_opt(
        &mut self,
        p: usize,
        q: usize,
        z: usize,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        assert!(z < self.visits.len(), "position out of range");
        if p > q || z <= q {
            return None;
        }

        let first = self.visits[p].customer_id;
        let last = self.visits[q].customer_id;
        let x = self.prev_of(p);
        let y = self.visits[q + 1].customer_id;
        let anchor = self.visits[z].customer_id;
        let w = self.next_of(z);

        let delta = instance.distance(x, y)
            + instance.distance(anchor, first)
            + instance.distance(last, w)
            - instance.distance(x, first)
            - instance.distance(last, y)
            - instance.distance(anchor, w);
        if only_improve && delta >= 0 {
            return None;
        }

        self.visits[p..=z].rotate_left(q - p + 1);
        self.cost += delta;
        self.refresh(p, z + 1, instance);
        Some(delta)
    }
}
