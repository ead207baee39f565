//! Shift (relocate) moves, within a route and between two routes.
//!
//! # Algorithm
//!
//! Removing the customer `u` between `a` and `b` saves
//! `d(a,u) + d(u,b) - d(a,b)`; inserting it between `x` and `y` costs
//! `d(x,u) + d(u,y) - d(x,y)`. The move delta is the difference, taken
//! from neighbor distances only.
//!
//! # Complexity
//!
//! O(1) delta evaluation; cache repair over the shifted span.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::models::{Instance, Route};

impl Route {
    /// Moves the visit at position `p` so that it ends up at position `q`.
    ///
    /// Returns the applied cost delta, or `None` when nothing changed: the
    /// route has fewer than two visits, `p == q`, or `only_improve` is set
    /// and the move would not shorten the route.
    ///
    /// # Panics
    ///
    /// Panics if `p` or `q` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_gvrp::models::{Instance, Route};
    ///
    /// let instance = Instance::builder()
    ///     .cluster(1, &[(0, 10)])
    ///     .cluster(1, &[(10, 0)])
    ///     .cluster(1, &[(10, 10)])
    ///     .build()
    ///     .unwrap();
    /// let mut route = Route::new(0, 10);
    /// for c in [1, 2, 3] {
    ///     route.push(c, &instance);
    /// }
    /// // 0 → (0,10) → (10,0) → (10,10) → 0 crosses itself.
    /// assert_eq!(route.intra_shift(1, 2, &instance, true), Some(-8));
    /// assert_eq!(route.customer_ids(), vec![1, 3, 2]);
    /// ```
    pub fn intra_shift(
        &mut self,
        p: usize,
        q: usize,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        let len = self.visits.len();
        assert!(p < len && q < len, "position out of range");
        if len < 2 || p == q {
            return None;
        }

        let u = self.visits[p].customer_id;
        let a = self.prev_of(p);
        let b = self.next_of(p);
        let saving = instance.distance(a, u) + instance.distance(u, b) - instance.distance(a, b);

        // Neighbors of the insertion slot, once `u` is out of the sequence.
        let (x, y) = if p < q {
            (self.visits[q].customer_id, self.next_of(q))
        } else {
            (self.prev_of(q), self.visits[q].customer_id)
        };
        let added = instance.distance(x, u) + instance.distance(u, y) - instance.distance(x, y);

        let delta = added - saving;
        if only_improve && delta >= 0 {
            return None;
        }

        let visit = self.visits.remove(p);
        self.visits.insert(q, visit);
        self.cost += delta;
        self.refresh(p.min(q), p.max(q) + 1, instance);
        Some(delta)
    }

    /// Moves the visit at position `p` of this route into `other`, so that
    /// it ends up at position `q` there.
    ///
    /// Returns `None` without changing either route when this route would
    /// become empty, `other` lacks capacity, or `only_improve` is set and the
    /// move would not shorten the combined distance.
    ///
    /// # Panics
    ///
    /// Panics if `p >= self.len()` or `q > other.len()`.
    pub fn inter_shift(
        &mut self,
        other: &mut Route,
        p: usize,
        q: usize,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        assert!(p < self.visits.len() && q <= other.visits.len(), "position out of range");
        if self.visits.len() < 2 {
            return None;
        }
        let demand = self.visits[p].demand;
        if other.load + demand > other.capacity {
            return None;
        }

        let u = self.visits[p].customer_id;
        let a = self.prev_of(p);
        let b = self.next_of(p);
        let from_delta = instance.distance(a, b) - instance.distance(a, u) - instance.distance(u, b);

        let x = other.prev_of(q);
        let y = other.at_or_depot(q);
        let to_delta = instance.distance(x, u) + instance.distance(u, y) - instance.distance(x, y);

        let delta = from_delta + to_delta;
        if only_improve && delta >= 0 {
            return None;
        }

        let visit = self.visits.remove(p);
        let cluster = visit.cluster;
        self.load -= demand;
        self.cost += from_delta;
        self.forget(cluster, instance);
        self.refresh(p, p, instance);

        other.visits.insert(q, visit);
        other.load += demand;
        other.cost += to_delta;
        other.refresh(q, q + 1, instance);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Instance, Route};

    /// Four unit clusters on the corners of a 10×10 square, two vehicles.
    fn square() -> Instance {
        Instance::builder()
            .depot(0, 0)
            .cluster(1, &[(0, 10)])
            .cluster(1, &[(10, 10)])
            .cluster(1, &[(10, 0)])
            .cluster(1, &[(5, 5)])
            .fleet(2)
            .capacity(3)
            .build()
            .expect("valid instance")
    }

    fn route(id: usize, customers: &[usize], inst: &Instance) -> Route {
        let mut r = Route::new(id, inst.capacity());
        for &c in customers {
            assert!(r.push(c, inst));
        }
        r
    }

    #[test]
    fn test_intra_shift_hand_computed() {
        let inst = square();
        // 0 → (10,10) → (0,10) → (10,0) → 0 = 14 + 10 + 14 + 10 = 48
        let mut r = route(0, &[2, 1, 3], &inst);
        assert_eq!(r.cost(), 48);
        // Moving (10,10) to the middle: 0 → (0,10) → (10,10) → (10,0) → 0 = 40
        assert_eq!(r.intra_shift(0, 1, &inst, true), Some(-8));
        assert_eq!(r.customer_ids(), vec![1, 2, 3]);
        assert_eq!(r.cost(), 40);
        assert_eq!(r.cost(), r.recompute_cost(&inst));
    }

    #[test]
    fn test_intra_shift_first_to_last_on_square() {
        let inst = square();
        // 0 → (10,0) → (0,10) → (10,10) → 0 = 10 + 14 + 10 + 14 = 48
        let mut a = route(0, &[3, 1, 2], &inst);
        let b = route(1, &[4], &inst);
        assert_eq!(a.cost(), 48);
        // (10,0) moves to the end: 0 → (0,10) → (10,10) → (10,0) → 0 = 40
        assert_eq!(a.intra_shift(0, 2, &inst, true), Some(-8));
        assert_eq!(a.customer_ids(), vec![1, 2, 3]);
        assert_eq!(a.cost(), 40);
        assert_eq!(a.cost(), a.recompute_cost(&inst));
        assert_eq!(a.cost() + b.cost(), 40 + 14);
    }

    #[test]
    fn test_intra_shift_only_improve_leaves_route() {
        let inst = square();
        let mut r = route(0, &[1, 2, 3], &inst);
        let before = r.clone();
        assert_eq!(r.intra_shift(0, 2, &inst, true), None);
        assert_eq!(r.visits(), before.visits());
        assert_eq!(r.from_left, before.from_left);
        assert_eq!(r.from_right, before.from_right);
        assert_eq!(r.cost(), before.cost());
    }

    #[test]
    fn test_intra_shift_forced_matches_recompute() {
        let inst = square();
        for p in 0..3 {
            for q in 0..3 {
                let mut r = route(0, &[1, 2, 3], &inst);
                let before = r.cost();
                match r.intra_shift(p, q, &inst, false) {
                    Some(delta) => assert_eq!(before + delta, r.recompute_cost(&inst)),
                    None => assert_eq!(p, q),
                }
                assert_eq!(r.cost(), r.recompute_cost(&inst));
            }
        }
    }

    #[test]
    fn test_intra_shift_needs_two() {
        let inst = square();
        let mut r = route(0, &[1], &inst);
        assert_eq!(r.intra_shift(0, 0, &inst, false), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_intra_shift_out_of_range() {
        let inst = square();
        let mut r = route(0, &[1, 2], &inst);
        r.intra_shift(0, 2, &inst, false);
    }

    #[test]
    fn test_inter_shift() {
        let inst = square();
        let mut a = route(0, &[1, 4], &inst);
        let mut b = route(1, &[2, 3], &inst);
        let total = a.cost() + b.cost();
        // (5,5) moves between (10,10) and (10,0).
        let delta = a.inter_shift(&mut b, 1, 1, &inst, false).expect("feasible");
        assert_eq!(a.customer_ids(), vec![1]);
        assert_eq!(b.customer_ids(), vec![2, 4, 3]);
        assert_eq!(a.load(), 1);
        assert_eq!(b.load(), 3);
        assert_eq!(a.cost() + b.cost(), total + delta);
        assert_eq!(a.cost(), a.recompute_cost(&inst));
        assert_eq!(b.cost(), b.recompute_cost(&inst));
        assert_eq!(a.dist_from_left(4), None);
        assert!(b.dist_from_left(4).is_some());
    }

    #[test]
    fn test_inter_shift_never_empties_route() {
        let inst = square();
        let mut a = route(0, &[1], &inst);
        let mut b = route(1, &[2], &inst);
        assert_eq!(a.inter_shift(&mut b, 0, 0, &inst, false), None);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_inter_shift_capacity_guard() {
        let inst = square();
        let mut a = route(0, &[1, 4], &inst);
        let mut b = route(1, &[2, 3], &inst);
        b.capacity = 2;
        assert_eq!(a.inter_shift(&mut b, 0, 0, &inst, false), None);
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_inter_shift_to_end() {
        let inst = square();
        let mut a = route(0, &[1, 2], &inst);
        let mut b = route(1, &[3], &inst);
        let delta = a.inter_shift(&mut b, 0, 1, &inst, false).expect("feasible");
        assert_eq!(b.customer_ids(), vec![3, 1]);
        assert_eq!(a.cost() + b.cost(), route(0, &[1, 2], &inst).cost() + 20 + delta);
    }
}
