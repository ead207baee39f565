//! Swap (exchange) moves, within a route and between two routes.
//!
//! # Algorithm
//!
//! Exchanges the visits at two positions. Adjacent positions share an edge,
//! which stays in place, so only the two outer edges change; otherwise the
//! four edges around both positions are replaced.
//!
//! # Complexity
//!
//! O(1) delta evaluation; cache repair over the span between both positions.

use crate::models::{Instance, Route};

impl Route {
    /// Exchanges the visits at positions `p` and `q`.
    ///
    /// Returns the applied cost delta, or `None` when nothing changed: the
    /// route has fewer than three visits, `p == q`, or `only_improve` is set
    /// and the move would not shorten the route.
    ///
    /// # Panics
    ///
    /// Panics if `p` or `q` is out of range.
    pub fn intra_swap(
        &mut self,
        p: usize,
        q: usize,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        let len = self.visits.len();
        assert!(p < len && q < len, "position out of range");
        if len < 3 || p == q {
            return None;
        }
        let (i, j) = (p.min(q), p.max(q));
        let u = self.visits[i].customer_id;
        let w = self.visits[j].customer_id;
        let a = self.prev_of(i);
        let e = self.next_of(j);

        let delta = if j == i + 1 {
            instance.distance(a, w) + instance.distance(u, e)
                - instance.distance(a, u)
                - instance.distance(w, e)
        } else {
            let b = self.next_of(i);
            let c = self.prev_of(j);
            instance.distance(a, w) + instance.distance(w, b) + instance.distance(c, u)
                + instance.distance(u, e)
                - instance.distance(a, u)
                - instance.distance(u, b)
                - instance.distance(c, w)
                - instance.distance(w, e)
        };
        if only_improve && delta >= 0 {
            return None;
        }

        self.visits.swap(i, j);
        self.cost += delta;
        self.refresh(i, j + 1, instance);
        Some(delta)
    }

    /// Exchanges the visit at position `p` of this route with the visit at
    /// position `q` of `other`.
    ///
    /// Returns `None` without changing either route when either resulting
    /// load exceeds its capacity, or `only_improve` is set and the move
    /// would not shorten the combined distance.
    ///
    /// # Panics
    ///
    /// Panics if `p` or `q` is out of range.
    pub fn inter_swap(
        &mut self,
        other: &mut Route,
        p: usize,
        q: usize,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        assert!(p < self.visits.len() && q < other.visits.len(), "position out of range");
        let du = self.visits[p].demand;
        let dw = other.visits[q].demand;
        if self.load - du + dw > self.capacity || other.load - dw + du > other.capacity {
            return None;
        }

        let u = self.visits[p].customer_id;
        let w = other.visits[q].customer_id;
        let (a, b) = (self.prev_of(p), self.next_of(p));
        let (x, y) = (other.prev_of(q), other.next_of(q));
        let self_delta = instance.distance(a, w) + instance.distance(w, b)
            - instance.distance(a, u)
            - instance.distance(u, b);
        let other_delta = instance.distance(x, u) + instance.distance(u, y)
            - instance.distance(x, w)
            - instance.distance(w, y);

        let delta = self_delta + other_delta;
        if only_improve && delta >= 0 {
            return None;
        }

        std::mem::swap(&mut self.visits[p], &mut other.visits[q]);
        let (cu, cw) = (other.visits[q].cluster, self.visits[p].cluster);
        self.load += dw - du;
        other.load += du - dw;
        self.cost += self_delta;
        other.cost += other_delta;
        self.forget(cu, instance);
        other.forget(cw, instance);
        self.refresh(p, p + 1, instance);
        other.refresh(q, q + 1, instance);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Instance, Route};

    fn line() -> Instance {
        Instance::builder()
            .depot(0, 0)
            .cluster(2, &[(10, 0)])
            .cluster(2, &[(20, 0)])
            .cluster(2, &[(30, 0)])
            .cluster(5, &[(40, 0)])
            .cluster(1, &[(0, 10), (0, 40)])
            .fleet(2)
            .capacity(8)
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
    fn test_intra_swap_adjacent() {
        let inst = line();
        // 0 → 20 → 10 → 30 → 0 = 20 + 10 + 20 + 30 = 80
        let mut r = route(0, &[2, 1, 3], &inst);
        assert_eq!(r.cost(), 80);
        assert_eq!(r.intra_swap(0, 1, &inst, true), Some(-20));
        assert_eq!(r.customer_ids(), vec![1, 2, 3]);
        assert_eq!(r.cost(), 60);
    }

    #[test]
    fn test_intra_swap_distant() {
        let inst = line();
        let mut r = route(0, &[3, 2, 1], &inst);
        assert_eq!(r.intra_swap(2, 0, &inst, true), None);
        let mut r = route(0, &[3, 2, 1], &inst);
        assert_eq!(r.intra_swap(2, 0, &inst, false), Some(0));
        assert_eq!(r.customer_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_intra_swap_all_pairs() {
        let inst = line();
        for p in 0..4 {
            for q in 0..4 {
                let mut r = route(0, &[5, 3, 1, 2], &inst);
                let before = r.cost();
                if let Some(delta) = r.intra_swap(p, q, &inst, false) {
                    assert_eq!(before + delta, r.recompute_cost(&inst));
                    assert_eq!(r.cost(), r.recompute_cost(&inst));
                } else {
                    assert_eq!(p, q);
                }
            }
        }
    }

    #[test]
    fn test_intra_swap_needs_three() {
        let inst = line();
        let mut r = route(0, &[2, 1], &inst);
        assert_eq!(r.intra_swap(0, 1, &inst, false), None);
    }

    #[test]
    fn test_inter_swap() {
        let inst = line();
        let mut a = route(0, &[1, 5], &inst);
        let mut b = route(1, &[2, 3], &inst);
        let total = a.cost() + b.cost();
        let delta = a.inter_swap(&mut b, 1, 0, &inst, false).expect("feasible");
        assert_eq!(a.customer_ids(), vec![1, 2]);
        assert_eq!(b.customer_ids(), vec![5, 3]);
        assert_eq!(a.load(), 4);
        assert_eq!(b.load(), 3);
        assert_eq!(a.cost() + b.cost(), total + delta);
        assert_eq!(a.cost(), a.recompute_cost(&inst));
        assert_eq!(b.cost(), b.recompute_cost(&inst));
        assert_eq!(a.dist_from_left(6), None);
        assert_eq!(b.dist_from_left(2), None);
        assert!(b.dist_from_left(6).is_some());
    }

    #[test]
    fn test_inter_swap_capacity_guard() {
        let inst = line();
        let mut a = route(0, &[4, 5], &inst);
        let mut b = route(1, &[1, 2, 3], &inst);
        // b would carry 2 + 2 + 5 = 9 > 8.
        assert_eq!(a.inter_swap(&mut b, 0, 0, &inst, false), None);
        assert_eq!(a.customer_ids(), vec![4, 5]);
        assert_eq!(b.customer_ids(), vec![1, 2, 3]);
    }
}
