//! Intra-route 2-opt move.
//!
//! # Algorithm
//!
//! Reversing the segment `r[i..=j]` replaces the edges entering and leaving
//! it; with symmetric distances the inner edges keep their length:
//!
//! ```text
//! delta = d(r[i-1], r[j]) + d(r[i], r[j+1]) - d(r[i-1], r[i]) - d(r[j], r[j+1])
//! ```
//!
//! where `r[-1]` and `r[len]` are the depot.
//!
//! # Complexity
//!
//! O(1) delta evaluation; O(j - i) reversal plus cache repair.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::models::{Instance, Route};

impl Route {
    /// Reverses the visits between positions `p` and `q` (inclusive, in
    /// either order).
    ///
    /// Returns the applied cost delta, or `None` when nothing changed: the
    /// route has fewer than four visits, `p == q`, or `only_improve` is set
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
    ///     .cluster(1, &[(10, 0)])
    ///     .cluster(1, &[(20, 0)])
    ///     .cluster(1, &[(30, 0)])
    ///     .cluster(1, &[(40, 0)])
    ///     .build()
    ///     .unwrap();
    /// let mut route = Route::new(0, 10);
    /// for c in [1, 3, 2, 4] {
    ///     route.push(c, &instance);
    /// }
    /// assert_eq!(route.intra_2opt(1, 2, &instance, true), Some(-20));
    /// assert_eq!(route.customer_ids(), vec![1, 2, 3, 4]);
    /// assert_eq!(route.cost(), 80);
    /// ```
    pub fn intra_2opt(
        &mut self,
        p: usize,
        q: usize,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        let len = self.visits.len();
        assert!(p < len && q < len, "position out of range");
        if len < 4 || p == q {
            return None;
        }
        let (i, j) = (p.min(q), p.max(q));
        let u = self.visits[i].customer_id;
        let w = self.visits[j].customer_id;
        let x = self.prev_of(i);
        let y = self.next_of(j);

        let delta = instance.distance(x, w) + instance.distance(u, y)
            - instance.distance(x, u)
            - instance.distance(w, y);
        if only_improve && delta >= 0 {
            return None;
        }

        self.visits[i..=j].reverse();
        self.cost += delta;
        self.refresh(i, j + 1, instance);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Instance, Route};

    fn zigzag() -> Instance {
        Instance::builder()
            .depot(0, 0)
            .cluster(1, &[(0, 10)])
            .cluster(1, &[(10, 10)])
            .cluster(1, &[(10, 0)])
            .cluster(1, &[(20, 0)])
            .cluster(1, &[(20, 10)])
            .capacity(10)
            .build()
            .expect("valid instance")
    }

    fn route(customers: &[usize], inst: &Instance) -> Route {
        let mut r = Route::new(0, inst.capacity());
        for &c in customers {
            assert!(r.push(c, inst));
        }
        r
    }

    #[test]
    fn test_intra_2opt_uncrosses() {
        let inst = zigzag();
        // 0 → (0,10) → (10,0) → (10,10) → (20,0) → (20,10) → 0
        let mut r = route(&[1, 3, 2, 4, 5], &inst);
        let before = r.cost();
        // Two diagonals of 14 become two sides of 10.
        assert_eq!(r.intra_2opt(1, 2, &inst, true), Some(-8));
        assert_eq!(r.customer_ids(), vec![1, 2, 3, 4, 5]);
        assert_eq!(r.cost(), before - 8);
        assert_eq!(r.cost(), r.recompute_cost(&inst));
    }

    #[test]
    fn test_intra_2opt_all_pairs() {
        let inst = zigzag();
        for p in 0..5 {
            for q in 0..5 {
                let mut r = route(&[4, 1, 5, 3, 2], &inst);
                let before = r.cost();
                match r.intra_2opt(p, q, &inst, false) {
                    Some(delta) => assert_eq!(before + delta, r.recompute_cost(&inst)),
                    None => assert_eq!(p, q),
                }
            }
        }
    }

    #[test]
    fn test_intra_2opt_full_reversal_is_free() {
        let inst = zigzag();
        let mut r = route(&[1, 2, 3, 4], &inst);
        assert_eq!(r.intra_2opt(3, 0, &inst, false), Some(0));
        assert_eq!(r.customer_ids(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_intra_2opt_needs_four() {
        let inst = zigzag();
        let mut r = route(&[1, 3, 2], &inst);
        assert_eq!(r.intra_2opt(0, 2, &inst, false), None);
        assert_eq!(r.customer_ids(), vec![1, 3, 2]);
    }
}
