//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! Given routes A = [a₀, ..., aₚ₋₁, aₚ, ..., aₙ] and
//! B = [b₀, ..., b_q₋₁, b_q, ..., bₘ], produce:
//!
//! A' = [a₀, ..., aₚ₋₁, b_q, ..., bₘ]
//! B' = [b₀, ..., b_q₋₁, aₚ, ..., aₙ]
//!
//! ```text
//! delta = d(aₚ₋₁, b_q) + d(b_q₋₁, aₚ) - d(aₚ₋₁, aₚ) - d(b_q₋₁, b_q)
//! ```
//!
//! Cuts right after the depot (`p == 0` or `q == 0`) and cuts at both
//! last visits only reproduce shift and swap moves, so they are skipped, as
//! is the pair of two-visit routes.
//!
//! # Complexity
//!
//! O(n) demand scan of both tails; cache repair over both tails.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use crate::models::{Instance, Route};

impl Route {
    /// Exchanges the tail of this route starting at `p` with the tail of
    /// `other` starting at `q`.
    ///
    /// Returns `None` without changing either route when the cut is one of
    /// the excluded degenerate cases, either resulting load exceeds its
    /// capacity, or `only_improve` is set and the move would not shorten the
    /// combined distance.
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
    /// // Two routes that cross between the x and y axes.
    /// let instance = Instance::builder()
    ///     .cluster(1, &[(10, 0)])
    ///     .cluster(1, &[(20, 0)])
    ///     .cluster(1, &[(30, 0)])
    ///     .cluster(1, &[(0, 10)])
    ///     .cluster(1, &[(0, 20)])
    ///     .cluster(1, &[(0, 30)])
    ///     .fleet(2)
    ///     .capacity(5)
    ///     .build()
    ///     .unwrap();
    /// let mut a = Route::new(0, 5);
    /// let mut b = Route::new(1, 5);
    /// for c in [1, 5, 6] {
    ///     a.push(c, &instance);
    /// }
    /// for c in [4, 2, 3] {
    ///     b.push(c, &instance);
    /// }
    /// let delta = a.inter_2opt_star(&mut b, 1, 1, &instance, true).unwrap();
    /// assert!(delta < 0);
    /// assert_eq!(a.customer_ids(), vec![1, 2, 3]);
    /// assert_eq!(b.customer_ids(), vec![4, 5, 6]);
    /// ```
    pub fn inter_2opt_star(
        &mut self,
        other: &mut Route,
        p: usize,
        q: usize,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        let size = self.visits.len();
        let other_size = other.visits.len();
        if size < 2 || other_size < 2 || (size == 2 && other_size == 2) {
            return None;
        }
        assert!(p < size && q < other_size, "position out of range");
        if p == 0 || q == 0 || (p == size - 1 && q == other_size - 1) {
            return None;
        }

        let gap = self.tail_demand(p) - other.tail_demand(q);
        if self.load - gap > self.capacity || other.load + gap > other.capacity {
            return None;
        }

        let x = self.visits[p - 1].customer_id;
        let cp = self.visits[p].customer_id;
        let y = other.visits[q - 1].customer_id;
        let cq = other.visits[q].customer_id;
        let delta = instance.distance(x, cq) + instance.distance(y, cp)
            - instance.distance(x, cp)
            - instance.distance(y, cq);
        if only_improve && delta >= 0 {
            return None;
        }

        let tail = self.visits.split_off(p);
        let other_tail = other.visits.split_off(q);
        for v in &tail {
            self.forget(v.cluster, instance);
        }
        for v in &other_tail {
            other.forget(v.cluster, instance);
        }
        self.visits.extend(other_tail);
        other.visits.extend(tail);
        self.load -= gap;
        other.load += gap;

        let (self_len, other_len) = (self.visits.len(), other.visits.len());
        self.refresh(p, self_len, instance);
        other.refresh(q, other_len, instance);
        self.cost = self.recompute_cost(instance);
        other.cost = other.recompute_cost(instance);
        Some(delta)
    }

    fn tail_demand(&self, from: usize) -> i32 {
        self.visits[from..].iter().map(|v| v.demand).sum()
    }
}
