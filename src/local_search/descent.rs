//! Variable neighborhood descent over candidate-list restricted moves.
//!
//! # Algorithm
//!
//! 1. Reselect representatives on every route, set level k = 0
//! 2. Scan customer pairs `(i, j)`, `j` from the candidate list of `i`, both
//!    visited, in a freshly shuffled order, trying the level-k move of each
//!    pair with `only_improve`
//! 3. On the first improving move: reselect representatives on the touched
//!    routes, set k = 0 and rescan
//! 4. If a full scan finds nothing, k = k + 1; stop once every level fails
//!
//! Perturbation reuses the same scan with `only_improve` off, starting from
//! the last level and cycling through the levels after every applied move.
//!
//! # Complexity
//!
//! O(n × k) move evaluations per scan, n = customers, k = candidate list size.
//!
//! # Reference
//!
//! Hansen, P. & Mladenović, N. (2001). "Variable neighborhood search:
//! Principles and applications", *European Journal of Operational Research*
//! 130(3), 449-467.

use rand::Rng;
use u_numflow::random::shuffle;

use super::{Move, Neighborhood, SearchConfig};
use crate::models::{Instance, Solution};

/// Descent local search bound to an instance.
///
/// # Examples
///
/// ```
/// use u_gvrp::constructive::sweep;
/// use u_gvrp::local_search::{LocalSearch, SearchConfig};
/// use u_gvrp::models::Instance;
/// use u_numflow::random::create_rng;
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
/// let mut solution = sweep(&instance).unwrap();
/// let before = solution.cost();
/// let ls = LocalSearch::new(&instance, SearchConfig::default());
/// ls.descend(&mut solution, &mut create_rng(42));
/// assert!(solution.cost() <= before);
/// assert!(solution.is_valid(&instance));
/// ```
#[derive(Debug, Clone)]
pub struct LocalSearch<'a> {
    instance: &'a Instance,
    config: SearchConfig,
}

impl<'a> LocalSearch<'a> {
    /// Creates a local search over `instance`.
    pub fn new(instance: &'a Instance, config: SearchConfig) -> Self {
        Self { instance, config }
    }

    /// The instance searched.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// The configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Descends to a local optimum over every configured level.
    ///
    /// Returns the number of improving moves applied.
    pub fn descend<R: Rng>(&self, solution: &mut Solution, rng: &mut R) -> usize {
        let levels = &self.config.neighborhoods;
        let start_cost = solution.cost();
        for r in 0..solution.num_routes() {
            solution.select_representatives(r, self.instance);
        }
        let mut improvements = 0;
        let mut level = 0;

        while level < levels.len() {
            match self.scan(solution, levels[level], true, rng) {
                Some((mv, delta)) => {
                    let reselected = self.reselect(solution, &mv);
                    log::trace!(
                        "{} improved by {} (+{} from representatives): {:?}",
                        levels[level],
                        -delta,
                        -reselected,
                        mv
                    );
                    improvements += 1;
                    level = 0;
                }
                None => level += 1,
            }
        }

        log::debug!(
            "descent: {} improvements, cost {} -> {}",
            improvements,
            start_cost,
            solution.cost()
        );
        if self.config.check_invariants {
            self.check_invariants(solution);
        }
        improvements
    }

    /// Applies `count` moves without regard to cost.
    ///
    /// Starts at the last level and advances one level after each applied
    /// move, and after each scan that finds nothing applicable. Stops early
    /// if a full cycle of levels applies nothing. Returns the number of
    /// moves applied.
    pub fn perturb<R: Rng>(&self, solution: &mut Solution, count: usize, rng: &mut R) -> usize {
        let levels = &self.config.neighborhoods;
        if levels.is_empty() {
            return 0;
        }
        let start_cost = solution.cost();
        let mut level = levels.len() - 1;
        let mut applied = 0;
        let mut misses = 0;

        while applied < count && misses < levels.len() {
            match self.scan(solution, levels[level], false, rng) {
                Some((mv, delta)) => {
                    log::trace!("perturbation {} by {}: {:?}", levels[level], delta, mv);
                    applied += 1;
                    misses = 0;
                }
                None => misses += 1,
            }
            level = (level + 1) % levels.len();
        }

        log::debug!(
            "perturbation: {}/{} moves, cost {} -> {}",
            applied,
            count,
            start_cost,
            solution.cost()
        );
        applied
    }

    /// Validates `solution` and logs every violation.
    ///
    /// Returns `true` if the solution is valid.
    pub fn check_invariants(&self, solution: &Solution) -> bool {
        let violations = solution.validate(self.instance);
        for v in &violations {
            log::warn!("invariant violated: {}", v);
        }
        violations.is_empty()
    }

    /// One shuffled pass over candidate pairs; applies the first move that
    /// `Move::apply` accepts.
    fn scan<R: Rng>(
        &self,
        solution: &mut Solution,
        neighborhood: Neighborhood,
        only_improve: bool,
        rng: &mut R,
    ) -> Option<(Move, i64)> {
        let candidates = self.instance.candidates();
        let mut i_order: Vec<usize> = (1..self.instance.customers().len()).collect();
        let mut j_order: Vec<usize> = (0..candidates.max_len()).collect();
        shuffle(&mut i_order, rng);
        shuffle(&mut j_order, rng);

        for &i in &i_order {
            if !solution.is_visited(i) {
                continue;
            }
            let neighbors = candidates.neighbors(i);
            for &jx in &j_order {
                let Some(&j) = neighbors.get(jx) else {
                    continue;
                };
                if !solution.is_visited(j) {
                    continue;
                }
                let Some(mv) = neighborhood.build_move(solution, i, j, rng) else {
                    continue;
                };
                if let Some(delta) = mv.apply(solution, self.instance, only_improve) {
                    return Some((mv, delta));
                }
            }
        }
        None
    }

    /// Reselects representatives on the routes touched by `mv`.
    fn reselect(&self, solution: &mut Solution, mv: &Move) -> i64 {
        let (a, b) = mv.routes();
        let mut delta = solution.select_representatives(a, self.instance);
        if let Some(b) = b {
            delta += solution.select_representatives(b, self.instance);
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Instance, ViolationType};
    use u_numflow::random::create_rng;

    /// Eight clusters around the depot, two members each.
    fn ring() -> Instance {
        Instance::builder()
            .name("ring")
            .depot(0, 0)
            .cluster(2, &[(10, 0), (30, 5)])
            .cluster(2, &[(7, 7), (25, 25)])
            .cluster(2, &[(0, 10), (-5, 30)])
            .cluster(2, &[(-7, 7), (-25, 25)])
            .cluster(2, &[(-10, 0), (-30, -5)])
            .cluster(2, &[(-7, -7), (-25, -25)])
            .cluster(2, &[(0, -10), (5, -30)])
            .cluster(2, &[(7, -7), (25, -25)])
            .fleet(2)
            .capacity(10)
            .candidate_size(5)
            .build()
            .expect("valid instance")
    }

    /// A deliberately bad start: far members, interleaved routes.
    fn scrambled(inst: &Instance) -> Solution {
        let mut sol = Solution::new(inst);
        for c in [2, 10, 6, 14] {
            assert!(sol.insert(0, c, inst));
        }
        for c in [12, 4, 16, 8] {
            assert!(sol.insert(1, c, inst));
        }
        sol
    }

    #[test]
    fn test_descend_improves_and_stays_valid() {
        let inst = ring();
        let mut sol = scrambled(&inst);
        assert!(sol.is_valid(&inst));
        let before = sol.cost();
        let ls = LocalSearch::new(&inst, SearchConfig::default());
        let improvements = ls.descend(&mut sol, &mut create_rng(7));
        assert!(improvements > 0);
        assert!(sol.cost() < before);
        assert_eq!(sol.cost(), sol.recompute_cost(&inst));
        assert!(sol.is_valid(&inst), "{:?}", sol.validate(&inst));
    }

    #[test]
    fn test_descend_reaches_local_optimum() {
        let inst = ring();
        let mut sol = scrambled(&inst);
        // Or-opt samples its target position, so leave it out here.
        let config = SearchConfig::default().with_neighborhoods(vec![
            Neighborhood::Shift,
            Neighborhood::Swap,
            Neighborhood::TwoOpt,
        ]);
        let ls = LocalSearch::new(&inst, config);
        let mut rng = create_rng(3);
        ls.descend(&mut sol, &mut rng);
        let cost = sol.cost();
        // Nothing left to improve: a second descent is a no-op.
        assert_eq!(ls.descend(&mut sol, &mut rng), 0);
        assert_eq!(sol.cost(), cost);
    }

    #[test]
    fn test_descend_is_deterministic() {
        let inst = ring();
        let ls = LocalSearch::new(&inst, SearchConfig::default());
        let mut a = scrambled(&inst);
        let mut b = scrambled(&inst);
        ls.descend(&mut a, &mut create_rng(11));
        ls.descend(&mut b, &mut create_rng(11));
        assert!(a.same_routes(&b));
        assert_eq!(a.cost(), b.cost());
    }

    #[test]
    fn test_descend_without_levels_only_reselects() {
        let inst = ring();
        let mut sol = scrambled(&inst);
        let ls = LocalSearch::new(&inst, SearchConfig::default().with_neighborhoods(vec![]));
        assert_eq!(ls.descend(&mut sol, &mut create_rng(1)), 0);
        assert!(sol.is_valid(&inst));
    }

    #[test]
    fn test_perturb_applies_count() {
        let inst = ring();
        let mut sol = scrambled(&inst);
        let ls = LocalSearch::new(&inst, SearchConfig::default());
        let mut rng = create_rng(5);
        ls.descend(&mut sol, &mut rng);
        let applied = ls.perturb(&mut sol, 4, &mut rng);
        assert_eq!(applied, 4);
        assert_eq!(sol.cost(), sol.recompute_cost(&inst));
        assert!(sol.is_valid(&inst), "{:?}", sol.validate(&inst));
    }

    #[test]
    fn test_perturb_gives_up_without_moves() {
        // A single customer admits no move at any level.
        let inst = Instance::builder()
            .cluster(1, &[(3, 4)])
            .build()
            .expect("valid");
        let mut sol = Solution::new(&inst);
        sol.insert(0, 1, &inst);
        let ls = LocalSearch::new(&inst, SearchConfig::default());
        assert_eq!(ls.perturb(&mut sol, 10, &mut create_rng(1)), 0);
        assert_eq!(ls.descend(&mut sol, &mut create_rng(1)), 0);
    }

    #[test]
    fn test_check_invariants_reports() {
        let inst = ring();
        let mut sol = scrambled(&inst);
        let ls = LocalSearch::new(&inst, SearchConfig::default().with_check_invariants(true));
        assert!(ls.check_invariants(&sol));
        sol.remove(2, &inst);
        assert!(!ls.check_invariants(&sol));
        assert!(sol
            .validate(&inst)
            .iter()
            .any(|v| matches!(v.kind, ViolationType::MissingCluster { .. })));
    }
}
