//! Iterated Local Search.
//!
//! # Algorithm
//!
//! 1. Descend from the initial solution; it becomes current and best
//! 2. While the stopping predicate accepts the current solution:
//!    a. **Perturbation**: apply non-improving moves to current
//!    b. **Local search**: descend from the perturbed solution
//!    c. **Acceptance**: if cost ≤ best cost, keep it and make it the new
//!    best; otherwise restart from a copy of best
//! 3. Return best
//!
//! # Reference
//!
//! Lourenço, H.R., Martin, O.C. & Stützle, T. (2003). "Iterated Local
//! Search", *Handbook of Metaheuristics*, 320-353.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{IlsConfig, LocalSearch};
use crate::models::{Instance, Solution};

/// Result of an ILS run.
#[derive(Debug, Clone)]
pub struct IlsResult {
    /// Best solution found.
    pub best: Solution,
    /// Cost of the best solution.
    pub best_cost: i64,
    /// Perturb-and-descend iterations executed.
    pub iterations: usize,
    /// Iterations that strictly lowered the best cost.
    pub improvements: usize,
    /// Best cost after the initial descent and after every iteration.
    pub cost_history: Vec<i64>,
}

impl IlsResult {
    /// Serializable summary of the run.
    pub fn stats(&self) -> IlsStats {
        IlsStats {
            best_cost: self.best_cost,
            initial_cost: self.cost_history.first().copied().unwrap_or(self.best_cost),
            iterations: self.iterations,
            improvements: self.improvements,
            routes_used: self.best.num_used_routes(),
        }
    }
}

/// Summary statistics of an ILS run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IlsStats {
    /// Cost of the best solution.
    pub best_cost: i64,
    /// Cost of the first local optimum.
    pub initial_cost: i64,
    /// Iterations executed.
    pub iterations: usize,
    /// Iterations that strictly lowered the best cost.
    pub improvements: usize,
    /// Non-empty routes in the best solution.
    pub routes_used: usize,
}

/// Iterated Local Search runner.
///
/// # Examples
///
/// ```
/// use u_gvrp::constructive::sweep;
/// use u_gvrp::local_search::{IlsConfig, IteratedLocalSearch};
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
/// let ils = IteratedLocalSearch::new(&instance, IlsConfig::default().with_seed(1));
/// let initial = sweep(&instance).unwrap();
/// let mut budget = 20;
/// let result = ils.run(initial, |_| {
///     budget -= 1;
///     budget > 0
/// });
/// assert_eq!(result.iterations, 19);
/// assert!(result.best.is_valid(&instance));
/// assert_eq!(result.best_cost, result.best.cost());
/// ```
#[derive(Debug, Clone)]
pub struct IteratedLocalSearch<'a> {
    search: LocalSearch<'a>,
    config: IlsConfig,
}

impl<'a> IteratedLocalSearch<'a> {
    /// Creates a runner over `instance`.
    pub fn new(instance: &'a Instance, config: IlsConfig) -> Self {
        Self {
            search: LocalSearch::new(instance, config.search.clone()),
            config,
        }
    }

    /// The inner descent.
    pub fn local_search(&self) -> &LocalSearch<'a> {
        &self.search
    }

    /// The configuration.
    pub fn config(&self) -> &IlsConfig {
        &self.config
    }

    /// Perturbation moves applied per iteration.
    pub fn perturbation_count(&self) -> usize {
        self.config
            .perturbation_count(self.search.instance().num_clusters())
    }

    /// Runs with an RNG seeded from the configuration (42 when unset).
    pub fn run<F>(&self, initial: Solution, keep_going: F) -> IlsResult
    where
        F: FnMut(&Solution) -> bool,
    {
        let mut rng = u_numflow::random::create_rng(self.config.seed.unwrap_or(42));
        self.explore(initial, &mut rng, keep_going)
    }

    /// Runs until `keep_going` returns `false` for the current solution.
    ///
    /// The predicate is evaluated once before every iteration, so the
    /// result is never worse than the first local optimum.
    pub fn explore<R, F>(&self, initial: Solution, rng: &mut R, mut keep_going: F) -> IlsResult
    where
        R: Rng,
        F: FnMut(&Solution) -> bool,
    {
        let count = self.perturbation_count();
        let mut current = initial;
        self.search.descend(&mut current, rng);

        let mut best = current.clone();
        let mut best_cost = best.cost();
        let mut cost_history = vec![best_cost];
        let mut iterations = 0;
        let mut improvements = 0;
        log::info!("ils: first local optimum {}", best_cost);

        while keep_going(&current) {
            iterations += 1;
            self.search.perturb(&mut current, count, rng);
            self.search.descend(&mut current, rng);

            let cost = current.cost();
            if cost <= best_cost {
                if cost < best_cost {
                    improvements += 1;
                    log::info!("ils iteration {}: new best {}", iterations, cost);
                }
                best = current.clone();
                best_cost = cost;
            } else {
                current = best.clone();
            }
            log::debug!(
                "ils iteration {}: cost {}, best {}",
                iterations,
                cost,
                best_cost
            );
            cost_history.push(best_cost);
        }

        log::info!(
            "ils finished: best {} after {} iterations ({} improvements)",
            best_cost,
            iterations,
            improvements
        );
        IlsResult {
            best,
            best_cost,
            iterations,
            improvements,
            cost_history,
        }
    }
}
