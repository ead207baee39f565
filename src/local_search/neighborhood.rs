//! Neighborhood levels and the moves they generate.
//!
//! A [`Neighborhood`] turns a pair of visited customers `(i, j)` into a
//! concrete [`Move`]: the intra-route variant when both share a route, the
//! inter-route variant otherwise. Every move is applied through the uniform
//! [`Move::apply`], which keeps the solution's membership index in sync.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Instance, Solution};

/// A neighborhood level of the descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Neighborhood {
    /// Intra-route shift / inter-route shift.
    Shift,
    /// Intra-route swap / inter-route swap.
    Swap,
    /// Intra-route 2-opt / inter-route 2-opt*.
    TwoOpt,
    /// Intra-route block relocation to a random later position.
    OrOpt,
}

impl Neighborhood {
    /// Every level, in the default escalation order.
    pub const ALL: [Neighborhood; 4] = [
        Neighborhood::Shift,
        Neighborhood::Swap,
        Neighborhood::TwoOpt,
        Neighborhood::OrOpt,
    ];

    /// Builds the move relating customers `i` and `j`.
    ///
    /// Returns `None` if either customer is not visited or the level has no
    /// move for this pair (Or-opt across routes, or with no position left
    /// after the block).
    pub fn build_move<R: Rng>(
        self,
        solution: &Solution,
        i: usize,
        j: usize,
        rng: &mut R,
    ) -> Option<Move> {
        let ri = solution.route_of(i)?;
        let rj = solution.route_of(j)?;
        let pi = solution.route(ri).position(i)?;
        let pj = solution.route(rj).position(j)?;

        if ri == rj {
            let route = ri;
            match self {
                Neighborhood::Shift => Some(Move::IntraShift {
                    route,
                    from: pi,
                    to: pj,
                }),
                Neighborhood::Swap => Some(Move::IntraSwap { route, a: pi, b: pj }),
                Neighborhood::TwoOpt => Some(Move::IntraTwoOpt {
                    route,
                    start: pi.min(pj),
                    end: pi.max(pj),
                }),
                Neighborhood::OrOpt => {
                    let (start, end) = (pi.min(pj), pi.max(pj));
                    let len = solution.route(route).len();
                    if end + 1 >= len {
                        return None;
                    }
                    Some(Move::IntraOrOpt {
                        route,
                        start,
                        end,
                        after: rng.random_range(end + 1..len),
                    })
                }
            }
        } else {
            match self {
                Neighborhood::Shift => Some(Move::InterShift {
                    from_route: ri,
                    to_route: rj,
                    from: pi,
                    to: pj,
                }),
                Neighborhood::Swap => Some(Move::InterSwap {
                    route_a: ri,
                    route_b: rj,
                    a: pi,
                    b: pj,
                }),
                Neighborhood::TwoOpt => Some(Move::InterTwoOptStar {
                    route_a: ri,
                    route_b: rj,
                    a: pi,
                    b: pj,
                }),
                Neighborhood::OrOpt => None,
            }
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Neighborhood::Shift => "shift",
            Neighborhood::Swap => "swap",
            Neighborhood::TwoOpt => "2-opt",
            Neighborhood::OrOpt => "or-opt",
        };
        f.write_str(name)
    }
}

/// A concrete move on positions of a solution's routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// [`Route::intra_shift`](crate::models::Route::intra_shift).
    IntraShift { route: usize, from: usize, to: usize },
    /// [`Route::intra_swap`](crate::models::Route::intra_swap).
    IntraSwap { route: usize, a: usize, b: usize },
    /// [`Route::intra_2opt`](crate::models::Route::intra_2opt).
    IntraTwoOpt { route: usize, start: usize, end: usize },
    /// [`Route::intra_or_opt`](crate::models::Route::intra_or_opt).
    IntraOrOpt {
        route: usize,
        start: usize,
        end: usize,
        after: usize,
    },
    /// [`Route::inter_shift`](crate::models::Route::inter_shift).
    InterShift {
        from_route: usize,
        to_route: usize,
        from: usize,
        to: usize,
    },
    /// [`Route::inter_swap`](crate::models::Route::inter_swap).
    InterSwap {
        route_a: usize,
        route_b: usize,
        a: usize,
        b: usize,
    },
    /// [`Route::inter_2opt_star`](crate::models::Route::inter_2opt_star).
    InterTwoOptStar {
        route_a: usize,
        route_b: usize,
        a: usize,
        b: usize,
    },
}

impl Move {
    /// Routes touched by the move.
    pub fn routes(&self) -> (usize, Option<usize>) {
        match *self {
            Move::IntraShift { route, .. }
            | Move::IntraSwap { route, .. }
            | Move::IntraTwoOpt { route, .. }
            | Move::IntraOrOpt { route, .. } => (route, None),
            Move::InterShift {
                from_route,
                to_route,
                ..
            } => (from_route, Some(to_route)),
            Move::InterSwap {
                route_a, route_b, ..
            }
            | Move::InterTwoOptStar {
                route_a, route_b, ..
            } => (route_a, Some(route_b)),
        }
    }

    /// Tries the move on `solution`.
    ///
    /// Returns the applied cost delta, or `None` if the move was infeasible
    /// or, with `only_improve`, not improving. Customers that change route
    /// are re-indexed.
    pub fn apply(
        &self,
        solution: &mut Solution,
        instance: &Instance,
        only_improve: bool,
    ) -> Option<i64> {
        match *self {
            Move::IntraShift { route, from, to } => {
                solution
                    .route_mut(route)
                    .intra_shift(from, to, instance, only_improve)
            }
            Move::IntraSwap { route, a, b } => {
                solution.route_mut(route).intra_swap(a, b, instance, only_improve)
            }
            Move::IntraTwoOpt { route, start, end } => {
                solution
                    .route_mut(route)
                    .intra_2opt(start, end, instance, only_improve)
            }
            Move::IntraOrOpt {
                route,
                start,
                end,
                after,
            } => solution
                .route_mut(route)
                .intra_or_opt(start, end, after, instance, only_improve),
            Move::InterShift {
                from_route,
                to_route,
                from,
                to,
            } => {
                let customer = solution.route(from_route).customer_at(from);
                let (a, b) = solution.routes_pair_mut(from_route, to_route);
                let delta = a.inter_shift(b, from, to, instance, only_improve)?;
                solution.set_owner(customer, to_route);
                Some(delta)
            }
            Move::InterSwap {
                route_a,
                route_b,
                a,
                b,
            } => {
                let ca = solution.route(route_a).customer_at(a);
                let cb = solution.route(route_b).customer_at(b);
                let (ra, rb) = solution.routes_pair_mut(route_a, route_b);
                let delta = ra.inter_swap(rb, a, b, instance, only_improve)?;
                solution.set_owner(ca, route_b);
                solution.set_owner(cb, route_a);
                Some(delta)
            }
            Move::InterTwoOptStar {
                route_a,
                route_b,
                a,
                b,
            } => {
                let (ra, rb) = solution.routes_pair_mut(route_a, route_b);
                let delta = ra.inter_2opt_star(rb, a, b, instance, only_improve)?;
                for (route_index, cut) in [(route_a, a), (route_b, b)] {
                    let moved: Vec<usize> = solution.route(route_index).visits()[cut..]
                        .iter()
                        .map(|v| v.customer_id)
                        .collect();
                    for c in moved {
                        solution.set_owner(c, route_index);
                    }
                }
                Some(delta)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_numflow::random::create_rng;

    /// Six unit clusters; route 0 = [1, 2, 3], route 1 = [4, 5, 6].
    fn setup() -> (Instance, Solution) {
        let inst = Instance::builder()
            .depot(0, 0)
            .cluster(1, &[(10, 0)])
            .cluster(1, &[(20, 0)])
            .cluster(1, &[(30, 0)])
            .cluster(1, &[(0, 10)])
            .cluster(1, &[(0, 20)])
            .cluster(1, &[(0, 30)])
            .fleet(2)
            .capacity(4)
            .build()
            .expect("valid instance");
        let mut sol = Solution::new(&inst);
        for c in 1..=3 {
            assert!(sol.insert(0, c, &inst));
        }
        for c in 4..=6 {
            assert!(sol.insert(1, c, &inst));
        }
        (inst, sol)
    }

    #[test]
    fn test_build_intra_moves() {
        let (_, sol) = setup();
        let mut rng = create_rng(1);
        assert_eq!(
            Neighborhood::Shift.build_move(&sol, 3, 1, &mut rng),
            Some(Move::IntraShift {
                route: 0,
                from: 2,
                to: 0
            })
        );
        assert_eq!(
            Neighborhood::TwoOpt.build_move(&sol, 3, 1, &mut rng),
            Some(Move::IntraTwoOpt {
                route: 0,
                start: 0,
                end: 2
            })
        );
        // No position after a block ending at the last visit.
        assert_eq!(Neighborhood::OrOpt.build_move(&sol, 3, 1, &mut rng), None);
        // Block [0, 1]; the only later position is 2.
        assert_eq!(
            Neighborhood::OrOpt.build_move(&sol, 2, 1, &mut rng),
            Some(Move::IntraOrOpt {
                route: 0,
                start: 0,
                end: 1,
                after: 2
            })
        );
    }

    #[test]
    fn test_build_inter_moves() {
        let (_, sol) = setup();
        let mut rng = create_rng(1);
        assert_eq!(
            Neighborhood::Swap.build_move(&sol, 2, 6, &mut rng),
            Some(Move::InterSwap {
                route_a: 0,
                route_b: 1,
                a: 1,
                b: 2
            })
        );
        assert_eq!(Neighborhood::OrOpt.build_move(&sol, 2, 6, &mut rng), None);
    }

    #[test]
    fn test_unvisited_customer_has_no_move() {
        let (inst, mut sol) = setup();
        sol.remove(2, &inst);
        let mut rng = create_rng(1);
        assert_eq!(Neighborhood::Shift.build_move(&sol, 2, 1, &mut rng), None);
    }

    #[test]
    fn test_apply_inter_shift_reindexes() {
        let (inst, mut sol) = setup();
        let mv = Move::InterShift {
            from_route: 0,
            to_route: 1,
            from: 2,
            to: 3,
        };
        let before = sol.cost();
        let delta = mv.apply(&mut sol, &inst, false).expect("feasible");
        assert_eq!(sol.route_of(3), Some(1));
        assert_eq!(sol.cost(), before + delta);
        assert!(sol.is_valid(&inst), "{:?}", sol.validate(&inst));
        assert_eq!(mv.routes(), (0, Some(1)));
    }

    #[test]
    fn test_apply_inter_swap_reindexes() {
        let (inst, mut sol) = setup();
        let mv = Move::InterSwap {
            route_a: 1,
            route_b: 0,
            a: 0,
            b: 0,
        };
        mv.apply(&mut sol, &inst, false).expect("feasible");
        assert_eq!(sol.route_of(4), Some(0));
        assert_eq!(sol.route_of(1), Some(1));
        assert!(sol.is_valid(&inst));
    }

    #[test]
    fn test_apply_2opt_star_reindexes() {
        let (inst, mut sol) = setup();
        let mv = Move::InterTwoOptStar {
            route_a: 0,
            route_b: 1,
            a: 1,
            b: 2,
        };
        mv.apply(&mut sol, &inst, false).expect("feasible");
        assert_eq!(sol.route(0).customer_ids(), vec![1, 6]);
        assert_eq!(sol.route(1).customer_ids(), vec![4, 5, 2, 3]);
        assert_eq!(sol.route_of(6), Some(0));
        assert_eq!(sol.route_of(2), Some(1));
        assert!(sol.is_valid(&inst), "{:?}", sol.validate(&inst));
    }

    #[test]
    fn test_apply_only_improve_rejects() {
        let (inst, mut sol) = setup();
        let snapshot = sol.clone();
        // Sending (30,0) to the y axis only makes things longer.
        let mv = Move::InterShift {
            from_route: 0,
            to_route: 1,
            from: 2,
            to: 1,
        };
        assert_eq!(mv.apply(&mut sol, &inst, true), None);
        assert!(sol.same_routes(&snapshot));
        assert_eq!(sol.route_of(3), Some(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Neighborhood::TwoOpt.to_string(), "2-opt");
        assert_eq!(Neighborhood::ALL.len(), 4);
    }
}
