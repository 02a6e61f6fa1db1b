//! `CombineSearch`: chains a coarse phase-0 search (driving the cube into a
//! subgroup) with a refined phase-1 search within it, streaming
//! non-increasing-length combined solutions.

use crate::ida_star::IdaStar;
use crate::moves::Moves;
use crate::result_flag::ResultFlag;
use crate::solver::Solver;

/// `S0`'s move set must be a superset of `S1`'s, and `S0` drives the cube
/// into `S1`'s domain — both share the same underlying group element type.
pub struct CombineSearch<'s, S0, S1, const B0: usize, const B1: usize, const CAP: usize>
where
    S0: Solver<B0>,
    S1: Solver<B1, Cube = S0::Cube>,
{
    solver0: &'s S0,
    solver1: &'s S1,
    a: S0::Cube,
    max_n_moves: u64,
    sym_mask_n_moves: u64,
    iter0: IdaStar<'s, S0, B0, CAP>,
    last_n_moves: u64,
    ended: bool,
    pub verbose: bool,
}

impl<'s, S0, S1, const B0: usize, const B1: usize, const CAP: usize> CombineSearch<'s, S0, S1, B0, B1, CAP>
where
    S0: Solver<B0>,
    S1: Solver<B1, Cube = S0::Cube>,
    S0::Hint: From<u64>,
    S1::Hint: From<u64>,
{
    pub fn new(solver0: &'s S0, solver1: &'s S1, a: S0::Cube, max_n_moves: u64, sym_mask_n_moves: u64) -> Self {
        let iter0 = IdaStar::new(solver0, a, max_n_moves, sym_mask_n_moves);
        CombineSearch {
            solver0,
            solver1,
            a,
            max_n_moves,
            sym_mask_n_moves,
            iter0,
            last_n_moves: max_n_moves,
            ended: false,
            verbose: true,
        }
    }

    /// Pulls the next combined solution. Each emission is no longer than the
    /// previous one; the final emission (phase 0 alone reaches the goal, or
    /// phase 0's search is exhausted) carries `OPTIMUM` or `END`.
    pub fn next(&mut self) -> (ResultFlag, Moves<CAP>) {
        if self.ended {
            return (ResultFlag::END, Moves::empty());
        }
        loop {
            let (f0, m0) = self.iter0.next();
            if f0.is_end() {
                self.ended = true;
                return (ResultFlag::END, Moves::empty());
            }
            if !f0.is_solution() {
                continue;
            }

            let bound = self.max_n_moves.min(self.last_n_moves);
            if m0.len() as u64 > bound {
                continue;
            }
            let remaining = bound - m0.len() as u64;

            let b = apply_sequence(self.solver0, self.a, m0.as_slice());

            let mut iter1 = IdaStar::new(self.solver1, b, remaining, self.sym_mask_n_moves);
            let m1 = loop {
                let (f1, m1) = iter1.next();
                if f1.is_end() {
                    break None;
                }
                if f1.is_optimum() {
                    break Some(m1);
                }
            };

            let Some(m1) = m1 else {
                continue;
            };

            let improved = m1.is_empty() || self.last_n_moves > m0.len() as u64 + m1.len() as u64;
            if !improved {
                continue;
            }

            self.last_n_moves = m0.len() as u64 + m1.len() as u64;
            let combined = Moves::concat_remapped(&m0, self.solver0, &m1, self.solver1);
            let mut flag = ResultFlag::SOLUTION;
            if m1.is_empty() {
                flag |= ResultFlag::OPTIMUM;
                self.ended = true;
            }
            if self.verbose {
                log::info!(
                    "combine_search: accepted phase0_len={}, phase1_len={}, total_len={}",
                    m0.len(),
                    m1.len(),
                    combined.len()
                );
            }
            return (flag, combined);
        }
    }
}

fn apply_sequence<S, const BASE: usize>(solver: &S, start: S::Cube, moves: &[u8]) -> S::Cube
where
    S: Solver<BASE>,
{
    let mut c = start;
    for &mv in moves {
        c = solver.apply(c, mv as usize);
    }
    c
}
