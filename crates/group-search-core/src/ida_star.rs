//! `IdaStar`: single-threaded iterative-deepening DFS yielding successively
//! optimal solutions.

use crate::moves::Moves;
use crate::oracle::DistanceOracle;
use crate::result_flag::ResultFlag;
use crate::solver::Solver;
use std::time::Instant;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum IterState {
    Ready,
    Emitted,
    Ended,
}

struct Node<S: Solver<BASE>, const BASE: usize, const CAP: usize> {
    state: S::State,
    hint: S::Hint,
    moves: Moves<CAP>,
}

impl<S: Solver<BASE>, const BASE: usize, const CAP: usize> Clone for Node<S, BASE, CAP> {
    fn clone(&self) -> Self {
        Node {
            state: self.state,
            hint: self.hint,
            moves: self.moves,
        }
    }
}
impl<S: Solver<BASE>, const BASE: usize, const CAP: usize> Copy for Node<S, BASE, CAP> {}

/// Iterative-deepening DFS over `solver`'s state space, bounded by
/// `max_n_moves` and (for the first `sym_mask_n_moves` plies) an extra
/// symmetry mask. Each call to [`Self::next`] returns one solution, or
/// `NONE`/`END` as the bound is raised and exhausted.
pub struct IdaStar<'s, S, const BASE: usize, const CAP: usize>
where
    S: Solver<BASE>,
{
    solver: &'s S,
    a: S::Cube,
    max_n_moves: u64,
    sym_mask_n_moves: u64,
    n_moves: u64,
    optimum_n_moves: Option<u64>,
    state: IterState,
    root: Node<S, BASE, CAP>,
    stack: Vec<Node<S, BASE, CAP>>,
    count: Vec<u64>,
    layer_time: f64,
    total_time: f64,
    t0: Instant,
    pub verbose: bool,
}

impl<'s, S, const BASE: usize, const CAP: usize> IdaStar<'s, S, BASE, CAP>
where
    S: Solver<BASE>,
    S::Hint: From<u64>,
{
    pub fn new(solver: &'s S, a: S::Cube, max_n_moves: u64, sym_mask_n_moves: u64) -> Self {
        assert!(BASE <= 64, "BASE must fit in a 64-bit prune mask");
        let max_n_moves = max_n_moves.min(CAP as u64);
        let state_a = solver.cube_to_state(a);
        let (dist_a, hint_a) = DistanceOracle::get_distance(solver, state_a);
        let n_moves = dist_a.min(max_n_moves);
        let root = Node {
            state: state_a,
            hint: hint_a,
            moves: Moves::empty(),
        };
        IdaStar {
            solver,
            a,
            max_n_moves,
            sym_mask_n_moves,
            n_moves,
            optimum_n_moves: None,
            state: IterState::Ready,
            root,
            stack: vec![root],
            count: vec![0; (n_moves + 1) as usize],
            layer_time: 0.0,
            total_time: 0.0,
            t0: Instant::now(),
            verbose: true,
        }
    }

    /// Advances the search. Returns `(SOLUTION[|OPTIMUM], moves)` on a hit,
    /// `(NONE, empty)` when the bound was raised and a cheaper optimum was
    /// already found (so the caller should stop), or `(END, empty)` once
    /// `max_n_moves` is exhausted.
    pub fn next(&mut self) -> (ResultFlag, Moves<CAP>) {
        if self.state == IterState::Emitted {
            self.state = IterState::Ready;
        }
        loop {
            match self.state {
                IterState::Ended => {
                    if self.verbose {
                        log::info!("ida_star: end");
                    }
                    return (ResultFlag::END, Moves::empty());
                }
                IterState::Ready | IterState::Emitted => {}
            }

            if self.stack.is_empty() {
                let now = Instant::now();
                let d = now.duration_since(self.t0).as_secs_f64();
                self.t0 = now;
                self.layer_time += d;
                self.total_time += d;
                if self.verbose {
                    let total: u64 = self.count.iter().sum();
                    log::info!(
                        "ida_star: complete, n_moves={}, total_count={total}, layer_time={:.3}s, total_time={:.3}s",
                        self.n_moves, self.layer_time, self.total_time
                    );
                }
                if self.n_moves == self.max_n_moves {
                    self.state = IterState::Ended;
                } else {
                    self.n_moves += 1;
                    self.stack.push(self.root);
                    self.count = vec![0; (self.n_moves + 1) as usize];
                    self.layer_time = 0.0;
                    if self.optimum_n_moves.is_some() {
                        self.state = IterState::Ready;
                        return (ResultFlag::NONE, Moves::empty());
                    }
                }
                continue;
            }

            let b = self.stack.pop().unwrap();
            self.count[b.moves.len()] += 1;

            if b.moves.len() as u64 == self.n_moves {
                if self.solver.is_start(b.state) {
                    let now = Instant::now();
                    let d = now.duration_since(self.t0).as_secs_f64();
                    self.t0 = now;
                    self.layer_time += d;
                    self.total_time += d;
                    if self.verbose {
                        let total: u64 = self.count.iter().sum();
                        log::info!(
                            "ida_star: found, n_moves={}, total_count={total}, layer_time={:.3}s, total_time={:.3}s",
                            self.n_moves, self.layer_time, self.total_time
                        );
                    }
                    if self.optimum_n_moves.is_none() {
                        self.optimum_n_moves = Some(b.moves.len() as u64);
                    }
                    let flag = if Some(b.moves.len() as u64) == self.optimum_n_moves {
                        ResultFlag::SOLUTION | ResultFlag::OPTIMUM
                    } else {
                        ResultFlag::SOLUTION
                    };
                    self.state = IterState::Emitted;
                    return (flag, b.moves);
                }
                continue;
            }

            let last = b.moves.len();
            let mut mask = if last == 0 {
                u64::MAX
            } else {
                self.solver.base_mask(b.moves.as_slice()[last - 1] as usize)
            };
            if (last as u64) < self.sym_mask_n_moves {
                mask &= self.solver.sym_mask(self.a, b.state, b.moves.as_slice());
            }

            let adj_b = self.solver.adj(b.state);
            for i in (0..BASE).rev() {
                if (mask >> i) & 1 == 0 {
                    continue;
                }
                let state_c = adj_b[i];
                let (dist_c, hint_c) =
                    DistanceOracle::get_distance_hint(self.solver, state_c, b.hint.into());
                if b.moves.len() as u64 + 1 + dist_c <= self.n_moves {
                    let c = Node {
                        state: state_c,
                        hint: hint_c,
                        moves: b.moves.pushed(i as u8),
                    };
                    self.stack.push(c);
                }
            }
        }
    }
}
