//! `ParallelIdaStar`: seeds a shallow BFS frontier, then distributes bounded
//! DFS subtrees over worker threads per bound, raising the bound between
//! layers exactly as [`crate::ida_star::IdaStar`] does single-threaded.

use crate::moves::Moves;
use crate::oracle::DistanceOracle;
use crate::result_flag::ResultFlag;
use crate::scheduler::{efficiency, SchedulePolicy};
use crate::solver::Solver;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

struct Node<S: Solver<BASE>, const BASE: usize, const CAP: usize> {
    state: S::State,
    hint: S::Hint,
    moves: Moves<CAP>,
    h: u64,
}

impl<S: Solver<BASE>, const BASE: usize, const CAP: usize> Clone for Node<S, BASE, CAP> {
    fn clone(&self) -> Self {
        Node {
            state: self.state,
            hint: self.hint,
            moves: self.moves,
            h: self.h,
        }
    }
}
impl<S: Solver<BASE>, const BASE: usize, const CAP: usize> Copy for Node<S, BASE, CAP> {}

pub struct ParallelIdaStar<'s, S, const BASE: usize, const CAP: usize>
where
    S: Solver<BASE>,
{
    solver: &'s S,
    max_n_moves: u64,
    sym_mask_n_moves: u64,
    bfs_count: usize,
    n_thread: usize,
    policy: SchedulePolicy,
    pub verbose: bool,
}

impl<'s, S, const BASE: usize, const CAP: usize> ParallelIdaStar<'s, S, BASE, CAP>
where
    S: Solver<BASE>,
    S::Hint: From<u64>,
{
    pub fn new(
        solver: &'s S,
        max_n_moves: u64,
        sym_mask_n_moves: u64,
        bfs_count: usize,
        n_thread: usize,
        policy: SchedulePolicy,
    ) -> Self {
        assert!(BASE <= 64, "BASE must fit in a 64-bit prune mask");
        assert!(n_thread >= 1, "n_thread must be at least 1");
        ParallelIdaStar {
            solver,
            max_n_moves: max_n_moves.min(CAP as u64),
            sym_mask_n_moves,
            bfs_count,
            n_thread,
            policy,
            verbose: true,
        }
    }

    pub fn solve(&self, a: S::Cube) -> (ResultFlag, Moves<CAP>) {
        let t0 = Instant::now();
        let state_a = self.solver.cube_to_state(a);
        if self.solver.is_start(state_a) {
            return (ResultFlag::SOLUTION | ResultFlag::OPTIMUM, Moves::empty());
        }
        if self.max_n_moves == 0 {
            return (ResultFlag::END, Moves::empty());
        }
        let (h_a, hint_a) = DistanceOracle::get_distance(self.solver, state_a);

        match self.shallow_bfs(a, state_a, hint_a, h_a) {
            ShallowResult::Solved(moves) => (ResultFlag::SOLUTION | ResultFlag::OPTIMUM, moves),
            ShallowResult::Dry => (ResultFlag::END, Moves::empty()),
            ShallowResult::Frontier(frontier, bfs_depth) => {
                let result = self.bounded_layers(&frontier, bfs_depth);
                if self.verbose {
                    log::info!("parallel_ida_star: total_time={:.3}s", t0.elapsed().as_secs_f64());
                }
                result
            }
        }
    }

    fn shallow_bfs(
        &self,
        a: S::Cube,
        state_a: S::State,
        hint_a: S::Hint,
        h_a: u64,
    ) -> ShallowResult<S, BASE, CAP> {
        let mut frontier = vec![Node {
            state: state_a,
            hint: hint_a,
            moves: Moves::empty(),
            h: h_a,
        }];
        let mut depth = 0u64;
        loop {
            if self.verbose {
                log::info!("parallel_ida_star: shallow_bfs depth={depth}, frontier={}", frontier.len());
            }
            if frontier.len() >= self.bfs_count || depth == self.max_n_moves {
                return ShallowResult::Frontier(frontier, depth);
            }

            let mut next_frontier = Vec::new();
            for node in &frontier {
                let last = node.moves.len();
                let mut mask = if last == 0 {
                    u64::MAX
                } else {
                    self.solver.base_mask(node.moves.as_slice()[last - 1] as usize)
                };
                if depth < self.sym_mask_n_moves {
                    mask &= self.solver.sym_mask(a, node.state, node.moves.as_slice());
                }
                let adj = self.solver.adj(node.state);
                for i in (0..BASE).rev() {
                    if (mask >> i) & 1 == 0 {
                        continue;
                    }
                    let state_c = adj[i];
                    let (dist_c, hint_c) =
                        DistanceOracle::get_distance_hint(self.solver, state_c, node.hint.into());
                    if node.moves.len() as u64 + 1 + dist_c > self.max_n_moves {
                        continue;
                    }
                    let moves_c = node.moves.pushed(i as u8);
                    if self.solver.is_start(state_c) {
                        return ShallowResult::Solved(moves_c);
                    }
                    next_frontier.push(Node {
                        state: state_c,
                        hint: hint_c,
                        moves: moves_c,
                        h: dist_c,
                    });
                }
            }
            if next_frontier.is_empty() {
                return ShallowResult::Dry;
            }
            frontier = next_frontier;
            depth += 1;
        }
    }

    fn bounded_layers(&self, frontier: &[Node<S, BASE, CAP>], bfs_depth: u64) -> (ResultFlag, Moves<CAP>) {
        let min_h = frontier.iter().map(|n| n.h).min().unwrap_or(0);
        let mut n_moves = bfs_depth + min_h;
        let mut prior_count = vec![0u64; frontier.len()];

        while n_moves <= self.max_n_moves {
            let t1 = Instant::now();
            let required: Vec<bool> = frontier.iter().map(|n| bfs_depth + n.h <= n_moves).collect();
            let schedule = self.policy.schedule(self.n_thread, &required, &prior_count);

            let stop = AtomicBool::new(false);
            let counts: Vec<AtomicU64> = (0..frontier.len()).map(|_| AtomicU64::new(0)).collect();
            let solution: Mutex<Option<Moves<CAP>>> = Mutex::new(None);
            let budget = n_moves - bfs_depth;

            std::thread::scope(|scope| {
                for t in 0..self.n_thread {
                    let start = schedule.split[t] as usize;
                    let end = schedule.split[t + 1] as usize;
                    let tasks = &schedule.tasks[start..end];
                    let stop = &stop;
                    let counts = &counts;
                    let solution = &solution;
                    scope.spawn(move || {
                        for &task in tasks {
                            if stop.load(Ordering::Relaxed) {
                                break;
                            }
                            let (found, count) = dfs_worker(self.solver, &frontier[task as usize], budget, stop);
                            counts[task as usize].store(count, Ordering::Relaxed);
                            if let Some(moves) = found {
                                *solution.lock().expect("solution mutex poisoned") = Some(moves);
                                stop.store(true, Ordering::Relaxed);
                                break;
                            }
                        }
                    });
                }
            });

            for (task, count) in counts.iter().enumerate() {
                let c = count.load(Ordering::Relaxed);
                if required[task] {
                    prior_count[task] = c;
                }
            }
            let total_count: u64 = counts.iter().map(|c| c.load(Ordering::Relaxed)).sum();
            let eff = efficiency(self.n_thread, &schedule, &prior_count, 1);
            let layer_time = t1.elapsed().as_secs_f64();
            if self.verbose {
                log::info!(
                    "parallel_ida_star: n_moves={n_moves}, total_count={total_count}, efficiency={eff:.3}, layer_time={layer_time:.3}s"
                );
            }

            if let Some(moves) = solution.into_inner().expect("solution mutex poisoned") {
                return (ResultFlag::SOLUTION | ResultFlag::OPTIMUM, moves);
            }
            n_moves += 1;
        }
        (ResultFlag::END, Moves::empty())
    }
}

enum ShallowResult<S: Solver<BASE>, const BASE: usize, const CAP: usize> {
    Solved(Moves<CAP>),
    Dry,
    Frontier(Vec<Node<S, BASE, CAP>>, u64),
}

/// Bounded DFS from one frontier node out to exactly `bound` total plies
/// (`bfs_depth` already spent reaching the frontier, `bound` more below
/// it). No symmetry masking: that pruning was already applied while
/// building the frontier in [`ParallelIdaStar::shallow_bfs`].
fn dfs_worker<S, const BASE: usize, const CAP: usize>(
    solver: &S,
    root: &Node<S, BASE, CAP>,
    bound: u64,
    stop: &AtomicBool,
) -> (Option<Moves<CAP>>, u64)
where
    S: Solver<BASE>,
    S::Hint: From<u64>,
{
    let target_len = root.moves.len() as u64 + bound;
    let mut stack: Vec<Node<S, BASE, CAP>> = Vec::with_capacity(BASE * CAP);
    stack.push(*root);
    let mut count = 0u64;

    while let Some(b) = stack.pop() {
        if stop.load(Ordering::Relaxed) {
            return (None, count);
        }
        count += 1;

        if b.moves.len() as u64 == target_len {
            if solver.is_start(b.state) {
                return (Some(b.moves), count);
            }
            continue;
        }

        let last = b.moves.len();
        let mask = if last == 0 {
            u64::MAX
        } else {
            solver.base_mask(b.moves.as_slice()[last - 1] as usize)
        };
        let adj_b = solver.adj(b.state);
        for i in (0..BASE).rev() {
            if (mask >> i) & 1 == 0 {
                continue;
            }
            let state_c = adj_b[i];
            let (dist_c, hint_c) = DistanceOracle::get_distance_hint(solver, state_c, b.hint.into());
            if b.moves.len() as u64 + 1 + dist_c <= target_len {
                stack.push(Node {
                    state: state_c,
                    hint: hint_c,
                    moves: b.moves.pushed(i as u8),
                    h: dist_c,
                });
            }
        }
    }
    (None, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bfs::BfsEngine;
    use crate::grid::AtomicTwoBitGrid;

    // Z/16 cyclic group under +1/-1; small enough to brute-force but deep
    // enough to exercise more than one parallel-DFS layer.
    struct Ring16 {
        grid: AtomicTwoBitGrid,
    }

    impl Solver<2> for Ring16 {
        type State = u64;
        type Cube = u64;
        type Hint = u64;
        type Alt = std::iter::Once<u64>;

        const N_STATE: u64 = 16;

        fn identity_cube(&self) -> u64 {
            0
        }
        fn cube_to_state(&self, cube: u64) -> u64 {
            cube
        }
        fn state_to_int(&self, state: u64) -> u64 {
            state
        }
        fn int_to_state(&self, i: u64) -> u64 {
            i
        }
        fn adj(&self, state: u64) -> [u64; 2] {
            [(state + 1) % 16, (state + 15) % 16]
        }
        fn alt(&self, _state: u64, index: u64) -> Self::Alt {
            std::iter::once(index)
        }
        fn is_start(&self, state: u64) -> bool {
            state == 0
        }
        fn apply(&self, cube: u64, mv: usize) -> u64 {
            if mv == 0 {
                (cube + 1) % 16
            } else {
                (cube + 15) % 16
            }
        }
        fn base_name(&self, mv: usize) -> &str {
            if mv == 0 {
                "+1"
            } else {
                "-1"
            }
        }
        fn base_mask(&self, _mv: usize) -> u64 {
            0b11
        }
        fn base_index(&self, mv: usize) -> u64 {
            mv as u64
        }
        fn grid(&self) -> &AtomicTwoBitGrid {
            &self.grid
        }
    }

    fn built_ring() -> Ring16 {
        let ring = Ring16 { grid: AtomicTwoBitGrid::new(16) };
        BfsEngine::build(&ring, &ring.grid, 2);
        ring
    }

    #[test]
    fn matches_single_threaded_minimum_length() {
        let ring = built_ring();
        for &(cube, n_thread, policy) in &[
            (5u64, 1usize, SchedulePolicy::Simple),
            (5u64, 2, SchedulePolicy::Linear),
            (7u64, 3, SchedulePolicy::BestFit),
            (7u64, 1, SchedulePolicy::Simple),
        ] {
            let search = ParallelIdaStar::<_, 2, 8>::new(&ring, 8, 0, 2, n_thread, policy);
            let (flag, moves) = search.solve(cube);
            assert!(flag.is_solution() && flag.is_optimum());
            let expected = cube.min(16 - cube);
            assert_eq!(moves.len() as u64, expected, "unexpected move count for cube {cube}");
        }
    }

    #[test]
    fn identity_cube_is_immediate() {
        let ring = built_ring();
        let search = ParallelIdaStar::<_, 2, 8>::new(&ring, 8, 0, 2, 2, SchedulePolicy::Simple);
        let (flag, moves) = search.solve(0);
        assert!(flag.is_solution() && flag.is_optimum());
        assert!(moves.is_empty());
    }

    #[test]
    fn zero_bound_on_non_identity_ends() {
        let ring = built_ring();
        let search = ParallelIdaStar::<_, 2, 8>::new(&ring, 0, 0, 2, 2, SchedulePolicy::Simple);
        let (flag, moves) = search.solve(3);
        assert!(flag.is_end());
        assert!(moves.is_empty());
    }
}
