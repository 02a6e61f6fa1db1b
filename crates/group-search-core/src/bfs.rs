//! `BfsEngine`: builds the `distance mod 3` pattern database over a
//! solver's entire reachable state space, in parallel, once.

use crate::grid::{AtomicTwoBitGrid, UNVISITED};
use crate::solver::Solver;
use std::time::Instant;

/// `word ^ modify[p]` turns every cell equal to `p` into `0b11`; ANDing the
/// shifted copy against itself and the `0x55…` mask then detects "does this
/// word contain any cell equal to `p`" without touching individual cells.
const MODIFY: [u64; 3] = [u64::MAX, 0xAAAA_AAAA_AAAA_AAAA, 0x5555_5555_5555_5555];
const PAIR_MASK: u64 = 0x5555_5555_5555_5555;

pub struct BfsEngine;

impl BfsEngine {
    /// Populates `grid` with `distance mod 3` for every reachable state of
    /// `solver`'s state space. `grid` must already be sized `S::N_STATE`.
    ///
    /// # Panics
    /// If the solver's symmetry orbits are not pairwise disjoint (a
    /// contract violation), a `set_multi` assertion fires. This is the one
    /// operation in the crate expected to run to completion unattended, so
    /// failure here is always treated as fatal rather than returned.
    pub fn build<S, const BASE: usize>(solver: &S, grid: &AtomicTwoBitGrid, n_thread: usize)
    where
        S: Solver<BASE>,
    {
        assert!(n_thread >= 1, "n_thread must be at least 1");
        assert_eq!(grid.len(), S::N_STATE, "grid must be sized to the solver's state space");

        let t0 = Instant::now();
        grid.fill(UNVISITED);

        let state_a = solver.cube_to_state(solver.identity_cube());
        let i_start = solver.state_to_int(state_a);
        let count_start = set_multi(grid, solver.alt(state_a, i_start), UNVISITED, 0);
        assert!(count_start > 0, "identity state's symmetry orbit must be non-empty");

        log::info!("bfs: n_state={}, n_thread={n_thread}", S::N_STATE);
        log::info!("bfs: depth=0, count_distinct=1, count={count_start}");

        let mut total_count_distinct = 1u64;
        let mut total_count = count_start;
        let mut count_m3 = [count_start, 0u64, 0u64];

        let boundaries = word_aligned_split(S::N_STATE, n_thread);

        let mut depth = 1u64;
        while total_count != S::N_STATE {
            let t1 = Instant::now();
            let p = ((depth - 1) % 3) as u8;
            let q = (depth % 3) as u8;
            let forward = count_m3[p as usize] <= S::N_STATE - total_count;

            let (count_distinct, count) = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..n_thread)
                    .map(|t| {
                        let start = boundaries[t];
                        let end = boundaries[t + 1];
                        scope.spawn(move || {
                            if forward {
                                forward_scan(solver, grid, start, end, p, q)
                            } else {
                                backward_scan(solver, grid, start, end, p, q)
                            }
                        })
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().expect("bfs worker thread panicked"))
                    .fold((0u64, 0u64), |(ad, ac), (d, c)| (ad + d, ac + c))
            });

            let layer_time = t1.elapsed().as_secs_f64();
            log::info!(
                "bfs: depth={depth}, count_distinct={count_distinct}, count={count}, time={layer_time:.3}s"
            );
            total_count_distinct += count_distinct;
            total_count += count;
            count_m3[q as usize] += count;
            depth += 1;
        }

        log::info!(
            "bfs: total_count_distinct={total_count_distinct}, total_count={total_count}, total_time={:.3}s",
            t0.elapsed().as_secs_f64()
        );
    }
}

/// Word-aligned thread partition of `[0, n)`: every boundary except possibly
/// the last is a multiple of 32, and word ranges are distributed as evenly
/// as possible across `n_thread` workers.
fn word_aligned_split(n: u64, n_thread: usize) -> Vec<u64> {
    let n_thread = n_thread as u64;
    let n_words = n.div_ceil(32);
    let div = n_words / n_thread;
    let rem = n_words % n_thread;

    let mut boundaries = Vec::with_capacity(n_thread as usize + 1);
    boundaries.push(0u64);
    for t in 0..n_thread {
        let words_for_t = div + u64::from(t < rem);
        let next = (boundaries[t as usize] + words_for_t * 32).min(n);
        boundaries.push(next);
    }
    boundaries
}

/// CAS's every index in a symmetry orbit from `old` to `new`. The first
/// element is attempted first; if it loses the race to another worker, the
/// whole orbit is conceded (returns 0). Every remaining element is expected
/// to succeed unconditionally, since orbits are disjoint — failure there
/// means the solver's `alt` violates that contract.
pub(crate) fn set_multi<I: IntoIterator<Item = u64>>(
    grid: &AtomicTwoBitGrid,
    indices: I,
    old: u8,
    new: u8,
) -> u64 {
    let mut it = indices.into_iter();
    let first = it.next().expect("symmetry orbit must yield at least one index");
    if !grid.cas(first, old, new) {
        return 0;
    }
    let mut count = 1u64;
    for idx in it {
        assert!(
            grid.cas(idx, old, new),
            "symmetry orbit disjointness violated: index {idx} already transitioned"
        );
        count += 1;
    }
    count
}

fn forward_scan<S, const BASE: usize>(
    solver: &S,
    grid: &AtomicTwoBitGrid,
    start: u64,
    end: u64,
    prev_depth_m3: u8,
    depth_m3: u8,
) -> (u64, u64)
where
    S: Solver<BASE>,
{
    let mut count_distinct = 0u64;
    let mut count = 0u64;
    let mut i = start;
    while i < end {
        let x = grid.word(i / 32) ^ MODIFY[prev_depth_m3 as usize];
        if ((x >> 1) & x & PAIR_MASK) == 0 {
            i += 32;
            continue;
        }
        let j_end = (i + 32).min(end);
        for j in i..j_end {
            if grid.get(j) != prev_depth_m3 {
                continue;
            }
            let a = solver.int_to_state(j);
            for b in solver.adj(a) {
                let k = solver.state_to_int(b);
                if grid.get(k) == UNVISITED {
                    let c = set_multi(grid, solver.alt(b, k), UNVISITED, depth_m3);
                    if c > 0 {
                        count_distinct += 1;
                        count += c;
                    }
                }
            }
        }
        i += 32;
    }
    (count_distinct, count)
}

fn backward_scan<S, const BASE: usize>(
    solver: &S,
    grid: &AtomicTwoBitGrid,
    start: u64,
    end: u64,
    prev_depth_m3: u8,
    depth_m3: u8,
) -> (u64, u64)
where
    S: Solver<BASE>,
{
    let mut count_distinct = 0u64;
    let mut count = 0u64;
    let mut i = start;
    while i < end {
        let x = grid.word(i / 32);
        if ((x >> 1) & x & PAIR_MASK) == 0 {
            i += 32;
            continue;
        }
        let j_end = (i + 32).min(end);
        for j in i..j_end {
            if grid.get(j) != UNVISITED {
                continue;
            }
            let a = solver.int_to_state(j);
            for b in solver.adj(a) {
                let k = solver.state_to_int(b);
                if grid.get(k) == prev_depth_m3 {
                    let c = set_multi(grid, solver.alt(a, j), UNVISITED, depth_m3);
                    if c > 0 {
                        count_distinct += 1;
                        count += c;
                    }
                }
            }
        }
        i += 32;
    }
    (count_distinct, count)
}
