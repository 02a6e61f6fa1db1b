//! `DistanceOracle`: recovers an exact distance from a stored `mod 3`
//! residue, either by walking downhill from scratch ("cold") or in constant
//! time given a known prior true distance ("warm").

use crate::grid::UNVISITED;
use crate::solver::Solver;

pub struct DistanceOracle;

impl DistanceOracle {
    /// Walks downhill from `state` toward the start, one move per step,
    /// picking any neighbor whose residue is the previous BFS layer
    /// (`(D[i] + 2) mod 3`). Returns the exact distance, which also serves
    /// as a hint for subsequent [`Self::get_distance_hint`] calls along the
    /// same path.
    ///
    /// # Panics
    /// If no such neighbor exists at some step, the grid was not built for
    /// this state (or the solver's `adj`/`alt` are inconsistent) — a fatal
    /// solver-contract violation, not a recoverable error.
    pub fn get_distance<S, const BASE: usize>(solver: &S, state: S::State) -> (u64, S::Hint)
    where
        S: Solver<BASE>,
        S::Hint: From<u64>,
    {
        let mut b = state;
        let mut i = solver.state_to_int(b);
        let mut depth = 0u64;
        let grid = solver.grid();
        while !solver.is_start(b) {
            let target = ((grid.get(i) as u64 + 2) % 3) as u8;
            let mut found = false;
            for c in solver.adj(b) {
                let j = solver.state_to_int(c);
                if grid.get(j) == target {
                    b = c;
                    i = j;
                    depth += 1;
                    found = true;
                    break;
                }
            }
            assert!(found, "oracle walk found no downhill neighbor at index {i}");
        }
        (depth, S::Hint::from(depth))
    }

    /// Constant-time recovery of the true distance from a known prior true
    /// distance `hint`: `hint + ((D[i] - hint - 3) mod 3) - 1`, which always
    /// evaluates to `hint - 1`, `hint`, or `hint + 1`.
    pub fn get_distance_hint<S, const BASE: usize>(
        solver: &S,
        state: S::State,
        hint: u64,
    ) -> (u64, S::Hint)
    where
        S: Solver<BASE>,
        S::Hint: From<u64>,
    {
        let i = solver.state_to_int(state);
        let residue = solver.grid().get(i) as i64;
        debug_assert_ne!(residue as u8, UNVISITED, "state {i} was never reached by BFS");
        let d = hint as i64 + (residue - hint as i64 - 3).rem_euclid(3) - 1;
        let d = d as u64;
        (d, S::Hint::from(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::AtomicTwoBitGrid;

    // A minimal ring solver (Z/8) used purely to exercise the oracle's
    // arithmetic independent of the full BFS pipeline: distances are
    // pre-seeded by hand rather than computed.
    struct Ring {
        grid: AtomicTwoBitGrid,
    }

    impl Solver<2> for Ring {
        type State = u64;
        type Cube = u64;
        type Hint = u64;
        type Alt = std::iter::Once<u64>;

        const N_STATE: u64 = 8;

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
            [(state + 1) % 8, (state + 7) % 8]
        }
        fn alt(&self, _state: u64, index: u64) -> Self::Alt {
            std::iter::once(index)
        }
        fn is_start(&self, state: u64) -> bool {
            state == 0
        }
        fn apply(&self, cube: u64, mv: usize) -> u64 {
            if mv == 0 {
                (cube + 1) % 8
            } else {
                (cube + 7) % 8
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
            u64::MAX
        }
        fn base_index(&self, mv: usize) -> u64 {
            mv as u64
        }
        fn grid(&self) -> &AtomicTwoBitGrid {
            &self.grid
        }
    }

    fn seeded_ring() -> Ring {
        let grid = AtomicTwoBitGrid::new(8);
        // true distances from 0 around the ring: 0,1,2,3,4,3,2,1
        let true_d = [0u8, 1, 2, 3, 4, 3, 2, 1];
        for (i, d) in true_d.iter().enumerate() {
            grid.cas(i as u64, UNVISITED, d % 3);
        }
        Ring { grid }
    }

    #[test]
    fn cold_walk_matches_expected_distance() {
        let ring = seeded_ring();
        let (d, hint) = DistanceOracle::get_distance(&ring, 4u64);
        assert_eq!(d, 4);
        assert_eq!(hint, 4);
    }

    #[test]
    fn warm_and_cold_agree_along_a_path() {
        let ring = seeded_ring();
        let (d3, h3) = DistanceOracle::get_distance(&ring, 3u64);
        let (d4, _) = DistanceOracle::get_distance_hint(&ring, 4u64, h3);
        assert_eq!(d3, 3);
        assert_eq!(d4, 4);
    }
}
