//! Deterministic scramble generation: the same seed and length always
//! produce the same move sequence, so scramble-driven tests and benchmarks
//! are reproducible across runs and machines.

use crate::error::ContractError;
use crate::moves::Moves;
use crate::solver::Solver;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

pub struct RandomMoves<const CAP: usize> {
    rng: Xoshiro256StarStar,
}

impl<const CAP: usize> RandomMoves<CAP> {
    pub fn new(seed: u64) -> Self {
        RandomMoves { rng: Xoshiro256StarStar::seed_from_u64(seed) }
    }

    /// Draws `n` moves independently and uniformly from `[0, BASE)` at every
    /// step, with no `base_mask` filtering — a scramble may include a move
    /// immediately followed by its own inverse, just as repeatedly drawing a
    /// uniform random generator does.
    pub fn generate<S, const BASE: usize>(&mut self, _solver: &S, n: usize) -> Result<Moves<CAP>, ContractError>
    where
        S: Solver<BASE>,
    {
        if n > CAP {
            return Err(ContractError::CapacityExceeded { requested: n, capacity: CAP });
        }
        let mut indices = Vec::with_capacity(n);
        for _ in 0..n {
            indices.push(self.rng.random_range(0..BASE as u8));
        }
        Ok(Moves::from_slice(&indices))
    }
}
