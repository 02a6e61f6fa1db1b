//! Construction-time contract errors.
//!
//! These are ordinary, recoverable mistakes a caller can make before any
//! search has touched shared state — as opposed to the in-search fatal
//! invariant violations (orbit disjointness, an oracle walk with no valid
//! predecessor, ...) which indicate a broken [`crate::solver::Solver`]
//! implementation and are reported via `assert!`/`panic!` instead, since by
//! the time they fire the pattern database or a DFS stack may already be in
//! an inconsistent state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("requested {requested} moves but capacity is only {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
}
