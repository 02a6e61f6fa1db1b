//! A generic group-element search engine for combinatorial puzzles expressed
//! as Cayley graphs over a finite state space (Rubik-like cubes and similar).
//!
//! The crate is split into two halves that share one data structure:
//!
//! - [`grid::AtomicTwoBitGrid`] + [`bfs::BfsEngine`] build a `distance mod 3`
//!   pattern database over the whole reachable state space, once, offline.
//! - [`oracle::DistanceOracle`], [`ida_star::IdaStar`],
//!   [`parallel_ida_star::ParallelIdaStar`], and [`combine_search::CombineSearch`]
//!   consult that database as an admissible heuristic while searching for
//!   move sequences that solve a target element.
//!
//! The concrete puzzle algebra (state representation, move generation,
//! symmetry orbits) is supplied by the caller through the [`solver::Solver`]
//! trait; this crate never hard-codes a particular puzzle.

pub mod bfs;
pub mod combine_search;
pub mod error;
pub mod grid;
pub mod ida_star;
pub mod moves;
pub mod oracle;
pub mod parallel_ida_star;
pub mod rand_moves;
pub mod result_flag;
pub mod scheduler;
pub mod solver;

pub mod prelude {
    pub use crate::bfs::BfsEngine;
    pub use crate::combine_search::CombineSearch;
    pub use crate::error::ContractError;
    pub use crate::grid::AtomicTwoBitGrid;
    pub use crate::ida_star::IdaStar;
    pub use crate::moves::Moves;
    pub use crate::oracle::DistanceOracle;
    pub use crate::parallel_ida_star::ParallelIdaStar;
    pub use crate::rand_moves::RandomMoves;
    pub use crate::result_flag::ResultFlag;
    pub use crate::scheduler::{Schedule, SchedulePolicy};
    pub use crate::solver::Solver;
}
