//! The solver contract: the puzzle-specific algebra this crate treats as an
//! external collaborator. Group element multiplication, adjacency, symmetry
//! orbits, and move-prune masks all live on the caller's implementation of
//! this trait; nothing in this crate hard-codes a particular puzzle.

use crate::grid::AtomicTwoBitGrid;

/// `BASE` is the number of move generators (const generic so `adj` can
/// return a fixed-size array); it must be `<= 64` so a `u64` bitmask can
/// gate moves.
pub trait Solver<const BASE: usize>: Sync {
    /// Opaque state value, comparable, cheap to copy.
    type State: Copy + Eq + Send + Sync;
    /// A group element; multiplied by move generators to drive a search.
    type Cube: Copy + Send + Sync;
    /// Small scalar carried between consecutive admissible-distance queries;
    /// typically the previously observed true distance, hence the `u64`
    /// conversions (the oracle only ever needs the distance out of it).
    type Hint: Copy + Send + Sync + Default + Into<u64> + From<u64>;
    /// The symmetry orbit of a `(state, index)` pair, as an iterable of
    /// state indices. The first element yielded MUST equal `index` itself —
    /// callers CAS that element first and the rest unconditionally.
    type Alt: IntoIterator<Item = u64>;

    /// Size of the enumerable state space.
    const N_STATE: u64;

    fn identity_cube(&self) -> Self::Cube;
    fn cube_to_state(&self, cube: Self::Cube) -> Self::State;
    fn state_to_int(&self, state: Self::State) -> u64;
    fn int_to_state(&self, i: u64) -> Self::State;

    /// The `BASE` neighbors of `state`, in move-index order.
    fn adj(&self, state: Self::State) -> [Self::State; BASE];

    /// The symmetry orbit of `(state, index)`; `index` is normally
    /// `state_to_int(state)` but is taken explicitly so forward/backward BFS
    /// scans can pass either endpoint of an edge.
    fn alt(&self, state: Self::State, index: u64) -> Self::Alt;

    fn is_start(&self, state: Self::State) -> bool;

    /// `cube * base[mv]`.
    fn apply(&self, cube: Self::Cube, mv: usize) -> Self::Cube;

    fn base_name(&self, mv: usize) -> &str;

    /// Bit `j` set ⇔ move `j` is allowed to follow move `mv`.
    fn base_mask(&self, mv: usize) -> u64;

    /// Maps a move index of this solver into the shared super-base used by
    /// [`crate::combine_search::CombineSearch`] to concatenate two phases'
    /// move sequences.
    fn base_index(&self, mv: usize) -> u64;

    /// The shared, already-built (`BfsEngine::build`-populated) distance
    /// table. Read-only from the search's point of view.
    fn grid(&self) -> &AtomicTwoBitGrid;

    /// Extra symmetry-derived pruning applied to the first `sym_mask_n_moves`
    /// plies of an IDA* search. Defaults to "no restriction"; solvers with
    /// richer symmetry structure than plain orbit-collapsing may override it.
    #[allow(unused_variables)]
    fn sym_mask(&self, cube: Self::Cube, state: Self::State, moves_so_far: &[u8]) -> u64 {
        u64::MAX
    }
}
