//! `AtomicTwoBitGrid`: an `N`-entry array of 2-bit cells with atomic
//! get/CAS/fill, packed 32 cells per 64-bit word.
//!
//! No standard library type provides this. We build it directly on
//! `AtomicU64` loads and compare-exchange, masking and shifting explicitly,
//! rather than reaching for a generic bit-vector crate: the bit tricks in
//! [`crate::bfs`] need word-level access to the same storage.

use std::sync::atomic::{AtomicU64, Ordering};

const CELLS_PER_WORD: u64 = 32;

/// Two-bit residue, or the unvisited sentinel `3`.
pub const UNVISITED: u8 = 3;

pub struct AtomicTwoBitGrid {
    words: Vec<AtomicU64>,
    len: u64,
}

impl AtomicTwoBitGrid {
    /// Allocates a grid of `len` cells, all initially zero (not yet `fill`ed).
    pub fn new(len: u64) -> Self {
        let n_words = (len + CELLS_PER_WORD - 1) / CELLS_PER_WORD;
        let mut words = Vec::with_capacity(n_words as usize);
        words.resize_with(n_words as usize, || AtomicU64::new(0));
        AtomicTwoBitGrid { words, len }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of 32-cell words backing this grid; used by [`crate::bfs`] to
    /// partition work on word boundaries.
    #[inline]
    pub fn n_words(&self) -> u64 {
        self.words.len() as u64
    }

    #[inline]
    fn word_index(i: u64) -> (u64, u64) {
        (i / CELLS_PER_WORD, (i % CELLS_PER_WORD) * 2)
    }

    /// Relaxed atomic load of the containing word followed by shift-and-mask.
    /// No synchronization guarantee beyond single-cell atomicity.
    #[inline]
    pub fn get(&self, i: u64) -> u8 {
        let (j, k) = Self::word_index(i);
        let w = self.words[j as usize].load(Ordering::Relaxed);
        ((w >> k) & 3) as u8
    }

    /// Reads the raw word containing cell `i`; used by the BFS bit tricks
    /// that test a whole word at once before touching individual cells.
    #[inline]
    pub fn word(&self, word_index: u64) -> u64 {
        self.words[word_index as usize].load(Ordering::Relaxed)
    }

    /// Retries a compare-and-exchange on the containing word until either
    /// the cell's current value differs from `old` (returns `false`), or the
    /// word swap succeeds with the cell updated in place (returns `true`).
    /// Other cells in the same word are preserved byte-accurately.
    pub fn cas(&self, i: u64, old: u8, new: u8) -> bool {
        let (j, k) = Self::word_index(i);
        let word = &self.words[j as usize];
        let mut current = word.load(Ordering::Relaxed);
        loop {
            if ((current >> k) & 3) as u8 != old {
                return false;
            }
            let updated = (current & !(3u64 << k)) | ((new as u64) << k);
            match word.compare_exchange_weak(current, updated, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Sets every cell to `x`. Non-atomic with respect to readers; callers
    /// must ensure no concurrent `get`/`cas` is in flight. For grids with
    /// enough words to amortize thread spawn cost, the fill is partitioned
    /// into per-thread chunks — purely a throughput optimization, mirroring
    /// how this codebase zeroes its own large fixed-size tables in chunks.
    pub fn fill(&self, x: u8) {
        debug_assert!(x <= 3);
        let mut pattern = x as u64;
        pattern |= pattern << 2;
        pattern |= pattern << 4;
        pattern |= pattern << 8;
        pattern |= pattern << 16;
        pattern |= pattern << 32;

        let n_words = self.words.len();
        let threads = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        if threads <= 1 || n_words < threads * 1024 {
            for w in &self.words {
                w.store(pattern, Ordering::Relaxed);
            }
            return;
        }

        let chunk = n_words.div_ceil(threads);
        std::thread::scope(|scope| {
            for words_chunk in self.words.chunks(chunk) {
                scope.spawn(move || {
                    for w in words_chunk {
                        w.store(pattern, Ordering::Relaxed);
                    }
                });
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_and_get_roundtrip() {
        let grid = AtomicTwoBitGrid::new(100);
        grid.fill(UNVISITED);
        for i in 0..100 {
            assert_eq!(grid.get(i), UNVISITED);
        }
    }

    #[test]
    fn cas_exactly_once() {
        let grid = AtomicTwoBitGrid::new(40);
        grid.fill(UNVISITED);
        assert!(grid.cas(5, UNVISITED, 1));
        assert_eq!(grid.get(5), 1);
        assert!(!grid.cas(5, UNVISITED, 2));
        assert_eq!(grid.get(5), 1);
    }

    #[test]
    fn cas_preserves_neighbors_in_same_word() {
        let grid = AtomicTwoBitGrid::new(32);
        grid.fill(0);
        assert!(grid.cas(0, 0, 1));
        assert!(grid.cas(1, 0, 2));
        assert!(grid.cas(31, 0, 3));
        assert_eq!(grid.get(0), 1);
        assert_eq!(grid.get(1), 2);
        assert_eq!(grid.get(31), 3);
        for i in 2..31 {
            assert_eq!(grid.get(i), 0);
        }
    }

    #[test]
    fn concurrent_cas_exactly_one_winner() {
        use std::sync::atomic::AtomicUsize;
        let grid = AtomicTwoBitGrid::new(64);
        grid.fill(UNVISITED);
        let wins = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    if grid.cas(10, UNVISITED, 1) {
                        wins.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });
        assert_eq!(wins.load(Ordering::Relaxed), 1);
        assert_eq!(grid.get(10), 1);
    }
}
