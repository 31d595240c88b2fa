//! Search statistics: atomic counters written by the search thread,
//! readable concurrently, plus the snapshot type published through the
//! progress callbacks.

use std::sync::atomic::{AtomicI16, AtomicU64, Ordering};
use std::time::Duration;

use crate::score::{Depth, EvaluatedMove};

/// Live counters of the current (or last) search.
///
/// The scalar fields are atomics so the control thread can read them
/// while the worker searches; compound data travels in
/// [`SearchSnapshot`]s instead.
#[derive(Debug, Default)]
pub struct SearchStats {
    nodes: AtomicU64,
    cutoffs: AtomicU64,
    depth: AtomicI16,
}

impl SearchStats {
    pub(crate) fn reset(&self) {
        self.nodes.store(0, Ordering::Relaxed);
        self.cutoffs.store(0, Ordering::Relaxed);
        self.depth.store(0, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn count_node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn count_cutoff(&self) {
        self.cutoffs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_depth(&self, depth: Depth) {
        self.depth.store(depth.get(), Ordering::Relaxed);
    }

    /// Nodes visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Alpha-beta cutoffs taken so far.
    pub fn cutoffs(&self) -> u64 {
        self.cutoffs.load(Ordering::Relaxed)
    }

    /// Depth of the iteration currently being searched.
    pub fn depth(&self) -> Depth {
        Depth::new(self.depth.load(Ordering::Relaxed))
    }
}

/// Point-in-time view of a search, published once per completed
/// iteration and available from `ChessEngine::search_stats`.
#[derive(Clone, Copy, Debug)]
pub struct SearchSnapshot {
    pub nodes: u64,
    pub cutoffs: u64,
    pub depth: Depth,
    pub best_move: EvaluatedMove,
    pub elapsed: Duration,
}

impl SearchSnapshot {
    /// Nodes per second; zero before the clock has measurably advanced.
    pub fn nps(&self) -> u64 {
        let millis = self.elapsed.as_millis() as u64;
        if millis > 0 { self.nodes * 1000 / millis } else { 0 }
    }
}

impl Default for SearchSnapshot {
    fn default() -> Self {
        SearchSnapshot {
            nodes: 0,
            cutoffs: 0,
            depth: Depth::ZERO,
            best_move: EvaluatedMove::default(),
            elapsed: Duration::ZERO,
        }
    }
}
