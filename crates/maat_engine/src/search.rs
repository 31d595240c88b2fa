//! Negamax search with alpha-beta pruning.
//!
//! A single recursive function computes "the value for the side to
//! move"; negating the child value and swapping the window serves both
//! sides. Cancellation is cooperative: the stop criteria surface as a
//! [`SearchStopped`] sentinel threaded through the recursion with `?`,
//! always after the move in flight has been unmade, so the position is
//! intact on every exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chess_core::{Move, Position, legal_moves};

use crate::config::MinimaxConfig;
use crate::eval::Evaluator;
use crate::ordering::MoveOrdering;
use crate::score::{Depth, EvaluatedMove, Score};
use crate::stats::SearchStats;

/// Nodes between clock reads; the stop flag and node limit are checked
/// on the cheap path every time.
pub(crate) const STOP_CHECK_INTERVAL: u64 = 1024;

/// Stopping criteria for a search. A zero value disables the criterion;
/// all zero means "search until told to stop".
#[derive(Clone, Copy, Debug, Default)]
pub struct StopParameters {
    pub max_search_time: Duration,
    pub max_search_depth: Depth,
    pub max_search_nodes: u64,
}

/// Sentinel carried out of the recursion when the search must wind
/// down. Not an error: stopping is the ordinary way a search ends early.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchStopped;

/// An alpha-beta window. `swapped` is the negamax step: the child node
/// sees the window from the other side.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bounds {
    pub alpha: Score,
    pub beta: Score,
}

impl Bounds {
    pub(crate) fn full() -> Bounds {
        Bounds {
            alpha: Score::NEG_INFINITY,
            beta: Score::INFINITY,
        }
    }

    #[inline(always)]
    pub(crate) fn swapped(self) -> Bounds {
        Bounds {
            alpha: -self.beta,
            beta: -self.alpha,
        }
    }
}

/// Evaluates the stop criteria for one search run.
///
/// Cheaply cloneable; the stop flag is shared with the engine facade so
/// `stop_search` on the control thread is visible to the worker at its
/// next check.
#[derive(Clone, Debug)]
pub struct SearchControl {
    stop: Arc<AtomicBool>,
    params: StopParameters,
    started_at: Instant,
}

impl SearchControl {
    pub fn new(stop: Arc<AtomicBool>, params: StopParameters) -> Self {
        SearchControl {
            stop,
            params,
            started_at: Instant::now(),
        }
    }

    pub fn params(&self) -> &StopParameters {
        &self.params
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Full stop-criteria check, used between iterations: stop flag,
    /// depth, node and time limits.
    pub fn should_stop(&self, stats: &SearchStats) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        let p = &self.params;
        if p.max_search_depth > Depth::ZERO && stats.depth() > p.max_search_depth {
            return true;
        }
        if p.max_search_nodes > 0 && stats.nodes() > p.max_search_nodes {
            return true;
        }
        !p.max_search_time.is_zero() && self.elapsed() > p.max_search_time
    }

    /// In-recursion check: stop flag and node limit every call, the
    /// clock only every [`STOP_CHECK_INTERVAL`] nodes.
    pub fn check_stop(&self, stats: &SearchStats) -> Result<(), SearchStopped> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(SearchStopped);
        }
        let p = &self.params;
        let nodes = stats.nodes();
        if p.max_search_nodes > 0 && nodes > p.max_search_nodes {
            return Err(SearchStopped);
        }
        if !p.max_search_time.is_zero()
            && nodes.is_multiple_of(STOP_CHECK_INTERVAL)
            && self.elapsed() > p.max_search_time
        {
            return Err(SearchStopped);
        }
        Ok(())
    }
}

/// One fixed-depth negamax search over a private copy of the position.
pub struct MinimaxSearch<'a> {
    config: &'a MinimaxConfig,
    evaluator: &'a Evaluator,
    ordering: &'a MoveOrdering,
    control: &'a SearchControl,
    stats: &'a SearchStats,
    position: Position,
    pv_move: Option<Move>,
}

impl<'a> MinimaxSearch<'a> {
    pub fn new(
        position: Position,
        config: &'a MinimaxConfig,
        evaluator: &'a Evaluator,
        ordering: &'a MoveOrdering,
        control: &'a SearchControl,
        stats: &'a SearchStats,
    ) -> Self {
        MinimaxSearch {
            config,
            evaluator,
            ordering,
            control,
            stats,
            position,
            pv_move: None,
        }
    }

    /// The principal-variation move to try first at the root, normally
    /// the best move of the previous iteration.
    pub fn set_pv_move(&mut self, mv: Option<Move>) {
        self.pv_move = mv;
    }

    /// The searched position; unchanged after every `search_root` call,
    /// stopped or not.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Searches the root to `depth` and returns the best move with its
    /// score. A position with no legal moves yields the null move and
    /// the static evaluation (`-MATE` when mated, the stalemate value
    /// otherwise).
    pub fn search_root(&mut self, depth: Depth) -> Result<EvaluatedMove, SearchStopped> {
        self.stats.count_node();

        let side = self.position.side_to_move;
        let mut moves = legal_moves(&self.position);
        if moves.is_empty() {
            return Ok(EvaluatedMove {
                mv: Move::default(),
                score: self.evaluator.evaluate(&self.position, side),
            });
        }
        self.ordering.order(&self.position, &mut moves, self.pv_move);

        let mut bounds = Bounds::full();
        let mut best = EvaluatedMove::default();
        for mv in moves {
            self.control.check_stop(self.stats)?;

            let undo = self.position.make_move(mv);
            let child = self.negamax(depth - Depth::STEP, bounds.swapped());
            self.position.unmake_move(mv, undo);

            let value = adjust_mate_distance(-(child?));
            if value > best.score {
                best = EvaluatedMove { mv, score: value };
            }
            bounds.alpha = bounds.alpha.max(best.score);
        }
        Ok(best)
    }

    fn negamax(&mut self, depth: Depth, mut bounds: Bounds) -> Result<Score, SearchStopped> {
        self.stats.count_node();

        let side = self.position.side_to_move;
        if depth <= Depth::ZERO {
            return Ok(self.evaluator.evaluate(&self.position, side));
        }

        let mut moves = legal_moves(&self.position);
        if moves.is_empty() {
            // Checkmate and stalemate both come out of the evaluator.
            return Ok(self.evaluator.evaluate(&self.position, side));
        }
        self.ordering.order(&self.position, &mut moves, None);

        let mut best = Score::NEG_INFINITY;
        for mv in moves {
            self.control.check_stop(self.stats)?;

            let undo = self.position.make_move(mv);
            let child = self.negamax(depth - Depth::STEP, bounds.swapped());
            self.position.unmake_move(mv, undo);

            let value = adjust_mate_distance(-(child?));
            best = best.max(value);
            bounds.alpha = bounds.alpha.max(best);
            if self.config.use_alpha_beta_pruning && bounds.beta <= bounds.alpha {
                self.stats.count_cutoff();
                break;
            }
        }
        Ok(best)
    }
}

/// Moves a decisive child score one ply further out, immediately after
/// negation: seen from this node, the mate the child reported takes one
/// more ply to reach. Without this the engine happily swaps a mate in
/// one for a mate in three of equal raw score.
#[inline(always)]
fn adjust_mate_distance(value: Score) -> Score {
    if value.is_winning() {
        value - Depth::STEP
    } else if value.is_losing() {
        value + Depth::STEP
    } else {
        value
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
