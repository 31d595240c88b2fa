//! Move ordering: better candidates first means earlier cutoffs.

use std::cmp::Reverse;

use chess_core::{Move, Position};

use crate::config::Config;
use crate::eval::Evaluator;

/// Orders a legal move list by expected quality, optionally promoting
/// the principal-variation move of the previous iteration to the front.
#[derive(Clone, Debug)]
pub struct MoveOrdering {
    evaluator: Evaluator,
    use_move_ordering: bool,
    search_pv_first: bool,
}

impl MoveOrdering {
    pub fn from_config(config: &Config) -> Self {
        MoveOrdering {
            evaluator: Evaluator::new(config.evaluator.clone()),
            use_move_ordering: config.minimax.use_move_ordering,
            search_pv_first: config.search.search_pv_first,
        }
    }

    /// Sorts descending by the move heuristic. If a PV move is supplied
    /// and present in the list, it is rotated to the front afterwards,
    /// preserving the relative order of the rest. With ordering
    /// disabled the list is left untouched.
    pub fn order(&self, pos: &Position, moves: &mut [Move], pv_move: Option<Move>) {
        if !self.use_move_ordering {
            return;
        }
        moves.sort_unstable_by_key(|&mv| Reverse(self.evaluator.evaluate_move(pos, mv)));
        if self.search_pv_first
            && let Some(pv) = pv_move
            && let Some(idx) = moves.iter().position(|&m| m == pv)
        {
            moves[..=idx].rotate_right(1);
        }
    }
}
