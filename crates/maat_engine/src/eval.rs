//! Static position evaluation and the per-move ordering heuristic.

use chess_core::{CheckState, Color, Move, PieceKind, Position};

use crate::config::EvaluatorConfig;
use crate::score::Score;

/// Maps a position to a score from one side's perspective.
///
/// This is the only producer of the terminal `MATE` value: the search
/// relies on checkmate being detected here, at the leaves.
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Evaluator { config }
    }

    /// Evaluates `pos` from the perspective of `side`.
    ///
    /// Checkmate of the side to move scores `-MATE` (or `+MATE` seen
    /// from the opponent); stalemate scores the empty-board value. All
    /// other terms combine additively, each gated by its config flag.
    pub fn evaluate(&self, pos: &Position, side: Color) -> Score {
        match pos.check_state() {
            CheckState::Checkmate => {
                return if side == pos.side_to_move {
                    -Score::MATE
                } else {
                    Score::MATE
                };
            }
            CheckState::Stalemate => return self.config.empty_board_value(),
            CheckState::Normal | CheckState::Check => {}
        }

        let mut score = Score::ZERO;
        if self.config.use_material_balance {
            score += self.material_balance(pos, side);
        }
        if self.config.use_piece_square_tables {
            score += self.square_table_balance(pos, side);
        }
        score
    }

    fn material_balance(&self, pos: &Position, side: Color) -> Score {
        let mut total = Score::ZERO;
        for kind in PieceKind::ALL {
            let ours = pos.piece_count(side, kind) as i16;
            let theirs = pos.piece_count(side.other(), kind) as i16;
            total += self.config.piece_value(kind) * (ours - theirs);
        }
        total
    }

    fn square_table_balance(&self, pos: &Position, side: Color) -> Score {
        let mut total = Score::ZERO;
        for sq in 0..64u8 {
            if let Some(pc) = pos.piece_at(sq) {
                let value = self.config.piece_square_value(pc.kind, sq, pc.color);
                if pc.color == side {
                    total += value;
                } else {
                    total -= value;
                }
            }
        }
        total
    }

    /// Heuristic quality of a move, used for ordering only: the sum of
    /// the capture, promotion and square-table terms.
    pub fn evaluate_move(&self, pos: &Position, mv: Move) -> Score {
        self.capture_score(pos, mv) + self.promotion_score(mv) + self.piece_movement_score(pos, mv)
    }

    /// MVV-LVA: victim value minus attacker value, zero for quiet moves.
    pub fn capture_score(&self, pos: &Position, mv: Move) -> Score {
        if !self.config.use_capture_bonus {
            return Score::ZERO;
        }
        let Some(mover) = pos.piece_at(mv.from) else {
            return Score::ZERO;
        };
        let captured = if mv.is_en_passant {
            Some(PieceKind::Pawn)
        } else {
            pos.piece_at(mv.to).map(|p| p.kind)
        };
        match captured {
            Some(kind) => self.config.piece_value(kind) - self.config.piece_value(mover.kind),
            None => Score::ZERO,
        }
    }

    /// Promotion bonus plus the material the promotion gains.
    pub fn promotion_score(&self, mv: Move) -> Score {
        if !self.config.use_promotion_bonus {
            return Score::ZERO;
        }
        match mv.promo {
            Some(kind) => {
                self.config.pawn_promotion_score + self.config.piece_value(kind)
                    - self.config.piece_value(PieceKind::Pawn)
            }
            None => Score::ZERO,
        }
    }

    /// Square-table delta of moving the piece from its source to its
    /// destination.
    pub fn piece_movement_score(&self, pos: &Position, mv: Move) -> Score {
        if !self.config.use_piece_square_tables {
            return Score::ZERO;
        }
        let Some(mover) = pos.piece_at(mv.from) else {
            return Score::ZERO;
        };
        self.config.piece_square_value(mover.kind, mv.to, mover.color)
            - self.config.piece_square_value(mover.kind, mv.from, mover.color)
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
