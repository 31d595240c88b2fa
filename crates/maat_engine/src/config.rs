//! Engine configuration: search strategy, pruning and evaluation
//! parameters, loadable from a JSON file.

use std::fmt;
use std::fs;
use std::ops::Index;
use std::path::Path;

use anyhow::Context;
use chess_core::{Color, PieceKind, mirror_sq};
use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::score::Score;

/// Parameters of the minimax algorithm itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    pub use_alpha_beta_pruning: bool,
    pub use_move_ordering: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        MinimaxConfig {
            use_alpha_beta_pruning: true,
            use_move_ordering: true,
        }
    }
}

/// Parameters of the search strategy around the algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub iterative_deepening: bool,
    /// Order the previous iteration's best move first at the root.
    pub search_pv_first: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            iterative_deepening: true,
            search_pv_first: true,
        }
    }
}

/// A 64-entry table of square values, indexed from White's side
/// (a1 = 0); lookups for Black mirror the rank.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SquareTable([i16; 64]);

impl SquareTable {
    pub const fn new(values: [i16; 64]) -> Self {
        SquareTable(values)
    }
}

impl Index<u8> for SquareTable {
    type Output = i16;

    #[inline(always)]
    fn index(&self, sq: u8) -> &i16 {
        &self.0[sq as usize]
    }
}

impl fmt::Debug for SquareTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SquareTable").field(&self.0).finish()
    }
}

impl Serialize for SquareTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for SquareTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<i16>::deserialize(deserializer)?;
        let table: [i16; 64] = values
            .try_into()
            .map_err(|v: Vec<i16>| D::Error::invalid_length(v.len(), &"64 square values"))?;
        Ok(SquareTable(table))
    }
}

/// Parameters of the position evaluator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// One value per piece type, in `PieceKind` order.
    pub piece_values: [Score; 6],
    pub pawn_squares: SquareTable,
    pub knight_squares: SquareTable,
    pub bishop_squares: SquareTable,
    pub rook_squares: SquareTable,
    pub queen_squares: SquareTable,
    pub king_middle_game_squares: SquareTable,
    pub king_end_game_squares: SquareTable,
    /// Blend between the two king tables; `1.0` is pure middle-game.
    pub king_middle_game_factor: f32,
    /// Flat bonus on top of the material swing of a promotion.
    pub pawn_promotion_score: Score,
    pub use_material_balance: bool,
    pub use_piece_square_tables: bool,
    pub use_promotion_bonus: bool,
    pub use_capture_bonus: bool,
}

impl EvaluatorConfig {
    #[inline(always)]
    pub fn piece_value(&self, kind: PieceKind) -> Score {
        self.piece_values[kind.idx()]
    }

    /// Score of a board with nothing to count: the stalemate value.
    #[inline(always)]
    pub fn empty_board_value(&self) -> Score {
        Score::ZERO
    }

    /// Square-table value of a piece of `color` standing on `sq`.
    pub fn piece_square_value(&self, kind: PieceKind, sq: u8, color: Color) -> Score {
        let sq = match color {
            Color::White => sq,
            Color::Black => mirror_sq(sq),
        };
        let value = match kind {
            PieceKind::Pawn => self.pawn_squares[sq],
            PieceKind::Knight => self.knight_squares[sq],
            PieceKind::Bishop => self.bishop_squares[sq],
            PieceKind::Rook => self.rook_squares[sq],
            PieceKind::Queen => self.queen_squares[sq],
            PieceKind::King => blend(
                self.king_middle_game_squares[sq],
                self.king_end_game_squares[sq],
                self.king_middle_game_factor,
            ),
        };
        Score::new(value)
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            piece_values: [
                Score::new(100), // pawn
                Score::new(300), // knight
                Score::new(300), // bishop
                Score::new(500), // rook
                Score::new(900), // queen
                Score::new(0),   // king
            ],
            pawn_squares: SquareTable::new(PAWN_SQUARES),
            knight_squares: SquareTable::new(KNIGHT_SQUARES),
            bishop_squares: SquareTable::new(BISHOP_SQUARES),
            rook_squares: SquareTable::new(ROOK_SQUARES),
            queen_squares: SquareTable::new(QUEEN_SQUARES),
            king_middle_game_squares: SquareTable::new(KING_MIDDLE_GAME_SQUARES),
            king_end_game_squares: SquareTable::new(KING_END_GAME_SQUARES),
            king_middle_game_factor: 1.0,
            pawn_promotion_score: Score::new(100),
            use_material_balance: true,
            use_piece_square_tables: true,
            use_promotion_bonus: true,
            use_capture_bonus: true,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub minimax: MinimaxConfig,
    pub search: SearchConfig,
    pub evaluator: EvaluatorConfig,
}

impl Config {
    /// Reads a configuration from a JSON file. Missing fields fall back
    /// to their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

fn blend(middle_game: i16, end_game: i16, factor: f32) -> i16 {
    (f32::from(middle_game) * factor + f32::from(end_game) * (1.0 - factor)).round() as i16
}

// The classical hand-tuned square tables, from White's side with a1 at
// index 0.

const PAWN_SQUARES: [i16; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0, //
      5,  10,  10, -20, -20,  10,  10,   5, //
      5,  -5, -10,   0,   0, -10,  -5,   5, //
      0,   0,   0,  20,  20,   0,   0,   0, //
      5,   5,  10,  25,  25,  10,   5,   5, //
     10,  10,  20,  30,  30,  20,  10,  10, //
     50,  50,  50,  50,  50,  50,  50,  50, //
      0,   0,   0,   0,   0,   0,   0,   0, //
];

const KNIGHT_SQUARES: [i16; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, //
    -40, -20,   0,   5,   5,   0, -20, -40, //
    -30,   5,  10,  15,  15,  10,   5, -30, //
    -30,   0,  15,  20,  20,  15,   0, -30, //
    -30,   5,  15,  20,  20,  15,   5, -30, //
    -30,   0,  10,  15,  15,  10,   0, -30, //
    -40, -20,   0,   0,   0,   0, -20, -40, //
    -50, -40, -30, -30, -30, -30, -40, -50, //
];

const BISHOP_SQUARES: [i16; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20, //
    -10,   5,   0,   0,   0,   0,   5, -10, //
    -10,  10,  10,  10,  10,  10,  10, -10, //
    -10,   0,  10,  10,  10,  10,   0, -10, //
    -10,   5,   5,  10,  10,   5,   5, -10, //
    -10,   0,   5,  10,  10,   5,   0, -10, //
    -10,   0,   0,   0,   0,   0,   0, -10, //
    -20, -10, -10, -10, -10, -10, -10, -20, //
];

const ROOK_SQUARES: [i16; 64] = [
      0,   0,   0,   5,   5,   0,   0,   0, //
     -5,   0,   0,   0,   0,   0,   0,  -5, //
     -5,   0,   0,   0,   0,   0,   0,  -5, //
     -5,   0,   0,   0,   0,   0,   0,  -5, //
     -5,   0,   0,   0,   0,   0,   0,  -5, //
     -5,   0,   0,   0,   0,   0,   0,  -5, //
      5,  10,  10,  10,  10,  10,  10,   5, //
      0,   0,   0,   0,   0,   0,   0,   0, //
];

const QUEEN_SQUARES: [i16; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20, //
    -10,   0,   5,   0,   0,   0,   0, -10, //
    -10,   5,   5,   5,   5,   5,   0, -10, //
      0,   0,   5,   5,   5,   5,   0,  -5, //
     -5,   0,   5,   5,   5,   5,   0,  -5, //
    -10,   0,   5,   5,   5,   5,   0, -10, //
    -10,   0,   0,   0,   0,   0,   0, -10, //
    -20, -10, -10,  -5,  -5, -10, -10, -20, //
];

const KING_MIDDLE_GAME_SQUARES: [i16; 64] = [
     20,  30,  10,   0,   0,  10,  30,  20, //
     20,  20,   0,   0,   0,   0,  20,  20, //
    -10, -20, -20, -20, -20, -20, -20, -10, //
    -20, -30, -30, -40, -40, -30, -30, -20, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
    -30, -40, -40, -50, -50, -40, -40, -30, //
];

const KING_END_GAME_SQUARES: [i16; 64] = [
    -50, -30, -30, -30, -30, -30, -30, -50, //
    -30, -30,   0,   0,   0,   0, -30, -30, //
    -30, -10,  20,  30,  30,  20, -10, -30, //
    -30, -10,  30,  40,  40,  30, -10, -30, //
    -30, -10,  30,  40,  40,  30, -10, -30, //
    -30, -10,  20,  30,  30,  20, -10, -30, //
    -30, -20, -10,   0,   0, -10, -20, -30, //
    -50, -40, -30, -20, -20, -30, -40, -50, //
];
