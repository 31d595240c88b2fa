//! Board library for the Maat chess engine.
//!
//! Owns everything about the rules of the game: position
//! representation, legal move generation, FEN parsing and UCI move
//! notation. Search and evaluation live in the `maat_engine` crate and
//! consume this one through `Position`, `Move` and `legal_moves`.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod movegen;
pub mod perft;
pub mod types;
pub mod uci;

pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use movegen::*;
pub use perft::perft;
pub use types::*;
pub use uci::*;
