//! Position representation and make/unmake.
//!
//! The position keeps a mailbox (`board`) for piece lookups and a set of
//! bitboards for move generation and attack detection; `set_piece` keeps
//! the two in sync.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

/// Per-color, per-piece-kind bitboards, maintained alongside the mailbox.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitboardSet {
    pieces: [[Bitboard; 6]; 2],
    colors: [Bitboard; 2],
}

impl BitboardSet {
    #[inline(always)]
    fn set(&mut self, pc: Piece, sq: u8) {
        self.pieces[pc.color.idx()][pc.kind.idx()].set(sq);
        self.colors[pc.color.idx()].set(sq);
    }

    #[inline(always)]
    fn clear(&mut self, pc: Piece, sq: u8) {
        self.pieces[pc.color.idx()][pc.kind.idx()].clear(sq);
        self.colors[pc.color.idx()].clear(sq);
    }

    /// All squares holding a piece of the given color and kind.
    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.idx()][kind.idx()]
    }

    /// All squares holding a piece of the given color.
    #[inline(always)]
    pub fn color(&self, color: Color) -> Bitboard {
        self.colors[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }
}

/// Whether the side to move is in check, mated, stalemated, or neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckState {
    Normal,
    Check,
    Checkmate,
    Stalemate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub bitboards: BitboardSet,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// State captured by `make_move` that `unmake_move` needs to restore.
#[derive(Clone, Debug)]
pub struct Undo {
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub moved_piece: Piece,
    pub rook_move: Option<(u8, u8)>, // (rook_from, rook_to) for castling
    pub ep_captured_sq: Option<u8>,  // square actually captured in en-passant
}

impl Position {
    fn empty() -> Self {
        Position {
            board: [None; 64],
            bitboards: BitboardSet::default(),
            side_to_move: Color::White,
            castling: CastlingRights {
                wk: true,
                wq: true,
                bk: true,
                bq: true,
            },
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        let mut p = Position::empty();

        for f in 0..8u8 {
            p.set_piece(
                8 + f,
                Some(Piece {
                    color: Color::White,
                    kind: PieceKind::Pawn,
                }),
            );
            p.set_piece(
                48 + f,
                Some(Piece {
                    color: Color::Black,
                    kind: PieceKind::Pawn,
                }),
            );
        }
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.set_piece(
                f as u8,
                Some(Piece {
                    color: Color::White,
                    kind,
                }),
            );
            p.set_piece(
                56 + f as u8,
                Some(Piece {
                    color: Color::Black,
                    kind,
                }),
            );
        }
        p
    }

    /// Parses a Forsyth-Edwards Notation string.
    ///
    /// Panics on malformed input; FENs reach the engine from tests and
    /// the UCI layer, which owns validation of external input.
    pub fn from_fen(fen: &str) -> Self {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        assert!(parts.len() >= 4, "Invalid FEN: expected at least 4 fields");

        let board_part = parts[0];
        let stm_part = parts[1];
        let castle_part = parts[2];
        let ep_part = parts[3];
        let halfmove_part = parts.get(4).copied().unwrap_or("0");
        let fullmove_part = parts.get(5).copied().unwrap_or("1");

        let mut pos = Position::empty();

        let ranks: Vec<&str> = board_part.split('/').collect();
        assert!(ranks.len() == 8, "Invalid FEN board section");

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file: i8 = 0;
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let color = if ch.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let kind = PieceKind::from_char(ch)
                        .unwrap_or_else(|| panic!("Invalid piece char in FEN: {}", ch));
                    let square = sq(file, rank).expect("Square out of bounds while parsing FEN");
                    pos.set_piece(square, Some(Piece { color, kind }));
                    file += 1;
                }
                assert!(file <= 8, "Too many files in FEN rank");
            }
            assert!(file == 8, "Not enough files in FEN rank");
        }

        pos.side_to_move = match stm_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => panic!("Invalid side to move in FEN: {}", stm_part),
        };

        pos.castling = CastlingRights {
            wk: false,
            wq: false,
            bk: false,
            bq: false,
        };
        if castle_part != "-" {
            for c in castle_part.chars() {
                match c {
                    'K' => pos.castling.wk = true,
                    'Q' => pos.castling.wq = true,
                    'k' => pos.castling.bk = true,
                    'q' => pos.castling.bq = true,
                    _ => panic!("Invalid castling char in FEN: {}", c),
                }
            }
        }

        pos.en_passant = if ep_part == "-" {
            None
        } else {
            coord_to_sq(ep_part)
        };

        pos.halfmove_clock = halfmove_part.parse().expect("Invalid halfmove clock in FEN");
        pos.fullmove_number = fullmove_part
            .parse()
            .expect("Invalid fullmove number in FEN");

        pos
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }

    /// Places (or removes, with `None`) a piece, keeping mailbox and
    /// bitboards consistent.
    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        if let Some(old) = self.board[sq as usize] {
            self.bitboards.clear(old, sq);
        }
        self.board[sq as usize] = pc;
        if let Some(new) = pc {
            self.bitboards.set(new, sq);
        }
    }

    /// Number of pieces of the given color and kind on the board.
    #[inline(always)]
    pub fn piece_count(&self, color: Color, kind: PieceKind) -> u32 {
        self.bitboards.pieces(color, kind).popcount()
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.bitboards.pieces(c, PieceKind::King).lsb()
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    /// Whether `by` attacks `target`, via the attack tables.
    ///
    /// Pawn attackers sit on the squares a pawn of the *other* color
    /// would attack from `target`, so the pawn lookup uses the reversed
    /// color.
    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let bbs = &self.bitboards;

        if !(pawn_attacks(target, by.other()) & bbs.pieces(by, PieceKind::Pawn)).is_empty() {
            return true;
        }
        if !(knight_attacks(target) & bbs.pieces(by, PieceKind::Knight)).is_empty() {
            return true;
        }
        if !(king_attacks(target) & bbs.pieces(by, PieceKind::King)).is_empty() {
            return true;
        }

        let occupied = bbs.occupied();
        let diagonal = bbs.pieces(by, PieceKind::Bishop) | bbs.pieces(by, PieceKind::Queen);
        if !(bishop_attacks(target, occupied) & diagonal).is_empty() {
            return true;
        }
        let orthogonal = bbs.pieces(by, PieceKind::Rook) | bbs.pieces(by, PieceKind::Queen);
        if !(rook_attacks(target, occupied) & orthogonal).is_empty() {
            return true;
        }

        false
    }

    /// Check/checkmate/stalemate status of the side to move.
    pub fn check_state(&self) -> CheckState {
        let in_check = self.in_check(self.side_to_move);
        if crate::movegen::has_legal_move(self) {
            if in_check {
                CheckState::Check
            } else {
                CheckState::Normal
            }
        } else if in_check {
            CheckState::Checkmate
        } else {
            CheckState::Stalemate
        }
    }

    pub fn make_move(&mut self, mv: Move) -> Undo {
        let from = mv.from;
        let to = mv.to;
        let moved = self.piece_at(from).expect("no piece on from-square");
        let mut captured = self.piece_at(to);
        let prev_castling = self.castling.clone();
        let prev_ep = self.en_passant;
        let prev_hmc = self.halfmove_clock;
        let prev_fmn = self.fullmove_number;

        self.en_passant = None;

        // Halfmove clock reset on capture or pawn move
        let mut reset_hmc = moved.kind == PieceKind::Pawn || captured.is_some();

        // En-passant capture removes the pawn behind the target square
        let mut ep_captured_sq = None;
        if mv.is_en_passant {
            let dir = match moved.color {
                Color::White => -1,
                Color::Black => 1,
            };
            let cap_rank = rank_of(to) + dir;
            let cap_file = file_of(to);
            if let Some(cs) = sq(cap_file, cap_rank) {
                captured = self.piece_at(cs);
                self.set_piece(cs, None);
                ep_captured_sq = Some(cs);
                reset_hmc = true;
            }
        }

        self.set_piece(from, None);
        self.set_piece(to, Some(moved));

        // Promotion
        if moved.kind == PieceKind::Pawn {
            let r = rank_of(to);
            if (moved.color == Color::White && r == 7) || (moved.color == Color::Black && r == 0) {
                let promo = mv.promo.unwrap_or(PieceKind::Queen);
                self.set_piece(
                    to,
                    Some(Piece {
                        color: moved.color,
                        kind: promo,
                    }),
                );
                reset_hmc = true;
            }
        }

        // Castling moves the rook as well
        let mut rook_move = None;
        if mv.is_castle && moved.kind == PieceKind::King {
            // White: e1->g1 rook h1->f1, e1->c1 rook a1->d1
            // Black: e8->g8 rook h8->f8, e8->c8 rook a8->d8
            let (rf, rt) = match (moved.color, from, to) {
                (Color::White, 4, 6) => (7, 5),
                (Color::White, 4, 2) => (0, 3),
                (Color::Black, 60, 62) => (63, 61),
                (Color::Black, 60, 58) => (56, 59),
                _ => (255, 255),
            };
            if rf != 255 {
                let rook = self.piece_at(rf).expect("rook missing for castling");
                self.set_piece(rf, None);
                self.set_piece(rt, Some(rook));
                rook_move = Some((rf, rt));
            }
        }

        // Castling rights expire when the king or a rook moves
        match moved.color {
            Color::White => {
                if moved.kind == PieceKind::King {
                    self.castling.wk = false;
                    self.castling.wq = false;
                }
                if moved.kind == PieceKind::Rook {
                    if from == 0 {
                        self.castling.wq = false;
                    }
                    if from == 7 {
                        self.castling.wk = false;
                    }
                }
            }
            Color::Black => {
                if moved.kind == PieceKind::King {
                    self.castling.bk = false;
                    self.castling.bq = false;
                }
                if moved.kind == PieceKind::Rook {
                    if from == 56 {
                        self.castling.bq = false;
                    }
                    if from == 63 {
                        self.castling.bk = false;
                    }
                }
            }
        }
        // A rook captured on its home square also removes the right
        if let Some(cp) = captured
            && cp.kind == PieceKind::Rook
        {
            match cp.color {
                Color::White => {
                    if to == 0 {
                        self.castling.wq = false;
                    }
                    if to == 7 {
                        self.castling.wk = false;
                    }
                }
                Color::Black => {
                    if to == 56 {
                        self.castling.bq = false;
                    }
                    if to == 63 {
                        self.castling.bk = false;
                    }
                }
            }
        }

        // Double pawn push sets the en-passant square
        if moved.kind == PieceKind::Pawn {
            let fr = rank_of(from);
            let tr = rank_of(to);
            if (moved.color == Color::White && fr == 1 && tr == 3)
                || (moved.color == Color::Black && fr == 6 && tr == 4)
            {
                self.en_passant = sq(file_of(from), (fr + tr) / 2);
            }
        }

        self.halfmove_clock = if reset_hmc {
            0
        } else {
            self.halfmove_clock + 1
        };

        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();

        Undo {
            captured,
            castling: prev_castling,
            en_passant: prev_ep,
            halfmove_clock: prev_hmc,
            fullmove_number: prev_fmn,
            moved_piece: moved,
            rook_move,
            ep_captured_sq,
        }
    }

    /// Reverts `mv`; must be passed the `Undo` returned by the matching
    /// `make_move`.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        let from = mv.from;
        let to = mv.to;

        if let Some((rf, rt)) = undo.rook_move {
            let rook = self.piece_at(rt).expect("rook missing while unmaking castling");
            self.set_piece(rt, None);
            self.set_piece(rf, Some(rook));
        }

        // Promotions revert to the pawn that moved
        self.set_piece(to, None);
        self.set_piece(from, Some(undo.moved_piece));

        if mv.is_en_passant {
            if let Some(cs) = undo.ep_captured_sq {
                self.set_piece(cs, undo.captured);
            }
        } else {
            self.set_piece(to, undo.captured);
        }
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
