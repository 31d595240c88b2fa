use super::*;
use crate::movegen::legal_moves;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn test_startpos_setup() {
    let pos = Position::startpos();
    assert_eq!(pos.side_to_move, Color::White);
    assert_eq!(pos.piece_count(Color::White, PieceKind::Pawn), 8);
    assert_eq!(pos.piece_count(Color::Black, PieceKind::Pawn), 8);
    assert_eq!(pos.piece_count(Color::White, PieceKind::King), 1);
    assert_eq!(pos.king_sq(Color::White), Some(4));
    assert_eq!(pos.king_sq(Color::Black), Some(60));
    assert_eq!(pos.bitboards.occupied().popcount(), 32);
}

#[test]
fn test_fen_matches_startpos() {
    let fen = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert_eq!(fen, Position::startpos());
}

#[test]
fn test_mailbox_and_bitboards_agree() {
    let pos = Position::from_fen(KIWIPETE);
    for sq in 0..64u8 {
        match pos.piece_at(sq) {
            Some(pc) => assert!(pos.bitboards.pieces(pc.color, pc.kind).contains(sq)),
            None => assert!(!pos.bitboards.occupied().contains(sq)),
        }
    }
}

#[test]
fn test_make_unmake_round_trip() {
    // Every legal move from a few structurally different positions must
    // restore the position exactly.
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        KIWIPETE,
        "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3", // en passant
        "8/P6k/8/8/8/8/p6K/8 w - - 0 1",                                // promotions
        "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",                         // castling
    ];

    for fen in fens {
        let reference = Position::from_fen(fen);
        let mut pos = reference.clone();
        for mv in legal_moves(&reference) {
            let undo = pos.make_move(mv);
            assert_ne!(pos, reference, "make_move had no effect for {mv}");
            pos.unmake_move(mv, undo);
            assert_eq!(pos, reference, "unmake_move failed to restore {mv} on {fen}");
        }
    }
}

#[test]
fn test_castling_moves_rook() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let mut mv = Move::new(4, 6); // e1g1
    mv.is_castle = true;
    let undo = pos.make_move(mv);
    assert_eq!(
        pos.piece_at(5).map(|p| p.kind),
        Some(PieceKind::Rook),
        "rook must land on f1"
    );
    assert_eq!(pos.piece_at(6).map(|p| p.kind), Some(PieceKind::King));
    assert!(!pos.castling.wk);
    assert!(!pos.castling.wq);
    pos.unmake_move(mv, undo);
    assert_eq!(pos, Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"));
}

#[test]
fn test_en_passant_capture_removes_pawn() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    let mut mv = Move::new(36, 43); // exd6 e.p.
    mv.is_en_passant = true;
    pos.make_move(mv);
    assert!(pos.piece_at(35).is_none(), "the d5 pawn must be gone");
    assert_eq!(pos.piece_at(43).map(|p| p.kind), Some(PieceKind::Pawn));
    assert_eq!(pos.piece_count(Color::Black, PieceKind::Pawn), 7);
}

#[test]
fn test_promotion_changes_piece_kind() {
    let mut pos = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1");
    let mv = Move::with_promo(48, 56, PieceKind::Queen);
    let undo = pos.make_move(mv);
    assert_eq!(pos.piece_at(56).map(|p| p.kind), Some(PieceKind::Queen));
    assert_eq!(pos.piece_count(Color::White, PieceKind::Pawn), 0);
    pos.unmake_move(mv, undo);
    assert_eq!(pos.piece_at(48).map(|p| p.kind), Some(PieceKind::Pawn));
    assert_eq!(pos.piece_count(Color::White, PieceKind::Queen), 0);
}

#[test]
fn test_is_square_attacked() {
    let pos = Position::startpos();
    // e3 and f3 are covered by white pawns and knights
    assert!(pos.is_square_attacked(20, Color::White));
    assert!(pos.is_square_attacked(21, Color::White));
    // e4 is attacked by nobody
    assert!(!pos.is_square_attacked(28, Color::White));
    assert!(!pos.is_square_attacked(28, Color::Black));
    // e6 is covered by black pawns
    assert!(pos.is_square_attacked(44, Color::Black));
}

#[test]
fn test_halfmove_clock_updates() {
    let mut pos = Position::startpos();
    pos.make_move(Move::new(1, 18)); // Nb1c3: quiet knight move
    assert_eq!(pos.halfmove_clock, 1);
    pos.make_move(Move::new(52, 36)); // e7e5: pawn move resets
    assert_eq!(pos.halfmove_clock, 0);
    assert_eq!(pos.fullmove_number, 2);
}
