use super::*;

#[test]
fn test_knight_attacks() {
    // Knight on e4 attacks 8 squares
    assert_eq!(knight_attacks(28).popcount(), 8);

    // Knight in the corner attacks 2 squares
    let attacks = knight_attacks(0);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(10)); // c2
    assert!(attacks.contains(17)); // b3
    assert_eq!(knight_attacks(7).popcount(), 2);
}

#[test]
fn test_king_attacks() {
    assert_eq!(king_attacks(28).popcount(), 8); // e4
    assert_eq!(king_attacks(0).popcount(), 3); // a1
    assert_eq!(king_attacks(60).popcount(), 5); // e8
}

#[test]
fn test_pawn_attacks() {
    // White pawn on e4 attacks d5 and f5
    let attacks = pawn_attacks(28, Color::White);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(35)); // d5
    assert!(attacks.contains(37)); // f5

    // White pawn on a2 attacks only b3
    let attacks = pawn_attacks(8, Color::White);
    assert_eq!(attacks.popcount(), 1);
    assert!(attacks.contains(17)); // b3

    // Black pawn on e5 attacks d4 and f4
    let attacks = pawn_attacks(36, Color::Black);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(27)); // d4
    assert!(attacks.contains(29)); // f4
}

#[test]
fn test_rook_attacks_empty_board() {
    assert_eq!(rook_attacks(28, Bitboard::EMPTY).popcount(), 14);
}

#[test]
fn test_bishop_attacks_empty_board() {
    assert_eq!(bishop_attacks(28, Bitboard::EMPTY).popcount(), 13);
    assert_eq!(bishop_attacks(0, Bitboard::EMPTY).popcount(), 7);
}

#[test]
fn test_queen_attacks_empty_board() {
    assert_eq!(queen_attacks(28, Bitboard::EMPTY).popcount(), 27);
}

#[test]
fn test_rook_attacks_with_blockers() {
    // Rook on a1, blocker on a4
    let occupied = Bitboard::from_square(24); // a4
    let attacks = rook_attacks(0, occupied);
    assert!(attacks.contains(8)); // a2
    assert!(attacks.contains(16)); // a3
    assert!(attacks.contains(24)); // a4 (the blocker itself)
    assert!(!attacks.contains(32)); // a5 (behind the blocker)
    assert!(attacks.contains(1)); // b1
    assert!(attacks.contains(7)); // h1
}

#[test]
fn test_bishop_attacks_with_blockers() {
    // Bishop on c1, blocker on e3
    let occupied = Bitboard::from_square(20); // e3
    let attacks = bishop_attacks(2, occupied);
    assert!(attacks.contains(11)); // d2
    assert!(attacks.contains(20)); // e3 (the blocker itself)
    assert!(!attacks.contains(29)); // f4 (behind the blocker)
    assert!(attacks.contains(9)); // b2
    assert!(attacks.contains(16)); // a3, sliding the other way
}
