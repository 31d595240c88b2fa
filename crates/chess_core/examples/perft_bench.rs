//! Quick perft throughput check: `cargo run --release --example perft_bench`

use std::time::Instant;

use chess_core::{Position, perft};

fn main() {
    let cases = [
        (
            "startpos",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            5u8,
        ),
        (
            "kiwipete",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            4u8,
        ),
    ];

    for (name, fen, depth) in cases {
        let mut pos = Position::from_fen(fen);
        let start = Instant::now();
        let nodes = perft(&mut pos, depth);
        let elapsed = start.elapsed();
        println!(
            "{name}: depth {depth}, {nodes} nodes in {elapsed:.3?} ({:.2} Mn/s)",
            (nodes as f64 / 1_000_000.0) / elapsed.as_secs_f64()
        );
    }
}
