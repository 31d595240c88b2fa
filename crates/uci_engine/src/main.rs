//! UCI front end for the Maat chess engine.
//!
//! Reads GUI commands from stdin and drives the engine facade. Search
//! progress and the final best move are printed from the engine's
//! callbacks, which run on the worker thread; stdout is line-buffered
//! per print so the interleaving stays safe. Logging goes to stderr so
//! it never corrupts the protocol stream.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use log::{info, warn};

use chess_core::{Position, set_position_from_uci};
use maat_engine::{AUTHOR, ChessEngine, Depth, EvaluatedMove, IDENTIFIER, Score, StopParameters};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut engine = ChessEngine::new();
    engine.on_search_progress(|snapshot| {
        println!(
            "info depth {} score {} nodes {} nps {} time {} pv {}",
            snapshot.depth,
            format_score(snapshot.best_move.score),
            snapshot.nodes,
            snapshot.nps(),
            snapshot.elapsed.as_millis(),
            snapshot.best_move.mv,
        );
    });
    engine.on_search_ended(|best: EvaluatedMove| {
        println!("bestmove {}", best.mv);
    });

    let stdin = io::stdin();
    let mut position = Position::startpos();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };

        match command {
            "uci" => {
                println!("id name {IDENTIFIER}");
                println!("id author {AUTHOR}");
                println!("option name ConfigFile type string default <empty>");
                println!("uciok");
                io::stdout().flush().ok();
            }
            "isready" => {
                println!("readyok");
                io::stdout().flush().ok();
            }
            "setoption" => handle_setoption(&engine, &parts[1..]),
            "ucinewgame" => {
                engine.new_game();
                position = Position::startpos();
            }
            "position" => {
                set_position_from_uci(&mut position, &parts[1..]);
                engine.set_position(position.clone());
            }
            "go" => {
                let stop_params = parse_go(&parts[1..]);
                info!("starting search with {stop_params:?}");
                engine.start_search(stop_params);
            }
            "stop" => engine.stop_search(),
            "quit" => break,
            _ => {
                // Per the UCI spec, unknown commands are ignored
            }
        }
    }
}

/// `setoption name <name> value <value>`; only `ConfigFile` is known.
fn handle_setoption(engine: &ChessEngine, args: &[&str]) {
    let Some(name_idx) = args.iter().position(|&a| a == "name") else {
        return;
    };
    let Some(&name) = args.get(name_idx + 1) else {
        return;
    };
    let value = args
        .iter()
        .position(|&a| a == "value")
        .and_then(|idx| args.get(idx + 1).copied());

    match name.to_lowercase().as_str() {
        "configfile" => {
            if let Some(path) = value
                && let Err(err) = engine.load_config(Path::new(path))
            {
                warn!("{err:#}");
            }
        }
        _ => warn!("ignoring unknown option {name}"),
    }
}

/// `go [depth N] [movetime T] [nodes N] [infinite]`; anything absent is
/// unlimited.
fn parse_go(args: &[&str]) -> StopParameters {
    let value_after = |key: &str| {
        args.iter()
            .position(|&a| a.eq_ignore_ascii_case(key))
            .and_then(|idx| args.get(idx + 1))
            .and_then(|v| v.parse::<u64>().ok())
    };

    StopParameters {
        max_search_time: value_after("movetime").map_or(Duration::ZERO, Duration::from_millis),
        max_search_depth: value_after("depth").map_or(Depth::ZERO, |d| Depth::new(d as i16)),
        max_search_nodes: value_after("nodes").unwrap_or(0),
    }
}

/// UCI score field: `cp <centipawns>` or `mate <moves>` (negative when
/// the engine is being mated).
fn format_score(score: Score) -> String {
    if score.is_winning() {
        let moves = (score.ply_to_mate().get() + 1) / 2;
        format!("mate {moves}")
    } else if score.is_losing() {
        let moves = (score.ply_to_mate().get() + 1) / 2;
        format!("mate -{moves}")
    } else {
        format!("cp {score}")
    }
}
