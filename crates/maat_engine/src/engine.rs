//! The engine facade: owns the position and configuration, runs the
//! iterative-deepening driver on a single worker thread, and publishes
//! progress through callbacks.
//!
//! Threading contract: exactly one worker searches at a time. The
//! control thread calls `start_search` / `stop_search` / `is_searching`;
//! the worker runs the search and invokes the callbacks on its own
//! thread. `stop_search` only sets an atomic flag, the worker observes
//! it cooperatively at its next stop check.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};

use chess_core::{Move, Position};

use crate::config::Config;
use crate::eval::Evaluator;
use crate::ordering::MoveOrdering;
use crate::score::{Depth, EvaluatedMove};
use crate::search::{MinimaxSearch, SearchControl, StopParameters};
use crate::stats::{SearchSnapshot, SearchStats};

/// Name and version reported over UCI.
pub const IDENTIFIER: &str = "Maat 0.1";
/// Author reported over UCI.
pub const AUTHOR: &str = "Maat developers";

type ProgressCallback = Box<dyn Fn(&SearchSnapshot) + Send>;
type EndedCallback = Box<dyn Fn(EvaluatedMove) + Send>;

#[derive(Default)]
struct Callbacks {
    progress: Option<ProgressCallback>,
    ended: Option<EndedCallback>,
}

/// State behind the mutex: everything the worker snapshots at search
/// start or writes back as results.
struct EngineState {
    config: Config,
    evaluator: Evaluator,
    position: Position,
    best_move: EvaluatedMove,
    search_started: Instant,
    last_elapsed: Duration,
}

struct EngineShared {
    state: Mutex<EngineState>,
    stats: SearchStats,
    stop_requested: Arc<AtomicBool>,
    search_running: AtomicBool,
    callbacks: Mutex<Callbacks>,
}

/// A chess engine: position, configuration and a background search.
///
/// ```no_run
/// use maat_engine::{ChessEngine, StopParameters};
/// use std::time::Duration;
///
/// let mut engine = ChessEngine::new();
/// engine.on_search_ended(|best| println!("bestmove {}", best.mv));
/// engine.start_search(StopParameters {
///     max_search_time: Duration::from_millis(500),
///     ..StopParameters::default()
/// });
/// ```
pub struct ChessEngine {
    shared: Arc<EngineShared>,
    worker: Option<JoinHandle<()>>,
}

impl ChessEngine {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let evaluator = Evaluator::new(config.evaluator.clone());
        ChessEngine {
            shared: Arc::new(EngineShared {
                state: Mutex::new(EngineState {
                    config,
                    evaluator,
                    position: Position::startpos(),
                    best_move: EvaluatedMove::default(),
                    search_started: Instant::now(),
                    last_elapsed: Duration::ZERO,
                }),
                stats: SearchStats::default(),
                stop_requested: Arc::new(AtomicBool::new(false)),
                search_running: AtomicBool::new(false),
                callbacks: Mutex::new(Callbacks::default()),
            }),
            worker: None,
        }
    }

    /// Resets the position to the standard start position.
    pub fn new_game(&self) {
        self.shared.state.lock().unwrap().position = Position::startpos();
    }

    /// Replaces the current position.
    ///
    /// A running search is not redirected: the worker operates on a
    /// snapshot taken when it started and keeps reporting on it.
    pub fn set_position(&self, position: Position) {
        self.shared.state.lock().unwrap().position = position;
    }

    /// The current position.
    pub fn position(&self) -> Position {
        self.shared.state.lock().unwrap().position.clone()
    }

    /// Applies a move to the current position.
    pub fn play_move(&self, mv: Move) {
        let _ = self.shared.state.lock().unwrap().position.make_move(mv);
    }

    /// Replaces the configuration. Takes effect at the next search; a
    /// search already underway keeps its own snapshot.
    pub fn set_config(&self, config: Config) {
        let mut state = self.shared.state.lock().unwrap();
        state.evaluator = Evaluator::new(config.evaluator.clone());
        state.config = config;
    }

    /// Loads the configuration from a JSON file.
    pub fn load_config(&self, path: &Path) -> anyhow::Result<()> {
        let config = Config::from_file(path)?;
        info!("loaded configuration from {}", path.display());
        self.set_config(config);
        Ok(())
    }

    /// Searches the current position, blocking until a stop criterion
    /// is met. Returns the best move found (the null move if the search
    /// was stopped before the first iteration completed).
    pub fn search(&mut self, stop_params: StopParameters) -> EvaluatedMove {
        if self.shared.search_running.swap(true, Ordering::AcqRel) {
            return self.best_move();
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.shared.stop_requested.store(false, Ordering::Release);
        execute(&self.shared, stop_params)
    }

    /// Starts a search on a background worker thread and returns
    /// immediately. A no-op when a search is already running. Progress
    /// and completion arrive through the callbacks; a stop before the
    /// first iteration completes reports the null move.
    pub fn start_search(&mut self, stop_params: StopParameters) {
        if self.shared.search_running.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.shared.stop_requested.store(false, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        self.worker = Some(thread::spawn(move || {
            execute(&shared, stop_params);
        }));
    }

    /// Asks a running search to stop; returns immediately. Does nothing
    /// when the engine is idle.
    pub fn stop_search(&self) {
        self.shared.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a search is currently running.
    pub fn is_searching(&self) -> bool {
        self.shared.search_running.load(Ordering::Acquire)
    }

    /// The best move of the last completed search.
    pub fn best_move(&self) -> EvaluatedMove {
        self.shared.state.lock().unwrap().best_move
    }

    /// A snapshot of the search statistics.
    pub fn search_stats(&self) -> SearchSnapshot {
        let state = self.shared.state.lock().unwrap();
        let elapsed = if self.is_searching() {
            state.search_started.elapsed()
        } else {
            state.last_elapsed
        };
        SearchSnapshot {
            nodes: self.shared.stats.nodes(),
            cutoffs: self.shared.stats.cutoffs(),
            depth: self.shared.stats.depth(),
            best_move: state.best_move,
            elapsed,
        }
    }

    /// Installs the per-iteration progress callback. Invoked on the
    /// worker thread; it must not block and must not call back into the
    /// engine.
    pub fn on_search_progress(&self, callback: impl Fn(&SearchSnapshot) + Send + 'static) {
        self.shared.callbacks.lock().unwrap().progress = Some(Box::new(callback));
    }

    /// Installs the end-of-search callback, fired exactly once per
    /// search, whatever the reason it ended. Same threading rules as
    /// [`Self::on_search_progress`].
    pub fn on_search_ended(&self, callback: impl Fn(EvaluatedMove) + Send + 'static) {
        self.shared.callbacks.lock().unwrap().ended = Some(Box::new(callback));
    }
}

impl Default for ChessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ChessEngine {
    fn drop(&mut self) {
        self.stop_search();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

/// Runs one search to completion: drives the iterations, downgrades a
/// worker panic to "ended with the last known best move", clears the
/// running flag and fires the ended callback, in that order.
fn execute(shared: &EngineShared, stop_params: StopParameters) -> EvaluatedMove {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| drive_search(shared, stop_params)));
    let best = match outcome {
        Ok(best) => best,
        Err(_) => {
            error!("search worker panicked; reporting last known best move");
            shared
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .best_move
        }
    };

    {
        let mut state = shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.best_move = best;
        state.last_elapsed = state.search_started.elapsed();
    }
    shared.search_running.store(false, Ordering::Release);

    let callbacks = shared
        .callbacks
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(ended) = &callbacks.ended {
        ended(best);
    }
    best
}

/// The iterative-deepening driver.
fn drive_search(shared: &EngineShared, stop_params: StopParameters) -> EvaluatedMove {
    shared.stats.reset();
    let (position, config, evaluator) = {
        let mut state = shared.state.lock().unwrap();
        state.best_move = EvaluatedMove::default();
        state.search_started = Instant::now();
        (
            state.position.clone(),
            state.config.clone(),
            state.evaluator.clone(),
        )
    };

    let iterative = config.search.iterative_deepening;
    if !iterative && stop_params.max_search_depth <= Depth::ZERO {
        error!("iterative deepening is off and no search depth is set; refusing to search");
        return EvaluatedMove::default();
    }

    let control = SearchControl::new(Arc::clone(&shared.stop_requested), stop_params);
    let ordering = MoveOrdering::from_config(&config);
    let mut minimax = MinimaxSearch::new(
        position,
        &config.minimax,
        &evaluator,
        &ordering,
        &control,
        &shared.stats,
    );

    let mut depth = if iterative {
        Depth::STEP
    } else {
        stop_params.max_search_depth
    };
    let mut last_best = EvaluatedMove::default();

    loop {
        if control.should_stop(&shared.stats) {
            break;
        }
        if stop_params.max_search_depth > Depth::ZERO && depth > stop_params.max_search_depth {
            break;
        }
        shared.stats.set_depth(depth);

        match minimax.search_root(depth) {
            Ok(candidate) => {
                last_best = candidate;
                {
                    let mut state = shared.state.lock().unwrap();
                    state.best_move = candidate;
                    state.last_elapsed = control.elapsed();
                }
                publish_progress(shared, candidate, depth, control.elapsed());
                debug!(
                    "depth {} best {} score {} nodes {}",
                    depth,
                    candidate.mv,
                    candidate.score,
                    shared.stats.nodes()
                );

                if candidate.score.is_winning() {
                    info!(
                        "mate in {} found at depth {}",
                        candidate.score.ply_to_mate(),
                        depth
                    );
                    break;
                }
                if !iterative {
                    break;
                }
                minimax.set_pv_move(Some(candidate.mv));
                depth += Depth::STEP;
            }
            Err(_) => {
                debug!("search stopped during depth {}", depth);
                break;
            }
        }
    }

    last_best
}

fn publish_progress(
    shared: &EngineShared,
    best_move: EvaluatedMove,
    depth: Depth,
    elapsed: Duration,
) {
    let snapshot = SearchSnapshot {
        nodes: shared.stats.nodes(),
        cutoffs: shared.stats.cutoffs(),
        depth,
        best_move,
        elapsed,
    };
    let callbacks = shared.callbacks.lock().unwrap();
    if let Some(progress) = &callbacks.progress {
        progress(&snapshot);
    }
}
