use super::*;
use crate::config::Config;

struct Fixture {
    config: Config,
    evaluator: Evaluator,
    ordering: MoveOrdering,
    control: SearchControl,
    stats: SearchStats,
}

impl Fixture {
    fn new(config: Config) -> Self {
        let evaluator = Evaluator::new(config.evaluator.clone());
        let ordering = MoveOrdering::from_config(&config);
        let control = SearchControl::new(
            Arc::new(AtomicBool::new(false)),
            StopParameters::default(),
        );
        Fixture {
            config,
            evaluator,
            ordering,
            control,
            stats: SearchStats::default(),
        }
    }

    fn search(&self, fen: &str, depth: i16) -> EvaluatedMove {
        let mut minimax = MinimaxSearch::new(
            Position::from_fen(fen),
            &self.config.minimax,
            &self.evaluator,
            &self.ordering,
            &self.control,
            &self.stats,
        );
        minimax
            .search_root(Depth::new(depth))
            .expect("unlimited search must not stop")
    }
}

#[test]
fn test_finds_back_rank_mate_in_one() {
    let fixture = Fixture::new(Config::default());
    let best = fixture.search("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1", 2);
    assert!(best.score.is_winning());
    assert_eq!(best.score.ply_to_mate(), Depth::STEP);
    assert_eq!(best.mv.to_string(), "e1e8");
}

#[test]
fn test_supported_queen_mate_in_one() {
    let fixture = Fixture::new(Config::default());
    let best = fixture.search("7k/5Q2/6K1/8/8/8/8/8 w - - 0 1", 3);
    assert!(best.score.is_winning());
    assert_eq!(best.score.ply_to_mate(), Depth::STEP);
    assert_eq!(best.mv.to_string(), "f7g7");
}

#[test]
fn test_prefers_faster_mate() {
    // Mate in one is available along with slower mates; the
    // mate-distance adjustment must pick the fast one even at depth 3.
    let fixture = Fixture::new(Config::default());
    let best = fixture.search("6k1/8/6K1/8/8/8/8/4Q3 w - - 0 1", 3);
    assert_eq!(best.score.ply_to_mate(), Depth::STEP);
    assert_eq!(best.mv.to_string(), "e1e8");
}

#[test]
fn test_startpos_depth_one() {
    let fixture = Fixture::new(Config::default());
    let best = fixture.search(
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        1,
    );
    assert!(!best.mv.is_null());
    assert!(!best.score.is_decisive());
    // Root node plus one leaf per legal move
    assert!(fixture.stats.nodes() >= 21);
}

#[test]
fn test_checkmated_root_reports_mate_score() {
    let fixture = Fixture::new(Config::default());
    let best = fixture.search("8/8/8/8/6n1/8/6PP/1r4K1 w - - 0 1", 3);
    assert!(best.mv.is_null());
    assert_eq!(best.score, -Score::MATE);
}

#[test]
fn test_stalemate_root_reports_empty_board_value() {
    let fixture = Fixture::new(Config::default());
    let best = fixture.search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
    assert!(best.mv.is_null());
    assert_eq!(best.score, Score::ZERO);
}

#[test]
fn test_position_restored_after_search() {
    let config = Config::default();
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let evaluator = Evaluator::new(config.evaluator.clone());
    let ordering = MoveOrdering::from_config(&config);
    let control = SearchControl::new(
        Arc::new(AtomicBool::new(false)),
        StopParameters::default(),
    );
    let stats = SearchStats::default();
    let mut minimax = MinimaxSearch::new(
        Position::from_fen(fen),
        &config.minimax,
        &evaluator,
        &ordering,
        &control,
        &stats,
    );
    minimax.search_root(Depth::new(3)).unwrap();
    assert_eq!(minimax.position(), &Position::from_fen(fen));
}

#[test]
fn test_position_restored_after_stopped_search() {
    let config = Config::default();
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    let evaluator = Evaluator::new(config.evaluator.clone());
    let ordering = MoveOrdering::from_config(&config);
    // A tiny node budget aborts the search in the middle of the tree.
    let control = SearchControl::new(
        Arc::new(AtomicBool::new(false)),
        StopParameters {
            max_search_nodes: 50,
            ..StopParameters::default()
        },
    );
    let stats = SearchStats::default();
    let mut minimax = MinimaxSearch::new(
        Position::from_fen(fen),
        &config.minimax,
        &evaluator,
        &ordering,
        &control,
        &stats,
    );
    assert_eq!(minimax.search_root(Depth::new(5)), Err(SearchStopped));
    assert_eq!(minimax.position(), &Position::from_fen(fen));
}

#[test]
fn test_alpha_beta_equivalence() {
    let fens = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ];

    for fen in fens {
        let pruned = Fixture::new(Config::default()).search(fen, 3);

        let mut config = Config::default();
        config.minimax.use_alpha_beta_pruning = false;
        let full = Fixture::new(config).search(fen, 3);

        assert_eq!(
            pruned.score, full.score,
            "alpha-beta changed the root score on {fen}"
        );
    }
}

#[test]
fn test_search_is_deterministic() {
    let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3";
    let mut config = Config::default();
    config.search.iterative_deepening = false;
    let first = Fixture::new(config.clone()).search(fen, 4);
    let second = Fixture::new(config).search(fen, 4);
    assert_eq!(first.mv, second.mv);
    assert_eq!(first.score, second.score);
}

#[test]
fn test_pruning_produces_cutoffs() {
    let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    let fixture = Fixture::new(Config::default());
    fixture.search(fen, 3);
    assert!(fixture.stats.cutoffs() > 0);
    let nodes_pruned = fixture.stats.nodes();

    let mut config = Config::default();
    config.minimax.use_alpha_beta_pruning = false;
    let full = Fixture::new(config);
    full.search(fen, 3);
    assert_eq!(full.stats.cutoffs(), 0);
    assert!(full.stats.nodes() > nodes_pruned);
}

#[test]
fn test_stop_flag_aborts_search() {
    let config = Config::default();
    let evaluator = Evaluator::new(config.evaluator.clone());
    let ordering = MoveOrdering::from_config(&config);
    let flag = Arc::new(AtomicBool::new(true));
    let control = SearchControl::new(flag, StopParameters::default());
    let stats = SearchStats::default();
    let mut minimax = MinimaxSearch::new(
        Position::startpos(),
        &config.minimax,
        &evaluator,
        &ordering,
        &control,
        &stats,
    );
    assert_eq!(minimax.search_root(Depth::new(4)), Err(SearchStopped));
}

#[test]
fn test_should_stop_criteria() {
    let stats = SearchStats::default();

    let flag = Arc::new(AtomicBool::new(false));
    let control = SearchControl::new(flag.clone(), StopParameters::default());
    assert!(!control.should_stop(&stats));
    flag.store(true, Ordering::Relaxed);
    assert!(control.should_stop(&stats));

    let control = SearchControl::new(
        Arc::new(AtomicBool::new(false)),
        StopParameters {
            max_search_depth: Depth::new(2),
            ..StopParameters::default()
        },
    );
    stats.set_depth(Depth::new(2));
    assert!(!control.should_stop(&stats));
    stats.set_depth(Depth::new(3));
    assert!(control.should_stop(&stats));

    let control = SearchControl::new(
        Arc::new(AtomicBool::new(false)),
        StopParameters {
            max_search_nodes: 10,
            ..StopParameters::default()
        },
    );
    for _ in 0..11 {
        stats.count_node();
    }
    assert!(control.should_stop(&stats));

    let control = SearchControl::new(
        Arc::new(AtomicBool::new(false)),
        StopParameters {
            max_search_time: Duration::from_millis(1),
            ..StopParameters::default()
        },
    );
    std::thread::sleep(Duration::from_millis(5));
    assert!(control.should_stop(&SearchStats::default()));
}
