use std::time::Duration;

use agents::*;
use gomoku_arena::{board::Move, prelude::*};

mod agents;

const BUDGET: Duration = Duration::from_millis(200);

fn positions(points: &[(i32, i32)]) -> Vec<Position> {
    points.iter().copied().map(Position::from).collect()
}

#[tokio::test]
async fn five_in_a_row_wins_for_black() {
    init_test_logger();
    let a = handle("a", ScriptedAgent::new(vec![(3, 3), (3, 4), (3, 5), (3, 6), (3, 7)]));
    let b = handle("b", ScriptedAgent::new(vec![(0, 0), (0, 1), (0, 2), (0, 3)]));

    let outcome = run_match(&a, &b, 8, BUDGET).await.unwrap();

    assert_eq!(outcome.result_code, GameResult::BlackWin);
    assert_eq!(outcome.result_code.code(), "BW");
    assert_eq!(outcome.winner.as_deref(), Some("a"));
    assert_eq!(outcome.loser.as_deref(), Some("b"));
    assert_eq!(outcome.moves, 9);
    assert_eq!(outcome.move_log.len(), 9);
    assert_eq!(
        outcome.winning_sequence,
        positions(&[(3, 3), (3, 4), (3, 5), (3, 6), (3, 7)])
    );
    assert_eq!(outcome.reason, "Five in a row");
    assert_eq!(outcome.final_board[3], "...XXXXX");
    assert_eq!(outcome.final_board[0], "OOOO....");

    for (i, record) in outcome.move_log.iter().enumerate() {
        assert_eq!(record.turn, i + 1);
        assert!(record.legal);
        let expected = if i % 2 == 0 { Stone::Black } else { Stone::White };
        assert_eq!(record.player, expected);
    }
}

#[tokio::test]
async fn white_can_win_too() {
    init_test_logger();
    let a = handle("a", ScriptedAgent::new(vec![(7, 0), (7, 2), (7, 4), (7, 6), (6, 6)]));
    let b = handle("b", ScriptedAgent::new(vec![(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]));

    let outcome = run_match(&a, &b, 8, BUDGET).await.unwrap();

    assert_eq!(outcome.result_code, GameResult::WhiteWin);
    assert_eq!(outcome.winner.as_deref(), Some("b"));
    assert_eq!(outcome.moves, 10);
    // anti-diagonal, listed from its upper end
    assert_eq!(
        outcome.winning_sequence,
        positions(&[(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)])
    );
}

#[tokio::test(start_paused = true)]
async fn slow_agent_times_out_on_any_board_size() {
    init_test_logger();
    for size in [5, 8, 15, 19] {
        let slow = handle("slow", Sleepy);
        let other = handle("other", FirstFree);

        let outcome = run_match(&slow, &other, size, BUDGET).await.unwrap();
        assert_eq!(outcome.result_code, GameResult::Timeout, "size {size}");
        assert_eq!(outcome.winner.as_deref(), Some("other"));
        assert_eq!(outcome.moves, 0);
        assert_eq!(outcome.move_log.len(), 1);
        assert_eq!(outcome.move_log[0].position, None);
        assert!(!outcome.move_log[0].legal);
        assert_eq!(outcome.reason, "Timeout (>0.2s)");
    }
}

#[tokio::test(start_paused = true)]
async fn slow_white_gets_one_attempt() {
    init_test_logger();
    let first = handle("first", FirstFree);
    let slow = handle("slow", Sleepy);

    let outcome = run_match(&first, &slow, 8, BUDGET).await.unwrap();
    assert_eq!(outcome.result_code, GameResult::Timeout);
    assert_eq!(outcome.winner.as_deref(), Some("first"));
    assert_eq!(outcome.moves, 1);
    let attempts: Vec<_> = outcome.move_log.iter().filter(|r| r.agent == "slow").collect();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].position, None);
}

async fn assert_blocking_answer_is_late() {
    let blocking = handle("blocking", Blocking(Duration::from_millis(600)));
    let other = handle("other", FirstFree);

    let outcome = run_match(&blocking, &other, 8, BUDGET).await.unwrap();
    assert_eq!(outcome.result_code, GameResult::Timeout);
    assert_eq!(outcome.winner.as_deref(), Some("other"));
    assert_eq!(outcome.moves, 0);
    assert_eq!(outcome.move_log.len(), 1);
    assert!(!outcome.move_log[0].legal);
    assert_eq!(outcome.move_log[0].position, None);
    assert!(outcome.move_log[0].time >= 0.6);
}

#[tokio::test]
async fn blocking_agent_times_out_on_current_thread() {
    init_test_logger();
    assert_blocking_answer_is_late().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn blocking_agent_times_out_on_a_starved_worker() {
    init_test_logger();
    assert_blocking_answer_is_late().await;
}

#[tokio::test]
async fn occupied_cell_is_an_invalid_move() {
    init_test_logger();
    let first = handle("first", FirstFree);
    let occupier = handle("occupier", Occupier);

    let outcome = run_match(&first, &occupier, 8, BUDGET).await.unwrap();
    assert_eq!(outcome.result_code, GameResult::InvalidMove);
    assert_eq!(outcome.result_code.code(), "IM");
    assert_eq!(outcome.winner.as_deref(), Some("first"));
    assert_eq!(outcome.reason, "Invalid move at (0, 0)");
    assert_eq!(outcome.moves, 1);

    let last = outcome.move_log.last().unwrap();
    assert_eq!(last.agent, "occupier");
    assert_eq!(last.position, Some(Position::new(0, 0)));
    assert!(!last.legal);
    assert_eq!(last.reason.as_deref(), Some("position (0, 0) is already occupied"));
}

#[tokio::test]
async fn out_of_bounds_is_an_invalid_move() {
    init_test_logger();
    let wild = handle("wild", ScriptedAgent::new(vec![(8, 0)]));
    let other = handle("other", FirstFree);

    let outcome = run_match(&wild, &other, 8, BUDGET).await.unwrap();
    assert_eq!(outcome.result_code, GameResult::InvalidMove);
    assert_eq!(outcome.winner.as_deref(), Some("other"));
    assert_eq!(outcome.moves, 0);
    assert_eq!(outcome.reason, "Invalid move at (8, 0)");
}

#[tokio::test]
async fn agent_error_is_an_exception() {
    init_test_logger();
    let first = handle("first", FirstFree);
    let failing = handle("failing", Failing);

    let outcome = run_match(&first, &failing, 8, BUDGET).await.unwrap();
    assert_eq!(outcome.result_code, GameResult::Exception);
    assert_eq!(outcome.winner.as_deref(), Some("first"));
    assert_eq!(outcome.reason, "Agent error: connection refused");
    assert!(!outcome.reason.contains("agent::network"));
    assert_eq!(
        outcome.move_log.last().unwrap().reason.as_deref(),
        Some("Agent error: connection refused")
    );
}

#[tokio::test]
async fn agent_panic_is_an_exception() {
    init_test_logger();
    let panicking = handle("panicking", Panicking);
    let first = handle("first", FirstFree);

    let outcome = run_match(&panicking, &first, 8, BUDGET).await.unwrap();
    assert_eq!(outcome.result_code, GameResult::Exception);
    assert_eq!(outcome.winner.as_deref(), Some("first"));
    assert_eq!(outcome.loser.as_deref(), Some("panicking"));
    assert_eq!(outcome.reason, "Agent panicked");
}

#[tokio::test]
async fn full_board_without_five_is_a_draw() {
    init_test_logger();
    let (black, white) = draw_scripts(6);
    let a = handle("a", ScriptedAgent::new(black));
    let b = handle("b", ScriptedAgent::new(white));

    let outcome = run_match(&a, &b, 6, BUDGET).await.unwrap();
    assert_eq!(outcome.result_code, GameResult::Draw);
    assert_eq!(outcome.result_code.code(), "DR");
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.loser, None);
    assert_eq!(outcome.moves, 36);
    assert_eq!(outcome.reason, "Board full");
    assert!(outcome.winning_sequence.is_empty());
    assert!(outcome.final_board.iter().all(|row| !row.contains('.')));
    assert_eq!(outcome.points_for("a"), 0.5);
}

#[tokio::test]
async fn replaying_the_log_reaches_the_same_end() {
    init_test_logger();
    let play = || async {
        let a = handle("a", SimpleAgent::with_seed(11));
        let b = handle("b", SimpleAgent::with_seed(12));
        run_match(&a, &b, 8, BUDGET).await.unwrap()
    };
    let first = play().await;
    let second = play().await;

    assert_eq!(first.result_code, second.result_code);
    assert_eq!(first.winning_sequence, second.winning_sequence);
    assert_eq!(first.final_board, second.final_board);

    let committed: Vec<Move> = first
        .move_log
        .iter()
        .filter(|r| r.legal)
        .filter_map(|r| r.position.map(|position| Move { player: r.player, position }))
        .collect();
    assert_eq!(committed.len(), first.moves);

    let replayed = GameState::new(8).unwrap().replay(&committed).unwrap();
    assert_eq!(replayed.rows(), first.final_board);
    if let Some(last) = replayed.last_move() {
        let sequence = replayed.check_win(last.position, last.player).unwrap_or_default();
        assert_eq!(sequence, first.winning_sequence);
    }
}

#[tokio::test]
async fn outcome_serializes_with_stable_codes() {
    init_test_logger();
    let a = handle("a", ScriptedAgent::new(vec![(3, 3), (3, 4), (3, 5), (3, 6), (3, 7)]));
    let b = handle("b", ScriptedAgent::new(vec![(0, 0), (0, 1), (0, 2), (0, 3)]));
    let outcome = run_match(&a, &b, 8, BUDGET).await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();
    assert_eq!(json["result_code"], "BW");
    assert_eq!(json["winner"], "a");
    assert_eq!(json["moves"], 9);
    assert_eq!(json["winning_sequence"][0], serde_json::json!([3, 3]));
    assert_eq!(json["move_log"][0]["player"], "BLACK");
    assert_eq!(json["move_log"][0]["position"], serde_json::json!([3, 3]));

    let back: Outcome = serde_json::from_value(json).unwrap();
    assert_eq!(back.result_code, GameResult::BlackWin);
    assert_eq!(back.winning_sequence, outcome.winning_sequence);
}

#[tokio::test]
async fn setup_errors_are_returned_before_playing() {
    init_test_logger();
    let a = handle("a", FirstFree);
    let b = handle("b", FirstFree);

    assert!(matches!(
        run_match(&a, &b, 4, BUDGET).await,
        Err(ConfigurationError::BoardSize { size: 4, .. })
    ));
    assert_eq!(
        run_match(&a, &b, 8, Duration::ZERO).await.unwrap_err(),
        ConfigurationError::ZeroTimeout
    );
    assert_eq!(
        run_match(&a, &a, 8, BUDGET).await.unwrap_err(),
        ConfigurationError::DuplicateAgent("a".into())
    );
}

#[tokio::test]
async fn first_player_can_be_white() {
    init_test_logger();
    let constraints = ConstraintsBuilder::new()
        .with_first_player(Stone::White)
        .with_action_timeout(BUDGET)
        .build()
        .unwrap();
    let a = handle("a", FirstFree);
    let b = handle("b", Occupier);

    let outcome = gomoku_arena::match_runner::run_match(&a, &b, &constraints)
        .await
        .unwrap();
    // white ("b") opens on the empty corner, black then fills the next free cell
    assert_eq!(outcome.move_log[0].player, Stone::White);
    assert_eq!(outcome.move_log[0].agent, "b");
    assert_eq!(outcome.result_code, GameResult::InvalidMove);
    assert_eq!(outcome.winner.as_deref(), Some("a"));
}
