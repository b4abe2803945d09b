//! Drives a single game between two agents to a terminal [`Outcome`].
//!
//! Each turn the acting agent receives a private copy of the state and has
//! [`Constraints::action_timeout`] to answer. The first fault (late answer, error, panic or
//! illegal coordinate) ends the match in the opponent's favour. There are no retries.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, info, instrument, warn};

use crate::{
    agent::AgentHandle,
    board::{GameState, Position, Stone},
    constraints::Constraints,
    error::ConfigurationError,
    game_interface::Decision,
    outcome::{GameResult, MoveRecord, Outcome},
};

/// Longest agent error message kept in a match log.
const MAX_REASON_LEN: usize = 160;

/// Why an agent failed to produce a candidate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionFault {
    /// No answer within the budget.
    #[error("Timeout (>{}s)", .0.as_secs_f64())]
    DecisionTimeout(Duration),
    /// The agent returned an error. Holds the sanitized message.
    #[error("Agent error: {0}")]
    AgentFault(String),
    /// The agent panicked.
    #[error("Agent panicked")]
    AgentPanic,
}

impl DecisionFault {
    fn result(&self) -> GameResult {
        match self {
            DecisionFault::DecisionTimeout(_) => GameResult::Timeout,
            DecisionFault::AgentFault(_) | DecisionFault::AgentPanic => GameResult::Exception,
        }
    }
}

/// Aborts the decision task when dropped, whether the turn timed out or the whole match future
/// was dropped.
struct DecisionTask(JoinHandle<anyhow::Result<Decision>>);

impl Drop for DecisionTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Asks `agent` for a move on its own task, bounded by `budget`.
///
/// An agent that blocks its thread instead of yielding keeps the timer from firing; its answer
/// is still discarded when it arrives after `budget`.
async fn request_decision(
    agent: &AgentHandle,
    snapshot: GameState,
    budget: Duration,
) -> Result<Decision, DecisionFault> {
    let capability = Arc::clone(&agent.agent);
    let asked_at = Instant::now();
    let mut task = DecisionTask(tokio::spawn(async move { capability.decide(snapshot).await }));

    let joined = tokio::time::timeout(budget, &mut task.0).await;
    if asked_at.elapsed() > budget {
        return Err(DecisionFault::DecisionTimeout(budget));
    }
    match joined {
        Ok(Ok(Ok(decision))) => Ok(decision),
        Ok(Ok(Err(e))) => Err(DecisionFault::AgentFault(sanitize(&e))),
        Ok(Err(join_error)) if join_error.is_panic() => Err(DecisionFault::AgentPanic),
        Ok(Err(_cancelled)) => Err(DecisionFault::AgentFault("decision cancelled".to_owned())),
        Err(_elapsed) => Err(DecisionFault::DecisionTimeout(budget)),
    }
}

/// Keeps the top-level message only: first line, no control characters, bounded length.
fn sanitize(error: &anyhow::Error) -> String {
    let message = error.to_string();
    let cleaned: String = message
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_REASON_LEN)
        .collect();
    if cleaned.is_empty() {
        "unspecified error".to_owned()
    } else {
        cleaned
    }
}

/// Identity of both sides plus the clock, used to assemble the final record.
struct Referee<'a> {
    black: &'a AgentHandle,
    white: &'a AgentHandle,
    start: Instant,
}

impl Referee<'_> {
    fn agent(&self, stone: Stone) -> &AgentHandle {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn conclude(
        &self,
        state: &GameState,
        move_log: Vec<MoveRecord>,
        result_code: GameResult,
        winner: Option<Stone>,
        reason: String,
        winning_sequence: Vec<Position>,
    ) -> Outcome {
        let outcome = Outcome {
            black: self.black.id.clone(),
            white: self.white.id.clone(),
            winner: winner.map(|s| self.agent(s).id.clone()),
            loser: winner.map(|s| self.agent(s.opponent()).id.clone()),
            result_code,
            reason,
            moves: state.history().len(),
            total_time: self.start.elapsed().as_secs_f64(),
            board_size: state.board_size(),
            move_log,
            winning_sequence,
            final_board: state.rows(),
        };
        info!(
            result = %outcome.result_code,
            winner = outcome.winner.as_deref().unwrap_or("-"),
            moves = outcome.moves,
            "{}",
            outcome.reason
        );
        outcome
    }
}

/// Plays one game, `black` against `white`, under `constraints`.
///
/// Every fault raised by an agent is absorbed into the returned [`Outcome`].
///
/// # Errors
/// [`ConfigurationError`] if both sides share the same id or the board size is invalid. Nothing
/// has been played in that case.
#[instrument(skip_all, fields(black = %black.id, white = %white.id, board_size = constraints.board_size))]
pub async fn run_match(
    black: &AgentHandle,
    white: &AgentHandle,
    constraints: &Constraints,
) -> Result<Outcome, ConfigurationError> {
    if black.id == white.id {
        return Err(ConfigurationError::DuplicateAgent(black.id.clone()));
    }
    let mut state = GameState::with_first_player(constraints.board_size, constraints.first_player)?;

    let referee = Referee {
        black,
        white,
        start: Instant::now(),
    };
    let mut move_log: Vec<MoveRecord> = Vec::new();

    loop {
        let player = state.current_player();
        let current = referee.agent(player);
        let turn = move_log.len() + 1;

        let asked_at = Instant::now();
        let response = request_decision(current, state.clone(), constraints.action_time).await;

        let mut record = MoveRecord {
            turn,
            agent: current.id.clone(),
            player,
            position: None,
            timestamp: referee.start.elapsed().as_secs_f64(),
            time: asked_at.elapsed().as_secs_f64(),
            legal: false,
            reason: None,
            diagnostic: None,
        };

        let decision = match response {
            Ok(decision) => decision,
            Err(fault) => {
                warn!(agent = %current.id, turn, "{fault}");
                let reason = fault.to_string();
                record.reason = Some(reason.clone());
                move_log.push(record);
                return Ok(referee.conclude(
                    &state,
                    move_log,
                    fault.result(),
                    Some(player.opponent()),
                    reason,
                    vec![],
                ));
            }
        };

        let position = decision.position;
        record.position = Some(position);
        record.diagnostic = decision.diagnostic;

        match state.place_move(position, player) {
            Err(e) => {
                warn!(agent = %current.id, turn, "illegal move: {e}");
                record.reason = Some(e.to_string());
                move_log.push(record);
                return Ok(referee.conclude(
                    &state,
                    move_log,
                    GameResult::InvalidMove,
                    Some(player.opponent()),
                    format!("Invalid move at {position}"),
                    vec![],
                ));
            }
            Ok(next) => {
                state = next;
                record.legal = true;
                debug!(agent = %current.id, turn, %position, time = record.time, "move");
                move_log.push(record);
            }
        }

        if let Some(winning_sequence) = state.check_win(position, player) {
            return Ok(referee.conclude(
                &state,
                move_log,
                GameResult::win_for(player),
                Some(player),
                "Five in a row".to_owned(),
                winning_sequence,
            ));
        }

        if state.is_full() {
            return Ok(referee.conclude(
                &state,
                move_log,
                GameResult::Draw,
                None,
                "Board full".to_owned(),
                vec![],
            ));
        }
    }
}
