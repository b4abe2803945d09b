//! Core evaluation logic for running tournaments.
//!
//! This module defines the [`Evaluator`] type, which orchestrates tournament execution.
//! Its responsibilities include:
//!
//! - Validating the roster through a user-chosen [`TournamentStrategy`]
//! - Running games concurrently, up to [`Configuration::max_concurrent_matches`]
//! - Folding every finished game into the strategy's standings, one at a time
//! - Returning the final ranking and every game record
//!
//! # Concurrency
//!
//! Each game runs on its own tokio task and reports back to the single loop that owns the
//! scheduler and the rating table, so rating updates are applied one outcome at a time in
//! completion order.
//!
//! # Cancellation
//!
//! [`Evaluator::evaluate_until`] takes a shutdown future. Once it resolves no new game is
//! started, games already running are played to their end and recorded, and the report is
//! flagged as cancelled. Dropping the evaluation future itself aborts every running game; none of
//! them is reported.

use std::{future::Future, path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{error, info, instrument, trace, warn};

use crate::{
    agent::AgentHandle,
    configuration::Configuration,
    confrontation::Confrontation,
    constraints::Constraints,
    error::ConfigurationError,
    logger::init_logger,
    match_runner,
    outcome::Outcome,
    tournament_scheduler::TournamentScheduler,
    tournament_strategy::{RankingTable, RoundRobinTournament, TournamentStrategy},
};

type MatchReport = (Confrontation, Result<Outcome, ConfigurationError>);

/// Everything a finished (or cancelled) tournament produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Final standings, best first.
    pub ranking: RankingTable,
    /// Every finished game in completion order.
    pub outcomes: Vec<Outcome>,
    /// True if the run was stopped before every scheduled game was played.
    pub cancelled: bool,
}

impl TournamentReport {
    /// Save the report as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Load a report written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// The main type for running games and tournaments between agents.
pub struct Evaluator {
    constraints: Constraints,
    config: Configuration,
}

impl Evaluator {
    /// Create an [`Evaluator`] with given [`Constraints`] and [`Configuration`].
    ///
    /// Installs the file logger when `config` asks for it. A failure to do so is reported on
    /// stderr and does not prevent evaluation.
    #[instrument(skip_all)]
    pub fn new(constraints: Constraints, config: Configuration) -> Evaluator {
        if config.log {
            if let Err(e) = init_logger() {
                eprintln!("logging disabled: {e:#}");
            }
        }

        trace!(?config, ?constraints);

        Evaluator {
            constraints,
            config,
        }
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Plays a single game.
    ///
    /// # Errors
    /// [`ConfigurationError`] if both handles share the same id.
    pub async fn run_match(
        &self,
        black: &AgentHandle,
        white: &AgentHandle,
    ) -> Result<Outcome, ConfigurationError> {
        let outcome = match_runner::run_match(black, white, &self.constraints).await?;
        if self.config.verbose {
            print_outcome(&format!("[{} VS {}]", black.id, white.id), &outcome);
        }
        Ok(outcome)
    }

    /// Runs `tournament` over `roster` to completion.
    ///
    /// # Errors
    /// [`ConfigurationError`] when the roster or the configuration is rejected. Faults of
    /// individual agents never surface here; they are part of the game records.
    pub async fn evaluate<T: TournamentStrategy>(
        &self,
        roster: Vec<AgentHandle>,
        tournament: T,
    ) -> Result<TournamentReport, ConfigurationError> {
        self.evaluate_until(roster, tournament, std::future::pending())
            .await
    }

    /// Runs `tournament` over `roster` until it completes or `shutdown` resolves.
    ///
    /// # Errors
    /// See [`evaluate`](Self::evaluate).
    #[instrument(skip_all, fields(agents = roster.len()))]
    pub async fn evaluate_until<T, F>(
        &self,
        roster: Vec<AgentHandle>,
        mut tournament: T,
        shutdown: F,
    ) -> Result<TournamentReport, ConfigurationError>
    where
        T: TournamentStrategy,
        F: Future<Output = ()>,
    {
        if self.config.max_concurrent_matches == 0 {
            return Err(ConfigurationError::ZeroConcurrency);
        }
        info!(roster = ?roster.iter().map(|a| a.id.as_str()).collect::<Vec<_>>());
        tournament.add_agents(roster)?;

        let mut scheduler = TournamentScheduler::new(tournament, self.config.max_concurrent_matches);
        let mut tasks: JoinSet<MatchReport> = JoinSet::new();
        let mut outcomes = Vec::new();
        let mut failure: Option<ConfigurationError> = None;

        for game in scheduler.advance() {
            self.launch_match(&mut tasks, game);
        }

        tokio::pin!(shutdown);
        let mut shutdown_requested = false;

        while !scheduler.is_finished() {
            tokio::select! {
                joined = tasks.join_next() => {
                    let next = match joined {
                        None => break,
                        Some(Ok((game, Ok(outcome)))) => {
                            if self.config.verbose {
                                print_outcome(&game.to_string(), &outcome);
                            }
                            let next = scheduler.on_result(&outcome);
                            outcomes.push(outcome);
                            next
                        }
                        Some(Ok((game, Err(e)))) => {
                            error!(%game, "game rejected: {e}");
                            failure.get_or_insert(e);
                            scheduler.cancel();
                            scheduler.on_abandoned()
                        }
                        Some(Err(join_error)) => {
                            error!("game task failed: {join_error}");
                            scheduler.cancel();
                            scheduler.on_abandoned()
                        }
                    };
                    for game in next {
                        self.launch_match(&mut tasks, game);
                    }
                }
                () = &mut shutdown, if !shutdown_requested => {
                    warn!(running = scheduler.running_matches(), "shutdown requested");
                    shutdown_requested = true;
                    scheduler.cancel();
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        let cancelled = scheduler.is_cancelled();
        let ranking = scheduler.strategy().ranking();
        info!(games = outcomes.len(), cancelled, "tournament finished");
        Ok(TournamentReport {
            ranking,
            outcomes,
            cancelled,
        })
    }

    fn launch_match(&self, tasks: &mut JoinSet<MatchReport>, game: Confrontation) {
        let constraints = self.constraints;
        trace!(%game, "launching");
        tasks.spawn(async move {
            let result = match_runner::run_match(&game.black, &game.white, &constraints).await;
            (game, result)
        });
    }
}

/// One game on a `board_size` board with `time_budget` per move, Black moving first.
///
/// # Errors
/// [`ConfigurationError`] for an invalid board size, a zero budget or two handles sharing an id.
pub async fn run_match(
    black: &AgentHandle,
    white: &AgentHandle,
    board_size: usize,
    time_budget: Duration,
) -> Result<Outcome, ConfigurationError> {
    let constraints = Constraints::builder()
        .with_board_size(board_size)
        .with_action_timeout(time_budget)
        .build()?;
    match_runner::run_match(black, white, &constraints).await
}

/// Round robin with default tie breakers and ratings.
///
/// Every pair of `roster` plays `games_per_match` games with alternating colours, on a
/// `board_size` board with `time_budget` per move, at most `concurrency` games at once.
///
/// # Errors
/// [`ConfigurationError`] for an invalid board size, a zero budget, a zero concurrency limit, a
/// zero game count, fewer than two agents or duplicate ids.
pub async fn run_round_robin(
    roster: Vec<AgentHandle>,
    games_per_match: usize,
    board_size: usize,
    time_budget: Duration,
    concurrency: usize,
) -> Result<RankingTable, ConfigurationError> {
    let constraints = Constraints::builder()
        .with_board_size(board_size)
        .with_action_timeout(time_budget)
        .build()?;
    let config = Configuration::new().with_max_concurrent_matches(concurrency);
    let report = Evaluator::new(constraints, config)
        .evaluate(roster, RoundRobinTournament::new(games_per_match))
        .await?;
    Ok(report.ranking)
}

fn print_outcome(label: &str, outcome: &Outcome) {
    // red for disqualifications, green otherwise
    let colour = if outcome.result_code.is_disqualification() {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };
    println!(
        "{label}: {colour}{}\x1b[39m {} ({} moves, {:.2}s) {}",
        outcome.result_code,
        outcome.winner.as_deref().unwrap_or("-"),
        outcome.moves,
        outcome.total_time,
        outcome.reason
    );
}
