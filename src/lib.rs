//! # Gomoku Arena
//!
//! An engine for pitting gomoku (five in a row) agents against each other, from a single game
//! up to a full round-robin tournament with Elo ratings.
//!
//! It provides:
//! - The board model: an immutable [`GameState`](crate::board::GameState) with move validation and
//!   win detection
//! - A referee running one game between two [`Agent`](crate::game_interface::Agent)s, with a
//!   per-move time budget and a structured [`Outcome`](crate::outcome::Outcome)
//! - Tournament logic via the [`TournamentStrategy`](crate::tournament_strategy::TournamentStrategy)
//!   trait, with the built-in [`RoundRobinTournament`](crate::tournament_strategy::RoundRobinTournament)
//! - Concurrent execution of a tournament's games through the [`Evaluator`](crate::server::Evaluator)
//!
//! Agents run in-process as async tasks. A decision that exceeds its budget is aborted and the
//! game is awarded to the opponent; an agent returning an error or panicking loses the same way.
//!
//! # Documentation Overview
//!
//! - For the rules of a game (board size, time budget, first player), see [`constraints`].
//! - For evaluator behavior (concurrency, verbosity, log file), see
//!   [`Configuration`](crate::configuration::Configuration).
//! - Result codes and game records are described in [`outcome`].
//! - Rating and standings are computed in [`elo`] and [`tournament_strategy`].
//!
//! # Usage Example
//!
//! ```no_run
//! use std::time::Duration;
//! use gomoku_arena::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let constraints = ConstraintsBuilder::new()
//!         .with_board_size(8)
//!         .with_action_timeout(Duration::from_millis(200))
//!         .build()?;
//!     let config = Configuration::new().with_max_concurrent_matches(4);
//!
//!     let roster = vec![
//!         AgentHandle::new("alice", SimpleAgent::new()),
//!         AgentHandle::new("bob", SimpleAgent::new()),
//!         AgentHandle::new("carol", SimpleAgent::new()),
//!     ];
//!
//!     let evaluator = Evaluator::new(constraints, config);
//!     let report = evaluator.evaluate(roster, RoundRobinTournament::new(2)).await?;
//!     print!("{}", report.ranking);
//!     Ok(())
//! }
//! ```
//!
//! # Example Agent
//!
//! ```
//! use gomoku_arena::prelude::*;
//!
//! struct FirstFree;
//!
//! #[async_trait::async_trait]
//! impl Agent for FirstFree {
//!     async fn decide(&self, state: GameState) -> anyhow::Result<Decision> {
//!         let position = state
//!             .legal_moves()
//!             .first()
//!             .copied()
//!             .ok_or_else(|| anyhow::anyhow!("board is full"))?;
//!         Ok(Decision::from(position))
//!     }
//! }
//! ```

pub mod agent;
pub mod agents;
pub mod board;
pub mod configuration;
pub mod confrontation;
pub mod constraints;
pub mod elo;
pub mod error;
pub mod game_interface;
mod logger;
pub mod match_runner;
pub mod outcome;
pub mod server;
mod tournament_scheduler;
pub mod tournament_strategy;

pub use anyhow;

/// Commonly used types and traits for quick access.
///
/// ```rust
/// use gomoku_arena::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::AgentHandle;
    pub use crate::agents::{ScriptedAgent, SimpleAgent};
    pub use crate::board::{GameState, Position, Stone};
    pub use crate::configuration::Configuration;
    pub use crate::constraints::{Constraints, ConstraintsBuilder};
    pub use crate::error::{ConfigurationError, IllegalMoveError};
    pub use crate::game_interface::{Agent, Decision};
    pub use crate::outcome::{GameResult, Outcome};
    pub use crate::server::{run_match, run_round_robin, Evaluator, TournamentReport};
    pub use crate::tournament_strategy::*;
}
