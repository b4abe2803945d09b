//! Module defining the trait an agent has to implement to enter the arena

use async_trait::async_trait;

use crate::board::{GameState, Position};

/// A decision-making unit.
///
/// The arena calls [`decide`](Agent::decide) once per turn with a private copy of the game
/// state. The call runs on its own task under the per-move time budget: when the budget expires
/// the task is aborted, so an implementation should reach an `.await` point regularly (or move
/// heavy work to `spawn_blocking`) for cancellation to take effect.
/// An answer that arrives after the budget is rejected as a timeout, even when a blocked thread kept
/// the timer from firing.
///
/// Implementations take `&self` and may be shared by several matches running at the same time.
/// Per-game state, if any, has to live behind interior mutability.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Propose the next placement for `state.current_player()`.
    ///
    /// # Error
    /// Any error ends the match with an `EXCEPTION` result in the opponent's favour. Only the
    /// top-level message of the error is kept in the match log.
    async fn decide(&self, state: GameState) -> anyhow::Result<Decision>;
}

/// Candidate returned by an agent, with an optional free-form diagnostic (reasoning trace,
/// evaluation, ...) stored alongside the move in the match log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Proposed coordinate. Not validated yet.
    pub position: Position,
    /// Attached to the move record as-is.
    pub diagnostic: Option<String>,
}

impl Decision {
    /// Candidate without diagnostic.
    pub fn new(row: i32, col: i32) -> Self {
        Self {
            position: Position::new(row, col),
            diagnostic: None,
        }
    }

    /// Attach a diagnostic payload.
    pub fn with_diagnostic(self, diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
            ..self
        }
    }
}

impl From<Position> for Decision {
    fn from(position: Position) -> Self {
        Self {
            position,
            diagnostic: None,
        }
    }
}

impl From<(i32, i32)> for Decision {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}
