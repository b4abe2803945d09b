//! Typed errors surfaced by the arena.
//!
//! Only two families exist. [`IllegalMoveError`] is produced by the board when a placement is
//! rejected, and [`ConfigurationError`] is returned synchronously by setup code before any match
//! starts. Faults raised by agents while a match is running never show up here: they are folded
//! into the match [`Outcome`](crate::outcome::Outcome).

use thiserror::Error;

use crate::board::Position;

/// A placement that the board refuses.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveError {
    /// Coordinate outside `0..board_size` on either axis.
    #[error("position {position} is outside the {board_size}x{board_size} board")]
    OutOfBounds {
        /// Offending coordinate.
        position: Position,
        /// Side length of the board.
        board_size: usize,
    },
    /// Target cell already holds a stone.
    #[error("position {position} is already occupied")]
    Occupied {
        /// Offending coordinate.
        position: Position,
    },
}

/// Invalid setup detected before a match or tournament starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Board side length outside the supported range.
    #[error("board size {size} is not supported (expected {min}..={max})")]
    BoardSize {
        /// Requested size.
        size: usize,
        /// Smallest supported size.
        min: usize,
        /// Largest supported size.
        max: usize,
    },
    /// A per-move time budget of zero.
    #[error("action timeout must be greater than zero")]
    ZeroTimeout,
    /// A pairing asked to play no games.
    #[error("at least one game per pairing is required")]
    ZeroGamesPerPairing,
    /// A concurrency limit of zero.
    #[error("at least one concurrent match is required")]
    ZeroConcurrency,
    /// Not enough agents in the roster.
    #[error("a tournament needs at least 2 agents, got {0}")]
    NotEnoughAgents(usize),
    /// Two roster entries (or both sides of a match) share the same id.
    #[error("agent id '{0}' appears more than once")]
    DuplicateAgent(String),
    /// K-factor that is negative or not finite.
    #[error("invalid K-factor {0}")]
    InvalidKFactor(f64),
    /// An environment variable could not be parsed.
    #[error("environment variable {var}={value:?} could not be parsed")]
    InvalidEnvValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },
}
