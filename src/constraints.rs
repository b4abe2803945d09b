//! Rules applied to every match.
//!
//! [`ConstraintsBuilder`] configures the board size, the per-move time budget and which side
//! moves first. Once built, a [`Constraints`] value is handed to the
//! [`Evaluator`](crate::server::Evaluator) or to [`run_match`](crate::match_runner::run_match).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use gomoku_arena::constraints::ConstraintsBuilder;
//!
//! let constraints = ConstraintsBuilder::new()
//!     .with_board_size(15)
//!     .with_action_timeout(Duration::from_millis(500))
//!     .build()
//!     .unwrap();
//! assert_eq!(constraints.board_size(), 15);
//! ```
//!
//! Constraints can also be read from environment variables with
//! [`ConstraintsBuilder::from_env()`].

use std::{env, time::Duration};

use crate::{
    board::{check_board_size, Stone, DEFAULT_BOARD_SIZE},
    error::ConfigurationError,
};

/// Per-move time budget used when none is configured.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// A builder for the rules of a match.
///
/// Unset values fall back to an 8x8 board, a 30 second budget per move and Black moving first.
#[derive(Debug, Default, Clone)]
pub struct ConstraintsBuilder {
    board_size: Option<usize>,
    action_time: Option<Duration>,
    first_player: Option<Stone>,
    env_error: Option<ConfigurationError>,
}

impl ConstraintsBuilder {
    /// Creates a builder with every value unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder configured from environment variables.
    ///
    /// Read environment variables are:
    /// - `BOARD_SIZE` (usize): board side length
    /// - `ACTION_TIMEOUT_MS` (u64): per-move time budget in milliseconds
    /// - `FIRST_PLAYER` (`black` or `white`): side moving first
    ///
    /// A variable that is set but cannot be parsed makes [`build`](Self::build) fail.
    #[must_use]
    pub fn from_env() -> Self {
        let mut builder = Self::default();

        match parse_var::<usize>("BOARD_SIZE") {
            Ok(value) => builder.board_size = value,
            Err(e) => builder.env_error = Some(e),
        }
        match parse_var::<u64>("ACTION_TIMEOUT_MS") {
            Ok(value) => builder.action_time = value.map(Duration::from_millis),
            Err(e) => builder.env_error = Some(e),
        }
        if let Ok(value) = env::var("FIRST_PLAYER") {
            if value.eq_ignore_ascii_case("black") {
                builder.first_player = Some(Stone::Black);
            } else if value.eq_ignore_ascii_case("white") {
                builder.first_player = Some(Stone::White);
            } else {
                builder.env_error = Some(ConfigurationError::InvalidEnvValue {
                    var: "FIRST_PLAYER",
                    value,
                });
            }
        }

        builder
    }

    /// Sets the board side length.
    #[must_use]
    pub fn with_board_size(self, size: usize) -> Self {
        Self {
            board_size: Some(size),
            ..self
        }
    }

    /// Sets the maximum duration an agent may spend on a single move.
    #[must_use]
    pub fn with_action_timeout(self, duration: Duration) -> Self {
        Self {
            action_time: Some(duration),
            ..self
        }
    }

    /// Sets the side moving first.
    #[must_use]
    pub fn with_first_player(self, stone: Stone) -> Self {
        Self {
            first_player: Some(stone),
            ..self
        }
    }

    /// Consumes the builder and returns the constructed `Constraints`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the board size is out of range, the timeout is zero,
    /// or an environment variable read by [`from_env`](Self::from_env) was malformed.
    pub fn build(self) -> Result<Constraints, ConfigurationError> {
        if let Some(e) = self.env_error {
            return Err(e);
        }

        let board_size = self.board_size.unwrap_or(DEFAULT_BOARD_SIZE);
        check_board_size(board_size)?;

        let action_time = self.action_time.unwrap_or(DEFAULT_ACTION_TIMEOUT);
        if action_time.is_zero() {
            return Err(ConfigurationError::ZeroTimeout);
        }

        Ok(Constraints {
            board_size,
            action_time,
            first_player: self.first_player.unwrap_or(Stone::Black),
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigurationError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigurationError::InvalidEnvValue { var, value }),
        Err(_) => Ok(None),
    }
}

/// Obtained using `ConstraintsBuilder`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraints {
    pub(crate) board_size: usize,
    pub(crate) action_time: Duration,
    pub(crate) first_player: Stone,
}

impl Constraints {
    /// create a ConstraintsBuilder
    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder::new()
    }

    /// Board side length.
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Per-move time budget.
    pub fn action_timeout(&self) -> Duration {
        self.action_time
    }

    /// Side moving first.
    pub fn first_player(&self) -> Stone {
        self.first_player
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            board_size: DEFAULT_BOARD_SIZE,
            action_time: DEFAULT_ACTION_TIMEOUT,
            first_player: Stone::Black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let constraints = ConstraintsBuilder::new().build().unwrap();
        assert_eq!(constraints, Constraints::default());
        assert_eq!(constraints.board_size(), 8);
        assert_eq!(constraints.action_timeout(), Duration::from_secs(30));
        assert_eq!(constraints.first_player(), Stone::Black);
    }

    #[test]
    fn test_rejects_bad_board_size() {
        let err = Constraints::builder().with_board_size(3).build().unwrap_err();
        assert!(matches!(err, ConfigurationError::BoardSize { size: 3, .. }));
        assert!(Constraints::builder().with_board_size(40).build().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = Constraints::builder()
            .with_action_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::ZeroTimeout);
    }

    #[test]
    fn test_builder_chain() {
        let constraints = Constraints::builder()
            .with_board_size(19)
            .with_action_timeout(Duration::from_millis(250))
            .with_first_player(Stone::White)
            .build()
            .unwrap();
        assert_eq!(constraints.board_size(), 19);
        assert_eq!(constraints.action_timeout(), Duration::from_millis(250));
        assert_eq!(constraints.first_player(), Stone::White);
    }
}
