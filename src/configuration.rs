//! Config for the evaluator behaviors
//!
//! This module provides configuration options for controlling the behavior of the
//! [`Evaluator`](crate::server::Evaluator). Rules of the games themselves live in
//! [`Constraints`](crate::constraints::Constraints).
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Boolean flags are case-insensitive, set them to `"true"` to enable.
//!
//! - `ARENA_VERBOSE`: Print one line per finished game (default: `false`)
//! - `ARENA_LOG`: Enable logging to a file (default: `false`)
//! - `ARENA_CONCURRENCY`: Maximum number of games running at once (default: physical CPU count)

use crate::error::ConfigurationError;

/// Configuration for evaluator behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) max_concurrent_matches: usize,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Nothing is printed to stdout.
    /// - Logging to file is disabled.
    /// - As many games run at once as there are physical CPUs.
    pub fn new() -> Self {
        Self {
            verbose: false,
            log: false,
            max_concurrent_matches: num_cpus::get_physical().max(1),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Unset variables keep their default value.
    ///
    /// # Errors
    /// [`ConfigurationError`] when `ARENA_CONCURRENCY` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        let defaults = Self::new();
        let max_concurrent_matches = match std::env::var("ARENA_CONCURRENCY") {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(0) => return Err(ConfigurationError::ZeroConcurrency),
                Ok(n) => n,
                Err(_) => {
                    return Err(ConfigurationError::InvalidEnvValue {
                        var: "ARENA_CONCURRENCY",
                        value,
                    })
                }
            },
            Err(_) => defaults.max_concurrent_matches,
        };

        Ok(Self {
            verbose: get_env_flag("ARENA_VERBOSE", defaults.verbose),
            log: get_env_flag("ARENA_LOG", defaults.log),
            max_concurrent_matches,
        })
    }

    /// Enable or disable progress output.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Maximum number of games running at the same time.
    ///
    /// `1` plays every game sequentially. Zero is rejected when the evaluator starts.
    pub fn with_max_concurrent_matches(mut self, value: usize) -> Self {
        self.max_concurrent_matches = value;
        self
    }

    /// Maximum number of games running at the same time.
    pub fn max_concurrent_matches(&self) -> usize {
        self.max_concurrent_matches
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
