//! Elo rating calculation and standings tracking

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ConfigurationError, outcome::GameResult, outcome::Outcome};

/// Default starting Elo for new agents
pub const DEFAULT_RATING: f64 = 1500.0;

/// K-factor for Elo updates (higher = more volatile)
pub const K_FACTOR: f64 = 32.0;

/// Expected score of a player rated `rating` against one rated `opponent`
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
}

/// Per-agent standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub rating: f64,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// 1 per win, 0.5 per draw
    pub points: f64,
}

impl RatingEntry {
    fn new(rating: f64) -> Self {
        Self {
            rating,
            games_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            points: 0.0,
        }
    }
}

/// Rating change caused by one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub black: String,
    pub white: String,
    pub result_code: GameResult,
    pub black_change: f64,
    pub white_change: f64,
}

/// Ratings, standings and head-to-head scores of every registered agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingTable {
    k_factor: f64,
    initial_rating: f64,
    entries: BTreeMap<String, RatingEntry>,
    /// `head_to_head[a][b]`: points scored by `a` in games against `b`
    head_to_head: BTreeMap<String, BTreeMap<String, f64>>,
    history: Vec<RatingChange>,
}

impl Default for RatingTable {
    fn default() -> Self {
        Self {
            k_factor: K_FACTOR,
            initial_rating: DEFAULT_RATING,
            entries: BTreeMap::new(),
            head_to_head: BTreeMap::new(),
            history: Vec::new(),
        }
    }
}

impl RatingTable {
    pub fn new(k_factor: f64, initial_rating: f64) -> Result<Self, ConfigurationError> {
        if !k_factor.is_finite() || k_factor < 0.0 {
            return Err(ConfigurationError::InvalidKFactor(k_factor));
        }
        Ok(Self {
            k_factor,
            initial_rating,
            ..Self::default()
        })
    }

    /// Add an agent at the initial rating. No-op if already present.
    pub fn register(&mut self, agent: &str) {
        let initial = self.initial_rating;
        self.entries
            .entry(agent.to_owned())
            .or_insert_with(|| RatingEntry::new(initial));
    }

    pub fn entry(&self, agent: &str) -> Option<&RatingEntry> {
        self.entries.get(agent)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &RatingEntry)> {
        self.entries.iter()
    }

    pub fn rating(&self, agent: &str) -> f64 {
        self.entries
            .get(agent)
            .map_or(self.initial_rating, |e| e.rating)
    }

    /// Points `agent` scored in games against `opponent`
    pub fn head_to_head(&self, agent: &str, opponent: &str) -> f64 {
        self.head_to_head
            .get(agent)
            .and_then(|scores| scores.get(opponent))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn history(&self) -> &[RatingChange] {
        &self.history
    }

    /// Fold a finished game into the table.
    ///
    /// Both new ratings are computed from the ratings held before the game, then every field is
    /// written in one step.
    pub fn record(&mut self, outcome: &Outcome) {
        let (black, white) = (outcome.black.as_str(), outcome.white.as_str());
        let (black_rating, white_rating) = (self.rating(black), self.rating(white));
        let (black_score, white_score) = (outcome.points_for(black), outcome.points_for(white));

        let black_change = self.k_factor * (black_score - expected_score(black_rating, white_rating));
        let white_change = self.k_factor * (white_score - expected_score(white_rating, black_rating));

        self.register(black);
        self.register(white);
        for (agent, opponent, score, change) in [
            (black, white, black_score, black_change),
            (white, black, white_score, white_change),
        ] {
            if let Some(entry) = self.entries.get_mut(agent) {
                entry.rating += change;
                entry.games_played += 1;
                entry.points += score;
                match outcome.winner.as_deref() {
                    None => entry.draws += 1,
                    Some(winner) if winner == agent => entry.wins += 1,
                    Some(_) => entry.losses += 1,
                }
            }
            *self
                .head_to_head
                .entry(agent.to_owned())
                .or_default()
                .entry(opponent.to_owned())
                .or_default() += score;
        }

        debug!(black, white, black_change, white_change, "ratings updated");
        self.history.push(RatingChange {
            black: black.to_owned(),
            white: white.to_owned(),
            result_code: outcome.result_code,
            black_change,
            white_change,
        });
    }
}
