//! Tournament strategies used by the evaluator to schedule games and rank agents.
//!
//! This module defines the [`TournamentStrategy`] trait and the built-in
//! [`RoundRobinTournament`].
//!
//! # Implementing a Custom Strategy
//! The evaluator calls `add_agents`, then repeatedly calls `advance_round` and runs every
//! returned game, feeding each finished [`Outcome`] back through `record_outcome`. A round is
//! only requested once every game of the previous one has been recorded. An empty round ends the
//! tournament, after which `ranking` produces the final table.

use std::{cmp::Ordering, collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    agent::AgentHandle,
    confrontation::Confrontation,
    elo::{RatingTable, DEFAULT_RATING, K_FACTOR},
    error::ConfigurationError,
    outcome::Outcome,
};

/// A trait defining how agents are paired, and how results are folded into a ranking.
pub trait TournamentStrategy {
    /// Registers the roster.
    ///
    /// # Errors
    /// [`ConfigurationError`] when the roster cannot produce a valid tournament (too few agents,
    /// duplicate ids, ...).
    fn add_agents(&mut self, agents: Vec<AgentHandle>) -> Result<(), ConfigurationError>;

    /// Returns the games of the next round. An empty list means the tournament is finished.
    fn advance_round(&mut self) -> Vec<Confrontation>;

    /// Folds a finished game into the standings.
    fn record_outcome(&mut self, outcome: &Outcome);

    /// Current standings, best first.
    fn ranking(&self) -> RankingTable;
}

/// Secondary ordering keys applied when total points are equal.
///
/// Agent id is always used last so the order is fully deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreaker {
    /// More wins first.
    Wins,
    /// More points scored against the other agents still tied at this stage.
    HeadToHead,
    /// Higher rating first.
    Rating,
}

/// A single row of the final standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub rank: usize,
    pub agent_id: String,
    pub points: f64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
    pub rating: f64,
}

impl fmt::Display for RankingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {}: {} points ({}W-{}L-{}D), rating {:.1}",
            self.rank, self.agent_id, self.points, self.wins, self.losses, self.draws, self.rating
        )
    }
}

/// Standings sorted by rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankingTable {
    pub entries: Vec<RankingEntry>,
}

impl RankingTable {
    /// Builds the standings from `ratings`: points descending, then `tie_breakers` in order, then
    /// agent id ascending.
    pub fn from_ratings(ratings: &RatingTable, tie_breakers: &[TieBreaker]) -> Self {
        let rows: Vec<_> = ratings.entries().collect();

        // keys[i]: sort key of rows[i], extended one tie breaker at a time
        let mut keys: Vec<Vec<f64>> = rows.iter().map(|(_, e)| vec![e.points]).collect();
        for tie_breaker in tie_breakers {
            let values: Vec<f64> = (0..rows.len())
                .map(|i| match tie_breaker {
                    TieBreaker::Wins => f64::from(rows[i].1.wins),
                    TieBreaker::Rating => rows[i].1.rating,
                    TieBreaker::HeadToHead => (0..rows.len())
                        .filter(|&j| j != i && keys[j] == keys[i])
                        .map(|j| ratings.head_to_head(rows[i].0, rows[j].0))
                        .sum(),
                })
                .collect();
            for (key, value) in keys.iter_mut().zip(values) {
                key.push(value);
            }
        }

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by(|&a, &b| {
            keys[b]
                .iter()
                .zip(&keys[a])
                .map(|(kb, ka)| kb.total_cmp(ka))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
                .then_with(|| rows[a].0.cmp(rows[b].0))
        });

        let entries = order
            .into_iter()
            .enumerate()
            .map(|(position, i)| {
                let (id, entry) = rows[i];
                RankingEntry {
                    rank: position + 1,
                    agent_id: id.clone(),
                    points: entry.points,
                    wins: entry.wins,
                    losses: entry.losses,
                    draws: entry.draws,
                    games_played: entry.games_played,
                    rating: entry.rating,
                }
            })
            .collect();
        RankingTable { entries }
    }

    pub fn get(&self, agent_id: &str) -> Option<&RankingEntry> {
        self.entries.iter().find(|e| e.agent_id == agent_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for RankingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// A round-robin tournament: every agent meets every other agent `games_per_pairing` times.
///
/// Colours alternate between repetitions to cancel the first-move advantage: in repetition `g`
/// the first agent of a pair (in roster order) plays black when `g` is even.
pub struct RoundRobinTournament {
    agents: Vec<AgentHandle>,
    games_per_pairing: usize,
    k_factor: f64,
    initial_rating: f64,
    tie_breakers: Vec<TieBreaker>,
    ratings: RatingTable,
    scheduled: bool,
}

impl RoundRobinTournament {
    /// Creates a new round robin.
    ///
    /// Each pair plays `games_per_pairing` games. The number should be even for both agents of
    /// a pair to play black equally often.
    pub fn new(games_per_pairing: usize) -> Self {
        Self {
            agents: vec![],
            games_per_pairing,
            k_factor: K_FACTOR,
            initial_rating: DEFAULT_RATING,
            tie_breakers: vec![TieBreaker::Wins, TieBreaker::HeadToHead],
            ratings: RatingTable::default(),
            scheduled: false,
        }
    }

    /// Elo K-factor, 32 by default.
    pub fn with_k_factor(self, k_factor: f64) -> Self {
        Self { k_factor, ..self }
    }

    /// Rating given to every agent before its first game, 1500 by default.
    pub fn with_initial_rating(self, initial_rating: f64) -> Self {
        Self {
            initial_rating,
            ..self
        }
    }

    /// Ordering applied when points are equal. Defaults to wins, then head-to-head.
    pub fn with_tie_breakers(self, tie_breakers: Vec<TieBreaker>) -> Self {
        Self {
            tie_breakers,
            ..self
        }
    }

    /// Ratings and head-to-head scores recorded so far.
    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }

    fn schedule(&self) -> Vec<Confrontation> {
        let n = self.agents.len();
        let mut pending = vec![];
        for game in 0..self.games_per_pairing {
            for i in 0..n {
                for j in (i + 1)..n {
                    let (black, white) = if game % 2 == 0 { (i, j) } else { (j, i) };
                    pending.push(Confrontation {
                        black: self.agents[black].clone(),
                        white: self.agents[white].clone(),
                        game,
                    });
                }
            }
        }
        pending
    }
}

impl TournamentStrategy for RoundRobinTournament {
    fn add_agents(&mut self, agents: Vec<AgentHandle>) -> Result<(), ConfigurationError> {
        if self.games_per_pairing == 0 {
            return Err(ConfigurationError::ZeroGamesPerPairing);
        }
        if agents.len() < 2 {
            return Err(ConfigurationError::NotEnoughAgents(agents.len()));
        }
        let mut seen = HashSet::new();
        for agent in &agents {
            if !seen.insert(agent.id.as_str()) {
                return Err(ConfigurationError::DuplicateAgent(agent.id.clone()));
            }
        }

        let mut ratings = RatingTable::new(self.k_factor, self.initial_rating)?;
        for agent in &agents {
            ratings.register(&agent.id);
        }
        self.ratings = ratings;
        self.agents = agents;
        self.scheduled = false;
        Ok(())
    }

    fn advance_round(&mut self) -> Vec<Confrontation> {
        if self.scheduled {
            // the first and only round already ran
            return vec![];
        }
        self.scheduled = true;
        let pending = self.schedule();
        info!(
            agents = self.agents.len(),
            games = pending.len(),
            "round robin scheduled"
        );
        pending
    }

    fn record_outcome(&mut self, outcome: &Outcome) {
        self.ratings.record(outcome);
    }

    fn ranking(&self) -> RankingTable {
        RankingTable::from_ratings(&self.ratings, &self.tie_breakers)
    }
}
