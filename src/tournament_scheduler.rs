use std::collections::VecDeque;

use tracing::{info, trace};

use crate::confrontation::Confrontation;
use crate::outcome::Outcome;
use crate::tournament_strategy::TournamentStrategy;

/// Bookkeeping between a [`TournamentStrategy`] and the tasks running its games.
///
/// At most `max_running` games are handed out at once. Rounds are requested from the strategy
/// only once every game of the previous round has reported back.
pub struct TournamentScheduler<S: TournamentStrategy> {
    pending_matches: VecDeque<Confrontation>,
    strategy: S,
    running_matches: usize,
    max_running: usize,
    is_finished: bool,
    cancelled: bool,
}

impl<S: TournamentStrategy> TournamentScheduler<S> {
    pub fn new(strategy: S, max_running: usize) -> Self {
        TournamentScheduler {
            pending_matches: VecDeque::new(),
            strategy,
            running_matches: 0,
            max_running: max_running.max(1),
            is_finished: false,
            cancelled: false,
        }
    }

    /// Games to launch now.
    pub fn advance(&mut self) -> Vec<Confrontation> {
        // Generate new round if needed
        if self.running_matches == 0 && self.pending_matches.is_empty() && !self.is_finished {
            if self.cancelled {
                self.is_finished = true;
                return vec![];
            }
            trace!("next round");
            self.pending_matches = self.strategy.advance_round().into();

            if self.pending_matches.is_empty() {
                // no more matches from `strategy`
                trace!("no more matches");
                self.is_finished = true;
            }
        }

        let free = self.max_running.saturating_sub(self.running_matches);
        let take = free.min(self.pending_matches.len());
        let matches_to_run: Vec<_> = self.pending_matches.drain(..take).collect();
        self.running_matches += matches_to_run.len();
        matches_to_run
    }

    /// Records a finished game and returns the games that can start in its place.
    pub fn on_result(&mut self, outcome: &Outcome) -> Vec<Confrontation> {
        self.strategy.record_outcome(outcome);
        self.running_matches = self.running_matches.saturating_sub(1);
        self.advance()
    }

    /// Frees the slot of a game that ended without an outcome.
    pub fn on_abandoned(&mut self) -> Vec<Confrontation> {
        self.running_matches = self.running_matches.saturating_sub(1);
        self.advance()
    }

    /// Drops every game not started yet. Running games still report through
    /// [`on_result`](Self::on_result).
    pub fn cancel(&mut self) {
        if !self.cancelled {
            info!(
                dropped = self.pending_matches.len(),
                running = self.running_matches,
                "tournament cancelled"
            );
        }
        self.cancelled = true;
        self.pending_matches.clear();
        if self.running_matches == 0 {
            self.is_finished = true;
        }
    }

    /// All tournament matches ran and finished
    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn running_matches(&self) -> usize {
        self.running_matches
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn into_strategy(self) -> S {
        self.strategy
    }
}
