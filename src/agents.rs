//! Built-in agents.
//!
//! - [`SimpleAgent`]: takes the centre when it is free, otherwise a random empty cell.
//! - [`ScriptedAgent`]: replays a fixed list of coordinates.

use std::sync::Mutex;

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    board::{GameState, Position},
    game_interface::{Agent, Decision},
};

/// Centre first, then uniformly random among legal cells.
pub struct SimpleAgent {
    rng: Mutex<StdRng>,
}

impl SimpleAgent {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence of choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SimpleAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for SimpleAgent {
    async fn decide(&self, state: GameState) -> anyhow::Result<Decision> {
        let center = (state.board_size() / 2) as i32;
        let center = Position::new(center, center);
        if state.is_valid_move(center) {
            return Ok(Decision::from(center).with_diagnostic("center"));
        }

        let legal = state.legal_moves();
        let mut rng = self.rng.lock().map_err(|_| anyhow!("rng lock poisoned"))?;
        let choice = legal
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| anyhow!("no legal move left"))?;
        Ok(Decision::from(choice).with_diagnostic("random"))
    }
}

/// Plays its list of coordinates in order.
///
/// The next entry is picked from the number of stones this side already has on the board, so the
/// agent holds no per-game state and one handle can be reused across games. Running out of
/// entries is reported as an error.
pub struct ScriptedAgent {
    script: Vec<Position>,
}

impl ScriptedAgent {
    pub fn new(script: Vec<(i32, i32)>) -> Self {
        Self {
            script: script.into_iter().map(Position::from).collect(),
        }
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn decide(&self, state: GameState) -> anyhow::Result<Decision> {
        let me = state.current_player();
        let played = state.history().iter().filter(|m| m.player == me).count();
        match self.script.get(played) {
            Some(&position) => Ok(Decision::from(position)),
            None => bail!("script exhausted after {played} moves"),
        }
    }
}
