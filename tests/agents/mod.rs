#![allow(dead_code)]

use std::time::Duration;

use gomoku_arena::prelude::*;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

/// Routes arena events through the test harness, so they are shown for failing tests only.
pub fn init_test_logger() {
    let format = fmt::format()
        .without_time()
        .with_level(true)
        .with_target(false)
        .with_thread_ids(true);

    let _ = Registry::default()
        .with(
            fmt::layer()
                .event_format(format)
                .with_test_writer()
                .with_filter(LevelFilter::DEBUG),
        )
        .try_init();
}

/// Never answers in time.
pub struct Sleepy;

#[async_trait::async_trait]
impl Agent for Sleepy {
    async fn decide(&self, _state: GameState) -> anyhow::Result<Decision> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Decision::new(0, 0))
    }
}

/// Blocks its thread for the given duration before playing the first empty cell.
pub struct Blocking(pub Duration);

#[async_trait::async_trait]
impl Agent for Blocking {
    async fn decide(&self, state: GameState) -> anyhow::Result<Decision> {
        std::thread::sleep(self.0);
        let position = state
            .legal_moves()
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("board is full"))?;
        Ok(Decision::from(position))
    }
}

/// Plays on top of the opponent's last stone, or in the corner when the board is empty.
pub struct Occupier;

#[async_trait::async_trait]
impl Agent for Occupier {
    async fn decide(&self, state: GameState) -> anyhow::Result<Decision> {
        Ok(match state.last_move() {
            Some(m) => Decision::from(m.position),
            None => Decision::new(0, 0),
        })
    }
}

/// Always fails with a multi-line error.
pub struct Failing;

#[async_trait::async_trait]
impl Agent for Failing {
    async fn decide(&self, _state: GameState) -> anyhow::Result<Decision> {
        anyhow::bail!("connection refused\n  at agent::network::connect\n  at agent::decide")
    }
}

/// Panics on every call.
pub struct Panicking;

#[async_trait::async_trait]
impl Agent for Panicking {
    async fn decide(&self, _state: GameState) -> anyhow::Result<Decision> {
        panic!("agent crashed")
    }
}

/// Plays the first empty cell in row-major order.
pub struct FirstFree;

#[async_trait::async_trait]
impl Agent for FirstFree {
    async fn decide(&self, state: GameState) -> anyhow::Result<Decision> {
        let position = state
            .legal_moves()
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("board is full"))?;
        Ok(Decision::from(position).with_diagnostic("first free"))
    }
}

/// Cells of a full `size`x`size` board that never contains five in a row, split by colour.
///
/// Stones come in horizontal pairs whose colour flips every row and every pair:
/// `XXOOXX` / `OOXXOO` / ...
pub fn draw_scripts(size: i32) -> (Vec<(i32, i32)>, Vec<(i32, i32)>) {
    let mut black = vec![];
    let mut white = vec![];
    for row in 0..size {
        for col in 0..size {
            if (col / 2 + row) % 2 == 0 {
                black.push((row, col));
            } else {
                white.push((row, col));
            }
        }
    }
    (black, white)
}

pub fn handle(id: &str, agent: impl Agent + 'static) -> AgentHandle {
    AgentHandle::new(id, agent)
}
