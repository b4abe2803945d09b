//! Terminal classification of a match and the record persisted for it.
//!
//! The 2-letter result codes and the field names of [`Outcome`] and [`MoveRecord`] are read by
//! downstream tooling (visualizers, statistics) and must stay stable.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::board::{Position, Stone};

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Black aligned five.
    #[serde(rename = "BW")]
    BlackWin,
    /// White aligned five.
    #[serde(rename = "WW")]
    WhiteWin,
    /// Board filled up without a line.
    #[serde(rename = "DR")]
    Draw,
    /// An agent proposed an occupied or off-board cell.
    #[serde(rename = "IM")]
    InvalidMove,
    /// An agent exceeded its per-move time budget.
    #[serde(rename = "TO")]
    Timeout,
    /// An agent failed or panicked.
    #[serde(rename = "EX")]
    Exception,
    /// Voluntary forfeit. Reserved, never produced by the match runner.
    #[serde(rename = "RS")]
    Resignation,
}

impl GameResult {
    /// Every variant, in code order.
    pub const ALL: [GameResult; 7] = [
        GameResult::BlackWin,
        GameResult::WhiteWin,
        GameResult::Draw,
        GameResult::InvalidMove,
        GameResult::Timeout,
        GameResult::Exception,
        GameResult::Resignation,
    ];

    /// Stable 2-letter code.
    pub fn code(self) -> &'static str {
        match self {
            GameResult::BlackWin => "BW",
            GameResult::WhiteWin => "WW",
            GameResult::Draw => "DR",
            GameResult::InvalidMove => "IM",
            GameResult::Timeout => "TO",
            GameResult::Exception => "EX",
            GameResult::Resignation => "RS",
        }
    }

    /// True for endings caused by an agent's own fault.
    pub fn is_disqualification(self) -> bool {
        matches!(
            self,
            GameResult::InvalidMove
                | GameResult::Timeout
                | GameResult::Exception
                | GameResult::Resignation
        )
    }

    /// Win by alignment for `stone`.
    pub fn win_for(stone: Stone) -> GameResult {
        match stone {
            Stone::Black => GameResult::BlackWin,
            Stone::White => GameResult::WhiteWin,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown result code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game result code: {0:?}")]
pub struct UnknownResultCode(pub String);

impl FromStr for GameResult {
    type Err = UnknownResultCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameResult::ALL
            .into_iter()
            .find(|result| result.code() == s)
            .ok_or_else(|| UnknownResultCode(s.to_owned()))
    }
}

/// One turn of the match log, legal or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based turn index.
    pub turn: usize,
    /// Id of the acting agent.
    pub agent: String,
    /// Side of the acting agent.
    pub player: Stone,
    /// Proposed coordinate, `None` when the agent timed out or failed.
    pub position: Option<Position>,
    /// Seconds since the match started, taken when the turn ended.
    pub timestamp: f64,
    /// Seconds the agent spent deciding.
    pub time: f64,
    /// Whether the move was committed to the board.
    pub legal: bool,
    /// Why the turn was rejected.
    pub reason: Option<String>,
    /// Agent-supplied diagnostic.
    pub diagnostic: Option<String>,
}

/// Terminal, immutable summary of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Agent playing black.
    pub black: String,
    /// Agent playing white.
    pub white: String,
    /// Winning agent, `None` on a draw.
    pub winner: Option<String>,
    /// Losing agent, `None` on a draw.
    pub loser: Option<String>,
    /// How the match ended.
    pub result_code: GameResult,
    /// Human readable explanation.
    pub reason: String,
    /// Number of committed moves.
    pub moves: usize,
    /// Wall time of the whole match in seconds.
    pub total_time: f64,
    /// Board side length.
    pub board_size: usize,
    /// Every turn, including a final rejected one.
    pub move_log: Vec<MoveRecord>,
    /// Aligned stones when the match ended by five-in-a-row.
    pub winning_sequence: Vec<Position>,
    /// Board at the end of the match, one string per row.
    pub final_board: Vec<String>,
}

impl Outcome {
    /// Side won by `agent_id`, if any.
    pub fn is_winner(&self, agent_id: &str) -> bool {
        self.winner.as_deref() == Some(agent_id)
    }

    /// Points earned by `agent_id`: 1 for a win, 0.5 for a draw, 0 otherwise.
    pub fn points_for(&self, agent_id: &str) -> f64 {
        match &self.winner {
            None => 0.5,
            Some(winner) if winner == agent_id => 1.0,
            Some(_) => 0.0,
        }
    }

    /// JSON form of this outcome.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
