use std::fmt::Display;

use crate::agent::AgentHandle;

/// One scheduled game: who plays black, who plays white, and which game of the pairing it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confrontation {
    pub black: AgentHandle,
    pub white: AgentHandle,
    /// 0-based index among the games played by this pair.
    pub game: usize,
}

impl Confrontation {
    /// Ids ordered so that `(a, b)` and `(b, a)` give the same key.
    pub fn pair_key(&self) -> (String, String) {
        if self.black.id <= self.white.id {
            (self.black.id.clone(), self.white.id.clone())
        } else {
            (self.white.id.clone(), self.black.id.clone())
        }
    }
}

impl Display for Confrontation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} VS {} #{}]", self.black.id, self.white.id, self.game + 1)
    }
}
