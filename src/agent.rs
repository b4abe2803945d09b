use std::{fmt, hash::Hash, sync::Arc};

use crate::game_interface::Agent;

/// Roster entry: a stable id and the decision capability behind it.
///
/// Two handles are equal iff their ids are equal.
#[derive(Clone)]
pub struct AgentHandle {
    pub id: String,
    pub agent: Arc<dyn Agent>,
}

impl AgentHandle {
    pub fn new(id: impl Into<String>, agent: impl Agent + 'static) -> AgentHandle {
        AgentHandle {
            id: id.into(),
            agent: Arc::new(agent),
        }
    }

    pub fn from_arc(id: impl Into<String>, agent: Arc<dyn Agent>) -> AgentHandle {
        AgentHandle {
            id: id.into(),
            agent,
        }
    }
}

impl PartialEq for AgentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AgentHandle {}

impl Hash for AgentHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentHandle").field("id", &self.id).finish()
    }
}
