//! Elector entities and identity value objects

use serde::{Deserialize, Serialize};

/// Stable identity of an elector (Value Object)
///
/// A dense, 0-based index into the roster. Ids are assigned once when the
/// roster is built and never change for the life of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(usize);

impl AgentId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this elector in the roster
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for AgentId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A participant in the election (Entity)
///
/// `background` is opaque profile data handed to the decision interface
/// untouched; the coordination core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elector {
    pub id: AgentId,
    pub name: String,
    pub background: String,
}

impl Elector {
    pub fn new(id: AgentId, name: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            background: background.into(),
        }
    }

    /// The `(id, name)` pair shown on candidate listings
    pub fn as_candidate(&self) -> Candidate {
        Candidate {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Entry on a candidate listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: AgentId,
    pub name: String,
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.name)
    }
}
