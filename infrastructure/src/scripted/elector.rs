//! Offline, deterministic elector
//!
//! Used for demos and tests where no LLM is available. A scripted elector
//! votes for its configured candidate, otherwise for the leader of the
//! previous ballot, and for itself in the first round.

use crate::roster::{LoadedRoster, RosterEntry};
use async_trait::async_trait;
use conclave_application::{DecisionError, ElectionSnapshot, ElectorAgent, VoteDecision};
use conclave_domain::{AgentId, UrgencyScore};
use std::sync::Arc;

const DEFAULT_URGENCY: i64 = 50;

/// Elector driven by fixed roster settings
#[derive(Debug, Clone)]
pub struct ScriptedElector {
    id: AgentId,
    name: String,
    vote_for: Option<AgentId>,
    urgency: i64,
}

impl ScriptedElector {
    pub fn new(id: AgentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vote_for: None,
            urgency: DEFAULT_URGENCY,
        }
    }

    pub fn with_vote_for(mut self, candidate: Option<AgentId>) -> Self {
        self.vote_for = candidate;
        self
    }

    pub fn with_urgency(mut self, urgency: i64) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn from_entry(id: AgentId, entry: &RosterEntry) -> Self {
        Self::new(id, entry.name.trim())
            .with_vote_for(entry.vote_for.map(AgentId::new))
            .with_urgency(entry.urgency.unwrap_or(DEFAULT_URGENCY))
    }

    /// One scripted elector per roster entry, in id order
    pub fn for_roster(loaded: &LoadedRoster) -> Vec<Arc<dyn ElectorAgent>> {
        loaded
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                Arc::new(Self::from_entry(AgentId::new(i), entry)) as Arc<dyn ElectorAgent>
            })
            .collect()
    }

    fn preferred(&self, snapshot: &ElectionSnapshot) -> AgentId {
        self.vote_for
            .or_else(|| {
                snapshot
                    .last_ballot()
                    .and_then(|ballot| ballot.leader.as_ref())
                    .map(|leader| leader.candidate)
            })
            .unwrap_or(self.id)
    }
}

#[async_trait]
impl ElectorAgent for ScriptedElector {
    fn id(&self) -> AgentId {
        self.id
    }

    async fn cast_vote(&self, snapshot: &ElectionSnapshot) -> Result<VoteDecision, DecisionError> {
        let candidate = self.preferred(snapshot);
        let reasoning = match (self.vote_for, snapshot.last_ballot()) {
            (Some(_), _) => "Standing by my chosen candidate".to_string(),
            (None, Some(ballot)) => format!("Following the leader of round {}", ballot.round),
            (None, None) => "No ballots yet; voting my own conscience".to_string(),
        };
        Ok(VoteDecision::new(candidate, reasoning))
    }

    async fn speaking_urgency(
        &self,
        _snapshot: &ElectionSnapshot,
    ) -> Result<UrgencyScore, DecisionError> {
        Ok(UrgencyScore::new(self.id, self.urgency, "Scripted urgency"))
    }

    async fn discuss(
        &self,
        snapshot: &ElectionSnapshot,
        _urgency: Option<&UrgencyScore>,
    ) -> Result<Option<String>, DecisionError> {
        let candidate = self.preferred(snapshot);
        let message = if candidate == self.id {
            format!("{} asks the conclave to consider their own candidacy.", self.name)
        } else {
            format!(
                "{} urges the conclave to unite behind {}.",
                self.name,
                snapshot.roster().name_of(candidate)
            )
        };
        Ok(Some(message))
    }
}
