//! Elector decision port
//!
//! Defines the capability set every participant must provide. The
//! coordination core depends only on this trait; LLM-backed and scripted
//! electors live in the infrastructure layer.

use async_trait::async_trait;
use conclave_domain::{
    AgentId, BallotRound, Candidate, DiscussionLedger, DiscussionView, ElectionRule, Roster,
    UrgencyScore,
};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors an individual elector decision can produce
///
/// Every variant except [`DecisionError::ChannelUnavailable`] is isolated to
/// the failing elector's contribution for the current round.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Malformed decision: {0}")]
    Malformed(String),

    #[error("Vote for unknown candidate {0}")]
    InvalidCandidate(usize),

    #[error("Decision timed out after {0:?}")]
    Timeout(Duration),

    #[error("Decision task panicked: {0}")]
    Panicked(String),

    #[error("Decision channel unavailable: {0}")]
    ChannelUnavailable(String),
}

impl DecisionError {
    /// Whether the error means no further decisions can be obtained at all
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecisionError::ChannelUnavailable(_))
    }
}

/// A vote and the reasoning behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteDecision {
    pub candidate: AgentId,
    pub reasoning: String,
}

impl VoteDecision {
    pub fn new(candidate: AgentId, reasoning: impl Into<String>) -> Self {
        Self {
            candidate,
            reasoning: reasoning.into(),
        }
    }
}

/// Read-only view of the election handed to every decision call
///
/// Taken once before a round fans out, so every elector in a round sees the
/// same state and none of them can observe a partially completed round.
#[derive(Debug, Clone)]
pub struct ElectionSnapshot {
    roster: Arc<Roster>,
    ballots: Arc<[BallotRound]>,
    discussion: Arc<DiscussionLedger>,
    rule: ElectionRule,
}

impl ElectionSnapshot {
    pub fn new(
        roster: Arc<Roster>,
        ballots: Vec<BallotRound>,
        discussion: DiscussionLedger,
        rule: ElectionRule,
    ) -> Self {
        Self {
            roster,
            ballots: ballots.into(),
            discussion: Arc::new(discussion),
            rule,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn population(&self) -> usize {
        self.roster.len()
    }

    pub fn rule(&self) -> ElectionRule {
        self.rule
    }

    /// Completed voting rounds, oldest first
    pub fn ballots(&self) -> &[BallotRound] {
        &self.ballots
    }

    pub fn last_ballot(&self) -> Option<&BallotRound> {
        self.ballots.last()
    }

    /// Number of the voting round that comes next (1-indexed)
    pub fn next_voting_round(&self) -> usize {
        self.ballots.len() + 1
    }

    /// Number of completed discussion rounds
    pub fn discussion_rounds(&self) -> usize {
        self.discussion.len()
    }

    /// Discussion history visible to `agent`
    pub fn discussion_for(&self, agent: AgentId) -> DiscussionView {
        self.discussion.view(Some(agent))
    }

    /// Unfiltered discussion history
    pub fn full_discussion(&self) -> DiscussionView {
        self.discussion.view(None)
    }

    /// Candidate listing, shuffled per call when `randomize` is set
    pub fn candidates(&self, randomize: bool) -> Vec<Candidate> {
        let mut listing = self.roster.candidates();
        if randomize {
            listing.shuffle(&mut rand::thread_rng());
        }
        listing
    }
}

/// A participant's decision interface
///
/// Implementations may keep private state (for example their own vote
/// history) but must never need mutable access to the environment.
#[async_trait]
pub trait ElectorAgent: Send + Sync {
    /// Roster id of this elector
    fn id(&self) -> AgentId;

    /// Choose a candidate
    async fn cast_vote(&self, snapshot: &ElectionSnapshot) -> Result<VoteDecision, DecisionError>;

    /// Report how urgently this elector wants to speak (1..=100)
    async fn speaking_urgency(
        &self,
        snapshot: &ElectionSnapshot,
    ) -> Result<UrgencyScore, DecisionError>;

    /// Contribute to a discussion round
    ///
    /// `urgency` carries the score collected during speaker selection, if
    /// the urgency policy was used. `Ok(None)` means no contribution.
    async fn discuss(
        &self,
        snapshot: &ElectionSnapshot,
        urgency: Option<&UrgencyScore>,
    ) -> Result<Option<String>, DecisionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{DiscussionEntry, VoteTally};

    fn snapshot() -> ElectionSnapshot {
        let roster = Arc::new(Roster::from_entries([("A", ""), ("B", ""), ("C", "")]));
        let mut discussion = DiscussionLedger::new();
        discussion.record_round(vec![DiscussionEntry::new(AgentId::new(1), "hi")]);
        let ballot = BallotRound::evaluate(
            1,
            VoteTally::from_votes([AgentId::new(0)]),
            3,
            ElectionRule::Supermajority,
        );
        ElectionSnapshot::new(roster, vec![ballot], discussion, ElectionRule::Supermajority)
    }

    #[test]
    fn test_only_channel_unavailable_is_fatal() {
        assert!(DecisionError::ChannelUnavailable("no credits".into()).is_fatal());
        assert!(!DecisionError::Gateway("500".into()).is_fatal());
        assert!(!DecisionError::InvalidCandidate(9).is_fatal());
        assert!(!DecisionError::Timeout(Duration::from_secs(1)).is_fatal());
    }

    #[test]
    fn test_snapshot_round_numbers() {
        let snapshot = snapshot();
        assert_eq!(snapshot.population(), 3);
        assert_eq!(snapshot.next_voting_round(), 2);
        assert_eq!(snapshot.discussion_rounds(), 1);
        assert_eq!(snapshot.last_ballot().unwrap().round, 1);
    }

    #[test]
    fn test_snapshot_filters_discussion() {
        let snapshot = snapshot();
        assert!(snapshot.discussion_for(AgentId::new(0)).is_empty());
        assert_eq!(snapshot.discussion_for(AgentId::new(1)).entry_count(), 1);
        assert_eq!(snapshot.full_discussion().entry_count(), 1);
    }

    #[test]
    fn test_snapshot_candidates() {
        let snapshot = snapshot();
        let ordered: Vec<_> = snapshot.candidates(false).iter().map(|c| c.id.index()).collect();
        assert_eq!(ordered, vec![0, 1, 2]);

        let mut shuffled: Vec<_> = snapshot.candidates(true).iter().map(|c| c.id.index()).collect();
        shuffled.sort_unstable();
        assert_eq!(shuffled, vec![0, 1, 2]);
    }
}
