//! Round stages and structured round events
//!
//! The environment emits these instead of printing; rendering is left to
//! whichever observers are attached.

use crate::ballot::BallotRound;
use crate::discussion::DiscussionEntry;
use crate::elector::AgentId;
use crate::speaker::{SpeakerPolicy, SpeakerSlate};
use serde::{Deserialize, Serialize};

/// Kind of concurrent fan-out within a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStage {
    /// Every elector casts a vote
    Voting,
    /// Every elector reports speaking urgency
    Urgency,
    /// Selected speakers contribute to the discussion
    Discussion,
}

impl RoundStage {
    pub fn as_str(&self) -> &str {
        match self {
            RoundStage::Voting => "voting",
            RoundStage::Urgency => "urgency",
            RoundStage::Discussion => "discussion",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RoundStage::Voting => "Collecting Votes",
            RoundStage::Urgency => "Evaluating Speaking Urgency",
            RoundStage::Discussion => "Collecting Discussion",
        }
    }
}

impl std::fmt::Display for RoundStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Structured event emitted at round boundaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConclaveEvent {
    /// Speakers were chosen for discussion round `round` (1-indexed)
    SpeakersSelected {
        round: usize,
        policy: SpeakerPolicy,
        slate: SpeakerSlate,
    },
    /// Discussion round `round` (1-indexed) finished
    DiscussionCompleted {
        round: usize,
        entries: Vec<DiscussionEntry>,
    },
    /// A voting round finished and was recorded in the ledger
    BallotCompleted { ballot: BallotRound },
    /// A candidate was elected; emitted once per run
    WinnerElected { round: usize, winner: AgentId },
}

impl ConclaveEvent {
    /// Short event identifier, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            ConclaveEvent::SpeakersSelected { .. } => "speakers_selected",
            ConclaveEvent::DiscussionCompleted { .. } => "discussion_completed",
            ConclaveEvent::BallotCompleted { .. } => "ballot_completed",
            ConclaveEvent::WinnerElected { .. } => "winner_elected",
        }
    }
}
