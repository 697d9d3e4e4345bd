//! Read-only views of discussion history

use super::ledger::DiscussionEntry;
use serde::{Deserialize, Serialize};

/// One discussion round as shown to a consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTranscript {
    /// Round number (1-indexed)
    pub number: usize,
    pub entries: Vec<DiscussionEntry>,
}

impl RoundTranscript {
    pub fn new(number: usize, entries: Vec<DiscussionEntry>) -> Self {
        Self { number, entries }
    }
}

/// Chronological sequence of discussion rounds visible to a consumer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionView {
    rounds: Vec<RoundTranscript>,
}

impl DiscussionView {
    pub fn new(rounds: Vec<RoundTranscript>) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> &[RoundTranscript] {
        &self.rounds
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Total number of entries across all rounds
    pub fn entry_count(&self) -> usize {
        self.rounds.iter().map(|r| r.entries.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = &DiscussionEntry> {
        self.rounds.iter().flat_map(|r| r.entries.iter())
    }
}
