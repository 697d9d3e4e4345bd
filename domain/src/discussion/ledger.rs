//! Discussion ledger and participation index
//!
//! The ledger keeps every completed discussion round (0-indexed internally)
//! and an index from elector to the rounds in which that elector spoke.
//! Both are append-only for the life of a run.

use super::view::{DiscussionView, RoundTranscript};
use crate::elector::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One contribution to a discussion round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionEntry {
    pub speaker: AgentId,
    pub message: String,
}

impl DiscussionEntry {
    pub fn new(speaker: AgentId, message: impl Into<String>) -> Self {
        Self {
            speaker,
            message: message.into(),
        }
    }
}

/// Append-only history of discussion rounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionLedger {
    rounds: Vec<Vec<DiscussionEntry>>,
    participation: BTreeMap<AgentId, Vec<usize>>,
}

impl DiscussionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed round and index its speakers
    ///
    /// Returns the 0-based index of the new round. An empty round is still
    /// recorded so that round numbering stays aligned with the rounds run.
    pub fn record_round(&mut self, entries: Vec<DiscussionEntry>) -> usize {
        let index = self.rounds.len();
        for entry in &entries {
            let rounds = self.participation.entry(entry.speaker).or_default();
            if rounds.last() != Some(&index) {
                rounds.push(index);
            }
        }
        self.rounds.push(entries);
        index
    }

    /// Number of recorded rounds
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Entries of round `index` (0-based)
    pub fn round(&self, index: usize) -> Option<&[DiscussionEntry]> {
        self.rounds.get(index).map(Vec::as_slice)
    }

    /// 0-based indices of the rounds `agent` spoke in, in chronological order
    pub fn participation(&self, agent: AgentId) -> &[usize] {
        self.participation
            .get(&agent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Speakers of round `index`
    pub fn participants(&self, index: usize) -> BTreeSet<AgentId> {
        self.rounds
            .get(index)
            .map(|entries| entries.iter().map(|e| e.speaker).collect())
            .unwrap_or_default()
    }

    /// History visible to `agent`, or the full history when `agent` is `None`
    ///
    /// Filtering works at round granularity: a round the agent spoke in is
    /// returned whole, with every speaker's entry.
    pub fn view(&self, agent: Option<AgentId>) -> DiscussionView {
        let rounds = match agent {
            None => self
                .rounds
                .iter()
                .enumerate()
                .map(|(i, entries)| RoundTranscript::new(i + 1, entries.clone()))
                .collect(),
            Some(agent) => self
                .participation(agent)
                .iter()
                .filter_map(|&i| {
                    self.rounds
                        .get(i)
                        .map(|entries| RoundTranscript::new(i + 1, entries.clone()))
                })
                .collect(),
        };
        DiscussionView::new(rounds)
    }
}
