//! Vote tally for a single voting round
//!
//! A tally is built by folding over every successfully cast vote. Keys are
//! exactly the candidates that received at least one vote.

use crate::elector::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Candidate with the most votes in a tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub candidate: AgentId,
    pub votes: usize,
    /// Another candidate has the same count; `candidate` is the lowest id among them
    pub tied: bool,
}

/// Mapping from candidate to vote count
///
/// # Example
///
/// ```
/// use conclave_domain::{AgentId, VoteTally};
///
/// let mut tally = VoteTally::new();
/// tally.record(AgentId::new(0));
/// tally.record(AgentId::new(0));
/// tally.record(AgentId::new(1));
///
/// assert_eq!(tally.total(), 3);
/// assert_eq!(tally.count(AgentId::new(0)), 2);
/// assert_eq!(tally.leader().unwrap().candidate, AgentId::new(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTally {
    counts: BTreeMap<AgentId, usize>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a list of votes into a tally
    pub fn from_votes(votes: impl IntoIterator<Item = AgentId>) -> Self {
        let mut tally = Self::new();
        for candidate in votes {
            tally.record(candidate);
        }
        tally
    }

    /// Add one vote for `candidate`
    pub fn record(&mut self, candidate: AgentId) {
        *self.counts.entry(candidate).or_insert(0) += 1;
    }

    /// Votes received by `candidate` (0 if none)
    pub fn count(&self, candidate: AgentId) -> usize {
        self.counts.get(&candidate).copied().unwrap_or(0)
    }

    /// Total number of votes in the tally
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct candidates that received votes
    pub fn candidate_count(&self) -> usize {
        self.counts.len()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Take the tally out, leaving an empty one behind
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Candidates ordered by votes descending, then id ascending
    pub fn ranked(&self) -> Vec<(AgentId, usize)> {
        let mut ranked: Vec<_> = self.counts.iter().map(|(id, n)| (*id, *n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// Candidate with the most votes; ties resolve to the lowest id
    ///
    /// Returns `None` when no votes were cast.
    pub fn leader(&self) -> Option<Leader> {
        let ranked = self.ranked();
        let (candidate, votes) = *ranked.first()?;
        let tied = ranked.get(1).is_some_and(|(_, n)| *n == votes);
        Some(Leader {
            candidate,
            votes,
            tied,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, usize)> + '_ {
        self.counts.iter().map(|(id, n)| (*id, *n))
    }

    /// Visual summary such as `"0:2 1:1"` in ranked order
    pub fn summary(&self) -> String {
        self.ranked()
            .iter()
            .map(|(id, n)| format!("{}:{}", id, n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: usize) -> AgentId {
        AgentId::new(i)
    }

    #[test]
    fn test_record_and_count() {
        let mut tally = VoteTally::new();
        tally.record(id(2));
        tally.record(id(2));
        tally.record(id(5));

        assert_eq!(tally.count(id(2)), 2);
        assert_eq!(tally.count(id(5)), 1);
        assert_eq!(tally.count(id(0)), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.candidate_count(), 2);
    }

    #[test]
    fn test_empty_tally_has_no_leader() {
        let tally = VoteTally::new();
        assert!(tally.is_empty());
        assert_eq!(tally.total(), 0);
        assert!(tally.leader().is_none());
    }

    #[test]
    fn test_ranked_breaks_ties_by_id() {
        let tally = VoteTally::from_votes([id(3), id(1), id(3), id(1), id(0)]);
        assert_eq!(tally.ranked(), vec![(id(1), 2), (id(3), 2), (id(0), 1)]);
    }

    #[test]
    fn test_leader_reports_tie() {
        let tally = VoteTally::from_votes([id(3), id(1), id(3), id(1)]);
        let leader = tally.leader().unwrap();
        assert_eq!(leader.candidate, id(1));
        assert_eq!(leader.votes, 2);
        assert!(leader.tied);

        let clear = VoteTally::from_votes([id(0), id(0), id(1)]);
        assert!(!clear.leader().unwrap().tied);
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut tally = VoteTally::from_votes([id(0)]);
        let taken = tally.take();
        assert_eq!(taken.total(), 1);
        assert!(tally.is_empty());
    }

    #[test]
    fn test_summary() {
        let tally = VoteTally::from_votes([id(0), id(1), id(0)]);
        assert_eq!(tally.summary(), "0:2 1:1");
    }

    #[test]
    fn test_serializes_as_map() {
        let tally = VoteTally::from_votes([id(0), id(1), id(0)]);
        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(json, serde_json::json!({"0": 2, "1": 1}));
    }
}
