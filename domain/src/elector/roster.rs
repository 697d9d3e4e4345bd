//! Roster of electors
//!
//! The roster is the canonical, ordered population for a run. Its order is
//! the id order and is never mutated; randomized listings are derived views.

use super::entities::{AgentId, Candidate, Elector};
use crate::core::error::DomainError;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Ordered, dense population of electors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    electors: Vec<Elector>,
}

impl Roster {
    /// Build a roster from `(name, background)` entries, assigning ids 0..N
    pub fn from_entries<N, B>(entries: impl IntoIterator<Item = (N, B)>) -> Self
    where
        N: Into<String>,
        B: Into<String>,
    {
        let electors = entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, background))| Elector::new(AgentId::new(i), name, background))
            .collect();
        Self { electors }
    }

    /// Build a roster from pre-identified electors
    ///
    /// Electors are sorted by id; ids must then be exactly `0..N`.
    pub fn from_electors(mut electors: Vec<Elector>) -> Result<Self, DomainError> {
        electors.sort_by_key(|e| e.id);
        for (expected, elector) in electors.iter().enumerate() {
            let found = elector.id.index();
            if found < expected {
                return Err(DomainError::DuplicateAgentId(found));
            }
            if found != expected {
                return Err(DomainError::NonDenseRoster { expected, found });
            }
        }
        Ok(Self { electors })
    }

    pub fn len(&self) -> usize {
        self.electors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.electors.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&Elector> {
        self.electors.get(id.index())
    }

    pub fn contains(&self, id: AgentId) -> bool {
        id.index() < self.electors.len()
    }

    /// Display name for an id, or a placeholder for ids outside the roster
    pub fn name_of(&self, id: AgentId) -> &str {
        self.get(id).map(|e| e.name.as_str()).unwrap_or("<unknown>")
    }

    /// Check that `id` names a roster member
    pub fn validate_candidate(&self, id: AgentId) -> Result<(), DomainError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DomainError::UnknownCandidate(id.index()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Elector> {
        self.electors.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.electors.iter().map(|e| e.id)
    }

    /// Keep only the first `limit` electors
    pub fn truncated(mut self, limit: usize) -> Self {
        self.electors.truncate(limit);
        self
    }

    /// Candidate listing in roster order
    pub fn candidates(&self) -> Vec<Candidate> {
        self.electors.iter().map(Elector::as_candidate).collect()
    }

    /// Candidate listing in a random order drawn from `rng`
    ///
    /// The roster itself is left untouched.
    pub fn shuffled_candidates<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Candidate> {
        let mut listing = self.candidates();
        listing.shuffle(rng);
        listing
    }
}
