//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Agent id {0} appears more than once in the roster")]
    DuplicateAgentId(usize),

    #[error("Roster ids must be dense and 0-based: expected {expected}, found {found}")]
    NonDenseRoster { expected: usize, found: usize },

    #[error("Unknown candidate: {0}")]
    UnknownCandidate(usize),

    #[error("Invalid election rule: {0}")]
    InvalidRule(String),

    #[error("Invalid speaker policy: {0}")]
    InvalidPolicy(String),
}

impl DomainError {
    /// Check if this error was caused by a vote for a non-existent candidate
    pub fn is_unknown_candidate(&self) -> bool {
        matches!(self, DomainError::UnknownCandidate(_))
    }
}
