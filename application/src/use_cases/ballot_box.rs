//! Shared vote buffer for the voting round in progress

use conclave_domain::{AgentId, DomainError, Roster, VoteTally};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Concurrency-safe buffer that voting units write into
///
/// Every increment happens under the lock, so concurrent votes for the same
/// candidate are never lost. Cheap to clone; clones share the buffer.
#[derive(Debug, Clone)]
pub struct BallotBox {
    roster: Arc<Roster>,
    buffer: Arc<Mutex<VoteTally>>,
}

impl BallotBox {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            buffer: Arc::new(Mutex::new(VoteTally::new())),
        }
    }

    /// Record one vote, rejecting ids outside the roster
    pub fn cast(&self, candidate: AgentId) -> Result<(), DomainError> {
        self.roster.validate_candidate(candidate)?;
        self.lock().record(candidate);
        Ok(())
    }

    /// Move the buffered votes out, leaving the buffer empty
    pub fn take(&self) -> VoteTally {
        self.lock().take()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the votes buffered so far
    pub fn peek(&self) -> VoteTally {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, VoteTally> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
