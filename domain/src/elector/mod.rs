//! Electors and the roster that owns them.

pub mod entities;
pub mod roster;

pub use entities::{AgentId, Candidate, Elector};
pub use roster::Roster;
