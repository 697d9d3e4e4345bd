//! Domain layer for conclave
//!
//! This crate contains the electors, ballots, and discussion history that
//! make up an election. It has no dependencies on async runtimes,
//! infrastructure, or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Rounds
//!
//! An election alternates two kinds of rounds:
//!
//! - **Discussion round**: a subset of electors each contribute one statement
//! - **Voting round**: every elector casts one vote for a candidate
//!
//! ## Termination
//!
//! A voting round elects its leader only when the leader's count strictly
//! exceeds the [`ElectionRule`] threshold (`2N/3` by default).
//!
//! ## Visibility
//!
//! Each elector sees only the discussion rounds it spoke in, in full
//! (see [`DiscussionLedger::view`]).

pub mod ballot;
pub mod core;
pub mod discussion;
pub mod elector;
pub mod event;
pub mod speaker;

// Re-export commonly used types
pub use ballot::{BallotOutcome, BallotRound, ElectionRule, Leader, VoteTally, evaluate};
pub use crate::core::error::DomainError;
pub use discussion::{DiscussionEntry, DiscussionLedger, DiscussionView, RoundTranscript};
pub use elector::{AgentId, Candidate, Elector, Roster};
pub use event::{ConclaveEvent, RoundStage};
pub use speaker::{
    Invitation, SpeakerPolicy, SpeakerSlate, UrgencyScore, select_by_urgency, select_random,
};
