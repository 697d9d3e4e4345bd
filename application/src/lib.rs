//! Application layer for conclave
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ConclaveParams, RoundPlan};
pub use ports::{
    composite_observer::CompositeObserver,
    elector_agent::{DecisionError, ElectionSnapshot, ElectorAgent, VoteDecision},
    observer::{ConclaveObserver, NoObserver},
};
pub use use_cases::ballot_box::BallotBox;
pub use use_cases::environment::{ConclaveEnvironment, ConclaveError};
pub use use_cases::round_executor::{FanOut, RoundExecutor, UnitFailure};
pub use use_cases::run_conclave::{ConclaveResult, RunConclaveUseCase, StopReason};
