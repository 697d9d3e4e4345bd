//! Run Conclave use case
//!
//! Drives the election: discussion and voting rounds alternate until a
//! candidate is elected, the round limit is reached, or the run is
//! cancelled.

use super::environment::{ConclaveEnvironment, ConclaveError};
use crate::config::RoundPlan;
use conclave_domain::{BallotRound, Candidate};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Why the driver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Elected,
    RoundLimit,
    Cancelled,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Elected => "elected",
            StopReason::RoundLimit => "round_limit",
            StopReason::Cancelled => "cancelled",
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConclaveResult {
    pub winner: Option<Candidate>,
    pub stop_reason: StopReason,
    pub population: usize,
    pub voting_rounds: usize,
    pub discussion_rounds: usize,
    pub ballots: Vec<BallotRound>,
}

impl ConclaveResult {
    fn from_environment(env: &ConclaveEnvironment, stop_reason: StopReason) -> Self {
        Self {
            winner: env
                .winner()
                .and_then(|id| env.roster().get(id))
                .map(|elector| elector.as_candidate()),
            stop_reason,
            population: env.population(),
            voting_rounds: env.voting_rounds(),
            discussion_rounds: env.discussion_rounds(),
            ballots: env.ballots().to_vec(),
        }
    }

    pub fn is_elected(&self) -> bool {
        self.winner.is_some()
    }

    pub fn final_ballot(&self) -> Option<&BallotRound> {
        self.ballots.last()
    }
}

/// Use case for running a full election
#[derive(Default)]
pub struct RunConclaveUseCase {
    cancellation: Option<CancellationToken>,
}

impl RunConclaveUseCase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop between rounds once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Execute rounds until a stop condition holds
    ///
    /// Without a round limit a deadlocked conclave runs until cancelled.
    pub async fn execute(
        &self,
        env: &mut ConclaveEnvironment,
        plan: &RoundPlan,
    ) -> Result<ConclaveResult, ConclaveError> {
        info!(
            "Starting conclave: {} speakers per round ({}), round limit {:?}",
            plan.speakers_per_round, plan.policy, plan.max_rounds
        );

        let stop_reason = loop {
            if env.is_decided() {
                break StopReason::Elected;
            }
            if plan.max_rounds.is_some_and(|max| env.voting_rounds() >= max) {
                warn!("No winner after {} voting rounds", env.voting_rounds());
                break StopReason::RoundLimit;
            }
            if self.is_cancelled() {
                break StopReason::Cancelled;
            }

            if plan.discussion_enabled() {
                env.run_discussion_round(plan.speakers_per_round, plan.policy)
                    .await?;
                if self.is_cancelled() {
                    break StopReason::Cancelled;
                }
            }

            env.run_voting_round().await?;
        };

        info!(
            "Conclave finished ({}) after {} voting rounds",
            stop_reason.as_str(),
            env.voting_rounds()
        );
        Ok(ConclaveResult::from_environment(env, stop_reason))
    }
}
