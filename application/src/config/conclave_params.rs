//! Conclave parameters: environment and driver control.
//!
//! [`ConclaveParams`] groups the static parameters that shape a run: the
//! election rule, fan-out width, per-unit timeout, and the seed for the
//! environment's own randomness. These are application-layer concerns; the
//! infrastructure layer maps its file configuration onto them.

use conclave_domain::{ElectionRule, SpeakerPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on concurrently in-flight decision calls
pub const DEFAULT_WORKER_CAP: usize = 8;

/// Speakers invited per discussion round
pub const DEFAULT_SPEAKERS_PER_ROUND: usize = 5;

/// Environment construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConclaveParams {
    pub rule: ElectionRule,
    /// Fan-out width is `min(worker_cap, units)`.
    pub worker_cap: usize,
    /// Timeout for a single decision call. `None` waits indefinitely.
    pub unit_timeout: Option<Duration>,
    /// Seed for speaker shuffles. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ConclaveParams {
    fn default() -> Self {
        Self {
            rule: ElectionRule::default(),
            worker_cap: DEFAULT_WORKER_CAP,
            unit_timeout: None,
            seed: None,
        }
    }
}

impl ConclaveParams {
    // ==================== Builder Methods ====================

    pub fn with_rule(mut self, rule: ElectionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_worker_cap(mut self, cap: usize) -> Self {
        self.worker_cap = cap;
        self
    }

    pub fn with_unit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.unit_timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Driver loop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundPlan {
    /// Speakers requested per discussion round. Zero skips discussion.
    pub speakers_per_round: usize,
    pub policy: SpeakerPolicy,
    /// Stop after this many voting rounds without a winner.
    pub max_rounds: Option<usize>,
}

impl Default for RoundPlan {
    fn default() -> Self {
        Self {
            speakers_per_round: DEFAULT_SPEAKERS_PER_ROUND,
            policy: SpeakerPolicy::default(),
            max_rounds: None,
        }
    }
}

impl RoundPlan {
    /// A single voting round with no discussion
    pub fn single_ballot() -> Self {
        Self {
            speakers_per_round: 0,
            policy: SpeakerPolicy::default(),
            max_rounds: Some(1),
        }
    }

    pub fn with_speakers(mut self, speakers: usize) -> Self {
        self.speakers_per_round = speakers;
        self
    }

    pub fn with_policy(mut self, policy: SpeakerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: Option<usize>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn discussion_enabled(&self) -> bool {
        self.speakers_per_round > 0
    }
}
