//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application
//! parameters once validated.

mod election;
mod executor;
mod logging;
mod openrouter;

pub use election::FileElectionConfig;
pub use executor::FileExecutorConfig;
pub use logging::FileLoggingConfig;
pub use openrouter::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, FileOpenRouterConfig};

use conclave_application::{ConclaveParams, RoundPlan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("executor.worker_cap cannot be 0")]
    InvalidWorkerCap,

    #[error("executor.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("openrouter.model cannot be empty")]
    EmptyModelName,

    #[error("election.rule: {0}")]
    InvalidRule(String),

    #[error("election.speaker_policy: {0}")]
    InvalidPolicy(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Election rule, discussion size, round limit
    pub election: FileElectionConfig,
    /// Fan-out width and per-call timeout
    pub executor: FileExecutorConfig,
    /// LLM elector settings
    pub openrouter: FileOpenRouterConfig,
    /// Log and transcript output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.executor.worker_cap == 0 {
            return Err(ConfigValidationError::InvalidWorkerCap);
        }

        // Timeout of 0 seconds doesn't make sense
        if let Some(0) = self.executor.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.openrouter.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        self.election
            .parse_rule()
            .map_err(|e| ConfigValidationError::InvalidRule(e.to_string()))?;
        self.election
            .parse_policy()
            .map_err(|e| ConfigValidationError::InvalidPolicy(e.to_string()))?;

        Ok(())
    }

    /// Environment parameters for this configuration
    pub fn to_params(&self) -> Result<ConclaveParams, ConfigValidationError> {
        self.validate()?;
        let rule = self
            .election
            .parse_rule()
            .map_err(|e| ConfigValidationError::InvalidRule(e.to_string()))?;
        Ok(ConclaveParams::default()
            .with_rule(rule)
            .with_worker_cap(self.executor.worker_cap)
            .with_unit_timeout(self.executor.unit_timeout())
            .with_seed(self.election.seed))
    }

    /// Driver loop plan for this configuration
    pub fn to_round_plan(&self) -> Result<RoundPlan, ConfigValidationError> {
        let policy = self
            .election
            .parse_policy()
            .map_err(|e| ConfigValidationError::InvalidPolicy(e.to_string()))?;
        Ok(RoundPlan::default()
            .with_speakers(self.election.speakers_per_round)
            .with_policy(policy)
            .with_max_rounds(self.election.max_rounds))
    }
}
