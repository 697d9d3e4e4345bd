//! Speaker selection policy

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How speakers are chosen for a discussion round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerPolicy {
    /// Uniformly random permutation of the roster
    #[default]
    Random,
    /// Electors ranked by self-reported speaking urgency
    Urgency,
}

impl SpeakerPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerPolicy::Random => "random",
            SpeakerPolicy::Urgency => "urgency",
        }
    }

    /// Whether the policy needs an urgency fan-out before speaking
    pub fn requires_urgency(&self) -> bool {
        matches!(self, SpeakerPolicy::Urgency)
    }
}

impl std::fmt::Display for SpeakerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SpeakerPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(SpeakerPolicy::Random),
            "urgency" => Ok(SpeakerPolicy::Urgency),
            other => Err(DomainError::InvalidPolicy(format!(
                "{}. Valid: random, urgency",
                other
            ))),
        }
    }
}
