//! Election configuration from TOML (`[election]` section)
//!
//! ```toml
//! [election]
//! rule = "supermajority"     # or "majority", "unanimous"
//! speakers_per_round = 5
//! speaker_policy = "random"  # or "urgency"
//! max_rounds = 50
//! seed = 42
//! ```

use conclave_application::config::DEFAULT_SPEAKERS_PER_ROUND;
use conclave_domain::{DomainError, ElectionRule, SpeakerPolicy};
use serde::{Deserialize, Serialize};

/// Raw election configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileElectionConfig {
    /// Termination rule: "supermajority", "majority", "unanimous"
    pub rule: String,
    /// Speakers invited per discussion round (0 disables discussion)
    pub speakers_per_round: usize,
    /// Speaker selection: "random" or "urgency"
    pub speaker_policy: String,
    /// Give up after this many voting rounds
    pub max_rounds: Option<usize>,
    /// Seed for speaker and candidate shuffles
    pub seed: Option<u64>,
}

impl Default for FileElectionConfig {
    fn default() -> Self {
        Self {
            rule: ElectionRule::default().as_str().to_string(),
            speakers_per_round: DEFAULT_SPEAKERS_PER_ROUND,
            speaker_policy: SpeakerPolicy::default().as_str().to_string(),
            max_rounds: None,
            seed: None,
        }
    }
}

impl FileElectionConfig {
    pub fn parse_rule(&self) -> Result<ElectionRule, DomainError> {
        self.rule.parse()
    }

    pub fn parse_policy(&self) -> Result<SpeakerPolicy, DomainError> {
        self.speaker_policy.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_election_config_default() {
        let config = FileElectionConfig::default();
        assert_eq!(config.rule, "supermajority");
        assert_eq!(config.speaker_policy, "random");
        assert_eq!(config.speakers_per_round, 5);
        assert_eq!(config.parse_rule().unwrap(), ElectionRule::Supermajority);
        assert_eq!(config.parse_policy().unwrap(), SpeakerPolicy::Random);
    }

    #[test]
    fn test_parse_aliases() {
        let config = FileElectionConfig {
            rule: "2/3".to_string(),
            speaker_policy: "Urgency".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_rule().unwrap(), ElectionRule::Supermajority);
        assert_eq!(config.parse_policy().unwrap(), SpeakerPolicy::Urgency);
    }

    #[test]
    fn test_parse_invalid_rule() {
        let config = FileElectionConfig {
            rule: "plurality".to_string(),
            ..Default::default()
        };
        assert!(config.parse_rule().is_err());
    }
}
