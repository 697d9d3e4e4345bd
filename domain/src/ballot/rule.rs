//! Election rules for winner determination
//!
//! A rule turns the population size into a real-valued threshold. A
//! candidate wins only by strictly exceeding it.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Rule for deciding whether a ballot elects a candidate
///
/// - `Supermajority`: more than 2/3 of the population (default)
/// - `Majority`: more than half of the population
/// - `Unanimous`: every elector
///
/// # Example
///
/// ```
/// use conclave_domain::ElectionRule;
///
/// let rule = ElectionRule::Supermajority;
/// assert_eq!(rule.threshold(3), 2.0);
/// assert!(!rule.is_satisfied(2, 3)); // 2 does not exceed 2.0
/// assert!(rule.is_satisfied(3, 3));
/// assert!(rule.is_satisfied(1, 1));  // 1 > 2/3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElectionRule {
    /// Votes must exceed `2N/3`
    #[default]
    Supermajority,

    /// Votes must exceed `N/2`
    Majority,

    /// Votes must exceed `N - 1`
    Unanimous,
}

impl ElectionRule {
    /// Real-valued threshold that a candidate's count must strictly exceed
    pub fn threshold(&self, population: usize) -> f64 {
        let n = population as f64;
        match self {
            ElectionRule::Supermajority => 2.0 * n / 3.0,
            ElectionRule::Majority => n / 2.0,
            ElectionRule::Unanimous => (n - 1.0).max(0.0),
        }
    }

    /// Check if `votes` elects a candidate in a population of `population`
    pub fn is_satisfied(&self, votes: usize, population: usize) -> bool {
        if population == 0 || votes == 0 {
            return false;
        }
        votes as f64 > self.threshold(population)
    }

    /// Smallest vote count that satisfies the rule
    pub fn min_votes_needed(&self, population: usize) -> usize {
        if population == 0 {
            return 0;
        }
        (self.threshold(population).floor() as usize + 1).min(population)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionRule::Supermajority => "supermajority",
            ElectionRule::Majority => "majority",
            ElectionRule::Unanimous => "unanimous",
        }
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> &'static str {
        match self {
            ElectionRule::Supermajority => "supermajority (more than two thirds)",
            ElectionRule::Majority => "majority (more than half)",
            ElectionRule::Unanimous => "unanimous (every elector)",
        }
    }
}

impl std::fmt::Display for ElectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for ElectionRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supermajority" | "two-thirds" | "2/3" => Ok(ElectionRule::Supermajority),
            "majority" => Ok(ElectionRule::Majority),
            "unanimous" => Ok(ElectionRule::Unanimous),
            other => Err(DomainError::InvalidRule(format!(
                "{}. Valid: supermajority, majority, unanimous",
                other
            ))),
        }
    }
}
