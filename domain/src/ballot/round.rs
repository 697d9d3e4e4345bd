//! Completed voting rounds and termination evaluation

use super::rule::ElectionRule;
use super::tally::{Leader, VoteTally};
use crate::elector::AgentId;
use serde::{Deserialize, Serialize};

/// Outcome of a voting round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "winner")]
pub enum BallotOutcome {
    /// A candidate strictly exceeded the threshold
    Elected(AgentId),
    /// No candidate exceeded the threshold (includes rounds with no votes)
    Undecided,
}

impl BallotOutcome {
    pub fn is_elected(&self) -> bool {
        matches!(self, BallotOutcome::Elected(_))
    }

    pub fn winner(&self) -> Option<AgentId> {
        match self {
            BallotOutcome::Elected(id) => Some(*id),
            BallotOutcome::Undecided => None,
        }
    }
}

impl std::fmt::Display for BallotOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotOutcome::Elected(id) => write!(f, "Elected {}", id),
            BallotOutcome::Undecided => write!(f, "Undecided"),
        }
    }
}

/// Decide whether `tally` elects anyone in a population of `population`
///
/// The leader is the candidate with the most votes (lowest id on ties). It
/// wins only when its count strictly exceeds the rule's threshold. An empty
/// tally never elects.
pub fn evaluate(tally: &VoteTally, population: usize, rule: ElectionRule) -> BallotOutcome {
    match tally.leader() {
        Some(leader) if rule.is_satisfied(leader.votes, population) => {
            BallotOutcome::Elected(leader.candidate)
        }
        _ => BallotOutcome::Undecided,
    }
}

/// A completed voting round (ledger entry)
///
/// # Example
///
/// ```
/// use conclave_domain::{AgentId, BallotRound, ElectionRule, VoteTally};
///
/// let tally = VoteTally::from_votes([AgentId::new(0), AgentId::new(1), AgentId::new(0)]);
/// let round = BallotRound::evaluate(1, tally, 3, ElectionRule::Supermajority);
///
/// assert_eq!(round.threshold, 2.0);
/// assert!(!round.is_elected()); // 2 votes do not exceed 2.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotRound {
    /// Round number (1-indexed)
    pub round: usize,
    pub tally: VoteTally,
    /// Population the threshold was computed against
    pub population: usize,
    pub threshold: f64,
    pub rule: ElectionRule,
    pub leader: Option<Leader>,
    pub outcome: BallotOutcome,
    /// Milliseconds since epoch
    pub timestamp: u64,
}

impl BallotRound {
    /// Evaluate `tally` and record the result as round number `round`
    pub fn evaluate(round: usize, tally: VoteTally, population: usize, rule: ElectionRule) -> Self {
        let outcome = evaluate(&tally, population, rule);
        Self {
            round,
            leader: tally.leader(),
            threshold: rule.threshold(population),
            outcome,
            tally,
            population,
            rule,
            timestamp: current_timestamp(),
        }
    }

    pub fn is_elected(&self) -> bool {
        self.outcome.is_elected()
    }

    pub fn winner(&self) -> Option<AgentId> {
        self.outcome.winner()
    }

    /// Number of votes counted in this round
    pub fn votes_cast(&self) -> usize {
        self.tally.total()
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
