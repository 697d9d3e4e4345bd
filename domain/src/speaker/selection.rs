//! Speaker selection
//!
//! Both policies produce a [`SpeakerSlate`]: the ordered electors invited to
//! speak, each with the urgency payload collected for it (if any) so it can
//! be passed to that elector's discussion call.

use crate::elector::AgentId;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Lowest and highest accepted urgency scores
pub const MIN_URGENCY: u8 = 1;
pub const MAX_URGENCY: u8 = 100;

/// Self-reported desire to speak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyScore {
    pub agent: AgentId,
    /// Always within `MIN_URGENCY..=MAX_URGENCY`
    pub score: u8,
    pub reasoning: String,
}

impl UrgencyScore {
    /// Create a score, clamping `score` into `1..=100`
    pub fn new(agent: AgentId, score: i64, reasoning: impl Into<String>) -> Self {
        Self {
            agent,
            score: score.clamp(MIN_URGENCY as i64, MAX_URGENCY as i64) as u8,
            reasoning: reasoning.into(),
        }
    }
}

/// An elector invited to speak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub agent: AgentId,
    pub urgency: Option<UrgencyScore>,
}

/// Ordered list of invited speakers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerSlate {
    invitations: Vec<Invitation>,
}

impl SpeakerSlate {
    pub fn new(invitations: Vec<Invitation>) -> Self {
        Self { invitations }
    }

    pub fn invitations(&self) -> &[Invitation] {
        &self.invitations
    }

    pub fn speakers(&self) -> Vec<AgentId> {
        self.invitations.iter().map(|i| i.agent).collect()
    }

    pub fn len(&self) -> usize {
        self.invitations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invitations.is_empty()
    }

    pub fn into_invitations(self) -> Vec<Invitation> {
        self.invitations
    }
}

/// Pick `min(k, N)` speakers from a uniformly random permutation of `population`
pub fn select_random<R: Rng + ?Sized>(
    population: &[AgentId],
    k: usize,
    rng: &mut R,
) -> SpeakerSlate {
    let mut order = population.to_vec();
    order.shuffle(rng);
    order.truncate(k.min(population.len()));
    SpeakerSlate::new(
        order
            .into_iter()
            .map(|agent| Invitation {
                agent,
                urgency: None,
            })
            .collect(),
    )
}

/// Rank urgency scores and keep the top `k`
///
/// Scores sort descending; equal scores sort by agent id ascending so the
/// selection does not depend on the order responses arrived in.
pub fn select_by_urgency(mut scores: Vec<UrgencyScore>, k: usize) -> SpeakerSlate {
    scores.sort_by(|a, b| b.score.cmp(&a.score).then(a.agent.cmp(&b.agent)));
    scores.truncate(k);
    SpeakerSlate::new(
        scores
            .into_iter()
            .map(|score| Invitation {
                agent: score.agent,
                urgency: Some(score),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ids(n: usize) -> Vec<AgentId> {
        (0..n).map(AgentId::new).collect()
    }

    #[test]
    fn test_urgency_score_clamps() {
        assert_eq!(UrgencyScore::new(AgentId::new(0), 0, "").score, 1);
        assert_eq!(UrgencyScore::new(AgentId::new(0), 250, "").score, 100);
        assert_eq!(UrgencyScore::new(AgentId::new(0), 42, "").score, 42);
    }

    #[test]
    fn test_random_selects_everyone_when_k_exceeds_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let slate = select_random(&ids(6), 10, &mut rng);

        let mut chosen: Vec<_> = slate.speakers().iter().map(|a| a.index()).collect();
        assert_eq!(chosen.len(), 6);
        chosen.sort_unstable();
        assert_eq!(chosen, vec![0, 1, 2, 3, 4, 5]);
        assert!(slate.invitations().iter().all(|i| i.urgency.is_none()));
    }

    #[test]
    fn test_random_selects_k_distinct() {
        let mut rng = StdRng::seed_from_u64(9);
        let slate = select_random(&ids(10), 3, &mut rng);
        let mut chosen = slate.speakers();
        chosen.sort();
        chosen.dedup();
        assert_eq!(chosen.len(), 3);
    }

    #[test]
    fn test_random_is_reproducible_for_seed() {
        let a = select_random(&ids(10), 4, &mut StdRng::seed_from_u64(5));
        let b = select_random(&ids(10), 4, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_speakers_or_empty_population() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_random(&ids(4), 0, &mut rng).is_empty());
        assert!(select_random(&[], 5, &mut rng).is_empty());
        assert!(select_by_urgency(Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_urgency_ranks_by_descending_score() {
        let scores = vec![
            UrgencyScore::new(AgentId::new(0), 90, "urgent"),
            UrgencyScore::new(AgentId::new(1), 10, "calm"),
            UrgencyScore::new(AgentId::new(2), 50, "some"),
        ];
        let slate = select_by_urgency(scores, 2);
        assert_eq!(slate.speakers(), vec![AgentId::new(0), AgentId::new(2)]);
        assert_eq!(slate.invitations()[1].urgency.as_ref().unwrap().score, 50);
    }

    #[test]
    fn test_urgency_ties_break_by_agent_id() {
        let scores = vec![
            UrgencyScore::new(AgentId::new(4), 70, ""),
            UrgencyScore::new(AgentId::new(1), 70, ""),
            UrgencyScore::new(AgentId::new(3), 70, ""),
        ];
        let slate = select_by_urgency(scores, 2);
        assert_eq!(slate.speakers(), vec![AgentId::new(1), AgentId::new(3)]);
    }
}
