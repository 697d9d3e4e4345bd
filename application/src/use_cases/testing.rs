//! Scripted electors for use case tests

use crate::ports::elector_agent::{DecisionError, ElectionSnapshot, ElectorAgent, VoteDecision};
use async_trait::async_trait;
use conclave_domain::{AgentId, UrgencyScore};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Elector with canned answers that records what it was shown
pub struct MockElector {
    id: AgentId,
    votes: Mutex<VecDeque<Result<usize, DecisionError>>>,
    fallback_vote: Result<usize, DecisionError>,
    urgency: Result<i64, DecisionError>,
    /// Score returned as-is, bypassing `UrgencyScore::new`
    raw_urgency: Option<u8>,
    message: Option<String>,
    discuss_error: Option<DecisionError>,
    delay: Duration,
    /// Entry count of the discussion view seen by each call
    pub seen_discussion: Mutex<Vec<usize>>,
    /// `next_voting_round` observed by each vote call
    pub seen_rounds: Mutex<Vec<usize>>,
    pub received_urgency: Mutex<Vec<Option<u8>>>,
}

impl MockElector {
    /// Always votes for `candidate`
    pub fn voting(id: usize, candidate: usize) -> Self {
        Self {
            id: AgentId::new(id),
            votes: Mutex::new(VecDeque::new()),
            fallback_vote: Ok(candidate),
            urgency: Ok(50),
            raw_urgency: None,
            message: Some(format!("Elector {} speaks", id)),
            discuss_error: None,
            delay: Duration::ZERO,
            seen_discussion: Mutex::new(Vec::new()),
            seen_rounds: Mutex::new(Vec::new()),
            received_urgency: Mutex::new(Vec::new()),
        }
    }

    /// Votes for itself
    pub fn stubborn(id: usize) -> Self {
        Self::voting(id, id)
    }

    /// Queue a vote used before the fallback
    pub fn then_voting(self, candidate: usize) -> Self {
        self.votes.lock().unwrap().push_back(Ok(candidate));
        self
    }

    pub fn failing_votes(mut self, error: DecisionError) -> Self {
        self.fallback_vote = Err(error);
        self
    }

    pub fn with_urgency(mut self, score: i64) -> Self {
        self.urgency = Ok(score);
        self
    }

    pub fn with_raw_urgency(mut self, score: u8) -> Self {
        self.raw_urgency = Some(score);
        self
    }

    pub fn failing_urgency(mut self, error: DecisionError) -> Self {
        self.urgency = Err(error);
        self
    }

    pub fn silent(mut self) -> Self {
        self.message = None;
        self
    }

    pub fn failing_discussion(mut self, error: DecisionError) -> Self {
        self.discuss_error = Some(error);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ElectorAgent for MockElector {
    fn id(&self) -> AgentId {
        self.id
    }

    async fn cast_vote(&self, snapshot: &ElectionSnapshot) -> Result<VoteDecision, DecisionError> {
        self.seen_rounds
            .lock()
            .unwrap()
            .push(snapshot.next_voting_round());
        self.pause().await;
        let next = self.votes.lock().unwrap().pop_front();
        let candidate = next.unwrap_or_else(|| self.fallback_vote.clone())?;
        Ok(VoteDecision::new(AgentId::new(candidate), "scripted"))
    }

    async fn speaking_urgency(
        &self,
        snapshot: &ElectionSnapshot,
    ) -> Result<UrgencyScore, DecisionError> {
        self.seen_discussion
            .lock()
            .unwrap()
            .push(snapshot.discussion_for(self.id).entry_count());
        self.pause().await;
        if let Some(score) = self.raw_urgency {
            return Ok(UrgencyScore {
                agent: self.id,
                score,
                reasoning: "scripted".to_string(),
            });
        }
        let score = self.urgency.clone()?;
        Ok(UrgencyScore::new(self.id, score, "scripted"))
    }

    async fn discuss(
        &self,
        snapshot: &ElectionSnapshot,
        urgency: Option<&UrgencyScore>,
    ) -> Result<Option<String>, DecisionError> {
        self.seen_discussion
            .lock()
            .unwrap()
            .push(snapshot.discussion_for(self.id).entry_count());
        self.received_urgency
            .lock()
            .unwrap()
            .push(urgency.map(|u| u.score));
        self.pause().await;
        if let Some(error) = &self.discuss_error {
            return Err(error.clone());
        }
        Ok(self.message.clone())
    }
}
