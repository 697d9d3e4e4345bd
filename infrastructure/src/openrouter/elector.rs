//! LLM-backed elector
//!
//! Wraps a [`ToolChannel`] and turns each decision into one forced tool
//! call. The elector keeps its own voting record with reasoning; nothing
//! else in the system sees it.

use super::client::ToolChannel;
use super::prompt::{PromptBuilder, VoteRecord};
use super::tools::{
    FALLBACK_URGENCY, cast_vote_tool, parse_message, parse_urgency, parse_vote, speak_tool,
    urgency_tool,
};
use async_trait::async_trait;
use conclave_application::{DecisionError, ElectionSnapshot, ElectorAgent, VoteDecision};
use conclave_domain::{AgentId, Elector, Roster, UrgencyScore};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, trace};

/// Elector whose decisions come from a language model
pub struct LlmElector {
    elector: Elector,
    channel: Arc<dyn ToolChannel>,
    history: Mutex<Vec<VoteRecord>>,
}

impl LlmElector {
    pub fn new(elector: Elector, channel: Arc<dyn ToolChannel>) -> Self {
        Self {
            elector,
            channel,
            history: Mutex::new(Vec::new()),
        }
    }

    /// One LLM elector per roster entry, in id order, sharing `channel`
    pub fn for_roster(roster: &Roster, channel: Arc<dyn ToolChannel>) -> Vec<Arc<dyn ElectorAgent>> {
        roster
            .iter()
            .map(|elector| {
                Arc::new(Self::new(elector.clone(), Arc::clone(&channel))) as Arc<dyn ElectorAgent>
            })
            .collect()
    }

    /// Copy of this elector's own voting record
    pub fn vote_history(&self) -> Vec<VoteRecord> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn prompt_for<F>(&self, snapshot: &ElectionSnapshot, build: F) -> String
    where
        F: FnOnce(&PromptBuilder<'_>) -> String,
    {
        let history = self.vote_history();
        let prompt = build(&PromptBuilder::new(&self.elector, snapshot, &history));
        trace!("Prompt for elector {}:\n{}", self.elector.id, prompt);
        prompt
    }
}

#[async_trait]
impl ElectorAgent for LlmElector {
    fn id(&self) -> AgentId {
        self.elector.id
    }

    async fn cast_vote(&self, snapshot: &ElectionSnapshot) -> Result<VoteDecision, DecisionError> {
        let prompt = self.prompt_for(snapshot, |builder| builder.voting());
        let tool = cast_vote_tool();

        let args = self
            .channel
            .invoke_tool(&prompt, &tool)
            .await?
            .ok_or_else(|| DecisionError::Malformed("model did not call cast_vote".to_string()))?;
        let (candidate, reasoning) = parse_vote(&args)?;

        let candidate = AgentId::new(candidate);
        if !snapshot.roster().contains(candidate) {
            return Err(DecisionError::InvalidCandidate(candidate.index()));
        }

        info!(
            "{} ({}) voted for {} ({})",
            self.elector.name,
            self.elector.id,
            snapshot.roster().name_of(candidate),
            candidate
        );
        debug!("Reasoning of elector {}: {}", self.elector.id, reasoning);

        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(VoteRecord {
                round: snapshot.next_voting_round(),
                candidate,
                reasoning: reasoning.clone(),
            });

        Ok(VoteDecision::new(candidate, reasoning))
    }

    async fn speaking_urgency(
        &self,
        snapshot: &ElectionSnapshot,
    ) -> Result<UrgencyScore, DecisionError> {
        let prompt = self.prompt_for(snapshot, |builder| builder.urgency());
        let tool = urgency_tool();

        let score = match self.channel.invoke_tool(&prompt, &tool).await? {
            Some(args) => {
                let (score, reasoning) = parse_urgency(&args);
                UrgencyScore::new(self.elector.id, score, reasoning)
            }
            None => UrgencyScore::new(
                self.elector.id,
                FALLBACK_URGENCY,
                "No urgency evaluation received",
            ),
        };
        debug!("Elector {} urgency {}", self.elector.id, score.score);
        Ok(score)
    }

    async fn discuss(
        &self,
        snapshot: &ElectionSnapshot,
        urgency: Option<&UrgencyScore>,
    ) -> Result<Option<String>, DecisionError> {
        let prompt = self.prompt_for(snapshot, |builder| builder.discussion(urgency));
        let tool = speak_tool();

        let message = self
            .channel
            .invoke_tool(&prompt, &tool)
            .await?
            .and_then(|args| parse_message(&args));

        if let Some(message) = &message {
            info!("{} ({}) speaks:\n{}", self.elector.name, self.elector.id, message);
        }
        Ok(message)
    }
}
