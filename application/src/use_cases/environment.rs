//! Conclave environment
//!
//! Owns the roster, the elector agents, the ballot ledger, and the
//! discussion ledger, and runs individual discussion and voting rounds.
//! Rounds are fan-outs over the [`RoundExecutor`]; the ledgers are only
//! touched after a round's join point, so a partially completed round is
//! never visible to anyone.

use super::ballot_box::BallotBox;
use super::round_executor::{FanOut, RoundExecutor};
use crate::config::ConclaveParams;
use crate::ports::elector_agent::{DecisionError, ElectionSnapshot, ElectorAgent};
use crate::ports::observer::{ConclaveObserver, NoObserver};
use conclave_domain::{
    AgentId, BallotRound, Candidate, ConclaveEvent, DiscussionEntry, DiscussionLedger,
    DiscussionView, DomainError, ElectionRule, Roster, RoundStage, SpeakerPolicy, SpeakerSlate,
    UrgencyScore, VoteTally, select_by_urgency, select_random,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a round
#[derive(Error, Debug)]
pub enum ConclaveError {
    #[error("Roster has {roster} electors but {agents} agents were supplied")]
    PopulationMismatch { roster: usize, agents: usize },

    #[error("Agent at position {position} reports id {reported}; agents must follow roster order")]
    AgentMismatch { position: usize, reported: AgentId },

    #[error("Election already decided: elector {0} was elected")]
    AlreadyDecided(AgentId),

    #[error("Decision channel unavailable (elector {agent}): {source}")]
    DecisionChannelUnavailable {
        agent: AgentId,
        #[source]
        source: DecisionError,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// The election environment
pub struct ConclaveEnvironment {
    roster: Arc<Roster>,
    agents: Vec<Arc<dyn ElectorAgent>>,
    executor: RoundExecutor,
    rule: ElectionRule,
    ballot_box: BallotBox,
    ballots: Vec<BallotRound>,
    discussion: DiscussionLedger,
    winner: Option<AgentId>,
    rng: StdRng,
    observer: Arc<dyn ConclaveObserver>,
}

impl ConclaveEnvironment {
    /// Create an environment over `roster`
    ///
    /// `agents[i]` must report id `i`.
    pub fn new(
        roster: Roster,
        agents: Vec<Arc<dyn ElectorAgent>>,
        params: &ConclaveParams,
    ) -> Result<Self, ConclaveError> {
        if roster.len() != agents.len() {
            return Err(ConclaveError::PopulationMismatch {
                roster: roster.len(),
                agents: agents.len(),
            });
        }
        for (position, agent) in agents.iter().enumerate() {
            let reported = agent.id();
            if reported.index() != position {
                return Err(ConclaveError::AgentMismatch { position, reported });
            }
        }

        let roster = Arc::new(roster);
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "Conclave of {} electors ({}, {} workers)",
            roster.len(),
            params.rule,
            params.worker_cap.min(roster.len()).max(1)
        );

        Ok(Self {
            ballot_box: BallotBox::new(Arc::clone(&roster)),
            roster,
            agents,
            executor: RoundExecutor::new(params.worker_cap).with_unit_timeout(params.unit_timeout),
            rule: params.rule,
            ballots: Vec::new(),
            discussion: DiscussionLedger::new(),
            winner: None,
            rng,
            observer: Arc::new(NoObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn ConclaveObserver>) -> Self {
        self.observer = observer;
        self
    }

    // ==================== Accessors ====================

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn population(&self) -> usize {
        self.roster.len()
    }

    pub fn rule(&self) -> ElectionRule {
        self.rule
    }

    /// Completed voting rounds, oldest first
    pub fn ballots(&self) -> &[BallotRound] {
        &self.ballots
    }

    pub fn voting_rounds(&self) -> usize {
        self.ballots.len()
    }

    pub fn discussion_rounds(&self) -> usize {
        self.discussion.len()
    }

    pub fn discussion_ledger(&self) -> &DiscussionLedger {
        &self.discussion
    }

    pub fn winner(&self) -> Option<AgentId> {
        self.winner
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Discussion rounds in which `agent` spoke
    pub fn participation(&self, agent: AgentId) -> &[usize] {
        self.discussion.participation(agent)
    }

    /// Votes buffered for the round in progress (empty between rounds)
    pub fn live_tally(&self) -> VoteTally {
        self.ballot_box.peek()
    }

    /// Point-in-time view handed to electors
    pub fn snapshot(&self) -> ElectionSnapshot {
        ElectionSnapshot::new(
            Arc::clone(&self.roster),
            self.ballots.clone(),
            self.discussion.clone(),
            self.rule,
        )
    }

    /// Candidate listing; randomized listings are drawn from the seeded rng
    pub fn candidates(&mut self, randomize: bool) -> Vec<Candidate> {
        if randomize {
            self.roster.shuffled_candidates(&mut self.rng)
        } else {
            self.roster.candidates()
        }
    }

    /// Discussion history, restricted to rounds `agent` spoke in when given
    pub fn discussion_history(&self, agent: Option<AgentId>) -> DiscussionView {
        self.discussion.view(agent)
    }

    /// Buffer a single vote for the round in progress
    pub fn cast_vote(&self, candidate: AgentId) -> Result<(), DomainError> {
        self.ballot_box.cast(candidate)
    }

    // ==================== Rounds ====================

    /// Run one discussion round with up to `speaker_count` speakers
    ///
    /// A round is recorded even when nobody was selected or nobody
    /// contributed, so discussion round numbers stay contiguous.
    pub async fn run_discussion_round(
        &mut self,
        speaker_count: usize,
        policy: SpeakerPolicy,
    ) -> Result<(), ConclaveError> {
        let round = self.discussion.len() + 1;
        info!(
            "Discussion round {}: up to {} speakers ({})",
            round, speaker_count, policy
        );

        let snapshot = Arc::new(self.snapshot());
        let slate = self
            .select_speakers(&snapshot, speaker_count, policy)
            .await?;
        debug!("Discussion round {} speakers: {:?}", round, slate.speakers());
        self.emit(ConclaveEvent::SpeakersSelected {
            round,
            policy,
            slate: slate.clone(),
        });

        let units: Vec<_> = slate
            .into_invitations()
            .into_iter()
            .map(|invitation| {
                let agent = Arc::clone(&self.agents[invitation.agent.index()]);
                let snapshot = Arc::clone(&snapshot);
                let unit = async move { agent.discuss(&snapshot, invitation.urgency.as_ref()).await };
                (invitation.agent, unit)
            })
            .collect();

        let report = self
            .executor
            .fan_out(RoundStage::Discussion, units, self.observer.as_ref())
            .await;
        ensure_channel(&report)?;

        let entries: Vec<DiscussionEntry> = report
            .successes
            .into_iter()
            .filter_map(|(speaker, message)| message.map(|m| DiscussionEntry::new(speaker, m)))
            .collect();

        info!(
            "Discussion round {} complete: {} contributions",
            round,
            entries.len()
        );
        self.discussion.record_round(entries.clone());
        self.emit(ConclaveEvent::DiscussionCompleted { round, entries });
        Ok(())
    }

    /// Run one voting round
    ///
    /// Returns `true` when a candidate was elected. Once a winner exists,
    /// further voting rounds are rejected.
    pub async fn run_voting_round(&mut self) -> Result<bool, ConclaveError> {
        if let Some(winner) = self.winner {
            return Err(ConclaveError::AlreadyDecided(winner));
        }

        let round = self.ballots.len() + 1;
        info!("Voting round {}", round);

        self.ballot_box.clear();
        let snapshot = Arc::new(self.snapshot());

        let units: Vec<_> = self
            .agents
            .iter()
            .map(|agent| {
                let id = agent.id();
                let agent = Arc::clone(agent);
                let snapshot = Arc::clone(&snapshot);
                let ballot_box = self.ballot_box.clone();
                let unit = async move {
                    let decision = agent.cast_vote(&snapshot).await?;
                    ballot_box
                        .cast(decision.candidate)
                        .map_err(|_| DecisionError::InvalidCandidate(decision.candidate.index()))?;
                    Ok::<_, DecisionError>(decision)
                };
                (id, unit)
            })
            .collect();

        let report = self
            .executor
            .fan_out(RoundStage::Voting, units, self.observer.as_ref())
            .await;
        if let Err(e) = ensure_channel(&report) {
            self.ballot_box.clear();
            return Err(e);
        }

        for (elector, decision) in &report.successes {
            debug!(
                "Elector {} voted for {}: {}",
                elector, decision.candidate, decision.reasoning
            );
        }

        let tally = self.ballot_box.take();
        let ballot = BallotRound::evaluate(round, tally, self.roster.len(), self.rule);
        info!(
            "Voting round {}: {} of {} votes cast [{}], threshold {:.2}",
            round,
            ballot.votes_cast(),
            ballot.population,
            ballot.tally.summary(),
            ballot.threshold
        );

        let winner = ballot.winner();
        self.ballots.push(ballot.clone());
        self.emit(ConclaveEvent::BallotCompleted { ballot });

        match winner {
            Some(winner) => {
                info!(
                    "Elector {} ({}) elected in round {}",
                    winner,
                    self.roster.name_of(winner),
                    round
                );
                self.winner = Some(winner);
                self.emit(ConclaveEvent::WinnerElected { round, winner });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn select_speakers(
        &mut self,
        snapshot: &Arc<ElectionSnapshot>,
        speaker_count: usize,
        policy: SpeakerPolicy,
    ) -> Result<SpeakerSlate, ConclaveError> {
        if speaker_count == 0 {
            return Ok(SpeakerSlate::default());
        }
        match policy {
            SpeakerPolicy::Random => {
                let ids: Vec<AgentId> = self.roster.ids().collect();
                Ok(select_random(&ids, speaker_count, &mut self.rng))
            }
            SpeakerPolicy::Urgency => {
                let scores = self.collect_urgency(snapshot).await?;
                Ok(select_by_urgency(scores, speaker_count))
            }
        }
    }

    /// Ask every elector for an urgency score; failed electors are not eligible
    async fn collect_urgency(
        &self,
        snapshot: &Arc<ElectionSnapshot>,
    ) -> Result<Vec<UrgencyScore>, ConclaveError> {
        let units: Vec<_> = self
            .agents
            .iter()
            .map(|agent| {
                let id = agent.id();
                let agent = Arc::clone(agent);
                let snapshot = Arc::clone(snapshot);
                let unit = async move { agent.speaking_urgency(&snapshot).await };
                (id, unit)
            })
            .collect();

        let report = self
            .executor
            .fan_out(RoundStage::Urgency, units, self.observer.as_ref())
            .await;
        ensure_channel(&report)?;

        Ok(report
            .successes
            .into_iter()
            .map(|(agent, score)| UrgencyScore::new(agent, i64::from(score.score), score.reasoning))
            .collect())
    }

    fn emit(&self, event: ConclaveEvent) {
        self.observer.on_event(&event);
    }
}

fn ensure_channel<T>(report: &FanOut<T>) -> Result<(), ConclaveError> {
    match report.fatal() {
        Some(failure) => Err(ConclaveError::DecisionChannelUnavailable {
            agent: failure.agent,
            source: failure.error.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::MockElector;
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::time::Duration;

    fn roster(n: usize) -> Roster {
        Roster::from_entries((0..n).map(|i| (format!("Cardinal {}", i), "")))
    }

    fn env_with(agents: Vec<MockElector>, params: ConclaveParams) -> ConclaveEnvironment {
        let n = agents.len();
        let agents: Vec<Arc<dyn ElectorAgent>> = agents
            .into_iter()
            .map(|a| Arc::new(a) as Arc<dyn ElectorAgent>)
            .collect();
        ConclaveEnvironment::new(roster(n), agents, &params).unwrap()
    }

    fn env(agents: Vec<MockElector>) -> ConclaveEnvironment {
        env_with(agents, ConclaveParams::default().with_seed(Some(42)))
    }

    #[derive(Default)]
    struct EventRecorder {
        events: Mutex<Vec<ConclaveEvent>>,
    }

    impl ConclaveObserver for EventRecorder {
        fn on_event(&self, event: &ConclaveEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    // ==================== Construction ====================

    #[test]
    fn test_rejects_misordered_agents() {
        let agents: Vec<Arc<dyn ElectorAgent>> = vec![
            Arc::new(MockElector::stubborn(1)),
            Arc::new(MockElector::stubborn(0)),
        ];
        let err = ConclaveEnvironment::new(roster(2), agents, &ConclaveParams::default())
            .err()
            .unwrap();
        assert!(matches!(err, ConclaveError::AgentMismatch { position: 0, .. }));
    }

    #[test]
    fn test_rejects_population_mismatch() {
        let agents: Vec<Arc<dyn ElectorAgent>> = vec![Arc::new(MockElector::stubborn(0))];
        let err = ConclaveEnvironment::new(roster(2), agents, &ConclaveParams::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ConclaveError::PopulationMismatch { roster: 2, agents: 1 }
        ));
    }

    #[tokio::test]
    async fn test_empty_population_never_elects() {
        let mut env =
            ConclaveEnvironment::new(Roster::default(), vec![], &ConclaveParams::default())
                .unwrap();

        env.run_discussion_round(3, SpeakerPolicy::Random).await.unwrap();
        assert!(!env.run_voting_round().await.unwrap());
        assert_eq!(env.discussion_rounds(), 1);
        assert!(env.discussion_ledger().round(0).unwrap().is_empty());
        assert_eq!(env.ballots()[0].votes_cast(), 0);
        assert!(env.winner().is_none());
    }

    // ==================== Voting ====================

    #[tokio::test]
    async fn test_unanimous_vote_elects() {
        let mut env = env((0..3).map(|i| MockElector::voting(i, 0)).collect());

        assert!(env.run_voting_round().await.unwrap());
        assert_eq!(env.winner(), Some(AgentId::new(0)));
        assert_eq!(env.ballots()[0].tally.count(AgentId::new(0)), 3);
    }

    #[tokio::test]
    async fn test_exactly_two_thirds_is_not_enough() {
        // N=3: threshold is 2.0 and 2 votes do not exceed it
        let mut env = env(vec![
            MockElector::voting(0, 0),
            MockElector::voting(1, 0),
            MockElector::voting(2, 1),
        ]);

        assert!(!env.run_voting_round().await.unwrap());
        assert!(env.winner().is_none());
        assert_eq!(env.ballots()[0].threshold, 2.0);
    }

    #[tokio::test]
    async fn test_threshold_uses_full_population() {
        // 3 of 4 votes cast for 0, but one elector failed: 3 > 8/3 still elects
        let mut env = env(vec![
            MockElector::voting(0, 0),
            MockElector::voting(1, 0),
            MockElector::voting(2, 0),
            MockElector::stubborn(3).failing_votes(DecisionError::Gateway("503".into())),
        ]);
        assert!(env.run_voting_round().await.unwrap());

        // 2 of 3 cast with one failure: 2 is not > 2.0
        let mut env = env_with(
            vec![
                MockElector::voting(0, 0),
                MockElector::voting(1, 0),
                MockElector::stubborn(2).failing_votes(DecisionError::Timeout(Duration::from_secs(1))),
            ],
            ConclaveParams::default(),
        );
        assert!(!env.run_voting_round().await.unwrap());
        assert_eq!(env.ballots()[0].votes_cast(), 2);
    }

    #[tokio::test]
    async fn test_tally_counts_only_successful_votes() {
        let mut env = env(vec![
            MockElector::voting(0, 1),
            MockElector::voting(1, 7),
            MockElector::stubborn(2).failing_votes(DecisionError::Malformed("no tool call".into())),
            MockElector::voting(3, 1),
        ]);

        env.run_voting_round().await.unwrap();
        let ballot = &env.ballots()[0];
        assert_eq!(ballot.votes_cast(), 2);
        assert_eq!(ballot.tally.count(AgentId::new(1)), 2);
        assert_eq!(ballot.tally.count(AgentId::new(7)), 0);
    }

    #[tokio::test]
    async fn test_buffer_empty_after_round() {
        let mut env = env((0..3).map(MockElector::stubborn).collect());
        env.run_voting_round().await.unwrap();
        assert!(env.live_tally().is_empty());
        assert_eq!(env.voting_rounds(), 1);
        assert_eq!(env.ballots()[0].round, 1);
    }

    #[tokio::test]
    async fn test_voting_after_winner_is_rejected() {
        let mut env = env((0..2).map(|i| MockElector::voting(i, 1)).collect());
        assert!(env.run_voting_round().await.unwrap());

        let err = env.run_voting_round().await.unwrap_err();
        assert!(matches!(err, ConclaveError::AlreadyDecided(id) if id == AgentId::new(1)));
        assert_eq!(env.voting_rounds(), 1);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_without_recording() {
        let mut env = env(vec![
            MockElector::voting(0, 0),
            MockElector::voting(1, 0)
                .failing_votes(DecisionError::ChannelUnavailable("credits depleted".into())),
            MockElector::voting(2, 0),
        ]);

        let err = env.run_voting_round().await.unwrap_err();
        assert!(matches!(
            err,
            ConclaveError::DecisionChannelUnavailable { agent, .. } if agent == AgentId::new(1)
        ));
        assert_eq!(env.voting_rounds(), 0);
        assert!(env.live_tally().is_empty());
        assert!(env.winner().is_none());
    }

    #[tokio::test]
    async fn test_every_voter_sees_same_round() {
        let agents: Vec<Arc<MockElector>> = (0..6)
            .map(|i| Arc::new(MockElector::stubborn(i).with_delay(Duration::from_millis(i as u64))))
            .collect();
        let dyn_agents: Vec<Arc<dyn ElectorAgent>> = agents
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn ElectorAgent>)
            .collect();
        let params = ConclaveParams::default().with_worker_cap(2);
        let mut env = ConclaveEnvironment::new(roster(6), dyn_agents, &params).unwrap();

        env.run_voting_round().await.unwrap();
        env.run_voting_round().await.unwrap();

        for agent in &agents {
            assert_eq!(*agent.seen_rounds.lock().unwrap(), vec![1, 2]);
        }
    }

    #[tokio::test]
    async fn test_cast_vote_validates_candidate() {
        let env = env((0..3).map(MockElector::stubborn).collect());
        assert!(env.cast_vote(AgentId::new(2)).is_ok());
        assert!(matches!(
            env.cast_vote(AgentId::new(3)),
            Err(DomainError::UnknownCandidate(3))
        ));
        assert_eq!(env.live_tally().total(), 1);
    }

    #[tokio::test]
    async fn test_vote_history_accumulates() {
        let mut env = env(vec![
            MockElector::voting(0, 1).then_voting(0),
            MockElector::voting(1, 1).then_voting(0),
            MockElector::voting(2, 1).then_voting(2),
        ]);

        assert!(!env.run_voting_round().await.unwrap());
        assert!(env.run_voting_round().await.unwrap());
        assert_eq!(env.ballots().len(), 2);
        assert_eq!(env.ballots()[0].tally.count(AgentId::new(0)), 2);
        assert_eq!(env.winner(), Some(AgentId::new(1)));
    }

    // ==================== Discussion ====================

    #[tokio::test]
    async fn test_random_selection_more_speakers_than_electors() {
        let mut env = env((0..3).map(MockElector::stubborn).collect());
        env.run_discussion_round(10, SpeakerPolicy::Random).await.unwrap();

        let participants = env.discussion_ledger().participants(0);
        assert_eq!(participants.len(), 3);
        assert_eq!(env.discussion_ledger().round(0).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_speakers_records_empty_round() {
        let mut env = env((0..3).map(MockElector::stubborn).collect());
        env.run_discussion_round(0, SpeakerPolicy::Urgency).await.unwrap();

        assert_eq!(env.discussion_rounds(), 1);
        assert!(env.discussion_ledger().round(0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_urgency_selects_top_scores() {
        let agents = vec![
            Arc::new(MockElector::stubborn(0).with_urgency(90)),
            Arc::new(MockElector::stubborn(1).with_urgency(10)),
            Arc::new(MockElector::stubborn(2).with_urgency(50)),
        ];
        let dyn_agents: Vec<Arc<dyn ElectorAgent>> = agents
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn ElectorAgent>)
            .collect();
        let mut env =
            ConclaveEnvironment::new(roster(3), dyn_agents, &ConclaveParams::default()).unwrap();

        env.run_discussion_round(2, SpeakerPolicy::Urgency).await.unwrap();

        let speakers: BTreeSet<usize> = env
            .discussion_ledger()
            .participants(0)
            .into_iter()
            .map(|a| a.index())
            .collect();
        assert_eq!(speakers, BTreeSet::from([0, 2]));

        // Speakers receive their own urgency score; elector 1 never speaks
        assert_eq!(*agents[0].received_urgency.lock().unwrap(), vec![Some(90)]);
        assert_eq!(*agents[2].received_urgency.lock().unwrap(), vec![Some(50)]);
        assert!(agents[1].received_urgency.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_urgency_scores_are_clamped_after_collection() {
        let agents = vec![
            Arc::new(MockElector::stubborn(0).with_urgency(1)),
            Arc::new(MockElector::stubborn(1).with_raw_urgency(0)),
            Arc::new(MockElector::stubborn(2).with_raw_urgency(255)),
        ];
        let dyn_agents: Vec<Arc<dyn ElectorAgent>> = agents
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn ElectorAgent>)
            .collect();
        let mut env =
            ConclaveEnvironment::new(roster(3), dyn_agents, &ConclaveParams::default()).unwrap();

        env.run_discussion_round(3, SpeakerPolicy::Urgency).await.unwrap();

        assert_eq!(*agents[1].received_urgency.lock().unwrap(), vec![Some(1)]);
        assert_eq!(*agents[2].received_urgency.lock().unwrap(), vec![Some(100)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_discussion_entries_follow_completion_order() {
        // Later ids answer first
        let mut env = env(vec![
            MockElector::stubborn(0).with_delay(Duration::from_millis(30)),
            MockElector::stubborn(1).with_delay(Duration::from_millis(20)),
            MockElector::stubborn(2).with_delay(Duration::from_millis(10)),
        ]);

        env.run_discussion_round(3, SpeakerPolicy::Random).await.unwrap();

        let order: Vec<usize> = env
            .discussion_ledger()
            .round(0)
            .unwrap()
            .iter()
            .map(|entry| entry.speaker.index())
            .collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_urgency_failures_are_not_eligible() {
        let mut env = env(vec![
            MockElector::stubborn(0).with_urgency(10),
            MockElector::stubborn(1).failing_urgency(DecisionError::Gateway("500".into())),
            MockElector::stubborn(2).with_urgency(20),
        ]);
        env.run_discussion_round(5, SpeakerPolicy::Urgency).await.unwrap();

        let speakers = env.discussion_ledger().participants(0);
        assert_eq!(speakers.len(), 2);
        assert!(!speakers.contains(&AgentId::new(1)));
    }

    #[tokio::test]
    async fn test_silent_and_failed_speakers_are_not_participants() {
        let mut env = env(vec![
            MockElector::stubborn(0),
            MockElector::stubborn(1).silent(),
            MockElector::stubborn(2).failing_discussion(DecisionError::Gateway("502".into())),
        ]);
        env.run_discussion_round(3, SpeakerPolicy::Random).await.unwrap();

        let speakers = env.discussion_ledger().participants(0);
        assert_eq!(speakers, BTreeSet::from([AgentId::new(0)]));
        assert_eq!(env.participation(AgentId::new(0)), &[0]);
        assert!(env.participation(AgentId::new(1)).is_empty());
    }

    #[tokio::test]
    async fn test_discussion_visibility_follows_participation() {
        // Elector 1 is silent in round 1 and speaks in round 2
        let agents = vec![
            Arc::new(MockElector::stubborn(0).with_urgency(90)),
            Arc::new(MockElector::stubborn(1).with_urgency(80).silent()),
            Arc::new(MockElector::stubborn(2).with_urgency(10)),
        ];
        let dyn_agents: Vec<Arc<dyn ElectorAgent>> = agents
            .iter()
            .map(|a| Arc::clone(a) as Arc<dyn ElectorAgent>)
            .collect();
        let mut env =
            ConclaveEnvironment::new(roster(3), dyn_agents, &ConclaveParams::default()).unwrap();

        env.run_discussion_round(2, SpeakerPolicy::Urgency).await.unwrap();
        assert_eq!(env.discussion_history(Some(AgentId::new(0))).entry_count(), 1);
        assert!(env.discussion_history(Some(AgentId::new(1))).is_empty());
        assert!(env.discussion_history(Some(AgentId::new(2))).is_empty());

        env.run_discussion_round(3, SpeakerPolicy::Random).await.unwrap();
        // Elector 2 spoke only in round 2, so round 1 stays hidden from it
        let view = env.discussion_history(Some(AgentId::new(2)));
        assert_eq!(view.rounds().len(), 1);
        assert_eq!(view.rounds()[0].number, 2);
        assert_eq!(env.discussion_history(None).rounds().len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_selection_is_reproducible() {
        let mut picks = Vec::new();
        for _ in 0..2 {
            let mut env = env_with(
                (0..10).map(MockElector::stubborn).collect(),
                ConclaveParams::default().with_seed(Some(2024)),
            );
            env.run_discussion_round(3, SpeakerPolicy::Random).await.unwrap();
            picks.push(env.discussion_ledger().participants(0));
        }
        assert_eq!(picks[0], picks[1]);
        assert_eq!(picks[0].len(), 3);
    }

    #[tokio::test]
    async fn test_discussion_fatal_error_records_nothing() {
        let mut env = env(vec![
            MockElector::stubborn(0),
            MockElector::stubborn(1).failing_discussion(DecisionError::ChannelUnavailable("quota".into())),
        ]);
        let err = env.run_discussion_round(2, SpeakerPolicy::Random).await.unwrap_err();
        assert!(matches!(err, ConclaveError::DecisionChannelUnavailable { .. }));
        assert_eq!(env.discussion_rounds(), 0);
    }

    #[tokio::test]
    async fn test_candidates_listing() {
        let mut env = env((0..4).map(MockElector::stubborn).collect());
        let ordered: Vec<usize> = env.candidates(false).iter().map(|c| c.id.index()).collect();
        assert_eq!(ordered, vec![0, 1, 2, 3]);

        let mut shuffled: Vec<usize> = env.candidates(true).iter().map(|c| c.id.index()).collect();
        shuffled.sort_unstable();
        assert_eq!(shuffled, ordered);
        // Listing never mutates the roster
        assert_eq!(env.roster().get(AgentId::new(0)).unwrap().name, "Cardinal 0");
    }

    // ==================== Events ====================

    #[tokio::test]
    async fn test_events_emitted_in_round_order() {
        let recorder = Arc::new(EventRecorder::default());
        let mut env = env((0..3).map(|i| MockElector::voting(i, 2)).collect())
            .with_observer(recorder.clone());

        env.run_discussion_round(1, SpeakerPolicy::Random).await.unwrap();
        env.run_voting_round().await.unwrap();

        let kinds: Vec<&str> = recorder
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "speakers_selected",
                "discussion_completed",
                "ballot_completed",
                "winner_elected"
            ]
        );
    }
}
