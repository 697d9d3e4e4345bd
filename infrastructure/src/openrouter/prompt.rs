//! Prompt construction for LLM electors
//!
//! Every prompt shares one context block: the elector's persona, the rule,
//! the candidate list (freshly shuffled), the elector's own voting record,
//! previous ballot results, and the discussion rounds the elector took
//! part in. The task instruction differs per decision.

use conclave_application::ElectionSnapshot;
use conclave_domain::{AgentId, DiscussionView, Elector, Roster, UrgencyScore};
use std::fmt::Write;

/// A vote this elector cast in an earlier round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub round: usize,
    pub candidate: AgentId,
    pub reasoning: String,
}

/// Builds decision prompts for one elector
pub struct PromptBuilder<'a> {
    elector: &'a Elector,
    snapshot: &'a ElectionSnapshot,
    history: &'a [VoteRecord],
}

impl<'a> PromptBuilder<'a> {
    pub fn new(
        elector: &'a Elector,
        snapshot: &'a ElectionSnapshot,
        history: &'a [VoteRecord],
    ) -> Self {
        Self {
            elector,
            snapshot,
            history,
        }
    }

    pub fn voting(&self) -> String {
        let mut prompt = self.context();
        prompt.push_str(
            "Cast your vote for one of the candidates using the cast_vote tool. \
             Give the candidate's ID and a detailed explanation of your choice.\n",
        );
        prompt
    }

    pub fn urgency(&self) -> String {
        let mut prompt = self.context();
        prompt.push_str(
            "Given the state of the conclave, how urgently do you need to speak in the next discussion round?\n\
             Rate it from 1 to 100, where 1 means you have nothing important to add \
             and 100 means you have a point that must be heard immediately.\n\n\
             Consider:\n\
             - How strongly you support or oppose particular candidates\n\
             - Whether you need to answer something said earlier\n\
             - Whether you hold a perspective nobody has voiced yet\n\
             - Whether the voting trend worries you\n\n\
             Use the evaluate_speaking_urgency tool to give your score and reasoning.\n",
        );
        prompt
    }

    pub fn discussion(&self, urgency: Option<&UrgencyScore>) -> String {
        let mut prompt = self.context();
        if let Some(urgency) = urgency {
            let _ = write!(
                prompt,
                "You rated your urgency to speak at {}/100.\nYour reasoning: {}\n\
                 Let that urgency shape what you say.\n\n",
                urgency.score, urgency.reasoning
            );
        }
        prompt.push_str(
            "This is a discussion round. Use the speak_message tool to address the other electors.\n\
             Try to persuade them according to your convictions and background. You may:\n\
             1. Argue for a particular candidate\n\
             2. Question the suitability of other candidates\n\
             3. Answer earlier speakers\n\
             4. Describe what you believe the Church needs now\n\n\
             Stay true to your character. Speak for 100 to 300 words.\n",
        );
        prompt
    }

    fn context(&self) -> String {
        let roster = self.snapshot.roster();
        let mut out = String::new();

        let _ = writeln!(
            out,
            "You are {}. About you: {}",
            self.elector.name, self.elector.background
        );
        let _ = writeln!(
            out,
            "You are an elector in the conclave choosing the next pope. A candidate is elected by a {} of the {} electors.",
            self.snapshot.rule().description(),
            self.snapshot.population()
        );
        out.push_str("The candidates are:\n");
        for candidate in self.snapshot.candidates(true) {
            let _ = writeln!(out, "{}", candidate);
        }
        out.push('\n');

        let history = vote_history(self.history, roster);
        if !history.is_empty() {
            out.push_str(&history);
            out.push('\n');
        }

        let results = ballot_results(self.snapshot, roster);
        if !results.is_empty() {
            out.push_str(&results);
            out.push('\n');
        }

        let discussion = discussion_history(&self.snapshot.discussion_for(self.elector.id), roster);
        if !discussion.is_empty() {
            out.push_str(&discussion);
        }

        out
    }
}

fn vote_history(history: &[VoteRecord], roster: &Roster) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut out = String::from("Your vote history:\n");
    for record in history {
        let _ = writeln!(
            out,
            "In round {}, you voted for {} because:\n{}",
            record.round,
            roster.name_of(record.candidate),
            record.reasoning
        );
    }
    out
}

fn ballot_results(snapshot: &ElectionSnapshot, roster: &Roster) -> String {
    if snapshot.ballots().is_empty() {
        return String::new();
    }
    let mut out = String::from("Previous ballot results:\n");
    for ballot in snapshot.ballots() {
        let _ = writeln!(out, "Round {}:", ballot.round);
        for (candidate, votes) in ballot.tally.ranked() {
            let _ = writeln!(
                out,
                "Cardinal {} - {}: {}",
                candidate,
                roster.name_of(candidate),
                votes
            );
        }
    }
    out
}

/// Render a discussion view as `Discussion Round N:` blocks
pub fn discussion_history(view: &DiscussionView, roster: &Roster) -> String {
    let mut out = String::new();
    for round in view.rounds() {
        let _ = writeln!(out, "Discussion Round {}:", round.number);
        for entry in &round.entries {
            let _ = writeln!(
                out,
                "Cardinal {} - {}:\n{}\n",
                entry.speaker,
                roster.name_of(entry.speaker),
                entry.message
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{
        BallotRound, DiscussionEntry, DiscussionLedger, ElectionRule, VoteTally,
    };
    use std::sync::Arc;

    fn snapshot() -> ElectionSnapshot {
        let roster = Roster::from_entries([
            ("Ada", "Archbishop of Genoa"),
            ("Basil", "Curial diplomat"),
            ("Clement", "Missionary bishop"),
        ]);
        let mut discussion = DiscussionLedger::new();
        discussion.record_round(vec![DiscussionEntry::new(AgentId::new(1), "Unity first.")]);
        discussion.record_round(vec![DiscussionEntry::new(AgentId::new(0), "Reform now.")]);
        let ballot = BallotRound::evaluate(
            1,
            VoteTally::from_votes([AgentId::new(2), AgentId::new(2), AgentId::new(0)]),
            3,
            ElectionRule::Supermajority,
        );
        ElectionSnapshot::new(Arc::new(roster), vec![ballot], discussion, ElectionRule::Supermajority)
    }

    #[test]
    fn test_voting_prompt_contents() {
        let snapshot = snapshot();
        let elector = snapshot.roster().get(AgentId::new(0)).unwrap().clone();
        let history = vec![VoteRecord {
            round: 1,
            candidate: AgentId::new(2),
            reasoning: "A shepherd".to_string(),
        }];

        let prompt = PromptBuilder::new(&elector, &snapshot, &history).voting();

        assert!(prompt.starts_with("You are Ada. About you: Archbishop of Genoa"));
        assert!(prompt.contains("1: Basil"));
        assert!(prompt.contains("In round 1, you voted for Clement because:\nA shepherd"));
        assert!(prompt.contains("Cardinal 2 - Clement: 2"));
        assert!(prompt.contains("cast_vote"));
    }

    #[test]
    fn test_prompt_shows_only_own_discussion_rounds() {
        let snapshot = snapshot();
        let elector = snapshot.roster().get(AgentId::new(0)).unwrap().clone();
        let prompt = PromptBuilder::new(&elector, &snapshot, &[]).urgency();

        assert!(prompt.contains("Discussion Round 2:\nCardinal 0 - Ada:\nReform now."));
        assert!(!prompt.contains("Unity first."));
        assert!(!prompt.contains("Your vote history"));
    }

    #[test]
    fn test_discussion_prompt_includes_urgency() {
        let snapshot = snapshot();
        let elector = snapshot.roster().get(AgentId::new(2)).unwrap().clone();
        let urgency = UrgencyScore::new(AgentId::new(2), 88, "The vote is drifting");

        let prompt = PromptBuilder::new(&elector, &snapshot, &[]).discussion(Some(&urgency));
        assert!(prompt.contains("88/100"));
        assert!(prompt.contains("The vote is drifting"));

        let prompt = PromptBuilder::new(&elector, &snapshot, &[]).discussion(None);
        assert!(!prompt.contains("/100"));
    }

    #[test]
    fn test_discussion_history_format() {
        let snapshot = snapshot();
        let text = discussion_history(&snapshot.full_discussion(), snapshot.roster());
        assert_eq!(
            text,
            "Discussion Round 1:\nCardinal 1 - Basil:\nUnity first.\n\n\
             Discussion Round 2:\nCardinal 0 - Ada:\nReform now.\n\n"
        );
    }
}
