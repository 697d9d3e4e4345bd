//! Console output for conclave runs
//!
//! [`ConsoleReporter`] narrates round events as they happen;
//! [`ConsoleFormatter`] renders the final [`ConclaveResult`].

use colored::Colorize;
use conclave_application::{ConclaveObserver, ConclaveResult, StopReason};
use conclave_domain::{AgentId, BallotRound, ConclaveEvent, DiscussionEntry, Roster};

/// Narrates round events on stdout
pub struct ConsoleReporter {
    roster: Roster,
}

impl ConsoleReporter {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    fn cardinal(&self, agent: AgentId) -> String {
        format!("Cardinal {} - {}", agent, self.roster.name_of(agent))
    }

    /// Text for one event, or `None` for events not worth narrating
    pub fn render(&self, event: &ConclaveEvent) -> Option<String> {
        match event {
            ConclaveEvent::SpeakersSelected { round, policy, slate } => {
                let names: Vec<String> = slate
                    .speakers()
                    .into_iter()
                    .map(|agent| self.roster.name_of(agent).to_string())
                    .collect();
                let speakers = if names.is_empty() {
                    "nobody".dimmed().to_string()
                } else {
                    names.join(", ")
                };
                Some(format!(
                    "\n{} ({} selection): {}",
                    format!("Discussion round {}", round).cyan().bold(),
                    policy,
                    speakers
                ))
            }
            ConclaveEvent::DiscussionCompleted { entries, .. } => {
                Some(self.render_entries(entries))
            }
            ConclaveEvent::BallotCompleted { ballot } => Some(self.render_ballot(ballot)),
            ConclaveEvent::WinnerElected { round, winner } => Some(format!(
                "\n{} {} elected in round {}\n",
                "Habemus papam!".green().bold(),
                self.cardinal(*winner).bold(),
                round
            )),
        }
    }

    fn render_entries(&self, entries: &[DiscussionEntry]) -> String {
        if entries.is_empty() {
            return format!("{}", "  (no contributions)".dimmed());
        }
        entries
            .iter()
            .map(|entry| {
                format!(
                    "\n{} speaks:\n{}",
                    self.cardinal(entry.speaker).yellow().bold(),
                    ConsoleFormatter::indent(&entry.message, "  ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_ballot(&self, ballot: &BallotRound) -> String {
        let mut output = format!(
            "\n{} {} of {} votes cast, more than {:.2} needed\n",
            format!("Voting round {}:", ballot.round).cyan().bold(),
            ballot.votes_cast(),
            ballot.population,
            ballot.threshold
        );
        output.push_str(&ConsoleFormatter::tally_table(ballot, &self.roster));
        if !ballot.is_elected() {
            output.push_str(&format!("{}\n", "No candidate reached the threshold".yellow()));
        }
        output
    }
}

impl ConclaveObserver for ConsoleReporter {
    fn on_event(&self, event: &ConclaveEvent) {
        if let Some(text) = self.render(event) {
            println!("{}", text);
        }
    }
}

/// Formats conclave results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(result: &ConclaveResult, roster: &Roster) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Conclave Results"));
        output.push('\n');

        match &result.winner {
            Some(winner) => output.push_str(&format!(
                "{} {}\n",
                "Elected:".green().bold(),
                winner
            )),
            None => output.push_str(&format!(
                "{} {}\n",
                "Elected:".yellow().bold(),
                "nobody".dimmed()
            )),
        }

        output.push_str(&format!(
            "{} {}\n",
            "Outcome:".cyan().bold(),
            Self::stop_reason(result.stop_reason)
        ));
        output.push_str(&format!(
            "{} {} electors, {} voting rounds, {} discussion rounds\n",
            "Conclave:".cyan().bold(),
            result.population,
            result.voting_rounds,
            result.discussion_rounds
        ));

        if let Some(ballot) = result.final_ballot() {
            output.push_str(&Self::section_header(&format!(
                "Final ballot (round {})",
                ballot.round
            )));
            output.push_str(&Self::tally_table(ballot, roster));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &ConclaveResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Ranked vote counts, one candidate per line
    pub fn tally_table(ballot: &BallotRound, roster: &Roster) -> String {
        let mut output = String::new();
        for (candidate, votes) in ballot.tally.ranked() {
            let line = format!(
                "  {:>3}  {:<32} {}",
                candidate.index(),
                roster.name_of(candidate),
                votes
            );
            if ballot.winner() == Some(candidate) {
                output.push_str(&format!("{}\n", line.green().bold()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
        output
    }

    fn stop_reason(reason: StopReason) -> &'static str {
        match reason {
            StopReason::Elected => "a candidate reached the threshold",
            StopReason::RoundLimit => "round limit reached without a winner",
            StopReason::Cancelled => "cancelled",
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
