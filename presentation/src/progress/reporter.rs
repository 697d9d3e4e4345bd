//! Progress reporting for round fan-outs

use colored::Colorize;
use conclave_application::ConclaveObserver;
use conclave_domain::{AgentId, Roster, RoundStage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};

/// Reports fan-out progress with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    roster: Roster,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(roster: Roster) -> Self {
        Self {
            multi: MultiProgress::new(),
            roster,
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn label(&self, agent: AgentId) -> String {
        format!("{} {}", agent, self.roster.name_of(agent))
    }
}

impl ConclaveObserver for ProgressReporter {
    fn on_fan_out_start(&self, stage: RoundStage, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(stage.display_name().to_string());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_unit_complete(&self, _stage: RoundStage, agent: AgentId, success: bool) {
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), self.label(agent))
            } else {
                format!("{} {}", "x".red(), self.label(agent))
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_fan_out_complete(&self, stage: RoundStage) {
        if let Ok(mut bar) = self.stage_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
            let _ = self
                .multi
                .println(format!("{} {}", "v".green(), stage.display_name().dimmed()));
        }
    }
}

/// Plain line-per-stage progress on stderr, for non-interactive runs
pub struct SimpleProgress;

impl SimpleProgress {
    fn start_line(stage: RoundStage, total: usize) -> String {
        format!(
            "{} {} ({} electors)",
            "->".cyan(),
            stage.display_name().bold(),
            total
        )
    }

    fn failure_line(agent: AgentId) -> String {
        format!("  {} elector {} (failed)", "x".red(), agent)
    }
}

impl ConclaveObserver for SimpleProgress {
    fn on_fan_out_start(&self, stage: RoundStage, total: usize) {
        eprintln!("{}", Self::start_line(stage, total));
    }

    fn on_unit_complete(&self, _stage: RoundStage, agent: AgentId, success: bool) {
        if !success {
            eprintln!("{}", Self::failure_line(agent));
        }
    }
}

/// Bars on an interactive terminal, plain lines otherwise
pub fn progress_observer(roster: Roster, interactive: bool) -> Arc<dyn ConclaveObserver> {
    if interactive {
        Arc::new(ProgressReporter::new(roster))
    } else {
        Arc::new(SimpleProgress)
    }
}
