//! CLI command definitions

use clap::{Parser, ValueEnum};
use conclave_domain::{ElectionRule, SpeakerPolicy};
use std::path::PathBuf;

/// Output format for the final result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Live round-by-round narration plus a final summary
    Text,
    /// JSON result only
    Json,
}

/// Speaker selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Uniformly random speakers
    Random,
    /// Speakers who report the highest urgency
    Urgency,
}

impl From<PolicyArg> for SpeakerPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Random => SpeakerPolicy::Random,
            PolicyArg::Urgency => SpeakerPolicy::Urgency,
        }
    }
}

/// Election rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    /// More than two thirds of all electors
    Supermajority,
    /// More than half of all electors
    Majority,
    /// Every elector
    Unanimous,
}

impl From<RuleArg> for ElectionRule {
    fn from(arg: RuleArg) -> Self {
        match arg {
            RuleArg::Supermajority => ElectionRule::Supermajority,
            RuleArg::Majority => ElectionRule::Majority,
            RuleArg::Unanimous => ElectionRule::Unanimous,
        }
    }
}

/// CLI arguments for conclave
#[derive(Parser, Debug)]
#[command(name = "conclave")]
#[command(author, version, about = "Papal conclave simulation - electors discuss and vote until a supermajority emerges")]
#[command(long_about = r#"
Conclave simulates an election among a roster of electors.

Each cycle has two steps:
1. Discussion: a few electors (random, or the most urgent) address the others
2. Voting: every elector casts a ballot in parallel

The run ends when one candidate receives more than two thirds of all votes,
or when --max-rounds is reached.

Configuration files are loaded from (in priority order):
1. CONCLAVE_* environment variables (e.g. CONCLAVE_EXECUTOR__WORKER_CAP=4)
2. --config <path>     Explicit config file
3. ./conclave.toml     Project-level config
4. ~/.config/conclave/config.toml   Global config

Example:
  conclave --roster cardinals.toml
  conclave --roster cardinals.toml --policy urgency --speakers 3 --max-rounds 20
  conclave --roster cardinals.toml --scripted --seed 7 --output json
"#)]
pub struct Cli {
    /// Roster file (TOML, one [[electors]] table per elector)
    #[arg(short, long, value_name = "PATH")]
    pub roster: Option<PathBuf>,

    /// Use only the first N electors of the roster
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Speakers per discussion round
    #[arg(short, long, value_name = "N")]
    pub speakers: Option<usize>,

    /// Speaker selection policy
    #[arg(short, long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Election rule
    #[arg(long, value_enum)]
    pub rule: Option<RuleArg>,

    /// Stop after N voting rounds without a winner
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<usize>,

    /// Seed for speaker and candidate shuffles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run a single voting round without discussion
    #[arg(long)]
    pub single_ballot: bool,

    /// Use offline scripted electors instead of an LLM
    #[arg(long)]
    pub scripted: bool,

    /// Maximum concurrent elector calls
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Model for LLM electors
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Do not write the JSONL event transcript
    #[arg(long)]
    pub no_transcript: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
