//! Presentation layer for conclave
//!
//! This crate contains CLI definitions, console output, and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, PolicyArg, RuleArg};
pub use output::console::{ConsoleFormatter, ConsoleReporter};
pub use progress::reporter::{ProgressReporter, SimpleProgress, progress_observer};
