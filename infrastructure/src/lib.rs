//! Infrastructure layer for conclave
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration and roster file loading, LLM-backed and
//! scripted electors, and the JSONL event transcript.

pub mod config;
pub mod logging;
pub mod openrouter;
pub mod roster;
pub mod scripted;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileElectionConfig, FileExecutorConfig,
    FileLoggingConfig, FileOpenRouterConfig,
};
pub use logging::JsonlEventLogger;
pub use openrouter::{LlmElector, OpenRouterClient, OpenRouterError, ToolChannel};
pub use roster::{LoadedRoster, RosterEntry, RosterError, RosterLoader};
pub use scripted::ScriptedElector;
