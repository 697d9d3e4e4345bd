//! OpenRouter adapter
//!
//! Implements [`ElectorAgent`](conclave_application::ElectorAgent) on top of
//! the OpenRouter chat-completions API with forced tool calls.

pub mod client;
pub mod elector;
pub mod error;
pub mod prompt;
pub mod tools;
pub mod types;

pub use client::{OpenRouterClient, ToolChannel};
pub use elector::LlmElector;
pub use error::OpenRouterError;
pub use prompt::{PromptBuilder, VoteRecord};
