//! OpenRouter configuration from TOML (`[openrouter]` section)
//!
//! The API key itself is never stored in the file; `api_key_env` names the
//! environment variable to read it from.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Raw OpenRouter configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Retries for 5xx responses
    pub max_retries: u32,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_tokens: 1000,
            temperature: 0.5,
            max_retries: 3,
        }
    }
}
