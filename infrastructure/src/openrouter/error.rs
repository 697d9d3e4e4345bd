//! Error types for the OpenRouter adapter

use conclave_application::DecisionError;
use thiserror::Error;

/// Substrings that identify an exhausted account rather than a transient failure
const CREDIT_MARKERS: [&str; 7] = [
    "insufficient_quota",
    "insufficient credits",
    "credits depleted",
    "no credits",
    "out of tokens",
    "token balance",
    "token limit",
];

/// Errors that can occur when talking to OpenRouter
#[derive(Error, Debug)]
pub enum OpenRouterError {
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("OpenRouter credits are depleted: {0}")]
    CreditsExhausted(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl OpenRouterError {
    /// Classify a failed response by status code and body
    pub fn from_status(status: u16, body: &str) -> Self {
        let lowered = body.to_lowercase();
        if status == 402 || CREDIT_MARKERS.iter().any(|m| lowered.contains(m)) {
            return OpenRouterError::CreditsExhausted(body.trim().to_string());
        }
        OpenRouterError::Api {
            status,
            message: body.trim().to_string(),
        }
    }

    /// Server-side failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, OpenRouterError::Api { status, .. } if *status >= 500)
    }
}

impl From<OpenRouterError> for DecisionError {
    fn from(err: OpenRouterError) -> Self {
        match err {
            OpenRouterError::MissingApiKey(_) | OpenRouterError::CreditsExhausted(_) => {
                DecisionError::ChannelUnavailable(err.to_string())
            }
            OpenRouterError::InvalidResponse(message) => DecisionError::Malformed(message),
            other => DecisionError::Gateway(other.to_string()),
        }
    }
}
