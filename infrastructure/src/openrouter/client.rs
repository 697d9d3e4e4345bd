//! OpenRouter chat-completions client
//!
//! Sends a single user prompt with one forced tool and returns the parsed
//! tool arguments. Server errors are retried with a short exponential
//! backoff; exhausted credits are reported immediately.

use super::error::OpenRouterError;
use super::types::{ChatMessage, ChatRequest, ChatResponse, ToolChoice, ToolDefinition};
use crate::config::FileOpenRouterConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Exponential backoff for the `attempt`-th retry (1-based), capped
fn retry_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    RETRY_BASE_DELAY.saturating_mul(factor).min(RETRY_MAX_DELAY)
}

/// Anything that can answer a prompt with a forced tool call
///
/// `Ok(None)` means the model replied without calling the tool.
#[async_trait]
pub trait ToolChannel: Send + Sync {
    async fn invoke_tool(
        &self,
        prompt: &str,
        tool: &ToolDefinition,
    ) -> Result<Option<Value>, OpenRouterError>;
}

/// HTTP client for the OpenRouter API
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
}

impl OpenRouterClient {
    /// Build a client, reading the API key from `config.api_key_env`
    pub fn from_config(config: &FileOpenRouterConfig) -> Result<Self, OpenRouterError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| OpenRouterError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    pub fn new(config: &FileOpenRouterConfig, api_key: impl Into<String>) -> Result<Self, OpenRouterError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_once(&self, request: &ChatRequest<'_>) -> Result<ChatResponse, OpenRouterError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenRouterError::from_status(status.as_u16(), &body));
        }

        let body: ChatResponse = response.json().await?;
        if let Some(error) = &body.error {
            let status = error
                .code
                .as_ref()
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(500);
            return Err(OpenRouterError::from_status(status, &error.message));
        }
        Ok(body)
    }
}

/// Pull the named tool call's arguments out of a completion
pub fn extract_tool_arguments(
    response: &ChatResponse,
    tool_name: &str,
) -> Result<Option<Value>, OpenRouterError> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| OpenRouterError::InvalidResponse("Empty response from API".to_string()))?;

    let Some(call) = choice
        .message
        .tool_calls
        .as_ref()
        .and_then(|calls| calls.first())
    else {
        return Ok(None);
    };

    if call.function.name != tool_name {
        return Err(OpenRouterError::InvalidResponse(format!(
            "Expected tool {}, model called {}",
            tool_name, call.function.name
        )));
    }

    serde_json::from_str(&call.function.arguments)
        .map(Some)
        .map_err(|e| OpenRouterError::InvalidResponse(format!("Bad tool arguments: {}", e)))
}

#[async_trait]
impl ToolChannel for OpenRouterClient {
    async fn invoke_tool(
        &self,
        prompt: &str,
        tool: &ToolDefinition,
    ) -> Result<Option<Value>, OpenRouterError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            tools: vec![tool.clone()],
            tool_choice: ToolChoice::forced(tool),
        };

        let mut attempt = 0;
        loop {
            match self.send_once(&request).await {
                Ok(response) => {
                    debug!("{} answered {}", self.model, tool.name());
                    return extract_tool_arguments(&response, tool.name());
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Server error, retrying ({}/{}): {}",
                        attempt, self.max_retries, e
                    );
                    tokio::time::sleep(retry_delay(attempt)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
