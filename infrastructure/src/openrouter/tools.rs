//! Forced tool definitions and argument parsing
//!
//! Each elector decision is a single forced function call: `cast_vote`,
//! `evaluate_speaking_urgency`, or `speak_message`.

use super::types::ToolDefinition;
use conclave_application::DecisionError;
use serde_json::{Value, json};

pub const CAST_VOTE: &str = "cast_vote";
pub const EVALUATE_URGENCY: &str = "evaluate_speaking_urgency";
pub const SPEAK_MESSAGE: &str = "speak_message";

/// Urgency reported when the model answers without calling the tool
pub const FALLBACK_URGENCY: i64 = 50;

pub fn cast_vote_tool() -> ToolDefinition {
    ToolDefinition::function(
        CAST_VOTE,
        "Cast a vote for a candidate",
        json!({
            "type": "object",
            "properties": {
                "candidate": {
                    "type": "integer",
                    "description": "The ID of the candidate to vote for"
                },
                "explanation": {
                    "type": "string",
                    "description": "Why you chose this candidate"
                }
            },
            "required": ["candidate", "explanation"]
        }),
    )
}

pub fn urgency_tool() -> ToolDefinition {
    ToolDefinition::function(
        EVALUATE_URGENCY,
        "Evaluate how urgently you want to speak",
        json!({
            "type": "object",
            "properties": {
                "urgency_score": {
                    "type": "integer",
                    "description": "Your urgency score (1-100)"
                },
                "reasoning": {
                    "type": "string",
                    "description": "Why you rated your urgency at this level"
                }
            },
            "required": ["urgency_score", "reasoning"]
        }),
    )
}

pub fn speak_tool() -> ToolDefinition {
    ToolDefinition::function(
        SPEAK_MESSAGE,
        "Contribute a message to the conclave discussion",
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Your contribution to the discussion (100-300 words)"
                }
            },
            "required": ["message"]
        }),
    )
}

fn text_field(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parsed `cast_vote` arguments: candidate index and explanation
pub fn parse_vote(args: &Value) -> Result<(usize, String), DecisionError> {
    let candidate = args
        .get("candidate")
        .and_then(Value::as_u64)
        .ok_or_else(|| DecisionError::Malformed(format!("candidate is not an id: {}", args)))?;
    let candidate = usize::try_from(candidate)
        .map_err(|_| DecisionError::Malformed(format!("candidate out of range: {}", candidate)))?;
    let explanation =
        text_field(args, "explanation").unwrap_or_else(|| "No explanation provided.".to_string());
    Ok((candidate, explanation))
}

/// Parsed `evaluate_speaking_urgency` arguments (score not yet clamped)
pub fn parse_urgency(args: &Value) -> (i64, String) {
    let score = args
        .get("urgency_score")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
        .unwrap_or(FALLBACK_URGENCY);
    let reasoning =
        text_field(args, "reasoning").unwrap_or_else(|| "No reasoning provided.".to_string());
    (score, reasoning)
}

/// Parsed `speak_message` arguments; blank messages are no contribution
pub fn parse_message(args: &Value) -> Option<String> {
    text_field(args, "message")
}
