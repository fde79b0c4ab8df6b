use serde_json::Value;

use crate::constants::{ERROR_MISSING_INPUT, ERROR_MISSING_MODEL, ERROR_MISSING_PROMPT};
use crate::error::ProxyError;

pub fn extract_model_name(body: &Value) -> Result<&str, ProxyError> {
    body.get("model")
        .and_then(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProxyError::bad_request(ERROR_MISSING_MODEL))
}

pub fn extract_prompt(body: &Value) -> Result<&str, ProxyError> {
    body.get("prompt")
        .and_then(|p| p.as_str())
        .ok_or_else(|| ProxyError::bad_request(ERROR_MISSING_PROMPT))
}

/// Embedding input: `prompt` is the Ollama field, `input` is accepted as a
/// synonym. Must be a non-empty string.
pub fn extract_embedding_input(body: &Value) -> Result<&str, ProxyError> {
    body.get("prompt")
        .or_else(|| body.get("input"))
        .and_then(|p| p.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProxyError::bad_request(ERROR_MISSING_INPUT))
}

/// Ollama defaults generate and chat to streaming when the flag is absent.
pub fn streaming_requested(body: &Value) -> bool {
    body.get("stream").and_then(|s| s.as_bool()).unwrap_or(true)
}
