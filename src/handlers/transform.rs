use std::time::Instant;

use chrono::{DateTime, Local, Utc};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use crate::error::ProxyError;
use crate::registry::ModelRegistry;

/// Timing block of Ollama response envelopes, all values in nanoseconds.
/// The gateway does not host models, so `load_duration` is always zero.
#[derive(Debug, Clone)]
pub struct TimingInfo {
    pub total_duration: u64,
    pub load_duration: u64,
    pub prompt_eval_count: u64,
    pub prompt_eval_duration: u64,
    pub eval_count: u64,
    pub eval_duration: u64,
}

impl TimingInfo {
    /// Unary calls have no observable prompt/eval split; the whole elapsed
    /// time is reported as eval time and token counts come from the
    /// backend's usage block (zero when absent).
    pub fn from_unary(start: Instant, usage: Option<&Value>) -> Self {
        let total_duration = start.elapsed().as_nanos() as u64;
        Self {
            total_duration,
            load_duration: 0,
            prompt_eval_count: usage_tokens(usage, "prompt_tokens"),
            prompt_eval_duration: 0,
            eval_count: usage_tokens(usage, "completion_tokens"),
            eval_duration: total_duration,
        }
    }

    /// Streaming calls split at the arrival of the first content-bearing
    /// chunk: everything before it counts as prompt evaluation.
    pub fn from_stream(
        started: Instant,
        first_content_at: Option<Instant>,
        prompt_tokens: Option<u64>,
        completion_tokens: Option<u64>,
    ) -> Self {
        let now = Instant::now();
        let total_duration = now.duration_since(started).as_nanos() as u64;
        let (prompt_eval_duration, eval_duration) = match first_content_at {
            Some(first) => (
                first.duration_since(started).as_nanos() as u64,
                now.duration_since(first).as_nanos() as u64,
            ),
            None => (total_duration, 0),
        };

        Self {
            total_duration,
            load_duration: 0,
            prompt_eval_count: prompt_tokens.unwrap_or(0),
            prompt_eval_duration,
            eval_count: completion_tokens.unwrap_or(0),
            eval_duration,
        }
    }
}

fn usage_tokens(usage: Option<&Value>, key: &str) -> u64 {
    usage
        .and_then(|u| u.get(key))
        .and_then(|t| t.as_u64())
        .unwrap_or(0)
}

/// Synthetic stable digest per model id: `sha256:` plus the first 12 hex
/// characters of SHA-256 over `openai:<id>`.
pub fn model_digest(id: &str) -> String {
    let digest = Sha256::digest(format!("openai:{}", id).as_bytes());
    let mut hex = String::with_capacity(12);
    for byte in &digest[..6] {
        hex.push_str(&format!("{:02x}", byte));
    }
    format!("sha256:{}", hex)
}

const EXCLUDED_KEYWORDS: &[&str] = &[
    "davinci",
    "curie",
    "babbage",
    "ada",
    "instruct",
    "deprecated",
    "preview",
];

const INCLUDED_PREFIXES: &[&str] = &["gpt-", "chatgpt-", "text-embedding-", "o1-", "o3-"];

/// Filter for the tags listing. Registry-known models always pass;
/// otherwise legacy/special identifiers are excluded by substring and the
/// rest must match a chat or embedding prefix.
pub fn should_include_model(id: &str, registry: &ModelRegistry) -> bool {
    if registry.included(id) {
        return true;
    }
    let lower = id.to_ascii_lowercase();
    if EXCLUDED_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return false;
    }
    INCLUDED_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Epoch seconds to RFC 3339 in the gateway's local timezone. The numeric
/// offset form is required by Ollama clients; a bare `Z` is not emitted.
pub fn format_modified_at(created_epoch_seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(created_epoch_seconds, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&Local)
        .to_rfc3339()
}

/// One tags entry; `name` and `model` carry the same value by construction.
pub fn model_to_tags_entry(id: &str, created_epoch_seconds: i64, registry: &ModelRegistry) -> Value {
    json!({
        "name": id,
        "model": id,
        "modified_at": format_modified_at(created_epoch_seconds),
        "size": registry.size(id),
        "digest": model_digest(id),
    })
}

/// Backend model list to Ollama tags response: filter, translate, and sort
/// lexicographically for deterministic output.
pub fn translate_tags(models: &[Value], registry: &ModelRegistry) -> Value {
    let mut entries: Vec<(String, Value)> = models
        .iter()
        .filter_map(|model| {
            let id = model.get("id").and_then(|i| i.as_str())?;
            if !should_include_model(id, registry) {
                return None;
            }
            let created = model.get("created").and_then(|c| c.as_i64()).unwrap_or(0);
            Some((id.to_string(), model_to_tags_entry(id, created, registry)))
        })
        .collect();

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let models: Vec<Value> = entries.into_iter().map(|(_, entry)| entry).collect();
    json!({ "models": models })
}

/// Ollama `options` to chat-completion parameters. `top_k` and `num_ctx`
/// have no equivalent on the backend and are dropped.
pub fn map_options(options: Option<&Value>) -> Map<String, Value> {
    let mut params = Map::new();

    let Some(options) = options else {
        return params;
    };

    const DIRECT_MAPPINGS: &[&str] = &[
        "temperature",
        "top_p",
        "seed",
        "stop",
        "frequency_penalty",
        "presence_penalty",
    ];

    for param in DIRECT_MAPPINGS {
        if let Some(value) = options.get(*param) {
            params.insert(param.to_string(), value.clone());
        }
    }

    if let Some(num_predict) = options.get("num_predict") {
        params.insert("max_tokens".to_string(), num_predict.clone());
    }

    params
}

/// Ollama `format` to the backend's `response_format`: the literal "json"
/// selects JSON-object mode, an object becomes a strict structured-output
/// schema, anything else is dropped.
pub fn convert_format(format: Option<&Value>) -> Option<Value> {
    let value = format?;
    match value {
        Value::String(mode) if mode.eq_ignore_ascii_case("json") => {
            Some(json!({ "type": "json_object" }))
        }
        Value::Object(_) => Some(json!({
            "type": "json_schema",
            "json_schema": {
                "name": "ollama_format",
                "strict": true,
                "schema": value.clone()
            }
        })),
        _ => None,
    }
}

/// The generate prompt becomes a single user message, preceded by a system
/// message when one is given.
pub fn build_generate_messages(prompt: &str, system: Option<&str>) -> Value {
    let mut messages = Vec::with_capacity(2);
    if let Some(system_text) = system {
        messages.push(json!({
            "role": "system",
            "content": system_text,
        }));
    }
    messages.push(json!({
        "role": "user",
        "content": prompt,
    }));
    Value::Array(messages)
}

/// Whether any message carries a non-empty `images` array.
pub fn messages_contain_images(messages: &[Value]) -> bool {
    messages.iter().any(|message| {
        message
            .get("images")
            .and_then(|i| i.as_array())
            .is_some_and(|images| !images.is_empty())
    })
}

/// Per-message base64 `images` arrays become multi-modal `image_url`
/// content parts next to the message text. The caller checks the model's
/// vision capability first; this function only reshapes.
pub fn expand_message_images(messages: &[Value]) -> Value {
    let expanded: Vec<Value> = messages
        .iter()
        .map(|message| {
            let Some(obj) = message.as_object() else {
                return message.clone();
            };
            let Some(images) = obj.get("images").and_then(|i| i.as_array()) else {
                return message.clone();
            };

            let image_parts: Vec<Value> = images
                .iter()
                .filter_map(|img| {
                    img.as_str().map(|base64_data| {
                        json!({
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:image/jpeg;base64,{}", base64_data)
                            }
                        })
                    })
                })
                .collect();

            if image_parts.is_empty() {
                let mut cleaned = obj.clone();
                cleaned.remove("images");
                return Value::Object(cleaned);
            }

            let text = obj.get("content").and_then(|c| c.as_str()).unwrap_or("");
            let mut parts = vec![json!({ "type": "text", "text": text })];
            parts.extend(image_parts);

            let mut updated = obj.clone();
            updated.remove("images");
            updated.insert("content".to_string(), Value::Array(parts));
            Value::Object(updated)
        })
        .collect();

    Value::Array(expanded)
}

/// Assemble the chat-completion call parameters. Streaming calls request
/// usage totals on the final chunk so the terminal frame can report real
/// token counts.
pub fn build_chat_params(
    model: &str,
    messages: Value,
    stream: bool,
    options: Option<&Value>,
    tools: Option<&Value>,
    format: Option<&Value>,
) -> Value {
    let mut params = Map::new();
    params.insert("model".to_string(), json!(model));
    params.insert("messages".to_string(), messages);
    params.insert("stream".to_string(), json!(stream));
    if stream {
        params.insert(
            "stream_options".to_string(),
            json!({ "include_usage": true }),
        );
    }

    if let Some(tools_value) = tools
        && tools_value.is_array()
        && !tools_value.as_array().unwrap().is_empty()
    {
        params.insert("tools".to_string(), tools_value.clone());
    }

    for (key, value) in map_options(options) {
        params.insert(key, value);
    }

    if let Some(response_format) = convert_format(format) {
        params.insert("response_format".to_string(), response_format);
    }

    Value::Object(params)
}

pub fn build_embed_params(model: &str, input: &str) -> Value {
    json!({
        "model": model,
        "input": input,
    })
}

/// Backend finish reason to Ollama `done_reason`. Tool calls end a turn
/// normally, so they map to "stop" like every other non-length reason.
pub fn map_done_reason(finish_reason: Option<&str>) -> &'static str {
    match finish_reason {
        Some("length") => "length",
        _ => "stop",
    }
}

fn first_choice(response: &Value) -> Option<&Value> {
    response.get("choices").and_then(|c| c.as_array())?.first()
}

pub fn extract_finish_reason(response: &Value) -> Option<&str> {
    first_choice(response)?
        .get("finish_reason")
        .and_then(|r| r.as_str())
}

pub fn extract_chat_content(response: &Value) -> String {
    first_choice(response)
        .and_then(|choice| choice.get("message")?.get("content")?.as_str())
        .unwrap_or("")
        .to_string()
}

fn extract_tool_calls(response: &Value) -> Option<Value> {
    let tool_calls = first_choice(response)?
        .get("message")?
        .get("tool_calls")?
        .as_array()?;
    if tool_calls.is_empty() {
        return None;
    }
    Some(json!(tool_calls))
}

fn extract_usage(response: &Value) -> Option<&Value> {
    response.get("usage").filter(|u| u.is_object())
}

/// Unary generate envelope.
pub fn convert_to_ollama_generate(response: &Value, model: &str, start: Instant) -> Value {
    let content = extract_chat_content(response);
    let timing = TimingInfo::from_unary(start, extract_usage(response));
    let done_reason = map_done_reason(extract_finish_reason(response));

    json!({
        "model": model,
        "created_at": Utc::now().to_rfc3339(),
        "response": content,
        "done": true,
        "done_reason": done_reason,
        "total_duration": timing.total_duration,
        "load_duration": timing.load_duration,
        "prompt_eval_count": timing.prompt_eval_count,
        "prompt_eval_duration": timing.prompt_eval_duration,
        "eval_count": timing.eval_count,
        "eval_duration": timing.eval_duration
    })
}

/// Unary chat envelope; backend tool calls are attached to the message
/// verbatim.
pub fn convert_to_ollama_chat(response: &Value, model: &str, start: Instant) -> Value {
    let content = extract_chat_content(response);
    let timing = TimingInfo::from_unary(start, extract_usage(response));
    let done_reason = map_done_reason(extract_finish_reason(response));

    let mut message = json!({
        "role": "assistant",
        "content": content
    });
    if let Some(tool_calls) = extract_tool_calls(response)
        && let Some(obj) = message.as_object_mut()
    {
        obj.insert("tool_calls".to_string(), tool_calls);
    }

    json!({
        "model": model,
        "created_at": Utc::now().to_rfc3339(),
        "message": message,
        "done": true,
        "done_reason": done_reason,
        "total_duration": timing.total_duration,
        "load_duration": timing.load_duration,
        "prompt_eval_count": timing.prompt_eval_count,
        "prompt_eval_duration": timing.prompt_eval_duration,
        "eval_count": timing.eval_count,
        "eval_duration": timing.eval_duration
    })
}

/// The backend returns `data[0].embedding`; the vector is passed through
/// unchanged, wrapped in the singular `embedding` field Ollama clients
/// expect.
pub fn convert_to_ollama_embedding(response: &Value) -> Result<Value, ProxyError> {
    let vector = response
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|data| data.first())
        .and_then(|item| item.get("embedding"))
        .filter(|e| e.is_array())
        .cloned()
        .ok_or_else(ProxyError::upstream_error)?;

    Ok(json!({ "embedding": vector }))
}

/// Generate-request fields the backend cannot represent. Their presence is
/// tolerated; the caller logs the names (never the values) and proceeds.
pub fn unsupported_generate_fields(body: &Value) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    if body.get("raw").and_then(|r| r.as_bool()).unwrap_or(false) {
        ignored.push("raw");
    }
    if body.get("template").is_some_and(|t| !t.is_null()) {
        ignored.push("template");
    }
    if body.get("context").is_some_and(|c| !c.is_null()) {
        ignored.push("context");
    }
    ignored
}
