use bytes::Bytes;
use serde_json::{Value, json};

use crate::handlers::transform::TimingInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Chat,
    Generate,
}

/// One Ollama streaming frame. Non-terminal frames carry the incremental
/// text delta; the terminal frame carries an empty delta plus the summary
/// fields added by [`create_terminal_frame`].
pub fn create_stream_frame(model: &str, content: &str, kind: FrameKind, done: bool) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match kind {
        FrameKind::Chat => json!({
            "model": model,
            "created_at": timestamp,
            "message": {
                "role": "assistant",
                "content": content
            },
            "done": done
        }),
        FrameKind::Generate => json!({
            "model": model,
            "created_at": timestamp,
            "response": content,
            "done": done
        }),
    }
}

pub fn create_terminal_frame(
    model: &str,
    kind: FrameKind,
    done_reason: &str,
    timing: &TimingInfo,
) -> Value {
    let mut frame = create_stream_frame(model, "", kind, true);

    if let Some(obj) = frame.as_object_mut() {
        obj.insert("done_reason".to_string(), json!(done_reason));
        obj.insert("total_duration".to_string(), json!(timing.total_duration));
        obj.insert("load_duration".to_string(), json!(timing.load_duration));
        obj.insert(
            "prompt_eval_count".to_string(),
            json!(timing.prompt_eval_count),
        );
        obj.insert(
            "prompt_eval_duration".to_string(),
            json!(timing.prompt_eval_duration),
        );
        obj.insert("eval_count".to_string(), json!(timing.eval_count));
        obj.insert("eval_duration".to_string(), json!(timing.eval_duration));
    }
    frame
}

/// Terminal frame used when the backend fails after frames have been
/// written: `done_reason` is "error" and the message rides in `error`.
pub fn create_error_frame(
    model: &str,
    kind: FrameKind,
    error_message: &str,
    timing: &TimingInfo,
) -> Value {
    let mut frame = create_terminal_frame(model, kind, "error", timing);
    if let Some(obj) = frame.as_object_mut() {
        obj.insert("error".to_string(), json!(error_message));
    }
    frame
}

/// One newline-terminated JSON object per frame; no SSE prefix.
pub fn serialize_frame(frame: &Value) -> Bytes {
    let mut line = serde_json::to_string(frame).unwrap_or_else(|_| "{}".to_string());
    line.push('\n');
    Bytes::from(line)
}
