use std::io;
use std::time::Instant;

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use serde_json::Value;
use tokio::time::timeout_at;

use crate::constants::ERROR_UPSTREAM_TIMEOUT;
use crate::handlers::transform::{TimingInfo, map_done_reason};
use crate::openai::ChunkStream;

use super::chunks::{
    FrameKind, create_error_frame, create_stream_frame, create_terminal_frame, serialize_frame,
};

/// Wall-clock and token accounting across one streaming response.
pub struct StreamStats {
    started: Instant,
    first_content_at: Option<Instant>,
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    finish_reason: Option<String>,
}

impl StreamStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            first_content_at: None,
            prompt_tokens: None,
            completion_tokens: None,
            finish_reason: None,
        }
    }

    /// Record usage totals and the finish reason from a backend chunk;
    /// returns the text delta when the chunk carries one.
    pub fn observe(&mut self, chunk: &Value) -> Option<String> {
        if let Some(usage) = chunk.get("usage").filter(|u| u.is_object()) {
            if let Some(prompt) = usage.get("prompt_tokens").and_then(|t| t.as_u64()) {
                self.prompt_tokens = Some(prompt);
            }
            if let Some(completion) = usage.get("completion_tokens").and_then(|t| t.as_u64()) {
                self.completion_tokens = Some(completion);
            }
        }

        let choice = chunk
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())?;

        if let Some(reason) = choice.get("finish_reason").and_then(|r| r.as_str()) {
            self.finish_reason = Some(reason.to_string());
        }

        let delta = choice.get("delta")?.get("content")?.as_str()?;
        if delta.is_empty() {
            return None;
        }
        if self.first_content_at.is_none() {
            self.first_content_at = Some(Instant::now());
        }
        Some(delta.to_string())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }

    pub fn timing(&self) -> TimingInfo {
        TimingInfo::from_stream(
            self.started,
            self.first_content_at,
            self.prompt_tokens,
            self.completion_tokens,
        )
    }
}

impl Default for StreamStats {
    fn default() -> Self {
        Self::new()
    }
}

struct AdapterState {
    upstream: ChunkStream,
    stats: StreamStats,
    model: String,
    kind: FrameKind,
    deadline: tokio::time::Instant,
    finished: bool,
}

/// Convert backend delta chunks into Ollama ndjson frames: one frame per
/// content-bearing chunk, then exactly one terminal frame. Pull semantics
/// are one-for-one with the consumer; no buffering beyond the chunk in
/// flight. Dropping the returned stream (client disconnect) drops the
/// backend response on the next poll cycle. The deadline bounds the whole
/// stream lifetime; on expiry a terminal timeout frame is emitted.
pub fn adapt_stream(
    upstream: ChunkStream,
    model: String,
    kind: FrameKind,
    deadline: tokio::time::Instant,
) -> impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static {
    let state = AdapterState {
        upstream,
        stats: StreamStats::new(),
        model,
        kind,
        deadline,
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if st.finished {
                return None;
            }

            match timeout_at(st.deadline, st.upstream.next()).await {
                Err(_) => {
                    st.finished = true;
                    let frame = create_error_frame(
                        &st.model,
                        st.kind,
                        ERROR_UPSTREAM_TIMEOUT,
                        &st.stats.timing(),
                    );
                    return Some((Ok(serialize_frame(&frame)), st));
                }
                Ok(None) => {
                    st.finished = true;
                    let done_reason = map_done_reason(st.stats.finish_reason());
                    let frame =
                        create_terminal_frame(&st.model, st.kind, done_reason, &st.stats.timing());
                    return Some((Ok(serialize_frame(&frame)), st));
                }
                Ok(Some(Err(error))) => {
                    st.finished = true;
                    let frame =
                        create_error_frame(&st.model, st.kind, &error.message, &st.stats.timing());
                    return Some((Ok(serialize_frame(&frame)), st));
                }
                Ok(Some(Ok(chunk))) => {
                    if let Some(delta) = st.stats.observe(&chunk) {
                        let frame = create_stream_frame(&st.model, &delta, st.kind, false);
                        return Some((Ok(serialize_frame(&frame)), st));
                    }
                }
            }
        }
    })
}
