use futures_util::stream::{self, Stream, StreamExt};
use serde_json::Value;

use crate::constants::{SSE_DATA_PREFIX, SSE_DONE_MESSAGE, SSE_MESSAGE_BOUNDARY};
use crate::error::ProxyError;

struct DecodeState {
    bytes: std::pin::Pin<
        Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static>,
    >,
    buffer: Vec<u8>,
    upstream_done: bool,
    finished: bool,
}

/// Decode the backend's SSE response into a lazy sequence of parsed JSON
/// chunks. The sequence ends at the `[DONE]` marker or at stream end; a
/// network failure surfaces as a single trailing `Err` item. The buffer is
/// kept as raw bytes so a UTF-8 code point split across two network chunks
/// cannot corrupt an event.
pub fn sse_json_stream(
    response: reqwest::Response,
) -> impl Stream<Item = Result<Value, ProxyError>> + Send + 'static {
    let state = DecodeState {
        bytes: Box::pin(response.bytes_stream()),
        buffer: Vec::new(),
        upstream_done: false,
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if st.finished {
                return None;
            }

            // Drain complete events already buffered.
            while let Some(boundary) = find_boundary(&st.buffer) {
                let event: Vec<u8> = st.buffer.drain(..boundary + SSE_MESSAGE_BOUNDARY.len()).collect();
                let event_text = String::from_utf8_lossy(&event[..boundary]).into_owned();
                match parse_event(&event_text) {
                    ParsedEvent::Chunk(value) => return Some((Ok(value), st)),
                    ParsedEvent::Done => {
                        st.finished = true;
                        return None;
                    }
                    ParsedEvent::Skip => {}
                }
            }

            if st.upstream_done {
                st.finished = true;
                // Tolerate a final event missing the trailing boundary.
                let tail = String::from_utf8_lossy(&st.buffer).into_owned();
                st.buffer.clear();
                match parse_event(&tail) {
                    ParsedEvent::Chunk(value) => return Some((Ok(value), st)),
                    _ => return None,
                }
            }

            match st.bytes.next().await {
                Some(Ok(chunk)) => st.buffer.extend_from_slice(&chunk),
                Some(Err(err)) => {
                    st.finished = true;
                    let error = if err.is_timeout() {
                        ProxyError::upstream_timeout()
                    } else {
                        ProxyError::upstream_error()
                    };
                    return Some((Err(error), st));
                }
                None => st.upstream_done = true,
            }
        }
    })
}

enum ParsedEvent {
    Chunk(Value),
    Done,
    Skip,
}

fn parse_event(event: &str) -> ParsedEvent {
    let trimmed = event.trim();
    if trimmed.is_empty() {
        return ParsedEvent::Skip;
    }
    let Some(data) = trimmed
        .strip_prefix(SSE_DATA_PREFIX)
        .or_else(|| trimmed.strip_prefix("data:"))
    else {
        log::warn!("SSE format: non-standard event from backend");
        return ParsedEvent::Skip;
    };
    let data = data.trim();
    if data == SSE_DONE_MESSAGE {
        return ParsedEvent::Done;
    }
    match serde_json::from_str::<Value>(data) {
        Ok(value) => ParsedEvent::Chunk(value),
        Err(e) => {
            log::warn!("SSE parsing error: {}", e);
            ParsedEvent::Skip
        }
    }
}

fn find_boundary(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(SSE_MESSAGE_BOUNDARY.len())
        .position(|window| window == SSE_MESSAGE_BOUNDARY.as_bytes())
}
