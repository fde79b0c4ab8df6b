use std::time::Instant;

use serde_json::Value;
use warp::hyper::Body;

use crate::constants::{
    CONTENT_TYPE_JSON, HEADER_ACCESS_CONTROL_ALLOW_HEADERS, HEADER_ACCESS_CONTROL_ALLOW_METHODS,
    HEADER_ACCESS_CONTROL_ALLOW_ORIGIN, HEADER_CACHE_CONTROL,
};
use crate::error::ProxyError;
use crate::handlers::RequestContext;
use crate::handlers::transform::{convert_to_ollama_chat, convert_to_ollama_generate};
use crate::streaming::{FrameKind, adapt_stream, ndjson_response};

pub fn json_response(value: &Value) -> warp::reply::Response {
    json_response_with_cache(value, HEADER_CACHE_CONTROL)
}

pub fn json_response_with_cache(value: &Value, cache_control: &str) -> warp::reply::Response {
    let json_string = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());
    let content_length = json_string.len();

    warp::http::Response::builder()
        .status(warp::http::StatusCode::OK)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .header("Content-Length", content_length.to_string())
        .header("Cache-Control", cache_control)
        .header(
            "Access-Control-Allow-Origin",
            HEADER_ACCESS_CONTROL_ALLOW_ORIGIN,
        )
        .header(
            "Access-Control-Allow-Methods",
            HEADER_ACCESS_CONTROL_ALLOW_METHODS,
        )
        .header(
            "Access-Control-Allow-Headers",
            HEADER_ACCESS_CONTROL_ALLOW_HEADERS,
        )
        .body(Body::from(json_string))
        .unwrap_or_else(|_| {
            warp::http::Response::builder()
                .status(warp::http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("Internal Server Error"))
                .unwrap()
        })
}

/// Drive a chat-completion call either as a unary envelope or as an ndjson
/// frame stream, per the request's `stream` flag.
pub async fn dispatch_model_call(
    context: &RequestContext,
    params: Value,
    stream: bool,
    kind: FrameKind,
    model: &str,
    start: Instant,
) -> Result<warp::reply::Response, ProxyError> {
    if stream {
        let chunks = context.backend.chat_stream(params, &context.scope).await?;
        let deadline = tokio::time::Instant::now() + context.stream_timeout;
        let frames = adapt_stream(chunks, model.to_string(), kind, deadline);
        ndjson_response(frames)
    } else {
        let response = context.backend.chat(params, &context.scope).await?;
        let body = match kind {
            FrameKind::Chat => convert_to_ollama_chat(&response, model, start),
            FrameKind::Generate => convert_to_ollama_generate(&response, model, start),
        };
        Ok(json_response(&body))
    }
}
