use std::time::Instant;

use serde_json::Value;

use crate::constants::{ERROR_IMAGES_NOT_SUPPORTED, ERROR_MISSING_MESSAGES, LOG_PREFIX_SUCCESS};
use crate::error::ProxyError;
use crate::handlers::RequestContext;
use crate::handlers::keep_alive::parse_keep_alive_seconds;
use crate::handlers::response::dispatch_model_call;
use crate::handlers::transform::{
    build_chat_params, expand_message_images, messages_contain_images,
};
use crate::handlers::validate::{extract_model_name, streaming_requested};
use crate::logging::log_timed;
use crate::streaming::FrameKind;

pub async fn handle_chat(
    context: RequestContext,
    body: Value,
) -> Result<warp::reply::Response, ProxyError> {
    let start_time = Instant::now();
    let model = extract_model_name(&body)?;

    let messages = body
        .get("messages")
        .and_then(|m| m.as_array())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ProxyError::bad_request(ERROR_MISSING_MESSAGES))?;

    // The stream flag is only consulted once the request shape is valid.
    let stream = streaming_requested(&body);

    let keep_alive = parse_keep_alive_seconds(body.get("keep_alive"))?;
    if keep_alive.is_some() {
        log::debug!(
            "[{}] keep_alive hint has no backend equivalent, ignored",
            context.scope.correlation_id
        );
    }

    // Roles map identity onto the backend; per-message image arrays become
    // multi-modal content parts, but only models with vision support accept
    // them.
    if messages_contain_images(messages) && !context.registry.supports_vision(model) {
        return Err(ProxyError::bad_request(ERROR_IMAGES_NOT_SUPPORTED));
    }
    let messages = expand_message_images(messages);
    let params = build_chat_params(
        model,
        messages,
        stream,
        body.get("options"),
        body.get("tools"),
        body.get("format"),
    );

    let response =
        dispatch_model_call(&context, params, stream, FrameKind::Chat, model, start_time).await?;

    log_timed(
        LOG_PREFIX_SUCCESS,
        &format!("[{}] chat", context.scope.correlation_id),
        start_time,
    );
    Ok(response)
}
