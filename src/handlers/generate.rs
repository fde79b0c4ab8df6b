use std::time::Instant;

use serde_json::Value;

use crate::constants::LOG_PREFIX_SUCCESS;
use crate::error::ProxyError;
use crate::handlers::RequestContext;
use crate::handlers::keep_alive::parse_keep_alive_seconds;
use crate::handlers::response::dispatch_model_call;
use crate::handlers::transform::{
    build_chat_params, build_generate_messages, unsupported_generate_fields,
};
use crate::handlers::validate::{extract_model_name, extract_prompt, streaming_requested};
use crate::logging::log_timed;
use crate::streaming::FrameKind;

pub async fn handle_generate(
    context: RequestContext,
    body: Value,
) -> Result<warp::reply::Response, ProxyError> {
    let start_time = Instant::now();
    let model = extract_model_name(&body)?;
    let prompt = extract_prompt(&body)?;
    let stream = streaming_requested(&body);

    let keep_alive = parse_keep_alive_seconds(body.get("keep_alive"))?;
    if keep_alive.is_some() {
        log::debug!(
            "[{}] keep_alive hint has no backend equivalent, ignored",
            context.scope.correlation_id
        );
    }

    // template, context, and raw are not representable on the backend;
    // their presence does not fail the request.
    let ignored = unsupported_generate_fields(&body);
    if !ignored.is_empty() {
        log::debug!(
            "[{}] generate fields not supported by backend, ignored: {:?}",
            context.scope.correlation_id,
            ignored
        );
    }

    let system = body.get("system").and_then(|s| s.as_str());
    let messages = build_generate_messages(prompt, system);
    let params = build_chat_params(
        model,
        messages,
        stream,
        body.get("options"),
        None,
        body.get("format"),
    );

    let response =
        dispatch_model_call(&context, params, stream, FrameKind::Generate, model, start_time)
            .await?;

    log_timed(
        LOG_PREFIX_SUCCESS,
        &format!("[{}] generate", context.scope.correlation_id),
        start_time,
    );
    Ok(response)
}
