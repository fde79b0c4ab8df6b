use std::time::Instant;

use crate::constants::{HEADER_CACHE_CONTROL_TAGS, LOG_PREFIX_SUCCESS};
use crate::error::ProxyError;
use crate::handlers::RequestContext;
use crate::handlers::response::json_response_with_cache;
use crate::handlers::transform::translate_tags;
use crate::logging::log_timed;

/// List the backend's models in Ollama tags shape. The gateway holds no
/// state: every request fetches and re-translates the backend list. The
/// Cache-Control header is only a hint for downstream caches.
pub async fn handle_tags(context: RequestContext) -> Result<warp::reply::Response, ProxyError> {
    let start_time = Instant::now();

    let models = context.backend.list_models(&context.scope).await?;
    let payload = translate_tags(&models, &context.registry);

    log_timed(
        LOG_PREFIX_SUCCESS,
        &format!(
            "[{}] tags ({} models)",
            context.scope.correlation_id,
            payload
                .get("models")
                .and_then(|m| m.as_array())
                .map(|m| m.len())
                .unwrap_or(0)
        ),
        start_time,
    );
    Ok(json_response_with_cache(&payload, HEADER_CACHE_CONTROL_TAGS))
}
