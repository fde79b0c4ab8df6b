use std::time::Instant;

use serde_json::Value;

use crate::constants::LOG_PREFIX_SUCCESS;
use crate::error::ProxyError;
use crate::handlers::RequestContext;
use crate::handlers::keep_alive::parse_keep_alive_seconds;
use crate::handlers::response::json_response;
use crate::handlers::transform::{build_embed_params, convert_to_ollama_embedding};
use crate::handlers::validate::{extract_embedding_input, extract_model_name};
use crate::logging::log_timed;

/// Serves both /api/embeddings and /api/embed with identical behaviour.
/// The Ollama shape is a single input string and a single output vector;
/// the vector length is passed through untouched.
pub async fn handle_embeddings(
    context: RequestContext,
    body: Value,
) -> Result<warp::reply::Response, ProxyError> {
    let start_time = Instant::now();
    let model = extract_model_name(&body)?;
    let input = extract_embedding_input(&body)?;
    parse_keep_alive_seconds(body.get("keep_alive"))?;

    let params = build_embed_params(model, input);
    let response = context.backend.embed(params, &context.scope).await?;
    let payload = convert_to_ollama_embedding(&response)?;

    log_timed(
        LOG_PREFIX_SUCCESS,
        &format!("[{}] embeddings", context.scope.correlation_id),
        start_time,
    );
    Ok(json_response(&payload))
}
