use serde_json::json;

use crate::error::ProxyError;
use crate::handlers::response::json_response;

/// Trivial liveness probe.
pub async fn handle_health() -> Result<warp::reply::Response, ProxyError> {
    Ok(json_response(&json!({ "status": "ok" })))
}

pub async fn handle_version() -> Result<warp::reply::Response, ProxyError> {
    Ok(json_response(&json!({ "version": crate::VERSION })))
}

/// Model-management endpoints (/api/pull, /api/push, /api/copy,
/// /api/create, /api/delete, /api/show, /api/ps) have nothing to manage on
/// a stateless gateway; they acknowledge with a success-shaped body so SDK
/// clients that call them keep working.
pub async fn handle_compat_success(
    endpoint: &'static str,
) -> Result<warp::reply::Response, ProxyError> {
    log::debug!("compat endpoint {} acknowledged", endpoint);
    Ok(json_response(&json!({ "status": "success" })))
}
