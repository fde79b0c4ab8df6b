use std::sync::Arc;

use serde_json::Value;
use warp::Filter;

use crate::constants::MAX_JSON_BODY_SIZE_BYTES;
use crate::handlers::validate::extract_model_name;
use crate::handlers::{self, RequestContext, RequestScope};
use crate::logging::log_request;
use crate::server::GatewayServer;

pub fn create_routes(
    server: Arc<GatewayServer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_server_state = warp::any().map(move || server.clone());

    let health_route = warp::path!("health")
        .and(warp::get())
        .and_then(|| async move {
            handlers::handle_health()
                .await
                .map_err(warp::reject::custom)
        });

    let tags_route = warp::path!("api" / "tags")
        .and(warp::get())
        .and(with_server_state.clone())
        .and_then(|s: Arc<GatewayServer>| async move {
            let context = create_context(&s);
            log_request(&context.scope.correlation_id, "GET", "/api/tags", None);
            handlers::handle_tags(context)
                .await
                .map_err(warp::reject::custom)
        });

    let generate_route = warp::path!("api" / "generate")
        .and(warp::post())
        .and(tolerant_json_body())
        .and(with_server_state.clone())
        .and_then(|body: Value, s: Arc<GatewayServer>| async move {
            let context = create_context(&s);
            log_request(
                &context.scope.correlation_id,
                "POST",
                "/api/generate",
                extract_model_name(&body).ok(),
            );
            handlers::handle_generate(context, body)
                .await
                .map_err(warp::reject::custom)
        });

    let chat_route = warp::path!("api" / "chat")
        .and(warp::post())
        .and(tolerant_json_body())
        .and(with_server_state.clone())
        .and_then(|body: Value, s: Arc<GatewayServer>| async move {
            let context = create_context(&s);
            log_request(
                &context.scope.correlation_id,
                "POST",
                "/api/chat",
                extract_model_name(&body).ok(),
            );
            handlers::handle_chat(context, body)
                .await
                .map_err(warp::reject::custom)
        });

    // /api/embed and /api/embeddings behave identically.
    let embed_endpoint = warp::path!("api" / "embed");
    let embeddings_endpoint = warp::path!("api" / "embeddings");

    let embeddings_route = embed_endpoint
        .or(embeddings_endpoint)
        .unify()
        .and(warp::post())
        .and(tolerant_json_body())
        .and(with_server_state.clone())
        .and_then(|body: Value, s: Arc<GatewayServer>| async move {
            let context = create_context(&s);
            log_request(
                &context.scope.correlation_id,
                "POST",
                "/api/embeddings",
                extract_model_name(&body).ok(),
            );
            handlers::handle_embeddings(context, body)
                .await
                .map_err(warp::reject::custom)
        });

    let pull_route = compat_post_route("pull");
    let push_route = compat_post_route("push");
    let copy_route = compat_post_route("copy");
    let create_route = compat_post_route("create");
    let show_route = compat_post_route("show");

    let delete_route = warp::path!("api" / "delete")
        .and(warp::delete().or(warp::post()).unify())
        .and_then(|| async move {
            handlers::handle_compat_success("delete")
                .await
                .map_err(warp::reject::custom)
        });

    let ps_route = warp::path!("api" / "ps").and(warp::get()).and_then(|| async move {
        handlers::handle_compat_success("ps")
            .await
            .map_err(warp::reject::custom)
    });

    let version_route = warp::path!("api" / "version")
        .and(warp::get())
        .and_then(|| async move {
            handlers::handle_version()
                .await
                .map_err(warp::reject::custom)
        });

    health_route
        .or(tags_route)
        .or(generate_route)
        .or(chat_route)
        .or(embeddings_route)
        .or(pull_route)
        .or(push_route)
        .or(copy_route)
        .or(create_route)
        .or(show_route)
        .or(delete_route)
        .or(ps_route)
        .or(version_route)
}

fn create_context(s: &Arc<GatewayServer>) -> RequestContext {
    RequestContext {
        backend: s.backend.clone(),
        registry: s.registry.clone(),
        stream_timeout: std::time::Duration::from_secs(s.config.stream_timeout_seconds),
        scope: RequestScope::new(),
    }
}

/// Bodies are parsed as loose JSON values so unknown fields from newer
/// clients pass through untouched.
fn tolerant_json_body() -> impl Filter<Extract = (Value,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_JSON_BODY_SIZE_BYTES).and(warp::body::json())
}

fn compat_post_route(
    name: &'static str,
) -> impl Filter<Extract = (warp::reply::Response,), Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path(name))
        .and(warp::path::end())
        .and(warp::post())
        .and_then(move || async move {
            handlers::handle_compat_success(name)
                .await
                .map_err(warp::reject::custom)
        })
}
