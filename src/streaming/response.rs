use std::io;

use bytes::Bytes;
use futures_util::Stream;
use warp::hyper::Body;

use crate::constants::{
    CONTENT_TYPE_NDJSON, HEADER_ACCESS_CONTROL_ALLOW_HEADERS, HEADER_ACCESS_CONTROL_ALLOW_METHODS,
    HEADER_ACCESS_CONTROL_ALLOW_ORIGIN, HEADER_CACHE_CONTROL, HEADER_CONNECTION,
};
use crate::error::ProxyError;

/// Wrap a frame stream as an `application/x-ndjson` response body. The body
/// is written to the client frame by frame as the adapter yields them.
pub fn ndjson_response<S>(frames: S) -> Result<warp::reply::Response, ProxyError>
where
    S: Stream<Item = Result<Bytes, io::Error>> + Send + 'static,
{
    warp::http::Response::builder()
        .status(warp::http::StatusCode::OK)
        .header("Content-Type", CONTENT_TYPE_NDJSON)
        .header("Cache-Control", HEADER_CACHE_CONTROL)
        .header("Connection", HEADER_CONNECTION)
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
        .body(Body::wrap_stream(frames))
        .map_err(|_| ProxyError::internal_server_error("failed to build streaming response"))
}
