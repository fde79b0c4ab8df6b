use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;

use crate::check_cancelled;
use crate::config::Config;
use crate::constants::{
    CONNECT_TIMEOUT_SECONDS, OPENAI_CHAT_COMPLETIONS, OPENAI_EMBEDDINGS, OPENAI_MODELS,
    POOL_IDLE_TIMEOUT_SECONDS, POOL_MAX_IDLE_PER_HOST, TCP_KEEPALIVE_SECONDS,
};
use crate::error::ProxyError;
use crate::handlers::RequestScope;
use crate::streaming::sse_json_stream;

use super::backend::{ChunkStream, OpenAiBackend};
use super::retry::execute_with_retry;

/// Thin asynchronous wrapper over the OpenAI-compatible HTTP API. Owns the
/// connection pool, per-request timeouts, and the retry policy. The request
/// and error counters are observability-only.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    request_timeout: Duration,
    stream_timeout: Duration,
    requests_total: AtomicU64,
    errors_total: AtomicU64,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECONDS))
            .tcp_keepalive(Duration::from_secs(TCP_KEEPALIVE_SECONDS))
            .build()?;

        Ok(Self {
            client,
            base_url: config.openai_api_base_url.clone(),
            api_key: config.openai_api_key.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            stream_timeout: Duration::from_secs(config.stream_timeout_seconds),
            requests_total: AtomicU64::new(0),
            errors_total: AtomicU64::new(0),
        })
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify_send_error(err: reqwest::Error) -> ProxyError {
        if err.is_timeout() || err.is_connect() {
            ProxyError::upstream_timeout()
        } else if err.is_request() || err.is_builder() {
            ProxyError::internal_server_error("failed to build backend request")
        } else {
            ProxyError::upstream_error()
        }
    }

    /// One attempt against the backend. Cancellation short-circuits both
    /// before the send and while waiting for the response.
    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
        timeout: Duration,
        scope: &RequestScope,
    ) -> Result<reqwest::Response, ProxyError> {
        check_cancelled!(scope.token);
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        let mut builder = self
            .client
            .request(method, self.endpoint_url(path))
            .bearer_auth(&self.api_key)
            .timeout(timeout);

        if let Some(json_body) = body {
            builder = builder.json(json_body);
        }

        tokio::select! {
            result = builder.send() => {
                result.map_err(|err| {
                    self.errors_total.fetch_add(1, Ordering::Relaxed);
                    Self::classify_send_error(err)
                })
            }
            _ = scope.token.cancelled() => {
                Err(ProxyError::request_cancelled())
            }
        }
    }

    /// Check the status line and, for failures, drain the body so the error
    /// class can be derived without ever logging its content.
    async fn ensure_success(
        &self,
        response: reqwest::Response,
        model: &str,
    ) -> Result<reqwest::Response, ProxyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        self.errors_total.fetch_add(1, Ordering::Relaxed);
        let _ = response.bytes().await;
        Err(ProxyError::from_upstream_status(status.as_u16(), model))
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<Value, ProxyError> {
        response
            .json::<Value>()
            .await
            .map_err(|_| ProxyError::internal_server_error("invalid JSON from backend"))
    }

    fn model_of(params: &Value) -> String {
        params
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl OpenAiBackend for OpenAiClient {
    async fn list_models(&self, scope: &RequestScope) -> Result<Vec<Value>, ProxyError> {
        execute_with_retry("list_models", scope, || async move {
            let response = self
                .send(reqwest::Method::GET, OPENAI_MODELS, None, self.request_timeout, scope)
                .await?;
            let response = self.ensure_success(response, "").await?;
            let status = response.status().as_u16();
            let body = self.read_json(response).await?;
            let models = body
                .get("data")
                .and_then(|d| d.as_array())
                .cloned()
                .unwrap_or_default();
            Ok((models, status))
        })
        .await
    }

    async fn chat(&self, params: Value, scope: &RequestScope) -> Result<Value, ProxyError> {
        let model = Self::model_of(&params);
        execute_with_retry("chat_completion", scope, || {
            let params = &params;
            let model = &model;
            async move {
                let response = self
                    .send(
                        reqwest::Method::POST,
                        OPENAI_CHAT_COMPLETIONS,
                        Some(params),
                        self.request_timeout,
                        scope,
                    )
                    .await?;
                let response = self.ensure_success(response, model).await?;
                let status = response.status().as_u16();
                let body = self.read_json(response).await?;
                Ok((body, status))
            }
        })
        .await
    }

    async fn chat_stream(
        &self,
        params: Value,
        scope: &RequestScope,
    ) -> Result<ChunkStream, ProxyError> {
        let model = Self::model_of(&params);

        // Retries stop once the response headers have arrived; after that an
        // upstream failure surfaces through the stream itself. The reqwest
        // timeout bounds the whole stream lifetime.
        let response = execute_with_retry("chat_completion_stream", scope, || {
            let params = &params;
            let model = &model;
            async move {
                let response = self
                    .send(
                        reqwest::Method::POST,
                        OPENAI_CHAT_COMPLETIONS,
                        Some(params),
                        self.stream_timeout,
                        scope,
                    )
                    .await?;
                let response = self.ensure_success(response, model).await?;
                let status = response.status().as_u16();
                Ok((response, status))
            }
        })
        .await?;

        Ok(sse_json_stream(response).boxed())
    }

    async fn embed(&self, params: Value, scope: &RequestScope) -> Result<Value, ProxyError> {
        let model = Self::model_of(&params);
        execute_with_retry("embedding", scope, || {
            let params = &params;
            let model = &model;
            async move {
                let response = self
                    .send(
                        reqwest::Method::POST,
                        OPENAI_EMBEDDINGS,
                        Some(params),
                        self.request_timeout,
                        scope,
                    )
                    .await?;
                let response = self.ensure_success(response, model).await?;
                let status = response.status().as_u16();
                let body = self.read_json(response).await?;
                Ok((body, status))
            }
        })
        .await
    }
}
