use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;

use crate::error::ProxyError;
use crate::handlers::RequestScope;

/// Parsed delta chunks from a streaming chat completion, ending after the
/// backend's terminal marker. Lazy and non-restartable.
pub type ChunkStream = BoxStream<'static, Result<Value, ProxyError>>;

/// Capability surface of the OpenAI-compatible backend. The production
/// implementation is [`super::OpenAiClient`]; tests drive the router against
/// a fake.
#[async_trait]
pub trait OpenAiBackend: Send + Sync {
    /// GET /models, returning the entries of the `data` array.
    async fn list_models(&self, scope: &RequestScope) -> Result<Vec<Value>, ProxyError>;

    /// POST /chat/completions with `stream: false`.
    async fn chat(&self, params: Value, scope: &RequestScope) -> Result<Value, ProxyError>;

    /// POST /chat/completions with `stream: true`. Retries apply only until
    /// the response headers arrive; the returned stream is not retried.
    async fn chat_stream(
        &self,
        params: Value,
        scope: &RequestScope,
    ) -> Result<ChunkStream, ProxyError>;

    /// POST /embeddings.
    async fn embed(&self, params: Value, scope: &RequestScope) -> Result<Value, ProxyError>;
}
