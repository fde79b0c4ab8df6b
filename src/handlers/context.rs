use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::logging::new_correlation_id;
use crate::openai::OpenAiBackend;
use crate::registry::ModelRegistry;

/// Per-request identity threaded through the backend client and all log
/// records: a correlation id plus the cancellation token for this request.
#[derive(Clone)]
pub struct RequestScope {
    pub correlation_id: String,
    pub token: CancellationToken,
}

impl RequestScope {
    pub fn new() -> Self {
        Self {
            correlation_id: new_correlation_id(),
            token: CancellationToken::new(),
        }
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct RequestContext {
    pub backend: Arc<dyn OpenAiBackend>,
    pub registry: Arc<ModelRegistry>,
    pub stream_timeout: Duration,
    pub scope: RequestScope,
}
