/// OpenAI-compatible backend endpoints, relative to the configured base URL
pub const OPENAI_MODELS: &str = "/models";
pub const OPENAI_CHAT_COMPLETIONS: &str = "/chat/completions";
pub const OPENAI_EMBEDDINGS: &str = "/embeddings";

/// Retry policy toward the backend: one initial attempt plus three retries,
/// exponential backoff capped at the max delay
pub const RETRY_MAX_ATTEMPTS: u32 = 4;
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Connection pool tuning for the backend client
pub const CONNECT_TIMEOUT_SECONDS: u64 = 10;
pub const POOL_MAX_IDLE_PER_HOST: usize = 20;
pub const POOL_IDLE_TIMEOUT_SECONDS: u64 = 90;
pub const TCP_KEEPALIVE_SECONDS: u64 = 60;

/// Response headers
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_NDJSON: &str = "application/x-ndjson";
pub const HEADER_CACHE_CONTROL: &str = "no-cache";
/// Downstream-cache hint on /api/tags; the gateway itself never caches
pub const HEADER_CACHE_CONTROL_TAGS: &str = "public, max-age=300";
pub const HEADER_CONNECTION: &str = "keep-alive";
pub const HEADER_ACCESS_CONTROL_ALLOW_ORIGIN: &str = "*";
pub const HEADER_ACCESS_CONTROL_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const HEADER_ACCESS_CONTROL_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Error messages
pub const ERROR_MISSING_MODEL: &str = "missing 'model' field";
pub const ERROR_MISSING_MESSAGES: &str = "'messages' must be a non-empty array";
pub const ERROR_MISSING_PROMPT: &str = "missing 'prompt' field";
pub const ERROR_MISSING_INPUT: &str = "missing 'prompt' or 'input' field";
pub const ERROR_IMAGES_NOT_SUPPORTED: &str = "images not supported for this model";
pub const ERROR_UNAUTHORIZED: &str = "unauthorized";
pub const ERROR_RATE_LIMITED: &str = "rate limit exceeded";
pub const ERROR_UPSTREAM: &str = "upstream error";
pub const ERROR_UPSTREAM_TIMEOUT: &str = "upstream timeout";
pub const ERROR_CANCELLED: &str = "client closed request";
pub const ERROR_INTERNAL: &str = "internal error";

/// SSE parsing constants for the backend's streaming responses
pub const SSE_DATA_PREFIX: &str = "data: ";
pub const SSE_DONE_MESSAGE: &str = "[DONE]";
pub const SSE_MESSAGE_BOUNDARY: &str = "\n\n";

/// Logging prefixes
pub const LOG_PREFIX_SUCCESS: &str = "✅";
pub const LOG_PREFIX_ERROR: &str = "❌";
pub const LOG_PREFIX_WARNING: &str = "⚠️";

/// Maximum accepted JSON body size (bytes)
pub const MAX_JSON_BODY_SIZE_BYTES: u64 = 16 * 1024 * 1024;

/// Size heuristics for models the registry does not know (bytes)
pub const SIZE_DEFAULT_EMBEDDING: u64 = 500_000_000;
pub const SIZE_DEFAULT_GPT4_FAMILY: u64 = 20_000_000_000;
pub const SIZE_DEFAULT_GPT35_FAMILY: u64 = 1_500_000_000;
pub const SIZE_DEFAULT_UNKNOWN: u64 = 1_000_000_000;
