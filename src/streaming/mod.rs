pub mod adapter;
pub mod chunks;
pub mod response;
pub mod sse;

pub use adapter::adapt_stream;
pub use chunks::FrameKind;
pub use response::ndjson_response;
pub use sse::sse_json_stream;
