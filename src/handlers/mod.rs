pub mod chat;
pub mod compat;
pub mod context;
pub mod embeddings;
pub mod generate;
pub mod keep_alive;
pub mod response;
pub mod tags;
pub mod transform;
pub mod validate;

pub use chat::handle_chat;
pub use compat::{handle_compat_success, handle_health, handle_version};
pub use context::{RequestContext, RequestScope};
pub use embeddings::handle_embeddings;
pub use generate::handle_generate;
pub use response::json_response;
pub use tags::handle_tags;
