pub mod proxy;
pub mod rejection;
pub mod routes;

pub use proxy::GatewayServer;
pub use rejection::handle_rejection;
