use std::sync::Arc;

use warp::Filter;

use crate::config::{Config, validate_config};
use crate::openai::{OpenAiBackend, OpenAiClient};
use crate::registry::ModelRegistry;
use crate::server::handle_rejection;
use crate::server::routes::create_routes;

pub struct GatewayServer {
    pub backend: Arc<dyn OpenAiBackend>,
    pub registry: Arc<ModelRegistry>,
    pub config: Config,
}

impl GatewayServer {
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        validate_config(&config)?;
        let backend: Arc<dyn OpenAiBackend> = Arc::new(OpenAiClient::new(&config)?);
        Ok(Self::with_backend(config, backend))
    }

    /// Construction seam used by tests to swap in a fake backend.
    pub fn with_backend(config: Config, backend: Arc<dyn OpenAiBackend>) -> Self {
        Self {
            backend,
            registry: Arc::new(ModelRegistry::new()),
            config,
        }
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.listen_addr();
        let backend_url = self.config.openai_api_base_url.clone();
        let server = Arc::new(self);

        let routes = create_routes(server).recover(handle_rejection);

        let cors = warp::cors()
            .allow_any_origin()
            .allow_headers(vec![
                "Content-Type",
                "Authorization",
                "Accept",
                "Origin",
                "X-Requested-With",
            ])
            .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS", "HEAD"]);

        let routes_with_cors = routes.with(cors);

        log::info!("starting gateway server on {}", addr);
        log::info!("OpenAI-compatible backend: {}", backend_url);

        warp::serve(routes_with_cors).run(addr).await;

        Ok(())
    }
}
