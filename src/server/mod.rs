pub mod handlers;
pub mod types;

use crate::{
    Error, Result, catalog,
    config::{Config, CorsConfig, ServerConfig},
    llm::{GeminiClient, LlmClient},
    relay::{Relay, build_instruction},
};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub async fn run(config: Config) -> Result<()> {
    let catalog = catalog::load(&config.catalog).await?;
    let instruction = build_instruction(&config.persona, &catalog);

    let client = match &config.llm.api_key {
        Some(api_key) => {
            info!("Relaying to model {}", config.llm.model);
            Some(Arc::new(GeminiClient::new(&config.llm, api_key.clone())) as Arc<dyn LlmClient>)
        }
        None => {
            warn!("GEMINI_API_KEY is not set; chat requests will fail until it is configured");
            None
        }
    };

    let app_state = AppState {
        relay: Relay::new(client, instruction),
    };

    let app = router(&config.server, app_state)?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn router(config: &ServerConfig, state: AppState) -> Result<Router> {
    let mut app = Router::new()
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health));

    if config.expose_models {
        app = app.route("/models", get(handlers::list_models));
    }

    Ok(app
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.cors)?),
        )
        .with_state(state))
}

/// Only the configured origins get CORS headers; browsers block everyone else.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            if origin == "*" {
                return Err(Error::config("wildcard CORS origin is not allowed"));
            }
            HeaderValue::from_str(origin)
                .map_err(|_| Error::config(format!("invalid CORS origin: '{}'", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
