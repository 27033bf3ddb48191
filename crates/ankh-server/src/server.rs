use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use ankh_engine::Pipeline;

use crate::config::ServerConfig;
use crate::routes;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub config: Arc<ServerConfig>,
    pub started_at: Instant,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/translate", post(routes::translate))
        .route("/ocr", post(routes::ocr))
        .route("/api/chart-data", get(routes::chart_data))
        .route("/translated-word-count", get(routes::chart_data))
        .route("/total-translated-words", get(routes::total_words))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Create and start the server. Returns a handle with the bound port.
pub async fn start(
    config: ServerConfig,
    pipeline: Arc<Pipeline>,
) -> Result<ServerHandle, std::io::Error> {
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState {
        pipeline,
        config: Arc::new(config),
        started_at: Instant::now(),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(addr = %local_addr, "ankh server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server_handle,
    })
}

/// Handle returned by `start()`. Keeps the accept loop alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}
