pub mod handlers;
pub mod state;
pub mod url_validation;

use crate::config::Config;
use axum::{Router, routing::get};
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Build the Axum router with all routes and the permissive CORS layer.
///
/// The CORS layer answers OPTIONS preflights itself (no origin fetch)
/// and stamps a wildcard allow-origin header on every response —
/// defeating origin-side CORS restrictions for its clients is the
/// point of the proxy.
pub fn build_router(config: Config) -> Router {
    let state = AppState::new(config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route("/proxy", get(handlers::proxy::serve_proxy))
        .layer(cors)
        .with_state(state)
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.port);

    let app = build_router(config);

    // Bind TCP listener
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("🚀 Server listening on http://{}", addr);

    // Start serving
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
