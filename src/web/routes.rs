use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use super::{handlers, AppState};

/// Order endpoints, health probe and the static frontend as fallback.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/market-order", post(handlers::market_order))
        .route("/limit-order", post(handlers::limit_order))
        .route("/oco-order", post(handlers::oco_order))
        .route("/health", get(handlers::health))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
        .with_state(state)
}
