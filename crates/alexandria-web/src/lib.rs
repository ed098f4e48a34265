use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod models;
pub mod state;

pub use state::AppState;

/// Build the axum router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/api/health", get(handlers::index::health))
        .route("/api/parse", post(handlers::parse::parse_auto))
        .route("/api/parse/batch", post(handlers::parse::parse_batch))
        .route("/api/parse/{parser_type}", post(handlers::parse::parse_typed))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
