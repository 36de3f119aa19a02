//! HTTP API surface.

pub mod notifications;
pub mod portfolio;
pub mod watchlist;

use std::sync::Arc;

use crate::main_lib::AppState;
use axum::{routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(portfolio::router())
        .merge(watchlist::router())
        .merge(notifications::router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
