use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use finclue_core::notifications::DispatchSummary;
use serde_json::json;

/// Checks the shared-secret bearer token the external cron calls with.
fn authorized(headers: &HeaderMap, secret: &str) -> bool {
    let Some(header) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return false;
    };
    scheme.eq_ignore_ascii_case("Bearer") && !secret.is_empty() && token.trim() == secret
}

async fn run_notifications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    if !authorized(&headers, &state.cron_secret) {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response());
    }
    let summary: DispatchSummary = state.notification_service.run().await?;
    Ok(Json(summary).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/notifications/run", post(run_notifications))
}
