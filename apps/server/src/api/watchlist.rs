use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use finclue_core::alerts::{DipAlert, NewWatchlistEntry, WatchlistEntry};
use finclue_core::notifications::AlertRecipient;

#[derive(serde::Deserialize)]
struct OwnerQuery {
    #[serde(rename = "ownerId")]
    owner_id: String,
}

async fn get_watchlist(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OwnerQuery>,
) -> ApiResult<Json<Vec<WatchlistEntry>>> {
    let entries = state.watchlist_repository.list_for_owner(&q.owner_id).await?;
    Ok(Json(entries))
}

async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OwnerQuery>,
) -> ApiResult<Json<Vec<DipAlert>>> {
    let alerts = state.alert_service.evaluate_for_owner(&q.owner_id).await?;
    Ok(Json(alerts))
}

async fn upsert_entry(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<NewWatchlistEntry>,
) -> ApiResult<Json<WatchlistEntry>> {
    let stored = state.watchlist_repository.upsert_entry(entry).await?;
    Ok(Json(stored))
}

#[derive(serde::Deserialize)]
struct EntryQuery {
    #[serde(rename = "ownerId")]
    owner_id: String,
    symbol: String,
}

async fn remove_entry(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EntryQuery>,
) -> ApiResult<StatusCode> {
    state
        .watchlist_repository
        .remove_entry(&q.owner_id, &q.symbol)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_recipient(
    State(state): State<Arc<AppState>>,
    Json(recipient): Json<AlertRecipient>,
) -> ApiResult<Json<AlertRecipient>> {
    let stored = state.recipient_repository.upsert(recipient).await?;
    Ok(Json(stored))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/watchlist", get(get_watchlist).post(upsert_entry).delete(remove_entry))
        .route("/watchlist/alerts", get(get_alerts))
        .route("/watchlist/recipient", put(set_recipient))
}
