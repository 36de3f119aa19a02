use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use finclue_core::portfolio::{Holding, NewHolding, Portfolio, PortfolioValuation};
use rust_decimal::Decimal;

#[derive(serde::Deserialize)]
struct PortfolioQuery {
    #[serde(rename = "portfolioId")]
    portfolio_id: String,
}

#[derive(serde::Deserialize)]
struct OwnerQuery {
    #[serde(rename = "ownerId")]
    owner_id: String,
}

async fn get_portfolio_value(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PortfolioQuery>,
) -> ApiResult<Json<PortfolioValuation>> {
    let portfolio = state.portfolio_repository.get_portfolio(&q.portfolio_id)?;
    let valuation = state.valuation_service.valuate(&portfolio).await?;
    Ok(Json(valuation))
}

async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OwnerQuery>,
) -> ApiResult<Json<Portfolio>> {
    let portfolio = state
        .portfolio_repository
        .get_or_create_for_owner(&q.owner_id)
        .await?;
    Ok(Json(portfolio))
}

async fn upsert_holding(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PortfolioQuery>,
    Json(payload): Json<NewHolding>,
) -> ApiResult<Json<Holding>> {
    let holding = payload.validate()?;
    let stored = state
        .portfolio_repository
        .upsert_holding(&q.portfolio_id, holding)
        .await?;
    Ok(Json(stored))
}

#[derive(serde::Deserialize)]
struct HoldingQuery {
    #[serde(rename = "portfolioId")]
    portfolio_id: String,
    symbol: String,
}

async fn remove_holding(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HoldingQuery>,
) -> ApiResult<StatusCode> {
    state
        .portfolio_repository
        .remove_holding(&q.portfolio_id, &q.symbol)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CashPayload {
    cash: Decimal,
}

async fn set_cash(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PortfolioQuery>,
    Json(payload): Json<CashPayload>,
) -> ApiResult<StatusCode> {
    state
        .portfolio_repository
        .set_cash(&q.portfolio_id, payload.cash)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio", get(get_portfolio))
        .route("/portfolio/value", get(get_portfolio_value))
        .route(
            "/portfolio/holdings",
            post(upsert_holding).delete(remove_holding),
        )
        .route("/portfolio/cash", put(set_cash))
}
