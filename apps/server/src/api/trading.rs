use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use vnquant_market_data::{normalize, Record};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

use super::shared;

#[derive(serde::Deserialize)]
struct PriceBoardQuery {
    /// Comma-separated symbol list (VPB,ACB,FPT).
    symbols: String,
    #[serde(default = "shared::source_tcbs")]
    source: String,
}

async fn get_price_board(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PriceBoardQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let symbols: Vec<String> = q
        .symbols
        .split(',')
        .map(shared::ticker)
        .filter(|s| !s.is_empty())
        .collect();
    if symbols.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one symbol is required".to_string(),
        ));
    }
    let dataset = state.trading.get(&q.source)?.price_board(&symbols).await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct FlowQuery {
    symbol: String,
    start: String,
    end: Option<String>,
    #[serde(default = "shared::source_tcbs")]
    source: String,
}

async fn get_foreign_trade(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FlowQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let range = shared::date_range(&q.start, q.end.as_deref())?;
    let dataset = state
        .trading
        .get(&q.source)?
        .foreign_trade(&shared::ticker(&q.symbol), &range)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct SymbolQuery {
    symbol: String,
    #[serde(default = "shared::source_tcbs")]
    source: String,
}

async fn get_insider_deals(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .trading
        .get(&q.source)?
        .insider_deals(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_prop_trades(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SymbolQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .trading
        .get(&q.source)?
        .prop_trades(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct StatsQuery {
    symbol: String,
    start: String,
    end: Option<String>,
    #[serde(default = "shared::source_vci")]
    source: String,
}

async fn get_trading_stats(
    State(state): State<Arc<AppState>>,
    Query(q): Query<StatsQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let range = shared::date_range(&q.start, q.end.as_deref())?;
    let dataset = state
        .trading
        .get(&q.source)?
        .trading_stats(&shared::ticker(&q.symbol), &range)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct OrderStatsQuery {
    symbol: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

async fn get_order_stats(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OrderStatsQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .trading
        .get(&q.source)?
        .order_stats(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/price-board", get(get_price_board))
        .route("/foreign-trade", get(get_foreign_trade))
        .route("/insider-deals", get(get_insider_deals))
        .route("/prop-trade", get(get_prop_trades))
        .route("/stats", get(get_trading_stats))
        .route("/order-stats", get(get_order_stats))
}
