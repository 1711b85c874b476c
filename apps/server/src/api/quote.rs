use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use vnquant_market_data::{normalize, HistoryParams, Record};

use crate::{error::ApiResult, state::AppState};

use super::shared;

#[derive(serde::Deserialize)]
struct HistoryQuery {
    symbol: String,
    start: String,
    end: Option<String>,
    #[serde(default = "shared::interval_daily")]
    interval: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let quotes = state.quotes.get(&q.source)?;
    let params = HistoryParams {
        symbol: shared::ticker(&q.symbol),
        range: shared::date_range(&q.start, q.end.as_deref())?,
        interval: q.interval.parse()?,
    };
    let dataset = quotes.history(&params).await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct IntradayQuery {
    symbol: String,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "shared::source_vci")]
    source: String,
}

fn default_page_size() -> u32 {
    100
}

fn default_page() -> u32 {
    1
}

async fn get_intraday(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IntradayQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let quotes = state.quotes.get(&q.source)?;
    let page_size = shared::bounded("page_size", q.page_size, 1, 1000)?;
    let page = shared::at_least("page", q.page, 1)?;
    let dataset = quotes
        .intraday(&shared::ticker(&q.symbol), page, page_size)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct PriceDepthQuery {
    symbol: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

async fn get_price_depth(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PriceDepthQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let quotes = state.quotes.get(&q.source)?;
    let dataset = quotes.price_depth(&shared::ticker(&q.symbol)).await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/history", get(get_history))
        .route("/intraday", get(get_intraday))
        .route("/price-depth", get(get_price_depth))
}
