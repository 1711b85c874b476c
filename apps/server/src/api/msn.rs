//! MSN-backed routes: international symbols plus the crypto/forex
//! shortcuts, which reuse the same search and chart calls.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use vnquant_market_data::{normalize, MsnAssetKind, MsnHistoryParams, Record};

use crate::{error::ApiResult, state::AppState};

use super::shared;

#[derive(serde::Deserialize)]
struct SearchQuery {
    query: String,
    locale: Option<String>,
    #[serde(default = "default_search_limit")]
    limit: u32,
}

fn default_search_limit() -> u32 {
    10
}

#[derive(serde::Deserialize)]
struct HistoryQuery {
    symbol_id: String,
    start: String,
    end: Option<String>,
    #[serde(default = "shared::interval_daily")]
    interval: String,
    #[serde(default = "default_count_back")]
    count_back: u32,
}

fn default_count_back() -> u32 {
    365
}

async fn run_search(
    state: &AppState,
    q: SearchQuery,
    asset_kind: Option<MsnAssetKind>,
) -> ApiResult<Vec<Record>> {
    let limit = shared::bounded("limit", q.limit, 1, 50)?;
    let dataset = state.msn.search(&q.query, q.locale.as_deref(), limit).await?;
    let mut records = normalize::to_records(dataset);
    // The crypto shortcut narrows the result set when the payload carries
    // an asset_type column; other kinds search unfiltered.
    if asset_kind == Some(MsnAssetKind::Crypto)
        && records.iter().any(|r| r.contains_key("asset_type"))
    {
        records.retain(|record| {
            record
                .get("asset_type")
                .and_then(Value::as_str)
                .map(|t| t.eq_ignore_ascii_case("crypto"))
                .unwrap_or(false)
        });
    }
    Ok(records)
}

async fn run_history(
    state: &AppState,
    q: HistoryQuery,
    asset_kind: Option<MsnAssetKind>,
) -> ApiResult<Vec<Record>> {
    let count_back = shared::at_least("count_back", q.count_back, 1)?;
    let params = MsnHistoryParams {
        range: shared::date_range(&q.start, q.end.as_deref())?,
        interval: q.interval.parse()?,
        count_back,
        asset_kind,
    };
    let dataset = state.msn.history(q.symbol_id.trim(), &params).await?;
    Ok(normalize::to_records(dataset))
}

async fn msn_search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(run_search(&state, q, None).await?))
}

async fn msn_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(run_history(&state, q, None).await?))
}

async fn crypto_search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(run_search(&state, q, Some(MsnAssetKind::Crypto)).await?))
}

async fn crypto_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(
        run_history(&state, q, Some(MsnAssetKind::Crypto)).await?,
    ))
}

async fn forex_search(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(run_search(&state, q, None).await?))
}

async fn forex_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(
        run_history(&state, q, Some(MsnAssetKind::Currency)).await?,
    ))
}

pub fn msn_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(msn_search))
        .route("/history", get(msn_history))
}

pub fn crypto_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(crypto_search))
        .route("/history", get(crypto_history))
}

pub fn forex_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(forex_search))
        .route("/history", get(forex_history))
}
