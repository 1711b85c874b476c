use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use vnquant_market_data::{normalize, Record};

use crate::{error::ApiResult, state::AppState};

use super::shared;

#[derive(serde::Deserialize)]
struct CompanyQuery {
    symbol: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

// TCBS is the richer source for narrative/dividend data, so those two
// routes default differently.
#[derive(serde::Deserialize)]
struct TcbsCompanyQuery {
    symbol: String,
    #[serde(default = "shared::source_tcbs")]
    source: String,
}

async fn get_overview(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .overview(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TcbsCompanyQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .profile(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_shareholders(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .shareholders(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct OfficersQuery {
    symbol: String,
    #[serde(default = "default_filter")]
    filter_by: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

fn default_filter() -> String {
    "all".to_string()
}

async fn get_officers(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OfficersQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .officers(&shared::ticker(&q.symbol), q.filter_by.parse()?)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_subsidiaries(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .subsidiaries(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_affiliates(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .affiliates(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .news(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_events(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CompanyQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .companies
        .get(&q.source)?
        .events(&shared::ticker(&q.symbol))
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct DividendsQuery {
    symbol: String,
    #[serde(default = "default_dividends_page_size")]
    page_size: u32,
    #[serde(default)]
    page: u32,
    #[serde(default = "shared::source_tcbs")]
    source: String,
}

fn default_dividends_page_size() -> u32 {
    15
}

async fn get_dividends(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DividendsQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let page_size = shared::bounded("page_size", q.page_size, 1, 100)?;
    let dataset = state
        .companies
        .get(&q.source)?
        .dividends(&shared::ticker(&q.symbol), q.page, page_size)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/overview", get(get_overview))
        .route("/profile", get(get_profile))
        .route("/shareholders", get(get_shareholders))
        .route("/officers", get(get_officers))
        .route("/subsidiaries", get(get_subsidiaries))
        .route("/affiliate", get(get_affiliates))
        .route("/news", get(get_news))
        .route("/events", get(get_events))
        .route("/dividends", get(get_dividends))
}
