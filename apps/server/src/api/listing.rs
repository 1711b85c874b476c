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
struct SourceQuery {
    #[serde(default = "shared::source_vci")]
    source: String,
}

#[derive(serde::Deserialize)]
struct GroupQuery {
    #[serde(default = "default_group")]
    group: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

fn default_group() -> String {
    "VN30".to_string()
}

#[derive(serde::Deserialize)]
struct LangQuery {
    #[serde(default = "shared::lang_vi")]
    lang: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

async fn get_all_symbols(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SourceQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.listings.get(&q.source)?.all_symbols().await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_symbols_by_group(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GroupQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .listings
        .get(&q.source)?
        .symbols_by_group(&q.group.to_uppercase())
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_symbols_by_exchange(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LangQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .listings
        .get(&q.source)?
        .symbols_by_exchange(q.lang.parse()?)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_industries(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LangQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .listings
        .get(&q.source)?
        .industries(q.lang.parse()?)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_industries_icb(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SourceQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.listings.get(&q.source)?.industries_icb().await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_futures(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SourceQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.listings.get(&q.source)?.all_future_indices().await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_covered_warrants(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SourceQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .listings
        .get(&q.source)?
        .all_covered_warrants()
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_government_bonds(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SourceQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state
        .listings
        .get(&q.source)?
        .all_government_bonds()
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_all_bonds(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SourceQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.listings.get(&q.source)?.all_bonds().await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/symbols", get(get_all_symbols))
        .route("/symbols-by-group", get(get_symbols_by_group))
        .route("/symbols-by-exchange", get(get_symbols_by_exchange))
        .route("/industries", get(get_industries))
        .route("/industries-icb", get(get_industries_icb))
        .route("/futures", get(get_futures))
        .route("/covered-warrants", get(get_covered_warrants))
        .route("/government-bonds", get(get_government_bonds))
        .route("/bonds", get(get_all_bonds))
}
