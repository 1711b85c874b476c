//! Market reference routes, served from the bundled catalog.

use std::sync::Arc;

use axum::{extract::Query, routing::get, Json, Router};
use serde_json::{json, Value};
use vnquant_market_data::{catalog, normalize, Dataset, Record};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

async fn get_indices() -> Json<Vec<Record>> {
    Json(normalize::to_records(Dataset::Table(catalog::all_indices())))
}

async fn get_index_groups() -> Json<Value> {
    Json(json!({ "groups": catalog::index_groups() }))
}

#[derive(serde::Deserialize)]
struct GroupQuery {
    group: String,
}

async fn get_indices_by_group(Query(q): Query<GroupQuery>) -> ApiResult<Json<Vec<Record>>> {
    let table = catalog::indices_by_group(&q.group)
        .ok_or_else(|| ApiError::NotFound(format!("Group '{}' not found", q.group)))?;
    Ok(Json(normalize::to_records(Dataset::Table(table))))
}

async fn get_sectors() -> Json<Vec<Record>> {
    Json(normalize::to_records(Dataset::Table(catalog::all_sectors())))
}

async fn get_exchanges() -> Json<Value> {
    Json(json!({ "exchanges": catalog::exchanges() }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/indices", get(get_indices))
        .route("/index-groups", get(get_index_groups))
        .route("/indices-by-group", get(get_indices_by_group))
        .route("/sectors", get(get_sectors))
        .route("/exchanges", get(get_exchanges))
}
