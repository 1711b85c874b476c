use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use vnquant_market_data::{normalize, Record};

use crate::{error::ApiResult, state::AppState};

use super::shared;

const DEFAULT_EXCHANGES: &str = "HOSE,HNX,UPCOM";

#[derive(serde::Deserialize)]
struct ScreenQuery {
    #[serde(default = "default_exchange")]
    exchange: String,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default = "shared::lang_vi")]
    lang: String,
}

fn default_exchange() -> String {
    DEFAULT_EXCHANGES.to_string()
}

fn default_limit() -> u32 {
    50
}

async fn screen_stocks(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ScreenQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let limit = shared::bounded("limit", q.limit, 1, 200)?;
    let mut filters = Map::new();
    filters.insert("exchangeName".to_string(), Value::String(q.exchange));
    let dataset = state
        .screener
        .screen(&filters, limit, q.lang.parse()?)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct FilterQuery {
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default = "shared::lang_vi")]
    lang: String,
}

/// Advanced screen: the body is the raw upstream filter map, e.g.
/// `{"exchangeName": "HOSE,HNX", "marketCap": [10000, 50000]}`.
async fn screen_stocks_with_filters(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FilterQuery>,
    body: Option<Json<Map<String, Value>>>,
) -> ApiResult<Json<Vec<Record>>> {
    let limit = shared::bounded("limit", q.limit, 1, 200)?;
    let mut filters = body.map(|Json(inner)| inner).unwrap_or_default();
    if filters.is_empty() {
        filters.insert(
            "exchangeName".to_string(),
            Value::String(DEFAULT_EXCHANGES.to_string()),
        );
    }
    let dataset = state
        .screener
        .screen(&filters, limit, q.lang.parse()?)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(screen_stocks))
        .route("/stocks/filter", post(screen_stocks_with_filters))
}
