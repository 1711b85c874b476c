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
struct SjcQuery {
    /// Lookup date (YYYY-MM-DD); today when omitted. Data starts 2016-01-02.
    date: Option<String>,
}

async fn get_sjc_prices(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SjcQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let date = match q.date.as_deref() {
        Some(value) => Some(shared::parse_date("date", value)?),
        None => None,
    };
    let dataset = state.gold.sjc(date).await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_btmc_prices(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.gold.btmc().await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sjc", get(get_sjc_prices))
        .route("/btmc", get(get_btmc_prices))
}
