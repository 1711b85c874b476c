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
struct VcbQuery {
    /// Lookup date (YYYY-MM-DD); today when omitted.
    date: Option<String>,
}

async fn get_vcb_rates(
    State(state): State<Arc<AppState>>,
    Query(q): Query<VcbQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let date = match q.date.as_deref() {
        Some(value) => shared::parse_date("date", value)?,
        None => chrono::Local::now().date_naive(),
    };
    let dataset = state.exchange_rates.vcb(date).await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/vcb", get(get_vcb_rates))
}
