use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use vnquant_market_data::{normalize, FundType, Record};

use crate::{error::ApiResult, state::AppState};

#[derive(serde::Deserialize)]
struct ListingQuery {
    /// STOCK, BOND, BALANCED, or empty for every fund.
    #[serde(default)]
    fund_type: String,
}

async fn get_fund_listing(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListingQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let fund_type: Option<FundType> = if q.fund_type.trim().is_empty() {
        None
    } else {
        Some(q.fund_type.trim().to_uppercase().parse()?)
    };
    let dataset = state.funds.listing(fund_type).await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct FilterQuery {
    #[serde(default)]
    symbol: String,
}

async fn filter_funds(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FilterQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.funds.filter(q.symbol.trim()).await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct FundQuery {
    /// Fund short name (SSISCA, VCBF-BCF, ...).
    symbol: String,
}

async fn get_top_holdings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FundQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.funds.top_holdings(q.symbol.trim()).await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_industry_holdings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FundQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.funds.industry_holdings(q.symbol.trim()).await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_asset_holdings(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FundQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.funds.asset_holdings(q.symbol.trim()).await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_nav_report(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FundQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let dataset = state.funds.nav_report(q.symbol.trim()).await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/listing", get(get_fund_listing))
        .route("/filter", get(filter_funds))
        .route("/top-holding", get(get_top_holdings))
        .route("/industry-holding", get(get_industry_holdings))
        .route("/asset-holding", get(get_asset_holdings))
        .route("/nav-report", get(get_nav_report))
}
