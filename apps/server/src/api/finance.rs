use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use vnquant_market_data::{normalize, FinanceParams, Lang, Record};

use crate::{error::ApiResult, state::AppState};

use super::shared;

#[derive(serde::Deserialize)]
struct StatementQuery {
    symbol: String,
    #[serde(default = "shared::period_quarter")]
    period: String,
    #[serde(default = "shared::lang_vi")]
    lang: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

impl StatementQuery {
    fn into_params(self) -> ApiResult<(String, FinanceParams)> {
        let params = FinanceParams {
            symbol: shared::ticker(&self.symbol),
            period: self.period.parse()?,
            lang: self.lang.parse()?,
        };
        Ok((self.source, params))
    }
}

async fn get_balance_sheet(
    State(state): State<Arc<AppState>>,
    Query(q): Query<StatementQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let (source, params) = q.into_params()?;
    let dataset = state.finance.get(&source)?.balance_sheet(&params).await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_income_statement(
    State(state): State<Arc<AppState>>,
    Query(q): Query<StatementQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let (source, params) = q.into_params()?;
    let dataset = state
        .finance
        .get(&source)?
        .income_statement(&params)
        .await?;
    Ok(Json(normalize::to_records(dataset)))
}

async fn get_cash_flow(
    State(state): State<Arc<AppState>>,
    Query(q): Query<StatementQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let (source, params) = q.into_params()?;
    let dataset = state.finance.get(&source)?.cash_flow(&params).await?;
    Ok(Json(normalize::to_records(dataset)))
}

#[derive(serde::Deserialize)]
struct RatioQuery {
    symbol: String,
    #[serde(default = "shared::period_quarter")]
    period: String,
    #[serde(default = "shared::source_vci")]
    source: String,
}

async fn get_ratios(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RatioQuery>,
) -> ApiResult<Json<Vec<Record>>> {
    let params = FinanceParams {
        symbol: shared::ticker(&q.symbol),
        period: q.period.parse()?,
        lang: Lang::Vi,
    };
    let dataset = state.finance.get(&q.source)?.ratios(&params).await?;
    Ok(Json(normalize::to_records(dataset)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/balance-sheet", get(get_balance_sheet))
        .route("/income-statement", get(get_income_statement))
        .route("/cash-flow", get(get_cash_flow))
        .route("/ratio", get(get_ratios))
}
