use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;
use vnquant_market_data::{
    dataset::{Cell, Series, Table},
    CompanyAccessor, Dataset, ExchangeRateAccessor, FinanceAccessor, FinanceParams, FundAccessor,
    FundType, GoldPriceAccessor, HistoryParams, ListingAccessor, MarketDataError, MsnAccessor,
    MsnHistoryParams, QuoteAccessor, ScreenerAccessor, SourceRegistry, TradingAccessor,
};
use vnquant_server::{api::app_router, config::Config, AppState};

type Result<T> = std::result::Result<T, MarketDataError>;

/// Quote stub: `ACB` yields a two-row table with a missing date and a NaN
/// close; `BAD` is rejected the way an upstream source rejects a malformed
/// range. Anything else means the handler failed to uppercase.
struct StubQuotes;

#[async_trait]
impl QuoteAccessor for StubQuotes {
    fn source_id(&self) -> &'static str {
        "vci"
    }

    async fn history(&self, params: &HistoryParams) -> Result<Dataset> {
        match params.symbol.as_str() {
            "ACB" => {
                let day = NaiveDate::from_ymd_opt(2024, 1, 2)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap();
                let mut table = Table::new(vec!["date".into(), "close".into()]);
                table.push_row(vec![Cell::DateTime(day), Cell::Float(10.5)]);
                table.push_row(vec![Cell::Null, Cell::Float(f64::NAN)]);
                Ok(Dataset::Table(table))
            }
            "BAD" => Err(MarketDataError::invalid("invalid date range")),
            other => Err(MarketDataError::provider(
                "vci",
                format!("unexpected symbol '{}'", other),
            )),
        }
    }
}

struct StubListing;

#[async_trait]
impl ListingAccessor for StubListing {
    fn source_id(&self) -> &'static str {
        "vci"
    }

    async fn all_symbols(&self) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }

    async fn symbols_by_group(&self, group: &str) -> Result<Dataset> {
        assert_eq!(group, "VN30");
        let mut series = Series::new();
        series.push("0", "ACB");
        series.push("1", "FPT");
        Ok(Dataset::Series(series))
    }
}

struct Unused;

#[async_trait]
impl QuoteAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn history(&self, _params: &HistoryParams) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

#[async_trait]
impl CompanyAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn overview(&self, _symbol: &str) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

#[async_trait]
impl FinanceAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn balance_sheet(&self, _params: &FinanceParams) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn income_statement(&self, _params: &FinanceParams) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn cash_flow(&self, _params: &FinanceParams) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn ratios(&self, _params: &FinanceParams) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

/// Every trading operation keeps its default body, so any call reports
/// `Unsupported` — which the API must surface as a 400.
struct StubTrading;

#[async_trait]
impl TradingAccessor for StubTrading {
    fn source_id(&self) -> &'static str {
        "tcbs"
    }
}

#[async_trait]
impl ScreenerAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn screen(
        &self,
        _filters: &serde_json::Map<String, Value>,
        _limit: u32,
        _lang: vnquant_market_data::Lang,
    ) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

#[async_trait]
impl FundAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn listing(&self, _fund_type: Option<FundType>) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn filter(&self, _symbol: &str) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn top_holdings(&self, _symbol: &str) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn industry_holdings(&self, _symbol: &str) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn asset_holdings(&self, _symbol: &str) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn nav_report(&self, _symbol: &str) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

#[async_trait]
impl MsnAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn search(&self, _query: &str, _locale: Option<&str>, _limit: u32) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn history(&self, _symbol_id: &str, _params: &MsnHistoryParams) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

#[async_trait]
impl GoldPriceAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn sjc(&self, _date: Option<NaiveDate>) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
    async fn btmc(&self) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

#[async_trait]
impl ExchangeRateAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn vcb(&self, _date: NaiveDate) -> Result<Dataset> {
        Ok(Dataset::Empty)
    }
}

fn test_state() -> Arc<AppState> {
    let quotes: SourceRegistry<dyn QuoteAccessor> =
        SourceRegistry::new().register("vci", Arc::new(StubQuotes));
    let listings: SourceRegistry<dyn ListingAccessor> =
        SourceRegistry::new().register("vci", Arc::new(StubListing));
    let companies: SourceRegistry<dyn CompanyAccessor> =
        SourceRegistry::new().register("vci", Arc::new(Unused));
    let finance: SourceRegistry<dyn FinanceAccessor> =
        SourceRegistry::new().register("vci", Arc::new(Unused));
    let trading: SourceRegistry<dyn TradingAccessor> =
        SourceRegistry::new().register("tcbs", Arc::new(StubTrading));
    Arc::new(AppState {
        quotes,
        listings,
        companies,
        finance,
        trading,
        screener: Arc::new(Unused),
        funds: Arc::new(Unused),
        msn: Arc::new(Unused),
        gold: Arc::new(Unused),
        exchange_rates: Arc::new(Unused),
    })
}

fn app() -> axum::Router {
    let config = Config::from_env();
    app_router(test_state(), &config)
}

async fn get(uri: &str) -> (axum::http::StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn history_normalizes_missing_dates_and_nan() {
    // Lowercase symbol on purpose: the boundary is case-insensitive.
    let (status, body) =
        get("/api/v1/quote/history?symbol=acb&start=2024-01-01&end=2024-01-31").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([
            { "date": "2024-01-02T00:00:00", "close": 10.5 },
            { "date": null, "close": null },
        ])
    );
}

#[tokio::test]
async fn missing_symbol_is_rejected_before_any_upstream_call() {
    let (status, _) = get("/api/v1/quote/history?start=2024-01-01").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn upstream_invalid_input_maps_to_400_envelope() {
    let (status, body) =
        get("/api/v1/quote/history?symbol=BAD&start=2024-01-01&end=2024-01-31").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "HTTP 400");
    assert_eq!(body["detail"], "invalid date range");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn inverted_date_range_is_rejected_locally() {
    let (status, body) =
        get("/api/v1/quote/history?symbol=ACB&start=2024-06-01&end=2024-01-01").await;
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "invalid date range");
}

#[tokio::test]
async fn unknown_source_is_a_client_error() {
    let (status, body) =
        get("/api/v1/quote/history?symbol=ACB&start=2024-01-01&source=ssi").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "HTTP 400");
}

#[tokio::test]
async fn unknown_interval_is_a_client_error() {
    let (status, _) =
        get("/api/v1/quote/history?symbol=ACB&start=2024-01-01&interval=2D").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn symbols_by_group_keeps_series_shape_and_order() {
    let (status, body) = get("/api/v1/listing/symbols-by-group?group=vn30").await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([
            { "index": "0", "value": "ACB" },
            { "index": "1", "value": "FPT" },
        ])
    );
}

#[tokio::test]
async fn unsupported_operation_maps_to_400() {
    let (status, body) = get("/api/v1/trading/order-stats?symbol=ACB&source=tcbs").await;
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "source 'tcbs' does not support order_stats");
}

#[tokio::test]
async fn page_size_bounds_are_enforced() {
    let (status, body) = get("/api/v1/quote/intraday?symbol=ACB&page_size=5000").await;
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "page_size must be between 1 and 1000");
}

#[tokio::test]
async fn market_index_groups_returns_named_array() {
    let (status, body) = get("/api/v1/market/index-groups").await;
    assert_eq!(status, 200);
    assert!(body["groups"]
        .as_array()
        .unwrap()
        .iter()
        .any(|g| g == "market"));
}

#[tokio::test]
async fn unknown_index_group_is_404() {
    let (status, body) = get("/api/v1/market/indices-by-group?group=frontier").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "HTTP 404");
    assert_eq!(body["detail"], "Group 'frontier' not found");
}

#[tokio::test]
async fn market_exchanges_returns_named_array() {
    let (status, body) = get("/api/v1/market/exchanges").await;
    assert_eq!(status, 200);
    assert_eq!(body["exchanges"], json!(["HOSE", "HNX", "UPCOM"]));
}

#[tokio::test]
async fn empty_dataset_serializes_as_empty_array() {
    let (status, body) = get("/api/v1/fund/listing").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_fund_type_is_rejected() {
    let (status, body) = get("/api/v1/fund/listing?fund_type=CRYPTO").await;
    assert_eq!(status, 400);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("invalid fund_type"));
}
