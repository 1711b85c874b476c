use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use tower::ServiceExt;
use vnquant_market_data::{
    dataset::{Series, Table},
    CompanyAccessor, Dataset, ExchangeRateAccessor, FinanceAccessor, FinanceParams, FundAccessor,
    FundType, GoldPriceAccessor, HistoryParams, ListingAccessor, MarketDataError, MsnAccessor,
    MsnHistoryParams, QuoteAccessor, ScreenerAccessor, SourceRegistry, TradingAccessor,
};
use vnquant_server::{api::app_router, config::Config, AppState};

type Result<T> = std::result::Result<T, MarketDataError>;

/// Listing stub whose `all_symbols` either answers or fails, driving the
/// readiness probe.
struct StubListing {
    fail: bool,
}

#[async_trait]
impl ListingAccessor for StubListing {
    fn source_id(&self) -> &'static str {
        "vci"
    }

    async fn all_symbols(&self) -> Result<Dataset> {
        if self.fail {
            return Err(MarketDataError::provider("vci", "HTTP 502"));
        }
        let mut series = Series::new();
        series.push("0", "ACB");
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

#[async_trait]
impl TradingAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
}

#[async_trait]
impl ScreenerAccessor for Unused {
    fn source_id(&self) -> &'static str {
        "unused"
    }
    async fn screen(
        &self,
        _filters: &serde_json::Map<String, serde_json::Value>,
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
    async fn sjc(&self, _date: Option<chrono::NaiveDate>) -> Result<Dataset> {
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
    async fn vcb(&self, _date: chrono::NaiveDate) -> Result<Dataset> {
        Ok(Dataset::Table(Table::default()))
    }
}

fn state_with_listing(fail: bool) -> Arc<AppState> {
    let listings: SourceRegistry<dyn ListingAccessor> =
        SourceRegistry::new().register("vci", Arc::new(StubListing { fail }));
    let quotes: SourceRegistry<dyn QuoteAccessor> =
        SourceRegistry::new().register("vci", Arc::new(Unused));
    let companies: SourceRegistry<dyn CompanyAccessor> =
        SourceRegistry::new().register("vci", Arc::new(Unused));
    let finance: SourceRegistry<dyn FinanceAccessor> =
        SourceRegistry::new().register("vci", Arc::new(Unused));
    let trading: SourceRegistry<dyn TradingAccessor> =
        SourceRegistry::new().register("vci", Arc::new(Unused));
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

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let config = Config::from_env();
    let app = app_router(state_with_listing(false), &config);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "vnquant-api");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn ready_succeeds_when_listing_answers() {
    let config = Config::from_env();
    let app = app_router(state_with_listing(false), &config);

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = body_json(response).await;
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn ready_reports_503_when_dependency_fails() {
    let config = Config::from_env();
    let app = app_router(state_with_listing(true), &config);

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 503);
    let body = body_json(response).await;
    assert_eq!(body["ready"], false);
    assert_eq!(body["error"], "vci: HTTP 502");
}
