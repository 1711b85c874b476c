use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use vnquant_market_data::{
    CompanyAccessor, ExchangeRateAccessor, FinanceAccessor, FmarketClient, FundAccessor,
    GoldClient, GoldPriceAccessor, ListingAccessor, MsnAccessor, MsnClient, QuoteAccessor,
    ScreenerAccessor, SourceRegistry, TcbsClient, TradingAccessor, VcbClient, VciClient,
};

use crate::config::Config;

/// Shared, immutable handler state: one accessor (or source registry, where
/// a `source` query parameter picks the implementation) per upstream domain.
pub struct AppState {
    pub quotes: SourceRegistry<dyn QuoteAccessor>,
    pub listings: SourceRegistry<dyn ListingAccessor>,
    pub companies: SourceRegistry<dyn CompanyAccessor>,
    pub finance: SourceRegistry<dyn FinanceAccessor>,
    pub trading: SourceRegistry<dyn TradingAccessor>,
    pub screener: Arc<dyn ScreenerAccessor>,
    pub funds: Arc<dyn FundAccessor>,
    pub msn: Arc<dyn MsnAccessor>,
    pub gold: Arc<dyn GoldPriceAccessor>,
    pub exchange_rates: Arc<dyn ExchangeRateAccessor>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .user_agent(concat!("vnquant-server/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let vci = Arc::new(VciClient::new(http.clone(), config.vci_base_url.clone()));
    let tcbs = Arc::new(TcbsClient::new(http.clone(), config.tcbs_base_url.clone()));
    let msn = Arc::new(MsnClient::new(
        http.clone(),
        config.msn_base_url.clone(),
        config.msn_api_key.clone(),
    ));
    let fmarket = Arc::new(FmarketClient::new(
        http.clone(),
        config.fmarket_base_url.clone(),
    ));
    let gold = Arc::new(GoldClient::new(
        http.clone(),
        config.sjc_base_url.clone(),
        config.btmc_base_url.clone(),
    ));
    let vcb = Arc::new(VcbClient::new(http, config.vcb_base_url.clone()));

    let quotes: SourceRegistry<dyn QuoteAccessor> = SourceRegistry::<dyn QuoteAccessor>::new()
        .register("vci", vci.clone())
        .register("tcbs", tcbs.clone());
    let listings: SourceRegistry<dyn ListingAccessor> =
        SourceRegistry::<dyn ListingAccessor>::new().register("vci", vci.clone());
    let companies: SourceRegistry<dyn CompanyAccessor> = SourceRegistry::<dyn CompanyAccessor>::new()
        .register("vci", vci.clone())
        .register("tcbs", tcbs.clone());
    let finance: SourceRegistry<dyn FinanceAccessor> = SourceRegistry::<dyn FinanceAccessor>::new()
        .register("vci", vci.clone())
        .register("tcbs", tcbs.clone());
    let trading: SourceRegistry<dyn TradingAccessor> = SourceRegistry::<dyn TradingAccessor>::new()
        .register("vci", vci)
        .register("tcbs", tcbs.clone());

    Ok(Arc::new(AppState {
        quotes,
        listings,
        companies,
        finance,
        trading,
        screener: tcbs,
        funds: fmarket,
        msn,
        gold,
        exchange_rates: vcb,
    }))
}
