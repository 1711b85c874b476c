//! Accessor trait definitions.
//!
//! One trait per upstream domain. Every method returns a
//! [`Dataset`](crate::dataset::Dataset) so the API layer stays a pure
//! translation layer: parse parameters, call one accessor method, normalize.
//!
//! Methods a source cannot serve keep the default body, which reports
//! [`MarketDataError::Unsupported`]; the API layer turns that into a 400.

mod registry;

pub use registry::SourceRegistry;

use async_trait::async_trait;

use crate::dataset::Dataset;
use crate::errors::MarketDataError;
use crate::models::{
    DateRange, FinanceParams, FundType, HistoryParams, Lang, MsnHistoryParams, OfficerFilter,
};

type Result<T> = std::result::Result<T, MarketDataError>;

/// Price data for a single listed symbol.
#[async_trait]
pub trait QuoteAccessor: Send + Sync {
    /// Source identifier ("vci", "tcbs"), used in error messages.
    fn source_id(&self) -> &'static str;

    /// OHLCV history over a date range.
    async fn history(&self, params: &HistoryParams) -> Result<Dataset>;

    /// Intra-day tick data, paged.
    async fn intraday(&self, symbol: &str, page: u32, page_size: u32) -> Result<Dataset> {
        let _ = (symbol, page, page_size);
        Err(MarketDataError::unsupported(self.source_id(), "intraday"))
    }

    /// Accumulated bid/ask volume per price step.
    async fn price_depth(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(self.source_id(), "price_depth"))
    }
}

/// Exchange listing reference data.
#[async_trait]
pub trait ListingAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    /// Every listed symbol with its organ name.
    async fn all_symbols(&self) -> Result<Dataset>;

    /// Constituents of a named board (VN30, HNX30, ...), as a series.
    async fn symbols_by_group(&self, group: &str) -> Result<Dataset> {
        let _ = group;
        Err(MarketDataError::unsupported(
            self.source_id(),
            "symbols_by_group",
        ))
    }

    async fn symbols_by_exchange(&self, lang: Lang) -> Result<Dataset> {
        let _ = lang;
        Err(MarketDataError::unsupported(
            self.source_id(),
            "symbols_by_exchange",
        ))
    }

    /// ICB industry membership per symbol.
    async fn industries(&self, lang: Lang) -> Result<Dataset> {
        let _ = lang;
        Err(MarketDataError::unsupported(self.source_id(), "industries"))
    }

    /// The ICB code table itself.
    async fn industries_icb(&self) -> Result<Dataset> {
        Err(MarketDataError::unsupported(
            self.source_id(),
            "industries_icb",
        ))
    }

    /// Index futures contracts, as a series.
    async fn all_future_indices(&self) -> Result<Dataset> {
        Err(MarketDataError::unsupported(
            self.source_id(),
            "all_future_indices",
        ))
    }

    async fn all_covered_warrants(&self) -> Result<Dataset> {
        Err(MarketDataError::unsupported(
            self.source_id(),
            "all_covered_warrants",
        ))
    }

    async fn all_government_bonds(&self) -> Result<Dataset> {
        Err(MarketDataError::unsupported(
            self.source_id(),
            "all_government_bonds",
        ))
    }

    async fn all_bonds(&self) -> Result<Dataset> {
        Err(MarketDataError::unsupported(self.source_id(), "all_bonds"))
    }
}

/// Company master data, disclosures and corporate events.
#[async_trait]
pub trait CompanyAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    /// Key figures for one company, as a single record.
    async fn overview(&self, symbol: &str) -> Result<Dataset>;

    /// Narrative profile (history, business lines).
    async fn profile(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(self.source_id(), "profile"))
    }

    async fn shareholders(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(
            self.source_id(),
            "shareholders",
        ))
    }

    async fn officers(&self, symbol: &str, filter: OfficerFilter) -> Result<Dataset> {
        let _ = (symbol, filter);
        Err(MarketDataError::unsupported(self.source_id(), "officers"))
    }

    async fn subsidiaries(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(
            self.source_id(),
            "subsidiaries",
        ))
    }

    async fn affiliates(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(self.source_id(), "affiliates"))
    }

    async fn news(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(self.source_id(), "news"))
    }

    async fn events(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(self.source_id(), "events"))
    }

    /// Dividend payment history, paged.
    async fn dividends(&self, symbol: &str, page: u32, page_size: u32) -> Result<Dataset> {
        let _ = (symbol, page, page_size);
        Err(MarketDataError::unsupported(self.source_id(), "dividends"))
    }
}

/// Financial statements.
#[async_trait]
pub trait FinanceAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    async fn balance_sheet(&self, params: &FinanceParams) -> Result<Dataset>;

    async fn income_statement(&self, params: &FinanceParams) -> Result<Dataset>;

    async fn cash_flow(&self, params: &FinanceParams) -> Result<Dataset>;

    async fn ratios(&self, params: &FinanceParams) -> Result<Dataset>;
}

/// Trading boards and flow statistics.
#[async_trait]
pub trait TradingAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    /// Live board for a list of symbols.
    async fn price_board(&self, symbols: &[String]) -> Result<Dataset> {
        let _ = symbols;
        Err(MarketDataError::unsupported(self.source_id(), "price_board"))
    }

    /// Foreign buy/sell flow over a date range.
    async fn foreign_trade(&self, symbol: &str, range: &DateRange) -> Result<Dataset> {
        let _ = (symbol, range);
        Err(MarketDataError::unsupported(
            self.source_id(),
            "foreign_trade",
        ))
    }

    async fn insider_deals(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(
            self.source_id(),
            "insider_deals",
        ))
    }

    /// Proprietary-desk trades.
    async fn prop_trades(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(self.source_id(), "prop_trades"))
    }

    /// Daily volume/value statistics over a date range.
    async fn trading_stats(&self, symbol: &str, range: &DateRange) -> Result<Dataset> {
        let _ = (symbol, range);
        Err(MarketDataError::unsupported(
            self.source_id(),
            "trading_stats",
        ))
    }

    /// Order-book statistics by price level.
    async fn order_stats(&self, symbol: &str) -> Result<Dataset> {
        let _ = symbol;
        Err(MarketDataError::unsupported(self.source_id(), "order_stats"))
    }
}

/// Stock screening.
#[async_trait]
pub trait ScreenerAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    /// Run a screen with the given filter map; `filters` keys follow the
    /// upstream screener's parameter names (e.g. `exchangeName`).
    async fn screen(
        &self,
        filters: &serde_json::Map<String, serde_json::Value>,
        limit: u32,
        lang: Lang,
    ) -> Result<Dataset>;
}

/// Open-end fund data.
#[async_trait]
pub trait FundAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    async fn listing(&self, fund_type: Option<FundType>) -> Result<Dataset>;

    /// Look up funds by short name; empty string lists everything.
    async fn filter(&self, symbol: &str) -> Result<Dataset>;

    async fn top_holdings(&self, symbol: &str) -> Result<Dataset>;

    async fn industry_holdings(&self, symbol: &str) -> Result<Dataset>;

    async fn asset_holdings(&self, symbol: &str) -> Result<Dataset>;

    /// NAV history per report date.
    async fn nav_report(&self, symbol: &str) -> Result<Dataset>;
}

/// International symbols, crypto and forex via MSN.
#[async_trait]
pub trait MsnAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    async fn search(&self, query: &str, locale: Option<&str>, limit: u32) -> Result<Dataset>;

    async fn history(&self, symbol_id: &str, params: &MsnHistoryParams) -> Result<Dataset>;
}

/// Domestic gold price boards.
#[async_trait]
pub trait GoldPriceAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    /// SJC buy/sell board for a date (data starts 2016-01-02).
    async fn sjc(&self, date: Option<chrono::NaiveDate>) -> Result<Dataset>;

    /// BTMC live board.
    async fn btmc(&self) -> Result<Dataset>;
}

/// Bank exchange-rate boards.
#[async_trait]
pub trait ExchangeRateAccessor: Send + Sync {
    fn source_id(&self) -> &'static str;

    /// Vietcombank's published rates for a date.
    async fn vcb(&self, date: chrono::NaiveDate) -> Result<Dataset>;
}
