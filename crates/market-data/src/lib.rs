//! Market data access for the vnquant gateway.
//!
//! This crate owns everything between the HTTP handlers and the upstream
//! data services:
//!
//! - [`dataset`] — the explicit shape tags (table, series, scalar, records)
//!   accessors produce
//! - [`normalize`] — conversion of any dataset into a JSON-safe list of
//!   flat records (NaN/Infinity scrubbing, header flattening, ISO-8601
//!   timestamps)
//! - [`accessor`] — one trait per upstream domain, plus the source registry
//!   that maps a `source` query parameter to an implementation
//! - [`provider`] — thin clients for the concrete sources (VCI, TCBS, MSN,
//!   Fmarket, SJC/BTMC, VCB)
//! - [`catalog`] — bundled index/sector/exchange reference data
//!
//! The crate performs no caching, retrying or rate limiting; each accessor
//! call is one upstream request adapted into a dataset.

pub mod accessor;
pub mod catalog;
pub mod dataset;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod provider;

pub use accessor::{
    CompanyAccessor, ExchangeRateAccessor, FinanceAccessor, FundAccessor, GoldPriceAccessor,
    ListingAccessor, MsnAccessor, QuoteAccessor, ScreenerAccessor, SourceRegistry,
    TradingAccessor,
};
pub use dataset::{Cell, Column, Dataset, Record, Series, Table};
pub use errors::MarketDataError;
pub use models::{
    DateRange, FinanceParams, FundType, HistoryParams, Interval, Lang, MsnAssetKind,
    MsnHistoryParams, OfficerFilter, Period,
};
pub use provider::{FmarketClient, GoldClient, MsnClient, TcbsClient, VcbClient, VciClient};
