//! MSN Money provider: international symbols, crypto and forex.
//!
//! Symbols are addressed by MSN's internal id (from the autosuggest
//! endpoint), not by ticker; callers search first, then chart by id.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::accessor::MsnAccessor;
use crate::dataset::Dataset;
use crate::errors::MarketDataError;
use crate::models::{MsnAssetKind, MsnHistoryParams};
use crate::provider::convert::{self, TableSpec};
use crate::provider::http;

pub const DEFAULT_BASE_URL: &str = "https://assets.msn.com/service/Finance";
// Public key MSN's own web client ships; overridable via config.
pub const DEFAULT_API_KEY: &str = "0QfOX3Vn51YCzitbLaRkTTBadtWpgTN8NZLW0C1SEM";
const SOURCE: &str = "msn";
const DEFAULT_LOCALE: &str = "en-us";

type Result<T> = std::result::Result<T, MarketDataError>;

/// Client for MSN Money's finance asset service.
pub struct MsnClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl MsnClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

fn chart_type(kind: Option<MsnAssetKind>) -> &'static str {
    match kind {
        Some(MsnAssetKind::Crypto) => "Cryptocurrency",
        Some(MsnAssetKind::Currency) => "Currency",
        Some(MsnAssetKind::Index) => "Index",
        Some(MsnAssetKind::Stock) | None => "All",
    }
}

#[async_trait]
impl MsnAccessor for MsnClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &str, locale: Option<&str>, limit: u32) -> Result<Dataset> {
        let url = format!("{}/Autosuggest", self.base_url);
        let params = [
            ("apikey", self.api_key.clone()),
            ("query", query.to_string()),
            ("market", locale.unwrap_or(DEFAULT_LOCALE).to_string()),
            ("count", limit.to_string()),
        ];
        let payload = http::get_json(&self.http, SOURCE, &url, &params).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["value"])?;
        const SPEC: TableSpec = TableSpec {
            keep: &[
                "secId",
                "symbol",
                "displayName",
                "assetType",
                "market",
                "exchangeName",
                "currency",
            ],
            rename: &[
                ("secId", "symbol_id"),
                ("displayName", "name"),
                ("assetType", "asset_type"),
                ("exchangeName", "exchange"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn history(&self, symbol_id: &str, params: &MsnHistoryParams) -> Result<Dataset> {
        let url = format!("{}/Charts/TimeRange", self.base_url);
        let query = [
            ("apikey", self.api_key.clone()),
            ("ids", symbol_id.to_string()),
            ("type", chart_type(params.asset_kind).to_string()),
            ("timeframe", params.interval.as_str().to_string()),
            ("startTime", params.range.start.format("%Y-%m-%d").to_string()),
            ("endTime", params.range.end.format("%Y-%m-%d").to_string()),
            ("wrapodata", "false".to_string()),
        ];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let Some(series) = payload
            .as_array()
            .and_then(|charts| charts.first())
            .and_then(|chart| chart.get("series"))
            .and_then(Value::as_array)
            .and_then(|series| series.first())
        else {
            return Ok(Dataset::Empty);
        };
        let arr = |key: &str| {
            series
                .get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        let mut table = convert::ohlc_table(
            &arr("timeStamps"),
            &arr("openPrices"),
            &arr("pricesHigh"),
            &arr("pricesLow"),
            &arr("prices"),
            &arr("volumes"),
        );
        // `count_back` bounds the window from the end, like the upstream UI.
        let excess = table.rows.len().saturating_sub(params.count_back as usize);
        if excess > 0 {
            table.rows.drain(..excess);
        }
        Ok(Dataset::Table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_defaults_to_all() {
        assert_eq!(chart_type(None), "All");
        assert_eq!(chart_type(Some(MsnAssetKind::Crypto)), "Cryptocurrency");
    }
}
