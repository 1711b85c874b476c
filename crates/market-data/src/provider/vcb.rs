//! Vietcombank exchange-rate board.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;

use crate::accessor::ExchangeRateAccessor;
use crate::dataset::Dataset;
use crate::errors::MarketDataError;
use crate::provider::convert::{self, TableSpec};
use crate::provider::http;

pub const DEFAULT_BASE_URL: &str = "https://www.vietcombank.com.vn";
const SOURCE: &str = "vcb";

/// Client for Vietcombank's published exchange rates.
pub struct VcbClient {
    http: Client,
    base_url: String,
}

impl VcbClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ExchangeRateAccessor for VcbClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn vcb(&self, date: NaiveDate) -> Result<Dataset, MarketDataError> {
        let url = format!("{}/api/exchangerates", self.base_url);
        let query = [("date", date.format("%Y-%m-%d").to_string())];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["Data"])?;
        // Rates arrive as grouped strings ("25,480.00"); unquoted currencies
        // carry "-" which becomes null.
        const SPEC: TableSpec = TableSpec {
            keep: &["currencyCode", "currencyName", "cash", "transfer", "sell"],
            rename: &[
                ("currencyCode", "currency_code"),
                ("currencyName", "currency_name"),
                ("cash", "buy_cash"),
                ("transfer", "buy_transfer"),
            ],
            numeric: &["cash", "transfer", "sell"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }
}
