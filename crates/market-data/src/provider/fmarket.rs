//! Fmarket provider: Vietnamese open-end funds.
//!
//! Detail endpoints are keyed by Fmarket's numeric product id, so
//! holdings/NAV lookups first resolve the fund's short name through the
//! filter endpoint (that indirection is the upstream API's, not ours).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::accessor::FundAccessor;
use crate::dataset::Dataset;
use crate::errors::MarketDataError;
use crate::models::FundType;
use crate::provider::convert::{self, TableSpec};
use crate::provider::http;

pub const DEFAULT_BASE_URL: &str = "https://api.fmarket.vn";
const SOURCE: &str = "fmarket";

type Result<T> = std::result::Result<T, MarketDataError>;

/// Client for the Fmarket fund platform API.
pub struct FmarketClient {
    http: Client,
    base_url: String,
}

const LISTING_SPEC: TableSpec = TableSpec {
    keep: &[
        "id",
        "shortName",
        "name",
        "code",
        "fundType",
        "managementFee",
        "nav",
        "navDate",
    ],
    rename: &[
        ("shortName", "short_name"),
        ("name", "fund_name"),
        ("fundType", "fund_type"),
        ("managementFee", "management_fee"),
        ("navDate", "nav_date"),
    ],
    date: &["navDate"],
    ..TableSpec::EMPTY
};

impl FmarketClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn filter_rows(
        &self,
        search: &str,
        fund_type: Option<FundType>,
    ) -> Result<Vec<Value>> {
        let url = format!("{}/res/products/filter", self.base_url);
        let asset_types: Vec<&str> = fund_type.iter().map(FundType::as_str).collect();
        let body = json!({
            "types": ["NEW_FUND", "TRADING_FUND"],
            "issuerIds": [],
            "fundAssetTypes": asset_types,
            "searchField": search,
            "sortOrder": "DESC",
            "sortField": "navToPrevious36Months",
            "page": 1,
            "pageSize": 100,
        });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        Ok(http::pluck_rows(SOURCE, &payload, &["data", "rows"])?.clone())
    }

    /// Resolve a fund short name to its numeric product id.
    async fn fund_id(&self, symbol: &str) -> Result<i64> {
        let rows = self.filter_rows(symbol, None).await?;
        rows.iter()
            .find(|row| {
                row.get("shortName")
                    .and_then(Value::as_str)
                    .map(|s| s.eq_ignore_ascii_case(symbol))
                    .unwrap_or(false)
            })
            .or(rows.first())
            .and_then(|row| row.get("id"))
            .and_then(Value::as_i64)
            .ok_or_else(|| MarketDataError::not_found(format!("Fund '{}' not found", symbol)))
    }

    async fn product_detail(&self, symbol: &str) -> Result<Value> {
        let id = self.fund_id(symbol).await?;
        let url = format!("{}/res/products/{}", self.base_url, id);
        let payload = http::get_json(&self.http, SOURCE, &url, &[]).await?;
        Ok(http::pluck(SOURCE, &payload, &["data"])?.clone())
    }

    fn holding_table(detail: &Value, list_field: &str, spec: &TableSpec) -> Dataset {
        let rows = detail
            .get(list_field)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Dataset::Table(convert::rows_to_table(&rows, spec))
    }
}

#[async_trait]
impl FundAccessor for FmarketClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn listing(&self, fund_type: Option<FundType>) -> Result<Dataset> {
        let rows = self.filter_rows("", fund_type).await?;
        Ok(Dataset::Table(convert::rows_to_table(&rows, &LISTING_SPEC)))
    }

    async fn filter(&self, symbol: &str) -> Result<Dataset> {
        let rows = self.filter_rows(symbol, None).await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["id", "shortName", "name", "code"],
            rename: &[("shortName", "short_name"), ("name", "fund_name")],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn top_holdings(&self, symbol: &str) -> Result<Dataset> {
        let detail = self.product_detail(symbol).await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["stockCode", "industry", "netAssetPercent", "type", "updateAt"],
            rename: &[
                ("stockCode", "stock_code"),
                ("netAssetPercent", "net_asset_percent"),
                ("type", "asset_type"),
                ("updateAt", "update_at"),
            ],
            datetime: &["updateAt"],
            ..TableSpec::EMPTY
        };
        Ok(Self::holding_table(&detail, "productTopHoldingList", &SPEC))
    }

    async fn industry_holdings(&self, symbol: &str) -> Result<Dataset> {
        let detail = self.product_detail(symbol).await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["industry", "assetPercent"],
            rename: &[("assetPercent", "net_asset_percent")],
            ..TableSpec::EMPTY
        };
        Ok(Self::holding_table(
            &detail,
            "productIndustriesHoldingList",
            &SPEC,
        ))
    }

    async fn asset_holdings(&self, symbol: &str) -> Result<Dataset> {
        let detail = self.product_detail(symbol).await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["assetType", "assetPercent"],
            rename: &[
                ("assetType", "asset_type"),
                ("assetPercent", "asset_percent"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Self::holding_table(&detail, "productAssetHoldingList", &SPEC))
    }

    async fn nav_report(&self, symbol: &str) -> Result<Dataset> {
        let id = self.fund_id(symbol).await?;
        let url = format!("{}/res/product/get-nav-history", self.base_url);
        let body = json!({
            "isAllData": 1,
            "productId": id,
            "fromDate": Value::Null,
            "toDate": Value::Null,
        });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data"])?;
        const SPEC: TableSpec = TableSpec {
            keep: &["navDate", "nav"],
            rename: &[("navDate", "date")],
            date: &["navDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }
}
