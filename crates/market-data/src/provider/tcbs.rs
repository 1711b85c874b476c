//! TCBS (Techcombank Securities) provider.
//!
//! Public analysis API under `apipubaws.tcbs.com.vn`. Covers bar history,
//! company data, financial statements, trading flow and the stock screener.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Map, Value};

use crate::accessor::{
    CompanyAccessor, FinanceAccessor, QuoteAccessor, ScreenerAccessor, TradingAccessor,
};
use crate::dataset::Dataset;
use crate::errors::MarketDataError;
use crate::models::{DateRange, FinanceParams, HistoryParams, Lang, Period};
use crate::provider::convert::{self, TableSpec};
use crate::provider::http;

pub const DEFAULT_BASE_URL: &str = "https://apipubaws.tcbs.com.vn";
const SOURCE: &str = "tcbs";

type Result<T> = std::result::Result<T, MarketDataError>;

/// Client for the public TCBS analysis API.
pub struct TcbsClient {
    http: Client,
    base_url: String,
}

impl TcbsClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn company_rows(
        &self,
        symbol: &str,
        endpoint: &str,
        list_field: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<Value>> {
        let url = self.url(&format!("tcanalysis/v1/company/{}/{}", symbol, endpoint));
        let payload = http::get_json(&self.http, SOURCE, &url, query).await?;
        Ok(http::pluck_rows(SOURCE, &payload, &[list_field])?.clone())
    }
}

fn epoch(date: NaiveDate, end_of_day: bool) -> i64 {
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|dt| dt.and_utc().timestamp()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[async_trait]
impl QuoteAccessor for TcbsClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn history(&self, params: &HistoryParams) -> Result<Dataset> {
        // Long-term bars only serve daily and coarser; minute data lives on
        // a separate endpoint.
        let (path, resolution) = if params.interval.is_intraday() {
            ("stock-insight/v2/stock/bars", params.interval.as_str())
        } else {
            ("stock-insight/v2/stock/bars-long-term", "D")
        };
        let url = self.url(path);
        let query = [
            ("ticker", params.symbol.clone()),
            ("type", "stock".to_string()),
            ("resolution", resolution.to_string()),
            ("from", epoch(params.range.start, false).to_string()),
            ("to", epoch(params.range.end, true).to_string()),
        ];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data"])?;
        const SPEC: TableSpec = TableSpec {
            keep: &["tradingDate", "open", "high", "low", "close", "volume"],
            rename: &[("tradingDate", "time")],
            datetime: &["tradingDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn intraday(&self, symbol: &str, page: u32, page_size: u32) -> Result<Dataset> {
        let url = self.url(&format!("stock-insight/v1/intraday/{}/his/paging", symbol));
        let query = [
            // Upstream pages are zero-based.
            ("page", page.saturating_sub(1).to_string()),
            ("size", page_size.to_string()),
            ("headIndex", "-1".to_string()),
        ];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data"])?;
        const SPEC: TableSpec = TableSpec {
            keep: &["t", "p", "v", "a"],
            rename: &[
                ("t", "time"),
                ("p", "price"),
                ("v", "volume"),
                ("a", "match_type"),
            ],
            datetime: &["t"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }
}

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

#[async_trait]
impl CompanyAccessor for TcbsClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn overview(&self, symbol: &str) -> Result<Dataset> {
        let url = self.url(&format!("tcanalysis/v1/ticker/{}/overview", symbol));
        let payload = http::get_json(&self.http, SOURCE, &url, &[]).await?;
        const SPEC: TableSpec = TableSpec {
            keep: &[
                "ticker",
                "exchange",
                "industry",
                "companyType",
                "establishedYear",
                "noEmployees",
                "noShareholders",
                "foreignPercent",
                "outstandingShare",
                "issueShare",
                "website",
            ],
            rename: &[
                ("ticker", "symbol"),
                ("companyType", "company_type"),
                ("establishedYear", "established_year"),
                ("noEmployees", "no_employees"),
                ("noShareholders", "no_shareholders"),
                ("foreignPercent", "foreign_percent"),
                ("outstandingShare", "outstanding_share"),
                ("issueShare", "issue_share"),
            ],
            ..TableSpec::EMPTY
        };
        let row = [payload];
        Ok(Dataset::Table(convert::rows_to_table(&row, &SPEC)))
    }

    /// Narrative company description; served as a single record.
    async fn profile(&self, symbol: &str) -> Result<Dataset> {
        let url = self.url(&format!("tcanalysis/v1/company/{}/overview", symbol));
        let payload = http::get_json(&self.http, SOURCE, &url, &[]).await?;
        Ok(Dataset::Scalar(convert::object_to_record(&payload)))
    }

    async fn shareholders(&self, symbol: &str) -> Result<Dataset> {
        let rows = self
            .company_rows(symbol, "large-share-holders", "listShareHolder", &[])
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["name", "ownPercent"],
            rename: &[("name", "share_holder"), ("ownPercent", "share_own_percent")],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn officers(
        &self,
        symbol: &str,
        _filter: crate::models::OfficerFilter,
    ) -> Result<Dataset> {
        let rows = self
            .company_rows(symbol, "key-officers", "listKeyOfficer", &[])
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["name", "position", "ownPercent"],
            rename: &[
                ("name", "officer_name"),
                ("position", "officer_position"),
                ("ownPercent", "officer_own_percent"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn subsidiaries(&self, symbol: &str) -> Result<Dataset> {
        let rows = self
            .company_rows(symbol, "sub-companies", "listSubCompany", &[])
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["companyName", "ownPercent"],
            rename: &[("companyName", "organ_name"), ("ownPercent", "own_percent")],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn news(&self, symbol: &str) -> Result<Dataset> {
        let rows = self
            .company_rows(symbol, "activity-news", "listActivityNews", &[])
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["title", "source", "publishDate"],
            rename: &[("publishDate", "publish_date")],
            datetime: &["publishDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn events(&self, symbol: &str) -> Result<Dataset> {
        let rows = self
            .company_rows(symbol, "events-news", "listEventNews", &[])
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["eventName", "eventDesc", "notifyDate", "exerDate", "regFinalDate"],
            rename: &[
                ("eventName", "event_name"),
                ("eventDesc", "event_desc"),
                ("notifyDate", "notify_date"),
                ("exerDate", "exercise_date"),
                ("regFinalDate", "reg_final_date"),
            ],
            date: &["notifyDate", "exerDate", "regFinalDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn dividends(&self, symbol: &str, page: u32, page_size: u32) -> Result<Dataset> {
        let query = [
            ("page", page.to_string()),
            ("size", page_size.to_string()),
        ];
        let rows = self
            .company_rows(
                symbol,
                "dividend-payment-histories",
                "listDividendPaymentHis",
                &query,
            )
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["exerciseDate", "cashYear", "cashDividendPercentage", "issueMethod"],
            rename: &[
                ("exerciseDate", "exercise_date"),
                ("cashYear", "cash_year"),
                ("cashDividendPercentage", "cash_dividend_percentage"),
                ("issueMethod", "issue_method"),
            ],
            date: &["exerciseDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

impl TcbsClient {
    async fn finance_rows(&self, params: &FinanceParams, endpoint: &str) -> Result<Dataset> {
        let url = self.url(&format!("tcanalysis/v1/finance/{}/{}", params.symbol, endpoint));
        let yearly = match params.period {
            Period::Quarter => "0",
            Period::Annual => "1",
        };
        let query = [
            ("yearly", yearly.to_string()),
            ("isAll", "true".to_string()),
        ];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let rows = payload.as_array().cloned().unwrap_or_default();
        // Statement labels arrive pre-localized in Vietnamese; `lang` only
        // matters for the VCI source.
        Ok(Dataset::Table(convert::rows_to_table(
            &rows,
            &TableSpec::EMPTY,
        )))
    }
}

#[async_trait]
impl FinanceAccessor for TcbsClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn balance_sheet(&self, params: &FinanceParams) -> Result<Dataset> {
        self.finance_rows(params, "balancesheet").await
    }

    async fn income_statement(&self, params: &FinanceParams) -> Result<Dataset> {
        self.finance_rows(params, "incomestatement").await
    }

    async fn cash_flow(&self, params: &FinanceParams) -> Result<Dataset> {
        self.finance_rows(params, "cashflow").await
    }

    async fn ratios(&self, params: &FinanceParams) -> Result<Dataset> {
        self.finance_rows(params, "financialratio").await
    }
}

// ---------------------------------------------------------------------------
// Trading
// ---------------------------------------------------------------------------

#[async_trait]
impl TradingAccessor for TcbsClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn price_board(&self, symbols: &[String]) -> Result<Dataset> {
        let url = self.url("stock-insight/v1/stock/second-tc-price");
        let query = [("tickers", symbols.join(","))];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data"])?;
        const SPEC: TableSpec = TableSpec {
            rename: &[
                ("t", "symbol"),
                ("cp", "close_price"),
                ("fv", "foreign_volume"),
                ("mav", "match_volume"),
                ("nstv", "net_sell_total_volume"),
                ("nstp", "net_sell_total_percent"),
                ("rsi", "rsi"),
                ("macdv", "macd_value"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn foreign_trade(&self, symbol: &str, range: &DateRange) -> Result<Dataset> {
        let query = [
            ("from", range.start.format("%Y-%m-%d").to_string()),
            ("to", range.end.format("%Y-%m-%d").to_string()),
        ];
        let rows = self
            .company_rows(symbol, "foreign-trading", "listForeignTrading", &query)
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["dateReport", "buyVol", "sellVol", "buyVal", "sellVal", "netVal"],
            rename: &[
                ("dateReport", "date"),
                ("buyVol", "buy_volume"),
                ("sellVol", "sell_volume"),
                ("buyVal", "buy_value"),
                ("sellVal", "sell_value"),
                ("netVal", "net_value"),
            ],
            date: &["dateReport"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn insider_deals(&self, symbol: &str) -> Result<Dataset> {
        let query = [("page", "0".to_string()), ("size", "100".to_string())];
        let rows = self
            .company_rows(symbol, "insider-dealing", "listInsiderDealing", &query)
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &[
                "anDate",
                "dealingMethod",
                "dealingAction",
                "quantity",
                "price",
                "ratio",
            ],
            rename: &[
                ("anDate", "deal_announce_date"),
                ("dealingMethod", "deal_method"),
                ("dealingAction", "deal_action"),
                ("quantity", "deal_quantity"),
                ("price", "deal_price"),
                ("ratio", "deal_ratio"),
            ],
            date: &["anDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn prop_trades(&self, symbol: &str) -> Result<Dataset> {
        let query = [("page", "0".to_string()), ("size", "100".to_string())];
        let rows = self
            .company_rows(symbol, "prop-trading", "listPropTrading", &query)
            .await?;
        const SPEC: TableSpec = TableSpec {
            keep: &["dateReport", "buyVol", "sellVol", "buyVal", "sellVal"],
            rename: &[
                ("dateReport", "date"),
                ("buyVol", "buy_volume"),
                ("sellVol", "sell_volume"),
                ("buyVal", "buy_value"),
                ("sellVal", "sell_value"),
            ],
            date: &["dateReport"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }
}

// ---------------------------------------------------------------------------
// Screener
// ---------------------------------------------------------------------------

#[async_trait]
impl ScreenerAccessor for TcbsClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn screen(
        &self,
        filters: &Map<String, Value>,
        limit: u32,
        lang: Lang,
    ) -> Result<Dataset> {
        let url = self.url("ligo/v1/watchlist/preset");
        // Scalar filters become equality terms; two-element arrays become
        // [min, max] range terms, matching the upstream screener contract.
        let terms: Vec<Value> = filters
            .iter()
            .map(|(key, value)| {
                if value.is_array() {
                    json!({ "key": key, "value": value, "operator": "BETWEEN" })
                } else {
                    json!({ "key": key, "value": value, "operator": "=" })
                }
            })
            .collect();
        let body = json!({
            "tcbsID": Value::Null,
            "filters": terms,
            "size": limit,
            "lang": lang.as_str(),
        });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["searchData", "pageContent"])?;
        const SPEC: TableSpec = TableSpec {
            rename: &[
                ("ticker", "symbol"),
                ("exchangeName", "exchange"),
                ("industryName", "industry"),
                ("marketCap", "market_cap"),
                ("priceNearRealtime", "price_near_realtime"),
                ("peRatio", "pe"),
                ("pbRatio", "pb"),
                ("dividendYield", "dividend_yield"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_spans_whole_days() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(epoch(date, true) - epoch(date, false), 86_399);
    }
}
