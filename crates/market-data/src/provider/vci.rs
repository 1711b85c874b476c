//! Vietcap (VCI) provider.
//!
//! Covers quotes, listing reference data, company disclosures, financial
//! statements and trading statistics. Price endpoints are plain JSON under
//! `/api/`; reference and company data come from the `data-mt` GraphQL
//! endpoint.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};

use crate::accessor::{
    CompanyAccessor, FinanceAccessor, ListingAccessor, QuoteAccessor, TradingAccessor,
};
use crate::dataset::{Cell, Column, Dataset, Table};
use crate::errors::MarketDataError;
use crate::models::{DateRange, FinanceParams, HistoryParams, Interval, Lang, OfficerFilter};
use crate::provider::convert::{self, TableSpec};
use crate::provider::http;

pub const DEFAULT_BASE_URL: &str = "https://trading.vietcap.com.vn";
const SOURCE: &str = "vci";

type Result<T> = std::result::Result<T, MarketDataError>;

/// Client for the Vietcap trading API.
pub struct VciClient {
    http: Client,
    base_url: String,
}

impl VciClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn graphql(&self, query: &'static str, variables: Value) -> Result<Value> {
        let url = format!("{}/data-mt/graphql", self.base_url);
        let body = json!({ "query": query, "variables": variables });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        if let Some(first) = payload
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
        {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("query rejected");
            return Err(MarketDataError::provider(SOURCE, message));
        }
        Ok(payload)
    }

    async fn symbols_in_board(&self, group: &str) -> Result<Vec<Value>> {
        let url = self.api_url("price/symbols/getByGroup");
        let payload =
            http::get_json(&self.http, SOURCE, &url, &[("group", group.to_string())]).await?;
        let rows = payload
            .as_array()
            .cloned()
            .ok_or_else(|| MarketDataError::provider(SOURCE, "expected a symbol array"))?;
        Ok(rows)
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

fn time_frame(interval: Interval) -> &'static str {
    if interval.is_intraday() {
        if interval == Interval::Hour1 {
            "ONE_HOUR"
        } else {
            "ONE_MINUTE"
        }
    } else {
        "ONE_DAY"
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[async_trait]
impl QuoteAccessor for VciClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn history(&self, params: &HistoryParams) -> Result<Dataset> {
        let url = self.api_url("chart/OHLCChart/gap-chart");
        let body = json!({
            "timeFrame": time_frame(params.interval),
            "symbols": [params.symbol],
            "from": epoch(params.range.start, false),
            "to": epoch(params.range.end, true),
        });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        let Some(chart) = payload.as_array().and_then(|charts| charts.first()) else {
            return Ok(Dataset::Empty);
        };
        let arr = |key: &str| {
            chart
                .get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        let table = convert::ohlc_table(
            &arr("t"),
            &arr("o"),
            &arr("h"),
            &arr("l"),
            &arr("c"),
            &arr("v"),
        );
        Ok(Dataset::Table(table))
    }

    async fn intraday(&self, symbol: &str, page: u32, page_size: u32) -> Result<Dataset> {
        let url = self.api_url("market-watch/LEData/getAll");
        let body = json!({ "symbol": symbol, "page": page, "limit": page_size });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        let rows = payload.as_array().cloned().unwrap_or_default();
        const SPEC: TableSpec = TableSpec {
            keep: &["truncTime", "matchPrice", "matchVol", "side", "id"],
            rename: &[
                ("truncTime", "time"),
                ("matchPrice", "price"),
                ("matchVol", "volume"),
                ("side", "match_type"),
            ],
            epoch: &["truncTime"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn price_depth(&self, symbol: &str) -> Result<Dataset> {
        let url = self.api_url("market-watch/AccumulatedPriceStepVol/getSymbolData");
        let body = json!({ "symbol": symbol });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        let rows = payload.as_array().cloned().unwrap_or_default();
        const SPEC: TableSpec = TableSpec {
            keep: &[
                "priceStep",
                "accumulatedVolume",
                "accumulatedBuyVolume",
                "accumulatedSellVolume",
                "accumulatedUndefinedVolume",
            ],
            rename: &[
                ("priceStep", "price"),
                ("accumulatedVolume", "acc_volume"),
                ("accumulatedBuyVolume", "acc_buy_volume"),
                ("accumulatedSellVolume", "acc_sell_volume"),
                ("accumulatedUndefinedVolume", "acc_undefined_volume"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

const LISTING_QUERY: &str = "query Query { CompaniesListingInfo { ticker organName enOrganName exchange type icbName2 icbName3 icbName4 enIcbName2 enIcbName3 enIcbName4 } }";

const ICB_QUERY: &str =
    "query Query { ListIcbCode { icbCode icbName enIcbName level } }";

#[async_trait]
impl ListingAccessor for VciClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn all_symbols(&self) -> Result<Dataset> {
        let payload = self.graphql(LISTING_QUERY, json!({})).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "CompaniesListingInfo"])?;
        const SPEC: TableSpec = TableSpec {
            keep: &["ticker", "organName"],
            rename: &[("ticker", "symbol"), ("organName", "organ_name")],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn symbols_by_group(&self, group: &str) -> Result<Dataset> {
        let rows = self.symbols_in_board(group).await?;
        Ok(Dataset::Series(convert::field_series(&rows, "symbol")))
    }

    async fn symbols_by_exchange(&self, lang: Lang) -> Result<Dataset> {
        let payload = self.graphql(LISTING_QUERY, json!({})).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "CompaniesListingInfo"])?;
        const VI: TableSpec = TableSpec {
            keep: &["ticker", "exchange", "type", "organName"],
            rename: &[("ticker", "symbol"), ("organName", "organ_name")],
            ..TableSpec::EMPTY
        };
        const EN: TableSpec = TableSpec {
            keep: &["ticker", "exchange", "type", "enOrganName"],
            rename: &[("ticker", "symbol"), ("enOrganName", "organ_name")],
            ..TableSpec::EMPTY
        };
        let spec = match lang {
            Lang::Vi => &VI,
            Lang::En => &EN,
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, spec)))
    }

    async fn industries(&self, lang: Lang) -> Result<Dataset> {
        let payload = self.graphql(LISTING_QUERY, json!({})).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "CompaniesListingInfo"])?;
        const VI: TableSpec = TableSpec {
            keep: &["ticker", "organName", "icbName2", "icbName3", "icbName4"],
            rename: &[
                ("ticker", "symbol"),
                ("organName", "organ_name"),
                ("icbName2", "icb_name2"),
                ("icbName3", "icb_name3"),
                ("icbName4", "icb_name4"),
            ],
            ..TableSpec::EMPTY
        };
        const EN: TableSpec = TableSpec {
            keep: &["ticker", "enOrganName", "enIcbName2", "enIcbName3", "enIcbName4"],
            rename: &[
                ("ticker", "symbol"),
                ("enOrganName", "organ_name"),
                ("enIcbName2", "icb_name2"),
                ("enIcbName3", "icb_name3"),
                ("enIcbName4", "icb_name4"),
            ],
            ..TableSpec::EMPTY
        };
        let spec = match lang {
            Lang::Vi => &VI,
            Lang::En => &EN,
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, spec)))
    }

    async fn industries_icb(&self) -> Result<Dataset> {
        let payload = self.graphql(ICB_QUERY, json!({})).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "ListIcbCode"])?;
        const SPEC: TableSpec = TableSpec {
            keep: &["icbName", "enIcbName", "icbCode", "level"],
            rename: &[
                ("icbName", "icb_name"),
                ("enIcbName", "en_icb_name"),
                ("icbCode", "icb_code"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn all_future_indices(&self) -> Result<Dataset> {
        let rows = self.symbols_in_board("FU_INDEX").await?;
        Ok(Dataset::Series(convert::field_series(&rows, "symbol")))
    }

    async fn all_covered_warrants(&self) -> Result<Dataset> {
        let rows = self.symbols_in_board("CW").await?;
        Ok(Dataset::Table(convert::rows_to_table(&rows, &BOARD_SPEC)))
    }

    async fn all_government_bonds(&self) -> Result<Dataset> {
        let rows = self.symbols_in_board("FU_BOND").await?;
        Ok(Dataset::Series(convert::field_series(&rows, "symbol")))
    }

    async fn all_bonds(&self) -> Result<Dataset> {
        let rows = self.symbols_in_board("BOND").await?;
        Ok(Dataset::Table(convert::rows_to_table(&rows, &BOARD_SPEC)))
    }
}

const BOARD_SPEC: TableSpec = TableSpec {
    keep: &["symbol", "id", "type", "board", "organName"],
    rename: &[("organName", "organ_name")],
    ..TableSpec::EMPTY
};

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

const OVERVIEW_QUERY: &str = "query Query($ticker: String!) { CompanyListingInfo(ticker: $ticker) { ticker organName enOrganName exchange icbName3 issueShare charterCapital financialRatio { dividend } } }";

const SHAREHOLDERS_QUERY: &str = "query Query($ticker: String!) { OrganizationShareHolders(ticker: $ticker) { ownerFullName ownerQuantity percentage updateDate } }";

const OFFICERS_QUERY: &str = "query Query($ticker: String!) { OrganizationManagers(ticker: $ticker) { fullName positionName positionShortName quantity percentage status } }";

const SUBSIDIARIES_QUERY: &str = "query Query($ticker: String!) { OrganizationSubsidiaries(ticker: $ticker) { organName subOrganCode percentage } }";

const AFFILIATES_QUERY: &str = "query Query($ticker: String!) { OrganizationAffiliates(ticker: $ticker) { organName subOrganCode percentage } }";

const NEWS_QUERY: &str = "query Query($ticker: String!) { OrganizationNews(ticker: $ticker) { id newsTitle newsSubTitle newsSourceLink publicDate } }";

const EVENTS_QUERY: &str = "query Query($ticker: String!) { OrganizationEvents(ticker: $ticker) { eventTitle issueDate sourceUrl publicDate recordDate exrightDate } }";

const RELATED_SPEC: TableSpec = TableSpec {
    rename: &[
        ("organName", "organ_name"),
        ("subOrganCode", "organ_code"),
        ("percentage", "own_percent"),
    ],
    ..TableSpec::EMPTY
};

#[async_trait]
impl CompanyAccessor for VciClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn overview(&self, symbol: &str) -> Result<Dataset> {
        let payload = self
            .graphql(OVERVIEW_QUERY, json!({ "ticker": symbol }))
            .await?;
        let info = http::pluck(SOURCE, &payload, &["data", "CompanyListingInfo"])?;
        if info.is_null() {
            return Ok(Dataset::Empty);
        }
        const SPEC: TableSpec = TableSpec {
            keep: &[
                "ticker",
                "organName",
                "enOrganName",
                "exchange",
                "icbName3",
                "issueShare",
                "charterCapital",
            ],
            rename: &[
                ("ticker", "symbol"),
                ("organName", "organ_name"),
                ("enOrganName", "en_organ_name"),
                ("icbName3", "industry"),
                ("issueShare", "issue_share"),
                ("charterCapital", "charter_capital"),
            ],
            ..TableSpec::EMPTY
        };
        let row = [info.clone()];
        Ok(Dataset::Table(convert::rows_to_table(&row, &SPEC)))
    }

    async fn shareholders(&self, symbol: &str) -> Result<Dataset> {
        let payload = self
            .graphql(SHAREHOLDERS_QUERY, json!({ "ticker": symbol }))
            .await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "OrganizationShareHolders"])?;
        const SPEC: TableSpec = TableSpec {
            rename: &[
                ("ownerFullName", "share_holder"),
                ("ownerQuantity", "quantity"),
                ("percentage", "share_own_percent"),
                ("updateDate", "update_date"),
            ],
            datetime: &["updateDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn officers(&self, symbol: &str, filter: OfficerFilter) -> Result<Dataset> {
        let payload = self
            .graphql(OFFICERS_QUERY, json!({ "ticker": symbol }))
            .await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "OrganizationManagers"])?;
        let wanted = match filter {
            OfficerFilter::All => None,
            OfficerFilter::Working => Some("working"),
            OfficerFilter::Resigned => Some("resigned"),
        };
        let filtered: Vec<Value> = rows
            .iter()
            .filter(|row| match wanted {
                None => true,
                Some(status) => row
                    .get("status")
                    .and_then(Value::as_str)
                    .map(|s| s.eq_ignore_ascii_case(status))
                    .unwrap_or(false),
            })
            .cloned()
            .collect();
        const SPEC: TableSpec = TableSpec {
            keep: &["fullName", "positionName", "positionShortName", "quantity", "percentage"],
            rename: &[
                ("fullName", "officer_name"),
                ("positionName", "officer_position"),
                ("positionShortName", "position_short_name"),
                ("percentage", "officer_own_percent"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&filtered, &SPEC)))
    }

    async fn subsidiaries(&self, symbol: &str) -> Result<Dataset> {
        let payload = self
            .graphql(SUBSIDIARIES_QUERY, json!({ "ticker": symbol }))
            .await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "OrganizationSubsidiaries"])?;
        Ok(Dataset::Table(convert::rows_to_table(rows, &RELATED_SPEC)))
    }

    async fn affiliates(&self, symbol: &str) -> Result<Dataset> {
        let payload = self
            .graphql(AFFILIATES_QUERY, json!({ "ticker": symbol }))
            .await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "OrganizationAffiliates"])?;
        Ok(Dataset::Table(convert::rows_to_table(rows, &RELATED_SPEC)))
    }

    async fn news(&self, symbol: &str) -> Result<Dataset> {
        let payload = self.graphql(NEWS_QUERY, json!({ "ticker": symbol })).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "OrganizationNews"])?;
        const SPEC: TableSpec = TableSpec {
            rename: &[
                ("newsTitle", "news_title"),
                ("newsSubTitle", "news_sub_title"),
                ("newsSourceLink", "news_source_link"),
                ("publicDate", "public_date"),
            ],
            datetime: &["publicDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn events(&self, symbol: &str) -> Result<Dataset> {
        let payload = self
            .graphql(EVENTS_QUERY, json!({ "ticker": symbol }))
            .await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["data", "OrganizationEvents"])?;
        const SPEC: TableSpec = TableSpec {
            rename: &[
                ("eventTitle", "event_title"),
                ("issueDate", "issue_date"),
                ("sourceUrl", "source_url"),
                ("publicDate", "public_date"),
                ("recordDate", "record_date"),
                ("exrightDate", "exright_date"),
            ],
            date: &["issueDate", "publicDate", "recordDate", "exrightDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

const STATEMENT_QUERY: &str = "query Query($ticker: String!, $period: String!, $statement: String!) { CompanyFinancialStatement(ticker: $ticker, period: $period, statement: $statement) { yearReport lengthReport items { name enName value } } }";

const RATIO_QUERY: &str = "query Query($ticker: String!, $period: String!) { CompanyFinancialRatio(ticker: $ticker, period: $period) { yearReport lengthReport groups { groupName items { name value } } } }";

impl VciClient {
    async fn statement(&self, params: &FinanceParams, statement: &str) -> Result<Dataset> {
        let payload = self
            .graphql(
                STATEMENT_QUERY,
                json!({
                    "ticker": params.symbol,
                    "period": params.period.as_str(),
                    "statement": statement,
                }),
            )
            .await?;
        let periods = http::pluck_rows(SOURCE, &payload, &["data", "CompanyFinancialStatement"])?;
        let name_key = match params.lang {
            Lang::Vi => "name",
            Lang::En => "enName",
        };
        Ok(Dataset::Table(pivot_periods(periods, |item| {
            item.get(name_key).and_then(Value::as_str)
        })))
    }
}

/// Pivot period rows carrying `items: [{name, value}]` into a wide table:
/// one row per period, one column per item name, names in first-appearance
/// order after the two period columns.
fn pivot_periods<'a, F>(periods: &'a [Value], item_name: F) -> Table
where
    F: Fn(&'a Value) -> Option<&'a str>,
{
    let mut names: Vec<&str> = Vec::new();
    for period in periods {
        if let Some(items) = period.get("items").and_then(Value::as_array) {
            for item in items {
                if let Some(name) = item_name(item) {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }
    }

    let mut columns: Vec<Column> = vec!["year_report".into(), "length_report".into()];
    columns.extend(names.iter().map(|n| Column::new(*n)));
    let mut table = Table::new(columns);

    for period in periods {
        let mut row = vec![
            int_cell(period.get("yearReport")),
            int_cell(period.get("lengthReport")),
        ];
        let items = period
            .get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for name in &names {
            let value = items
                .iter()
                .find(|item| item_name(item) == Some(*name))
                .and_then(|item| item.get("value"))
                .and_then(Value::as_f64);
            row.push(value.map(Cell::Float).unwrap_or(Cell::Null));
        }
        table.push_row(row);
    }
    table
}

fn int_cell(value: Option<&Value>) -> Cell {
    value
        .and_then(Value::as_i64)
        .map(Cell::Int)
        .unwrap_or(Cell::Null)
}

#[async_trait]
impl FinanceAccessor for VciClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn balance_sheet(&self, params: &FinanceParams) -> Result<Dataset> {
        self.statement(params, "balance_sheet").await
    }

    async fn income_statement(&self, params: &FinanceParams) -> Result<Dataset> {
        self.statement(params, "income_statement").await
    }

    async fn cash_flow(&self, params: &FinanceParams) -> Result<Dataset> {
        self.statement(params, "cash_flow").await
    }

    /// Ratios come back grouped (profitability, liquidity, ...); group and
    /// metric become a two-level column header.
    async fn ratios(&self, params: &FinanceParams) -> Result<Dataset> {
        let payload = self
            .graphql(
                RATIO_QUERY,
                json!({
                    "ticker": params.symbol,
                    "period": params.period.as_str(),
                }),
            )
            .await?;
        let periods = http::pluck_rows(SOURCE, &payload, &["data", "CompanyFinancialRatio"])?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        for period in periods {
            if let Some(groups) = period.get("groups").and_then(Value::as_array) {
                for group in groups {
                    let group_name = group
                        .get("groupName")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    if let Some(items) = group.get("items").and_then(Value::as_array) {
                        for item in items {
                            if let Some(name) = item.get("name").and_then(Value::as_str) {
                                let pair = (group_name.to_string(), name.to_string());
                                if !pairs.contains(&pair) {
                                    pairs.push(pair);
                                }
                            }
                        }
                    }
                }
            }
        }

        let mut columns: Vec<Column> = vec!["year_report".into(), "length_report".into()];
        columns.extend(
            pairs
                .iter()
                .map(|(group, name)| Column::nested([group.as_str(), name.as_str()])),
        );
        let mut table = Table::new(columns);

        for period in periods {
            let mut row = vec![
                int_cell(period.get("yearReport")),
                int_cell(period.get("lengthReport")),
            ];
            for (group_name, name) in &pairs {
                let value = period
                    .get("groups")
                    .and_then(Value::as_array)
                    .and_then(|groups| {
                        groups.iter().find(|g| {
                            g.get("groupName").and_then(Value::as_str)
                                == Some(group_name.as_str())
                        })
                    })
                    .and_then(|g| g.get("items"))
                    .and_then(Value::as_array)
                    .and_then(|items| {
                        items
                            .iter()
                            .find(|i| i.get("name").and_then(Value::as_str) == Some(name.as_str()))
                    })
                    .and_then(|i| i.get("value"))
                    .and_then(Value::as_f64);
                row.push(value.map(Cell::Float).unwrap_or(Cell::Null));
            }
            table.push_row(row);
        }
        Ok(Dataset::Table(table))
    }
}

// ---------------------------------------------------------------------------
// Trading
// ---------------------------------------------------------------------------

#[async_trait]
impl TradingAccessor for VciClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    /// The board payload nests per-section objects (listing info, bid/ask,
    /// match data); section and field become a two-level column header.
    async fn price_board(&self, symbols: &[String]) -> Result<Dataset> {
        let url = self.api_url("price/symbols/getList");
        let body = json!({ "symbols": symbols });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        let rows = payload.as_array().cloned().unwrap_or_default();

        const SECTIONS: &[(&str, &str)] = &[
            ("listingInfo", "listing"),
            ("bidAsk", "bid_ask"),
            ("matchPrice", "match"),
        ];

        let mut pairs: Vec<(&'static str, &'static str, String)> = Vec::new();
        for row in &rows {
            for (section, label) in SECTIONS {
                if let Some(fields) = row.get(*section).and_then(Value::as_object) {
                    for key in fields.keys() {
                        if !pairs.iter().any(|(s, _, k)| s == section && k == key) {
                            pairs.push((*section, *label, key.clone()));
                        }
                    }
                }
            }
        }

        let columns = pairs
            .iter()
            .map(|(_, label, key)| Column::nested([*label, key.as_str()]))
            .collect();
        let mut table = Table::new(columns);

        for row in &rows {
            let cells = pairs
                .iter()
                .map(|(section, _, key)| {
                    let value = row
                        .get(*section)
                        .and_then(|fields| fields.get(key.as_str()))
                        .unwrap_or(&Value::Null);
                    match value {
                        Value::Null => Cell::Null,
                        Value::Bool(b) => Cell::Bool(*b),
                        Value::Number(n) => n
                            .as_i64()
                            .map(Cell::Int)
                            .unwrap_or_else(|| Cell::Float(n.as_f64().unwrap_or(f64::NAN))),
                        Value::String(s) => Cell::Text(s.clone()),
                        other => Cell::Text(other.to_string()),
                    }
                })
                .collect();
            table.push_row(cells);
        }
        Ok(Dataset::Table(table))
    }

    async fn trading_stats(&self, symbol: &str, range: &DateRange) -> Result<Dataset> {
        let url = self.api_url("price/tradingStat/getByTimeRange");
        let query = [
            ("ticker", symbol.to_string()),
            ("from", range.start.format("%Y-%m-%d").to_string()),
            ("to", range.end.format("%Y-%m-%d").to_string()),
        ];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let rows = payload.as_array().cloned().unwrap_or_default();
        const SPEC: TableSpec = TableSpec {
            rename: &[
                ("tradingDate", "trading_date"),
                ("totalMatchVolume", "total_match_volume"),
                ("totalMatchValue", "total_match_value"),
                ("totalDealVolume", "total_deal_volume"),
                ("totalDealValue", "total_deal_value"),
                ("foreignBuyVolume", "foreign_buy_volume"),
                ("foreignSellVolume", "foreign_sell_volume"),
            ],
            date: &["tradingDate"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }

    async fn order_stats(&self, symbol: &str) -> Result<Dataset> {
        let url = self.api_url("market-watch/OrderStat/getSymbolData");
        let body = json!({ "symbol": symbol });
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        let rows = payload.as_array().cloned().unwrap_or_default();
        const SPEC: TableSpec = TableSpec {
            rename: &[
                ("priceStep", "price"),
                ("buyOrders", "buy_orders"),
                ("sellOrders", "sell_orders"),
                ("buyVolume", "buy_volume"),
                ("sellVolume", "sell_volume"),
            ],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(&rows, &SPEC)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_frame_mapping() {
        assert_eq!(time_frame(Interval::Minute5), "ONE_MINUTE");
        assert_eq!(time_frame(Interval::Hour1), "ONE_HOUR");
        assert_eq!(time_frame(Interval::Day1), "ONE_DAY");
        assert_eq!(time_frame(Interval::Week1), "ONE_DAY");
    }

    #[test]
    fn test_pivot_periods_unions_item_names() {
        let periods = vec![
            json!({
                "yearReport": 2024,
                "lengthReport": 1,
                "items": [{"name": "cash", "value": 10.0}],
            }),
            json!({
                "yearReport": 2024,
                "lengthReport": 2,
                "items": [{"name": "cash", "value": 12.0}, {"name": "debt", "value": 3.0}],
            }),
        ];
        let table = pivot_periods(&periods, |item| item.get("name").and_then(Value::as_str));
        let names: Vec<String> = table.columns.iter().map(|c| c.flat_name()).collect();
        assert_eq!(names, vec!["year_report", "length_report", "cash", "debt"]);
        assert_eq!(table.rows[0][3], Cell::Null);
        assert_eq!(table.rows[1][3], Cell::Float(3.0));
    }
}
