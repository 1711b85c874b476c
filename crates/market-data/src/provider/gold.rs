//! Domestic gold price boards (SJC and BTMC).

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};

use crate::accessor::GoldPriceAccessor;
use crate::dataset::{Cell, Dataset, Table};
use crate::errors::MarketDataError;
use crate::provider::convert::{self, parse_grouped_number, TableSpec};
use crate::provider::http;

pub const DEFAULT_SJC_BASE_URL: &str = "https://sjc.com.vn";
pub const DEFAULT_BTMC_BASE_URL: &str = "http://api.btmc.vn";
// Public key embedded in BTMC's own price widget.
const BTMC_KEY: &str = "3kd8ub1llcg9t45hnoh8hmn7t5kc2v";
const SOURCE: &str = "gold";

// SJC publishes history from this date onward.
const SJC_EPOCH: (i32, u32, u32) = (2016, 1, 2);

type Result<T> = std::result::Result<T, MarketDataError>;

/// Client for the SJC and BTMC gold price services.
pub struct GoldClient {
    http: Client,
    sjc_base_url: String,
    btmc_base_url: String,
}

impl GoldClient {
    pub fn new(
        http: Client,
        sjc_base_url: impl Into<String>,
        btmc_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            sjc_base_url: sjc_base_url.into(),
            btmc_base_url: btmc_base_url.into(),
        }
    }
}

#[async_trait]
impl GoldPriceAccessor for GoldClient {
    fn source_id(&self) -> &'static str {
        SOURCE
    }

    async fn sjc(&self, date: Option<NaiveDate>) -> Result<Dataset> {
        if let Some(date) = date {
            let (y, m, d) = SJC_EPOCH;
            let earliest = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
            if date < earliest {
                return Err(MarketDataError::invalid(format!(
                    "SJC gold prices are only available from {} onward",
                    earliest
                )));
            }
        }
        let url = format!("{}/GoldPrice/Services/PriceService.ashx", self.sjc_base_url);
        let mut body = json!({ "method": "GetSJCGoldPriceByDate" });
        if let Some(date) = date {
            body["toDate"] = Value::String(date.format("%d/%m/%Y").to_string());
        }
        let payload = http::post_json(&self.http, SOURCE, &url, &body).await?;
        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(MarketDataError::provider(SOURCE, "SJC rejected the query"));
        }
        let rows = http::pluck_rows(SOURCE, &payload, &["data"])?;
        const SPEC: TableSpec = TableSpec {
            keep: &["TypeName", "BranchName", "BuyValue", "SellValue"],
            rename: &[
                ("TypeName", "name"),
                ("BranchName", "branch"),
                ("BuyValue", "buy_price"),
                ("SellValue", "sell_price"),
            ],
            numeric: &["BuyValue", "SellValue"],
            ..TableSpec::EMPTY
        };
        Ok(Dataset::Table(convert::rows_to_table(rows, &SPEC)))
    }

    async fn btmc(&self) -> Result<Dataset> {
        let url = format!("{}/api/BTMCAPI/getpricebtmc", self.btmc_base_url);
        let query = [("key", BTMC_KEY.to_string())];
        let payload = http::get_json(&self.http, SOURCE, &url, &query).await?;
        let rows = http::pluck_rows(SOURCE, &payload, &["DataList", "Data"])?;
        Ok(Dataset::Table(btmc_table(rows)))
    }
}

/// BTMC suffixes every field with the row number (`@n_1`, `@pb_1`, ...);
/// re-key per row before tabulating.
fn btmc_table(rows: &[Value]) -> Table {
    const FIELDS: &[(&str, &str)] = &[
        ("n", "name"),
        ("k", "karat"),
        ("h", "gold_content"),
        ("pb", "buy_price"),
        ("ps", "sell_price"),
        ("pt", "world_price"),
        ("d", "time"),
    ];

    let mut table = Table::new(FIELDS.iter().map(|(_, label)| (*label).into()).collect());
    for (i, row) in rows.iter().enumerate() {
        let suffix = row
            .get("@row")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| (i + 1).to_string());
        let cells = FIELDS
            .iter()
            .map(|(field, label)| {
                let key = format!("@{}_{}", field, suffix);
                match row.get(&key) {
                    Some(Value::String(s)) => match *label {
                        "buy_price" | "sell_price" | "world_price" => parse_grouped_number(s),
                        "time" => convert::parse_datetime(s),
                        _ => Cell::Text(s.clone()),
                    },
                    Some(Value::Number(n)) => n
                        .as_i64()
                        .map(Cell::Int)
                        .unwrap_or_else(|| Cell::Float(n.as_f64().unwrap_or(f64::NAN))),
                    _ => Cell::Null,
                }
            })
            .collect();
        table.push_row(cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_btmc_rows_are_rekeyed_by_suffix() {
        let rows = vec![
            json!({
                "@row": "1",
                "@n_1": "VANG MIENG SJC",
                "@k_1": "24k",
                "@h_1": "999.9",
                "@pb_1": "11,905,000",
                "@ps_1": "12,105,000",
                "@pt_1": "10,610,000",
                "@d_1": "02/01/2024 09:15",
            }),
            json!({
                "@row": "2",
                "@n_2": "NHAN TRON TRON",
                "@pb_2": "-",
            }),
        ];
        let table = btmc_table(&rows);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], Cell::Text("VANG MIENG SJC".into()));
        assert_eq!(table.rows[0][3], Cell::Float(11_905_000.0));
        assert!(matches!(table.rows[0][6], Cell::DateTime(_)));
        assert_eq!(table.rows[1][3], Cell::Null);
        assert_eq!(table.rows[1][4], Cell::Null);
    }
}
