//! Conversion of upstream JSON payloads into dataset shapes.
//!
//! Providers return arrays of objects with source-specific key names and
//! loosely typed values (dates as strings, numbers as strings with digit
//! grouping, epochs as integers). [`rows_to_table`] turns such an array
//! into a [`Table`] under a declarative [`TableSpec`]: which keys to keep,
//! what to call them, and which ones carry temporal or numeric text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::dataset::{Cell, Column, Record, Series, Table};

/// Declarative mapping for one upstream payload. All slices reference the
/// *upstream* key names; `rename` only changes the emitted column label.
#[derive(Default)]
pub(crate) struct TableSpec {
    /// Projection and column order. Empty = every key, in first-appearance
    /// order across rows.
    pub keep: &'static [&'static str],
    /// Upstream key → output column label.
    pub rename: &'static [(&'static str, &'static str)],
    /// String columns holding timestamps.
    pub datetime: &'static [&'static str],
    /// String columns holding calendar dates.
    pub date: &'static [&'static str],
    /// Integer columns holding unix seconds.
    pub epoch: &'static [&'static str],
    /// String columns holding numbers with digit grouping ("25,480.00").
    pub numeric: &'static [&'static str],
}

impl TableSpec {
    pub(crate) const EMPTY: TableSpec = TableSpec {
        keep: &[],
        rename: &[],
        datetime: &[],
        date: &[],
        epoch: &[],
        numeric: &[],
    };

    fn label(&self, key: &str) -> String {
        self.rename
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| to.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Build a table from an array of JSON objects. Non-object rows are
/// skipped; keys absent from a row yield null cells.
pub(crate) fn rows_to_table(rows: &[Value], spec: &TableSpec) -> Table {
    let keys: Vec<String> = if spec.keep.is_empty() {
        let mut seen = Vec::new();
        for row in rows {
            if let Some(object) = row.as_object() {
                for key in object.keys() {
                    if !seen.iter().any(|k| k == key) {
                        seen.push(key.clone());
                    }
                }
            }
        }
        seen
    } else {
        spec.keep.iter().map(|k| k.to_string()).collect()
    };

    let columns = keys
        .iter()
        .map(|key| Column::new(spec.label(key)))
        .collect();
    let mut table = Table::new(columns);

    for row in rows {
        let Some(object) = row.as_object() else {
            continue;
        };
        let cells = keys
            .iter()
            .map(|key| cell_from_json(key, object.get(key.as_str()).unwrap_or(&Value::Null), spec))
            .collect();
        table.push_row(cells);
    }
    table
}

fn cell_from_json(key: &str, value: &Value, spec: &TableSpec) -> Cell {
    if value.is_null() {
        return Cell::Null;
    }
    if spec.epoch.contains(&key) {
        return match value.as_i64() {
            Some(secs) => epoch_cell(secs),
            None => Cell::Null,
        };
    }
    if spec.datetime.contains(&key) {
        return match value.as_str() {
            Some(s) => parse_datetime(s),
            None => Cell::Null,
        };
    }
    if spec.date.contains(&key) {
        return match value.as_str() {
            Some(s) => parse_date(s),
            None => Cell::Null,
        };
    }
    if spec.numeric.contains(&key) {
        return match value {
            Value::String(s) => parse_grouped_number(s),
            Value::Number(n) => number_cell(n),
            _ => Cell::Null,
        };
    }
    match value {
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => number_cell(n),
        Value::String(s) => Cell::Text(s.clone()),
        // Nested structures are opaque to the record shape; keep them as
        // their JSON text so nothing is silently dropped.
        other => Cell::Text(other.to_string()),
    }
}

fn number_cell(n: &serde_json::Number) -> Cell {
    match n.as_i64() {
        Some(i) => Cell::Int(i),
        None => Cell::Float(n.as_f64().unwrap_or(f64::NAN)),
    }
}

pub(crate) fn epoch_cell(secs: i64) -> Cell {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| Cell::DateTime(dt.naive_utc()))
        .unwrap_or(Cell::Null)
}

/// Timestamps arrive in a handful of shapes across sources.
pub(crate) fn parse_datetime(s: &str) -> Cell {
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Cell::DateTime(dt);
        }
    }
    if let Cell::Date(d) = parse_date(s) {
        return Cell::Date(d);
    }
    Cell::Text(s.to_string())
}

pub(crate) fn parse_date(s: &str) -> Cell {
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Cell::Date(d);
        }
    }
    Cell::Text(s.to_string())
}

/// "25,480.00" → 25480.0; bare "-" (no quote) → null.
pub(crate) fn parse_grouped_number(s: &str) -> Cell {
    let cleaned = s.trim().replace(',', "");
    if cleaned.is_empty() || cleaned == "-" {
        return Cell::Null;
    }
    match cleaned.parse::<f64>() {
        Ok(f) => Cell::Float(f),
        Err(_) => Cell::Text(s.to_string()),
    }
}

/// Positionally indexed series over one field of each row, mirroring how a
/// single listing column is served ({"index": "0", "value": "ACB"}, ...).
pub(crate) fn field_series(rows: &[Value], field: &str) -> Series {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            row.get(field)
                .and_then(Value::as_str)
                .map(|v| (i.to_string(), Cell::Text(v.to_string())))
        })
        .collect()
}

/// Candle table from parallel arrays (timestamps + OHLCV). Timestamps may
/// be epoch seconds or ISO strings depending on the source.
pub(crate) fn ohlc_table(
    times: &[Value],
    opens: &[Value],
    highs: &[Value],
    lows: &[Value],
    closes: &[Value],
    volumes: &[Value],
) -> Table {
    let mut table = Table::new(vec![
        "time".into(),
        "open".into(),
        "high".into(),
        "low".into(),
        "close".into(),
        "volume".into(),
    ]);
    for i in 0..times.len() {
        let time = match &times[i] {
            Value::Number(n) => n.as_i64().map(epoch_cell).unwrap_or(Cell::Null),
            Value::String(s) => parse_datetime(s),
            _ => Cell::Null,
        };
        let float_at = |arr: &[Value]| {
            arr.get(i)
                .and_then(Value::as_f64)
                .map(Cell::Float)
                .unwrap_or(Cell::Null)
        };
        table.push_row(vec![
            time,
            float_at(opens),
            float_at(highs),
            float_at(lows),
            float_at(closes),
            float_at(volumes),
        ]);
    }
    table
}

/// A JSON object as a scalar record, untouched.
pub(crate) fn object_to_record(value: &Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_to_table_derives_columns_in_first_appearance_order() {
        let rows = vec![json!({"a": 1, "b": "x"}), json!({"b": "y", "c": 2.5})];
        let table = rows_to_table(&rows, &TableSpec::EMPTY);
        let names: Vec<String> = table.columns.iter().map(|c| c.flat_name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(table.rows[0][2], Cell::Null);
        assert_eq!(table.rows[1][0], Cell::Null);
        assert_eq!(table.rows[1][2], Cell::Float(2.5));
    }

    #[test]
    fn test_rows_to_table_applies_keep_and_rename() {
        let rows = vec![json!({"tradingDate": "2024-01-02", "close": 10.5, "noise": true})];
        let spec = TableSpec {
            keep: &["tradingDate", "close"],
            rename: &[("tradingDate", "trading_date")],
            date: &["tradingDate"],
            ..TableSpec::EMPTY
        };
        let table = rows_to_table(&rows, &spec);
        let names: Vec<String> = table.columns.iter().map(|c| c.flat_name()).collect();
        assert_eq!(names, vec!["trading_date", "close"]);
        assert_eq!(
            table.rows[0][0],
            Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_parse_grouped_number() {
        assert_eq!(parse_grouped_number("25,480.00"), Cell::Float(25480.0));
        assert_eq!(parse_grouped_number("-"), Cell::Null);
        assert_eq!(parse_grouped_number(""), Cell::Null);
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(matches!(parse_datetime("2024-01-02T09:15:00"), Cell::DateTime(_)));
        assert!(matches!(parse_datetime("02/01/2024 09:15"), Cell::DateTime(_)));
        assert!(matches!(parse_datetime("2024-01-02"), Cell::Date(_)));
        assert!(matches!(parse_datetime("n/a"), Cell::Text(_)));
    }

    #[test]
    fn test_field_series_is_positional() {
        let rows = vec![json!({"symbol": "ACB"}), json!({"symbol": "FPT"})];
        let series = field_series(&rows, "symbol");
        let entries = series.into_entries();
        assert_eq!(entries[0], ("0".to_string(), Cell::Text("ACB".into())));
        assert_eq!(entries[1], ("1".to_string(), Cell::Text("FPT".into())));
    }

    #[test]
    fn test_ohlc_table_handles_ragged_arrays() {
        let t = vec![json!(1704153600), json!(1704240000)];
        let o = vec![json!(10.0)];
        let empty: Vec<Value> = vec![];
        let table = ohlc_table(&t, &o, &empty, &empty, &empty, &empty);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], Cell::Null);
    }
}
