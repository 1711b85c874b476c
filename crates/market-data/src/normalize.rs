//! Conversion of upstream datasets into JSON-safe record lists.
//!
//! This is the one shared piece of logic in the gateway: every response body
//! is produced by [`to_records`] (or [`to_records_or`] when a route supplies
//! its own fallback). The conversion is pure, never fails, and guarantees
//! that no NaN or infinite float survives into the output.

use chrono::Timelike;
use serde_json::Value;

use crate::dataset::{Cell, Column, Dataset, Record};

/// Convert a dataset into an ordered list of flat records.
///
/// Empty input yields an empty list; see [`to_records_or`] for a custom
/// default.
pub fn to_records(dataset: Dataset) -> Vec<Record> {
    to_records_or(dataset, Vec::new())
}

/// Convert a dataset into an ordered list of flat records, substituting
/// `default` when the dataset carries no rows.
///
/// - A series of N entries becomes N `{index, value}` records in entry
///   order.
/// - A table becomes one record per row, keyed by the flattened column
///   names, in row order. Rows shorter than the header are padded with
///   nulls.
/// - A scalar mapping becomes a one-element list; a record list passes
///   through unchanged.
pub fn to_records_or(dataset: Dataset, default: Vec<Record>) -> Vec<Record> {
    match dataset {
        Dataset::Empty => default,
        Dataset::Series(series) => {
            if series.is_empty() {
                return default;
            }
            series
                .into_entries()
                .into_iter()
                .map(|(index, value)| {
                    let mut record = Record::new();
                    record.insert("index".to_string(), Value::String(index));
                    record.insert("value".to_string(), sanitize(value));
                    record
                })
                .collect()
        }
        Dataset::Table(table) => {
            if table.is_empty() {
                return default;
            }
            let names: Vec<String> = table.columns.iter().map(Column::flat_name).collect();
            table
                .rows
                .into_iter()
                .map(|row| {
                    let mut record = Record::new();
                    let mut cells = row.into_iter();
                    for name in &names {
                        let cell = cells.next().unwrap_or(Cell::Null);
                        record.insert(name.clone(), sanitize(cell));
                    }
                    record
                })
                .collect()
        }
        Dataset::Scalar(record) => vec![record],
        Dataset::Records(records) => records,
    }
}

/// Map one cell to its JSON value, applying the sanitation precedence:
/// non-finite floats → null, temporal values → ISO-8601 strings, the
/// missing sentinel → null, everything else passes through.
fn sanitize(cell: Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Bool(b) => Value::Bool(b),
        Cell::Int(i) => Value::from(i),
        Cell::Float(f) if !f.is_finite() => Value::Null,
        Cell::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Text(s) => Value::String(s),
        Cell::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        Cell::DateTime(dt) => {
            let formatted = if dt.nanosecond() == 0 {
                dt.format("%Y-%m-%dT%H:%M:%S")
            } else {
                dt.format("%Y-%m-%dT%H:%M:%S%.6f")
            };
            Value::String(formatted.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Series, Table};
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        let mut r = Record::new();
        for (k, v) in pairs {
            r.insert(k.to_string(), v.clone());
        }
        r
    }

    #[test]
    fn test_empty_dataset_yields_empty_list() {
        assert!(to_records(Dataset::Empty).is_empty());
    }

    #[test]
    fn test_empty_table_yields_default() {
        let table = Table::new(vec!["close".into()]);
        let fallback = vec![record(&[("note", json!("none"))])];
        let out = to_records_or(Dataset::Table(table), fallback.clone());
        assert_eq!(out, fallback);
    }

    #[test]
    fn test_series_emits_index_value_pairs_in_order() {
        let mut series = Series::new();
        series.push("VCB", 1.0);
        series.push("ACB", Cell::Null);
        series.push("FPT", "hold");

        let out = to_records(Dataset::Series(series));
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["index"], json!("VCB"));
        assert_eq!(out[0]["value"], json!(1.0));
        assert_eq!(out[1]["index"], json!("ACB"));
        assert_eq!(out[1]["value"], Value::Null);
        assert_eq!(out[2]["value"], json!("hold"));
        for rec in &out {
            assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["index", "value"]);
        }
    }

    #[test]
    fn test_series_nan_becomes_null() {
        let mut series = Series::new();
        series.push("x", f64::NAN);
        let out = to_records(Dataset::Series(series));
        assert_eq!(out[0]["value"], Value::Null);
    }

    #[test]
    fn test_table_scrubs_nan_and_infinity() {
        let mut table = Table::new(vec!["open".into(), "close".into(), "volume".into()]);
        table.push_row(vec![
            Cell::Float(f64::NAN),
            Cell::Float(f64::INFINITY),
            Cell::Float(f64::NEG_INFINITY),
        ]);
        table.push_row(vec![Cell::Float(1.0), Cell::Float(2.0), Cell::Int(300)]);

        let out = to_records(Dataset::Table(table));
        assert_eq!(out[0]["open"], Value::Null);
        assert_eq!(out[0]["close"], Value::Null);
        assert_eq!(out[0]["volume"], Value::Null);
        assert_eq!(out[1]["volume"], json!(300));
        for rec in &out {
            for v in rec.values() {
                if let Some(f) = v.as_f64() {
                    assert!(f.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_multi_level_headers_flatten_with_underscore() {
        let mut table = Table::new(vec![
            Column::nested(["price", "close"]),
            Column::nested(["price", "open"]),
        ]);
        table.push_row(vec![Cell::Float(10.5), Cell::Float(10.1)]);

        let out = to_records(Dataset::Table(table));
        assert_eq!(
            out[0].keys().collect::<Vec<_>>(),
            vec!["price_close", "price_open"]
        );
        assert_eq!(out[0]["price_close"], json!(10.5));
        assert_eq!(out[0]["price_open"], json!(10.1));
    }

    #[test]
    fn test_missing_date_and_nan_close() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut table = Table::new(vec!["date".into(), "close".into()]);
        table.push_row(vec![Cell::DateTime(day), Cell::Float(10.5)]);
        table.push_row(vec![Cell::Null, Cell::Float(f64::NAN)]);

        let out = to_records(Dataset::Table(table));
        assert_eq!(out[0]["date"], json!("2024-01-02T00:00:00"));
        assert_eq!(out[0]["close"], json!(10.5));
        assert_eq!(out[1]["date"], Value::Null);
        assert_eq!(out[1]["close"], Value::Null);
    }

    #[test]
    fn test_date_cells_render_without_time() {
        let mut table = Table::new(vec!["trading_date".into()]);
        table.push_row(vec![Cell::Date(
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )]);
        let out = to_records(Dataset::Table(table));
        assert_eq!(out[0]["trading_date"], json!("2024-03-15"));
    }

    #[test]
    fn test_short_rows_pad_with_null() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.push_row(vec![Cell::Int(1)]);
        let out = to_records(Dataset::Table(table));
        assert_eq!(out[0]["a"], json!(1));
        assert_eq!(out[0]["b"], Value::Null);
    }

    #[test]
    fn test_scalar_wraps_as_single_record() {
        let rec = record(&[("ticker", json!("VNM")), ("exchange", json!("HSX"))]);
        let out = to_records(Dataset::Scalar(rec.clone()));
        assert_eq!(out, vec![rec]);
    }

    #[test]
    fn test_records_pass_through_unchanged() {
        let records = vec![
            record(&[("index", json!("0")), ("value", json!(1))]),
            record(&[("index", json!("1")), ("value", Value::Null)]),
        ];
        let out = to_records(Dataset::Records(records.clone()));
        assert_eq!(out, records);
    }
}
