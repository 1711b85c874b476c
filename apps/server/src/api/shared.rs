//! Parameter parsing helpers shared across route modules.

use chrono::NaiveDate;
use vnquant_market_data::DateRange;

use crate::error::{ApiError, ApiResult};

/// Symbols are case-insensitive at the boundary; upstream sources expect
/// uppercase.
pub(crate) fn ticker(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

pub(crate) fn parse_date(field: &str, value: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| ApiError::BadRequest(format!("Invalid {}: {}", field, e)))
}

/// Parse `start`/`end` query values; a missing `end` means today.
pub(crate) fn date_range(start: &str, end: Option<&str>) -> ApiResult<DateRange> {
    let start = parse_date("start", start)?;
    let end = match end {
        Some(value) => parse_date("end", value)?,
        None => chrono::Local::now().date_naive(),
    };
    Ok(DateRange::new(start, end)?)
}

/// Enforce the per-route paging/limit bounds the API documents.
pub(crate) fn bounded(field: &str, value: u32, min: u32, max: u32) -> ApiResult<u32> {
    if value < min || value > max {
        return Err(ApiError::BadRequest(format!(
            "{} must be between {} and {}",
            field, min, max
        )));
    }
    Ok(value)
}

pub(crate) fn at_least(field: &str, value: u32, min: u32) -> ApiResult<u32> {
    if value < min {
        return Err(ApiError::BadRequest(format!(
            "{} must be at least {}",
            field, min
        )));
    }
    Ok(value)
}

// serde defaults for query structs

pub(crate) fn source_vci() -> String {
    "vci".to_string()
}

pub(crate) fn source_tcbs() -> String {
    "tcbs".to_string()
}

pub(crate) fn lang_vi() -> String {
    "vi".to_string()
}

pub(crate) fn period_quarter() -> String {
    "quarter".to_string()
}

pub(crate) fn interval_daily() -> String {
    "1D".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_uppercases_and_trims() {
        assert_eq!(ticker(" acb "), "ACB");
    }

    #[test]
    fn test_bad_date_is_a_client_error() {
        let err = parse_date("start", "01-02-2024").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_bounded_rejects_out_of_range() {
        assert!(bounded("page_size", 0, 1, 1000).is_err());
        assert!(bounded("page_size", 1001, 1, 1000).is_err());
        assert_eq!(bounded("page_size", 100, 1, 1000).unwrap(), 100);
    }
}
