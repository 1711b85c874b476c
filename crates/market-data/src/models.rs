//! Typed request parameters shared by accessors and the API layer.
//!
//! Query strings are parsed into these types at the HTTP boundary; parse
//! failures become [`MarketDataError::InvalidInput`] so the caller sees a
//! 400 with the offending value named.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::MarketDataError;

/// Candle resolution for price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Day1,
    Week1,
    Month1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1H",
            Interval::Day1 => "1D",
            Interval::Week1 => "1W",
            Interval::Month1 => "1M",
        }
    }

    /// True for resolutions finer than one day.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::Minute1
                | Interval::Minute5
                | Interval::Minute15
                | Interval::Minute30
                | Interval::Hour1
        )
    }
}

impl FromStr for Interval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Interval::Minute1),
            "5m" => Ok(Interval::Minute5),
            "15m" => Ok(Interval::Minute15),
            "30m" => Ok(Interval::Minute30),
            "1H" => Ok(Interval::Hour1),
            "1D" => Ok(Interval::Day1),
            "1W" => Ok(Interval::Week1),
            "1M" => Ok(Interval::Month1),
            other => Err(MarketDataError::invalid(format!(
                "invalid interval '{}' (expected 1m, 5m, 15m, 30m, 1H, 1D, 1W or 1M)",
                other
            ))),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting period for financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Quarter,
    Annual,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Quarter => "quarter",
            Period::Annual => "annual",
        }
    }
}

impl FromStr for Period {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quarter" => Ok(Period::Quarter),
            "annual" => Ok(Period::Annual),
            other => Err(MarketDataError::invalid(format!(
                "invalid period '{}' (expected quarter or annual)",
                other
            ))),
        }
    }
}

/// Label language for localized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Vi,
    En,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Vi => "vi",
            Lang::En => "en",
        }
    }
}

impl FromStr for Lang {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vi" => Ok(Lang::Vi),
            "en" => Ok(Lang::En),
            other => Err(MarketDataError::invalid(format!(
                "invalid lang '{}' (expected vi or en)",
                other
            ))),
        }
    }
}

/// An inclusive date range. `new` rejects inverted ranges up front so the
/// caller gets a 400 instead of an upstream error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, MarketDataError> {
        if start > end {
            return Err(MarketDataError::invalid("invalid date range"));
        }
        Ok(Self { start, end })
    }
}

/// Parameters for a price-history request.
#[derive(Debug, Clone)]
pub struct HistoryParams {
    pub symbol: String,
    pub range: DateRange,
    pub interval: Interval,
}

/// Officer-list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfficerFilter {
    All,
    Working,
    Resigned,
}

impl OfficerFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfficerFilter::All => "all",
            OfficerFilter::Working => "working",
            OfficerFilter::Resigned => "resigned",
        }
    }
}

impl FromStr for OfficerFilter {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(OfficerFilter::All),
            "working" => Ok(OfficerFilter::Working),
            "resigned" => Ok(OfficerFilter::Resigned),
            other => Err(MarketDataError::invalid(format!(
                "invalid filter_by '{}' (expected all, working or resigned)",
                other
            ))),
        }
    }
}

/// Parameters for a financial-statement request.
#[derive(Debug, Clone)]
pub struct FinanceParams {
    pub symbol: String,
    pub period: Period,
    pub lang: Lang,
}

/// Open-end fund category on Fmarket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundType {
    Stock,
    Bond,
    Balanced,
}

impl FundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundType::Stock => "STOCK",
            FundType::Bond => "BOND",
            FundType::Balanced => "BALANCED",
        }
    }
}

impl FromStr for FundType {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STOCK" => Ok(FundType::Stock),
            "BOND" => Ok(FundType::Bond),
            "BALANCED" => Ok(FundType::Balanced),
            other => Err(MarketDataError::invalid(format!(
                "invalid fund_type '{}' (expected STOCK, BOND or BALANCED)",
                other
            ))),
        }
    }
}

/// Asset class hint for MSN chart requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsnAssetKind {
    Crypto,
    Currency,
    Index,
    Stock,
}

/// Parameters for an MSN price-history request.
#[derive(Debug, Clone)]
pub struct MsnHistoryParams {
    pub range: DateRange,
    pub interval: Interval,
    pub count_back: u32,
    pub asset_kind: Option<MsnAssetKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_round_trip() {
        for s in ["1m", "5m", "15m", "30m", "1H", "1D", "1W", "1M"] {
            assert_eq!(s.parse::<Interval>().unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_interval_rejects_unknown() {
        assert!("2D".parse::<Interval>().is_err());
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = DateRange::new(start, end).unwrap_err();
        assert_eq!(format!("{}", err), "invalid date range");
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("annual".parse::<Period>().unwrap(), Period::Annual);
        assert!("yearly".parse::<Period>().is_err());
    }
}
