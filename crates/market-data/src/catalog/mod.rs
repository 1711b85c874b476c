//! Bundled market reference data: indices, index groups, sectors and
//! exchanges.
//!
//! This catalog ships with the crate (the upstream publishes it as static
//! reference data, there is no network call to make). Lookups are
//! case-insensitive on group names.

use crate::dataset::{Cell, Table};

/// One market index.
pub struct IndexInfo {
    pub symbol: &'static str,
    pub name: &'static str,
    pub group: &'static str,
    pub exchange: &'static str,
}

const INDICES: &[IndexInfo] = &[
    IndexInfo { symbol: "VNINDEX", name: "VN-Index", group: "market", exchange: "HOSE" },
    IndexInfo { symbol: "HNXINDEX", name: "HNX-Index", group: "market", exchange: "HNX" },
    IndexInfo { symbol: "UPCOMINDEX", name: "UPCOM-Index", group: "market", exchange: "UPCOM" },
    IndexInfo { symbol: "VN30", name: "VN30", group: "capitalization", exchange: "HOSE" },
    IndexInfo { symbol: "VN100", name: "VN100", group: "capitalization", exchange: "HOSE" },
    IndexInfo { symbol: "VNMIDCAP", name: "VNMidcap", group: "capitalization", exchange: "HOSE" },
    IndexInfo { symbol: "VNSMALLCAP", name: "VNSmallcap", group: "capitalization", exchange: "HOSE" },
    IndexInfo { symbol: "VNALLSHARE", name: "VNAllshare", group: "capitalization", exchange: "HOSE" },
    IndexInfo { symbol: "HNX30", name: "HNX30", group: "capitalization", exchange: "HNX" },
    IndexInfo { symbol: "VNIT", name: "VNIT - Information Technology", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNFIN", name: "VNFIN - Financials", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNIND", name: "VNIND - Industrials", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNCONS", name: "VNCONS - Consumer Goods", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNENE", name: "VNENE - Energy", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNHEAL", name: "VNHEAL - Health Care", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNMAT", name: "VNMAT - Materials", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNREAL", name: "VNREAL - Real Estate", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNUTI", name: "VNUTI - Utilities", group: "sector", exchange: "HOSE" },
    IndexInfo { symbol: "VNDIAMOND", name: "VN Diamond", group: "thematic", exchange: "HOSE" },
    IndexInfo { symbol: "VNFINLEAD", name: "VNFIN Lead", group: "thematic", exchange: "HOSE" },
    IndexInfo { symbol: "VNFINSELECT", name: "VNFIN Select", group: "thematic", exchange: "HOSE" },
    IndexInfo { symbol: "VNSI", name: "VN Sustainability Index", group: "thematic", exchange: "HOSE" },
];

/// ICB level-1 industries as (code, Vietnamese name, English name).
const SECTORS: &[(&str, &str, &str)] = &[
    ("0001", "Dầu khí", "Oil & Gas"),
    ("1000", "Nguyên vật liệu", "Basic Materials"),
    ("2000", "Công nghiệp", "Industrials"),
    ("3000", "Hàng tiêu dùng", "Consumer Goods"),
    ("4000", "Y tế", "Health Care"),
    ("5000", "Dịch vụ tiêu dùng", "Consumer Services"),
    ("6000", "Viễn thông", "Telecommunications"),
    ("7000", "Tiện ích cộng đồng", "Utilities"),
    ("8000", "Tài chính", "Financials"),
    ("9000", "Công nghệ thông tin", "Technology"),
];

const EXCHANGES: &[&str] = &["HOSE", "HNX", "UPCOM"];

fn index_table<'a>(indices: impl Iterator<Item = &'a IndexInfo>) -> Table {
    let mut table = Table::new(vec![
        "symbol".into(),
        "name".into(),
        "group".into(),
        "exchange".into(),
    ]);
    for index in indices {
        table.push_row(vec![
            Cell::Text(index.symbol.to_string()),
            Cell::Text(index.name.to_string()),
            Cell::Text(index.group.to_string()),
            Cell::Text(index.exchange.to_string()),
        ]);
    }
    table
}

/// Every known index.
pub fn all_indices() -> Table {
    index_table(INDICES.iter())
}

/// Distinct group names, in catalog order.
pub fn index_groups() -> Vec<&'static str> {
    let mut groups = Vec::new();
    for index in INDICES {
        if !groups.contains(&index.group) {
            groups.push(index.group);
        }
    }
    groups
}

/// Indices belonging to one group, or `None` for an unknown group.
pub fn indices_by_group(group: &str) -> Option<Table> {
    if !INDICES.iter().any(|i| i.group.eq_ignore_ascii_case(group)) {
        return None;
    }
    Some(index_table(
        INDICES
            .iter()
            .filter(|i| i.group.eq_ignore_ascii_case(group)),
    ))
}

/// The ICB level-1 sector table.
pub fn all_sectors() -> Table {
    let mut table = Table::new(vec![
        "icb_code".into(),
        "sector".into(),
        "en_sector".into(),
    ]);
    for (code, vi, en) in SECTORS {
        table.push_row(vec![
            Cell::Text(code.to_string()),
            Cell::Text(vi.to_string()),
            Cell::Text(en.to_string()),
        ]);
    }
    table
}

/// Exchange codes.
pub fn exchanges() -> Vec<&'static str> {
    EXCHANGES.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_distinct_and_ordered() {
        assert_eq!(
            index_groups(),
            vec!["market", "capitalization", "sector", "thematic"]
        );
    }

    #[test]
    fn test_indices_by_group_is_case_insensitive() {
        let table = indices_by_group("MARKET").unwrap();
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn test_unknown_group_yields_none() {
        assert!(indices_by_group("frontier").is_none());
    }

    #[test]
    fn test_every_index_has_a_known_exchange() {
        for index in INDICES {
            assert!(EXCHANGES.contains(&index.exchange), "{}", index.symbol);
        }
    }
}
