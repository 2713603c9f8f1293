//! The catalog compiled into the binary. Used when no file is configured and as
//! the fallback when a configured source fails.

use indexmap::IndexMap;

use crate::config::SectorCatalog;

const SECTORS: &[(&str, &[&str])] = &[
    ("Semiconductors", &["NVDA", "AMD", "INTC", "TSM", "AVGO", "QCOM", "MU", "TXN", "ARM"]),
    ("EV & Mobility", &["TSLA", "RIVN", "LCID", "NIO", "XPEV", "GM", "F", "ON", "LI"]),
    ("Cloud & SaaS", &["MSFT", "ADBE", "CRM", "SNOW", "DDOG", "NOW", "WDAY", "ZS", "HUBS"]),
    ("Cybersecurity", &["PANW", "CRWD", "FTNT", "OKTA", "CYBR", "S", "NET", "TENB"]),
    ("AI & Robotics", &["ISRG", "PATH", "IRBT", "UPST", "PLTR", "AI", "GOOGL", "SYM"]),
    ("E-Commerce", &["AMZN", "BABA", "JD", "SHOP", "MELI", "EBAY", "ETSY", "CPNG"]),
    ("Biotech", &["PFE", "MRNA", "BNTX", "LLY", "UNH", "JNJ", "ABBV", "VRTX"]),
    ("Fintech", &["PYPL", "AXP", "COIN", "AFRM", "V", "MA", "HOOD", "SQ"]),
    ("Energy", &["XOM", "CVX", "SHEL", "BP", "COP", "SLB", "OXY", "HAL"]),
    ("Retail", &["WMT", "TGT", "COST", "HD", "LOW", "NKE", "SBUX", "LULU"]),
    ("Media", &["NFLX", "DIS", "CMCSA", "WBD", "PARA", "SPOT", "ROKU"]),
    ("Travel", &["BKNG", "ABNB", "MAR", "DAL", "UAL", "CCL", "RCL", "LUV"]),
    ("Defense", &["RTX", "LMT", "BA", "NOC", "GD", "LHX", "HII"]),
    ("Gaming", &["TTWO", "EA", "RBLX", "U", "SONY", "NTDOY", "ATVI"]),
];

const INDICES: &[(&str, &str)] = &[
    ("S&P 500", "^GSPC"),
    ("Nasdaq", "^IXIC"),
    ("Bitcoin", "BTC-USD"),
];

/// Fourteen themed sectors plus the S&P 500, Nasdaq and Bitcoin pulse.
pub fn builtin_catalog() -> SectorCatalog {
    SectorCatalog {
        sectors: SECTORS
            .iter()
            .map(|(name, members)| {
                (name.to_string(), members.iter().map(|t| t.to_string()).collect())
            })
            .collect(),
        display_names: IndexMap::new(),
        indices: INDICES
            .iter()
            .map(|(label, ticker)| (label.to_string(), ticker.to_string()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::normalize_catalog;

    #[test]
    fn builtin_is_already_normalized() {
        let cat = builtin_catalog();
        let mut normalized = cat.clone();
        let report = normalize_catalog(&mut normalized).unwrap();
        assert_eq!(cat, normalized);
        assert_eq!(report.members_deduped, 0);
        assert_eq!(report.empty_sectors, 0);
    }

    #[test]
    fn builtin_shape() {
        let cat = builtin_catalog();
        assert_eq!(cat.sectors.len(), 14);
        assert_eq!(cat.sector_names().next(), Some("Semiconductors"));
        assert_eq!(cat.display_name("^GSPC"), Some("S&P 500"));
        assert_eq!(cat.indices.len(), 3);
    }
}
