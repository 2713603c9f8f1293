//! Sector catalog: parsing, normalization, and loading.
//!
//! The catalog is a TOML document describing:
//! - Sectors (display name -> ordered member tickers)
//! - Optional display names for tickers
//! - The "pulse" indices shown above the sector tables (label -> ticker)
//!
//! ```toml
//! [sectors]
//! Semiconductors = ["NVDA", "AMD", "TSM"]
//! "EV & Mobility" = ["TSLA", "RIVN"]
//!
//! [display_names]
//! NVDA = "NVIDIA"
//!
//! [indices]
//! "S&P 500" = "^GSPC"
//! ```
//!
//! Key behaviors:
//! - Sector names and index labels are trimmed; empty or duplicate names are errors.
//! - Tickers are trimmed and upper-cased; duplicates within a sector are dropped
//!   keeping the first occurrence; blank tickers are dropped.
//! - Sectors left with no members are kept. They aggregate to zero members.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_catalog_str`]
//! - Parse + normalize from a file path: [`load_catalog_path`]
//! - Normalize an in-memory catalog: [`normalize_catalog`]

use std::{collections::HashSet, mem, path::Path};

use anyhow::{Context, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sector name -> member tickers, plus display metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SectorCatalog {
    /// Ordered sector -> members map. Order is the display order.
    pub sectors: IndexMap<String, Vec<String>>,
    /// Optional ticker -> human-readable name.
    #[serde(default)]
    pub display_names: IndexMap<String, String>,
    /// Pulse indices, label -> ticker (e.g. "Nasdaq" -> "^IXIC").
    #[serde(default)]
    pub indices: IndexMap<String, String>,
}

impl SectorCatalog {
    /// `true` when there is no sector to show.
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn sector_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sectors.keys().map(String::as_str)
    }

    pub fn members(&self, sector: &str) -> Option<&[String]> {
        self.sectors.get(sector).map(Vec::as_slice)
    }

    /// Case-insensitive sector lookup, returning the canonical name.
    pub fn find_sector(&self, name: &str) -> Option<(&str, &[String])> {
        let needle = name.trim();
        self.sectors
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(needle))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Display name for a ticker: an explicit entry, else the label of the
    /// index it tracks.
    pub fn display_name(&self, ticker: &str) -> Option<&str> {
        self.display_names.get(ticker).map(String::as_str).or_else(|| {
            self.indices
                .iter()
                .find(|(_, t)| t.as_str() == ticker)
                .map(|(label, _)| label.as_str())
        })
    }

    /// Every sector member and index ticker once, in first-seen order.
    pub fn all_tickers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.sectors
            .values()
            .flatten()
            .chain(self.indices.values())
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }

    /// Members of every sector once, in first-seen order.
    pub fn sector_tickers(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.sectors
            .values()
            .flatten()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Sector names that changed when trimmed.
    pub sectors_renamed: usize,
    /// Tickers that changed when trimmed/upper-cased.
    pub tickers_rewritten: usize,
    /// Duplicate members removed.
    pub members_deduped: usize,
    /// Blank tickers removed.
    pub blank_tickers_dropped: usize,
    /// Sectors with no members after normalization.
    pub empty_sectors: usize,
}

fn normalize_ticker(raw: &str, report: &mut NormalizationReport) -> Option<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        report.blank_tickers_dropped += 1;
        return None;
    }
    if ticker != raw {
        report.tickers_rewritten += 1;
    }
    Some(ticker)
}

/// Normalize a catalog in-place.
///
/// Errors:
/// - Empty or duplicate sector names after trimming
/// - Empty or duplicate index labels after trimming, or a blank index ticker
pub fn normalize_catalog(cat: &mut SectorCatalog) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    let mut rebuilt: IndexMap<String, Vec<String>> = IndexMap::new();
    for (raw_name, members) in mem::take(&mut cat.sectors) {
        let name = raw_name.trim().to_string();
        if name.is_empty() {
            bail!("sector name cannot be empty after trimming");
        }
        if name != raw_name {
            report.sectors_renamed += 1;
        }
        if rebuilt.contains_key(&name) {
            bail!("duplicate sector name after normalization: {name}");
        }

        let before = members.len();
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(before);
        for raw in members {
            let Some(ticker) = normalize_ticker(&raw, &mut report) else {
                continue;
            };
            if seen.insert(ticker.clone()) {
                out.push(ticker);
            } else {
                report.members_deduped += 1;
            }
        }
        if out.is_empty() {
            report.empty_sectors += 1;
        }
        rebuilt.insert(name, out);
    }
    cat.sectors = rebuilt;

    let mut names = IndexMap::new();
    for (raw, display) in mem::take(&mut cat.display_names) {
        if let Some(ticker) = normalize_ticker(&raw, &mut report) {
            names.entry(ticker).or_insert_with(|| display.trim().to_string());
        }
    }
    cat.display_names = names;

    let mut indices = IndexMap::new();
    for (raw_label, raw_ticker) in mem::take(&mut cat.indices) {
        let label = raw_label.trim().to_string();
        if label.is_empty() {
            bail!("index label cannot be empty after trimming");
        }
        if indices.contains_key(&label) {
            bail!("duplicate index label after normalization: {label}");
        }
        let Some(ticker) = normalize_ticker(&raw_ticker, &mut report) else {
            bail!("index {label} has no ticker");
        };
        indices.insert(label, ticker);
    }
    cat.indices = indices;

    Ok(report)
}

/// Parse and normalize a catalog from a TOML string.
pub fn load_catalog_str(toml_str: &str) -> anyhow::Result<SectorCatalog> {
    let mut cat: SectorCatalog = toml::from_str(toml_str).context("failed to parse catalog TOML")?;
    let report = normalize_catalog(&mut cat).context("normalize_catalog failed")?;
    tracing::debug!(?report, sectors = cat.sectors.len(), "catalog normalized");
    Ok(cat)
}

/// Read a catalog TOML file from disk, parse, and normalize it.
pub fn load_catalog_path(path: impl AsRef<Path>) -> anyhow::Result<SectorCatalog> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read catalog file {}", path.as_ref().display()))?;
    load_catalog_str(&text).with_context(|| format!("load catalog {}", path.as_ref().display()))
}
