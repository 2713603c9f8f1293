//! In-memory [`BarStore`], optionally loaded from a JSON fixture.
//!
//! Fixture layout, keyed by interval then ticker:
//!
//! ```json
//! {
//!   "15m": { "NVDA": [ { "timestamp": "2024-03-08T15:45:00-05:00", "close": 875.3 } ] },
//!   "1D":  { "NVDA": [ { "timestamp": "2024-03-07", "close": 926.7, "volume": 6.0e7 } ] }
//! }
//! ```
//!
//! Bars are sorted on load, so fixtures do not have to be in order.

use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::debug;

use crate::{
    models::{
        bar::Bar,
        bar_series::BarSeries,
        interval::{Interval, Period},
        request_params::BarsRequest,
    },
    providers::{BarBatch, BarStore, ProviderError},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryBarStore {
    series: IndexMap<Interval, IndexMap<String, BarSeries>>,
}

impl MemoryBarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) one series, keyed by its symbol and interval.
    pub fn insert(&mut self, series: BarSeries) {
        self.series
            .entry(series.interval)
            .or_default()
            .insert(series.symbol.clone(), series);
    }

    pub fn with_series(mut self, series: BarSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ProviderError> {
        let raw: IndexMap<Interval, IndexMap<String, Vec<Bar>>> =
            serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let mut store = Self::new();
        for (interval, tickers) in raw {
            for (symbol, bars) in tickers {
                store.insert(BarSeries::sorted(symbol, interval, bars));
            }
        }
        Ok(store)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Internal(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Number of stored series across all intervals.
    pub fn len(&self) -> usize {
        self.series.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps the bars inside `period`, measured back from the series' newest bar.
fn clip_to_period(series: &BarSeries, period: Period) -> BarSeries {
    let Some(latest) = series.bars.last() else {
        return series.clone();
    };
    let Some(cutoff) = period.cutoff(latest.timestamp.sort_key()) else {
        return series.clone();
    };
    BarSeries {
        symbol: series.symbol.clone(),
        interval: series.interval,
        bars: series
            .bars
            .iter()
            .filter(|b| b.timestamp.sort_key() >= cutoff)
            .cloned()
            .collect(),
    }
}

#[async_trait]
impl BarStore for MemoryBarStore {
    async fn fetch(&self, request: &BarsRequest) -> Result<BarBatch, ProviderError> {
        let mut batch = BarBatch::new();
        let Some(by_ticker) = self.series.get(&request.interval) else {
            debug!(interval = %request.interval, "no series stored for interval");
            return Ok(batch);
        };

        for ticker in &request.tickers {
            match by_ticker.get(ticker) {
                Some(series) => {
                    batch.insert(ticker.clone(), clip_to_period(series, request.period));
                }
                None => debug!(%ticker, interval = %request.interval, "ticker not in store"),
            }
        }
        Ok(batch)
    }
}
