use serde::{Deserialize, Serialize};

use crate::{session::PriceSource, timeframe::Timeframe};

/// One dashboard row: where a ticker trades now and how far it moved over a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMetrics {
    pub ticker: String,
    pub timeframe: Timeframe,
    pub current_price: f64,
    pub reference_price: f64,
    /// `current_price - reference_price`.
    pub change: f64,
    /// Signed decimal, `0.05` is +5%.
    pub change_fraction: f64,
    pub is_extended_session: bool,
    pub source: PriceSource,
    /// Oldest first.
    pub recent_close_window: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl TickerMetrics {
    pub fn change_percent(&self) -> f64 {
        self.change_fraction * 100.0
    }
}

/// Per-sector mean over members that produced metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAggregate {
    pub sector_name: String,
    /// Members with valid metrics.
    pub member_count: usize,
    /// `0.0` when `member_count == 0`.
    pub mean_change_fraction: f64,
    /// Members listed in the catalog, valid or not.
    pub catalog_size: usize,
    /// Sparkline of the first valid member in catalog order.
    pub leader_trend: Vec<f64>,
}

/// 52-week style range over the coarse series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    pub high: f64,
    pub low: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_volume: Option<f64>,
    pub observations: usize,
}
