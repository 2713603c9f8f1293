use thiserror::Error;

use crate::timeframe::Timeframe;

/// Why a ticker produced no metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoDataReason {
    #[error("no bars were returned")]
    MissingSeries,

    #[error("need at least 2 closes, have {available}")]
    InsufficientHistory { available: usize },

    #[error("no closes in {year}")]
    NoCloseInYear { year: i32 },

    #[error("no usable prices in range")]
    EmptyRange,
}

/// A ticker has nothing to show. Callers omit the row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{ticker}: {reason}")]
pub struct NoData {
    pub ticker: String,
    pub reason: NoDataReason,
}

impl NoData {
    pub fn new(ticker: impl Into<String>, reason: NoDataReason) -> Self {
        Self {
            ticker: ticker.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("no data for {0}")]
    NoData(#[from] NoData),

    /// The engine's lookback table has no rule for this label.
    #[error("timeframe {0} is not supported by this engine")]
    UnsupportedTimeframe(Timeframe),
}

impl MetricsError {
    /// `true` when the ticker simply has no data, as opposed to a caller error.
    pub fn is_no_data(&self) -> bool {
        matches!(self, MetricsError::NoData(_))
    }
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown time zone: {0:?}")]
    UnknownTimeZone(String),

    #[error("invalid time of day {0:?} (expected HH:MM)")]
    InvalidTime(String),

    #[error("session must open before it closes ({open} >= {close})")]
    InvalidSession { open: String, close: String },

    #[error("sparkline length must be at least 1")]
    ZeroSparklineLength,

    #[error("lookback table must contain 1D")]
    MissingOneDay,

    #[error("invalid lookback rule for {timeframe}: {message}")]
    InvalidLookback { timeframe: Timeframe, message: String },
}
