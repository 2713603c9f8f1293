//! A collection of time-series bars for a specific symbol and interval.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{bar::Bar, interval::Interval};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    /// `bars[index]` is not strictly after `bars[index - 1]`.
    #[error("{symbol}: bar timestamps must be strictly increasing (index {index})")]
    NotIncreasing { symbol: String, index: usize },
}

/// Represents a complete set of time-series data for a single symbol.
///
/// Invariant: `bars` are strictly increasing in time. The series may be empty
/// and may have gaps (weekends, halts); nothing assumes fixed spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "AAPL", "BTC-USD").
    pub symbol: String,
    /// The granularity of each bar in the series.
    pub interval: Interval,
    /// The collection of OHLCV bars.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn empty(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars: Vec::new(),
        }
    }

    /// Builds a series from bars that are already in order.
    pub fn try_new(
        symbol: impl Into<String>,
        interval: Interval,
        bars: Vec<Bar>,
    ) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if let Some(pos) = bars
            .windows(2)
            .position(|w| w[1].timestamp.sort_key() <= w[0].timestamp.sort_key())
        {
            return Err(SeriesError::NotIncreasing {
                symbol,
                index: pos + 1,
            });
        }
        Ok(Self {
            symbol,
            interval,
            bars,
        })
    }

    /// Builds a series from bars in any order. When several bars share a
    /// timestamp the one that came last in the input wins.
    pub fn sorted(symbol: impl Into<String>, interval: Interval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp.sort_key());
        let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match out.last_mut() {
                Some(prev) if prev.timestamp.sort_key() == bar.timestamp.sort_key() => *prev = bar,
                _ => out.push(bar),
            }
        }
        Self {
            symbol: symbol.into(),
            interval,
            bars: out,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars whose close is present, oldest first.
    pub fn valid_bars(&self) -> impl DoubleEndedIterator<Item = &Bar> + '_ {
        self.bars.iter().filter(|b| b.has_close())
    }

    /// Present closes, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.valid_bars().map(|b| b.close).collect()
    }

    /// Newest bar with a present close.
    pub fn last_valid(&self) -> Option<&Bar> {
        self.valid_bars().next_back()
    }
}
