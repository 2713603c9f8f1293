//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! This struct is the standard output of every [`BarStore`](crate::providers::BarStore)
//! implementation, regardless of the vendor behind it.
//!
//! Providers encode missing values in different ways (JSON `null`, `NaN`). Every
//! price/volume field is an `f64` where a non-finite value means "missing"; a
//! `null` in JSON input deserializes to `NaN`.

use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error returned when a bar timestamp string matches none of the accepted layouts.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized bar timestamp: {0:?}")]
pub struct BarTimeParseError(pub String);

/// Timestamp of a bar.
///
/// Vendors either attach an offset (`Aware`) or hand back wall-clock exchange
/// time with no zone information (`Naive`). Naive timestamps are exchange-local
/// by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BarTime {
    /// Timestamp with an explicit UTC offset.
    Aware(DateTime<FixedOffset>),
    /// Exchange-local wall-clock time.
    Naive(NaiveDateTime),
}

const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

impl BarTime {
    /// Key used to order bars inside one series.
    ///
    /// Aware timestamps order by their UTC instant, naive ones by wall-clock time.
    /// A single series is expected to use one flavour only.
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            BarTime::Aware(dt) => dt.naive_utc(),
            BarTime::Naive(naive) => *naive,
        }
    }
}

impl From<DateTime<Utc>> for BarTime {
    fn from(dt: DateTime<Utc>) -> Self {
        BarTime::Aware(dt.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for BarTime {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        BarTime::Aware(dt)
    }
}

impl From<NaiveDateTime> for BarTime {
    fn from(naive: NaiveDateTime) -> Self {
        BarTime::Naive(naive)
    }
}

impl From<NaiveDate> for BarTime {
    fn from(date: NaiveDate) -> Self {
        BarTime::Naive(date.and_time(NaiveTime::MIN))
    }
}

impl fmt::Display for BarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarTime::Aware(dt) => write!(f, "{}", dt.to_rfc3339()),
            BarTime::Naive(naive) => write!(f, "{}", naive.format(NAIVE_LAYOUTS[0])),
        }
    }
}

/// Accepts RFC-3339 (aware), `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`
/// (naive), and date-only `YYYY-MM-DD` (naive midnight).
impl FromStr for BarTime {
    type Err = BarTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(BarTime::Aware(dt));
        }
        for layout in NAIVE_LAYOUTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
                return Ok(BarTime::Naive(naive));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(BarTime::from)
            .map_err(|_| BarTimeParseError(s.to_string()))
    }
}

impl TryFrom<String> for BarTime {
    type Error = BarTimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BarTime> for String {
    fn from(ts: BarTime) -> Self {
        ts.to_string()
    }
}

/// A single time-series bar (OHLCV) for a given timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// When the bar starts.
    pub timestamp: BarTime,

    /// Opening price.
    #[serde(default = "missing", deserialize_with = "nullable_f64")]
    pub open: f64,

    /// Highest price during the bar interval.
    #[serde(default = "missing", deserialize_with = "nullable_f64")]
    pub high: f64,

    /// Lowest price during the bar interval.
    #[serde(default = "missing", deserialize_with = "nullable_f64")]
    pub low: f64,

    /// Closing price. The only field every metric relies on.
    #[serde(deserialize_with = "nullable_f64")]
    pub close: f64,

    /// Volume traded during the bar interval.
    #[serde(default = "missing", deserialize_with = "nullable_f64")]
    pub volume: f64,

    /// Trade count for the bar. Not all providers supply this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_count: Option<u64>,

    /// Volume-weighted average price. Not all providers supply this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
}

impl Bar {
    /// Bar carrying only a timestamp and a close; every other field is missing.
    pub fn from_close(timestamp: impl Into<BarTime>, close: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            open: f64::NAN,
            high: f64::NAN,
            low: f64::NAN,
            close,
            volume: f64::NAN,
            trade_count: None,
            vwap: None,
        }
    }

    /// Sets the volume, builder style.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// `true` when the close is a usable number.
    pub fn has_close(&self) -> bool {
        self.close.is_finite()
    }
}

fn missing() -> f64 {
    f64::NAN
}

fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
