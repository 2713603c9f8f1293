//! Request vocabulary: bar [`Interval`] (granularity) and look-back [`Period`].
//!
//! Both parse from the short yfinance-style strings dashboards are usually
//! configured with:
//!
//! ```
//! use bar_store::models::interval::{Interval, IntervalUnit, Period};
//!
//! let iv: Interval = "15m".parse().unwrap();
//! assert_eq!(iv.amount().get(), 15);
//! assert_eq!(iv.unit(), IntervalUnit::Minute);
//!
//! let p: Period = "1y".parse().unwrap();
//! assert_eq!(p.to_string(), "1y");
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("empty value")]
    Empty,

    #[error("amount must be a positive integer: {0:?}")]
    InvalidAmount(String),

    #[error("unknown unit: {0:?}")]
    UnknownUnit(String),
}

/// Bar granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntervalUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

/// An interval = amount × unit (e.g. 15-Minute, 1-Day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    amount: NonZeroU32,
    unit: IntervalUnit,
}

impl Interval {
    pub const fn new(amount: NonZeroU32, unit: IntervalUnit) -> Self {
        Self { amount, unit }
    }
    pub const fn amount(&self) -> NonZeroU32 {
        self.amount
    }
    pub const fn unit(&self) -> IntervalUnit {
        self.unit
    }

    /// `true` for sub-daily granularity.
    pub const fn is_intraday(&self) -> bool {
        matches!(self.unit, IntervalUnit::Minute | IntervalUnit::Hour)
    }

    pub const fn daily() -> Self {
        Self::new(NonZeroU32::MIN, IntervalUnit::Day)
    }
}

/// Splits `"15m"` into `(15, "m")`.
fn split_amount(s: &str) -> Result<(NonZeroU32, &str), IntervalError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(IntervalError::Empty);
    }
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    let amount = digits
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| IntervalError::InvalidAmount(s.to_string()))?;
    Ok((amount, unit))
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            IntervalUnit::Minute => "m",
            IntervalUnit::Hour => "h",
            IntervalUnit::Day => "D",
            IntervalUnit::Week => "W",
            IntervalUnit::Month => "M",
        };
        write!(f, "{}{u}", self.amount)
    }
}

/// Single-letter units are case sensitive (`m` minute, `M` month); longer
/// spellings (`min`, `wk`, `mo`, `day`) are not.
impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, unit) = split_amount(s)?;
        let unit = match unit {
            "m" => IntervalUnit::Minute,
            "h" | "H" => IntervalUnit::Hour,
            "d" | "D" => IntervalUnit::Day,
            "w" | "W" => IntervalUnit::Week,
            "M" => IntervalUnit::Month,
            other => match other.to_ascii_lowercase().as_str() {
                "min" | "minute" => IntervalUnit::Minute,
                "hr" | "hour" => IntervalUnit::Hour,
                "day" => IntervalUnit::Day,
                "wk" | "week" => IntervalUnit::Week,
                "mo" | "month" => IntervalUnit::Month,
                _ => return Err(IntervalError::UnknownUnit(other.to_string())),
            },
        };
        Ok(Interval::new(amount, unit))
    }
}

impl TryFrom<String> for Interval {
    type Error = IntervalError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(iv: Interval) -> Self {
        iv.to_string()
    }
}

/// Calendar unit of a [`Period`] span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodUnit {
    Day,
    Week,
    Month,
    Year,
}

/// How much history to request, counted back from the newest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Span { amount: NonZeroU32, unit: PeriodUnit },
    /// From January 1st of the newest bar's year.
    YearToDate,
    /// Everything the source has.
    Max,
}

impl Period {
    pub const fn span(amount: NonZeroU32, unit: PeriodUnit) -> Self {
        Period::Span { amount, unit }
    }

    /// Earliest timestamp still inside the period when the newest data point is
    /// `latest`. `None` means unbounded.
    pub fn cutoff(&self, latest: NaiveDateTime) -> Option<NaiveDateTime> {
        match *self {
            Period::Max => None,
            Period::YearToDate => NaiveDate::from_ymd_opt(latest.year(), 1, 1)
                .map(|d| d.and_time(NaiveTime::MIN)),
            Period::Span { amount, unit } => {
                let n = amount.get();
                match unit {
                    PeriodUnit::Day => latest.checked_sub_signed(Duration::days(n.into())),
                    PeriodUnit::Week => latest.checked_sub_signed(Duration::weeks(n.into())),
                    PeriodUnit::Month => latest.checked_sub_months(Months::new(n)),
                    PeriodUnit::Year => n
                        .checked_mul(12)
                        .and_then(|m| latest.checked_sub_months(Months::new(m))),
                }
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::YearToDate => f.write_str("ytd"),
            Period::Max => f.write_str("max"),
            Period::Span { amount, unit } => {
                let u = match unit {
                    PeriodUnit::Day => "d",
                    PeriodUnit::Week => "wk",
                    PeriodUnit::Month => "mo",
                    PeriodUnit::Year => "y",
                };
                write!(f, "{amount}{u}")
            }
        }
    }
}

impl FromStr for Period {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ytd" => return Ok(Period::YearToDate),
            "max" => return Ok(Period::Max),
            _ => {}
        }
        let (amount, unit) = split_amount(s)?;
        let unit = match unit.to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => PeriodUnit::Day,
            "w" | "wk" | "week" | "weeks" => PeriodUnit::Week,
            "mo" | "month" | "months" => PeriodUnit::Month,
            "y" | "yr" | "year" | "years" => PeriodUnit::Year,
            other => return Err(IntervalError::UnknownUnit(other.to_string())),
        };
        Ok(Period::span(amount, unit))
    }
}

impl TryFrom<String> for Period {
    type Error = IntervalError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}
