//! Timeframe labels and the lookback table that gives them meaning.
//!
//! A [`Timeframe`] is the symbolic label a viewer picks (`1D`, `1W`, ...).
//! A [`LookbackTable`] maps each supported label to a [`LookbackRule`]: either a
//! count of trailing trading-day observations or "since January 1st".
//!
//! ```
//! use metrics_engine::timeframe::{LookbackRule, LookbackTable, Timeframe};
//!
//! let tf: Timeframe = "1m".parse().unwrap();
//! assert_eq!(tf.to_string(), "1M");
//! assert_eq!(LookbackTable::default().get(tf), Some(LookbackRule::Trailing(21)));
//! ```

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigError;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown timeframe {0:?} (expected one of 1D, 1W, 1M, 3M, 1Y, YTD)")]
pub struct TimeframeParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    OneYear,
    YearToDate,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::ThreeMonths,
        Timeframe::OneYear,
        Timeframe::YearToDate,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
            Timeframe::YearToDate => "YTD",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.label() == upper)
            .ok_or_else(|| TimeframeParseError(s.to_string()))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeParseError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.label().to_string()
    }
}

/// How a label picks its reference close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LookbackSetting", into = "LookbackSetting")]
pub enum LookbackRule {
    /// Reference is this many observations before the latest one.
    Trailing(usize),
    /// Reference is the first close of the latest close's calendar year.
    YearToDate,
}

/// Config spelling of a rule: an integer or the string `"ytd"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookbackSetting {
    Trailing(usize),
    Named(String),
}

impl TryFrom<LookbackSetting> for LookbackRule {
    type Error = String;

    fn try_from(value: LookbackSetting) -> Result<Self, Self::Error> {
        match value {
            LookbackSetting::Trailing(0) => Err("trailing lookback must be at least 1".into()),
            LookbackSetting::Trailing(n) => Ok(LookbackRule::Trailing(n)),
            LookbackSetting::Named(s) if s.trim().eq_ignore_ascii_case("ytd") => {
                Ok(LookbackRule::YearToDate)
            }
            LookbackSetting::Named(s) => Err(format!("expected a count or \"ytd\", got {s:?}")),
        }
    }
}

impl From<LookbackRule> for LookbackSetting {
    fn from(rule: LookbackRule) -> Self {
        match rule {
            LookbackRule::Trailing(n) => LookbackSetting::Trailing(n),
            LookbackRule::YearToDate => LookbackSetting::Named("ytd".into()),
        }
    }
}

/// Supported labels and their rules. Always contains `1D`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookbackTable(IndexMap<Timeframe, LookbackRule>);

impl Default for LookbackTable {
    /// Trading-day approximations: 1, 5, 21, 63 and 252 sessions, plus YTD.
    fn default() -> Self {
        Self(IndexMap::from([
            (Timeframe::OneDay, LookbackRule::Trailing(1)),
            (Timeframe::OneWeek, LookbackRule::Trailing(5)),
            (Timeframe::OneMonth, LookbackRule::Trailing(21)),
            (Timeframe::ThreeMonths, LookbackRule::Trailing(63)),
            (Timeframe::OneYear, LookbackRule::Trailing(252)),
            (Timeframe::YearToDate, LookbackRule::YearToDate),
        ]))
    }
}

impl LookbackTable {
    pub fn new(rules: IndexMap<Timeframe, LookbackRule>) -> Result<Self, ConfigError> {
        if !rules.contains_key(&Timeframe::OneDay) {
            return Err(ConfigError::MissingOneDay);
        }
        Ok(Self(rules))
    }

    pub fn get(&self, timeframe: Timeframe) -> Option<LookbackRule> {
        self.0.get(&timeframe).copied()
    }

    pub fn supports(&self, timeframe: Timeframe) -> bool {
        self.0.contains_key(&timeframe)
    }

    /// Supported labels in configuration order.
    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timeframe, LookbackRule)> + '_ {
        self.0.iter().map(|(tf, rule)| (*tf, *rule))
    }
}
