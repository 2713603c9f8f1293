//! Current price and extended-session detection.

use bar_store::models::{bar::Bar, bar_series::BarSeries};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, tz::to_exchange_local};

/// Regular trading hours on the exchange clock, `[open, close)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    open: NaiveTime,
    close: NaiveTime,
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        }
    }
}

impl SessionWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self, ConfigError> {
        if open >= close {
            return Err(ConfigError::InvalidSession {
                open: open.format("%H:%M").to_string(),
                close: close.format("%H:%M").to_string(),
            });
        }
        Ok(Self { open, close })
    }

    /// Parses `"HH:MM"` bounds.
    pub fn parse(open: &str, close: &str) -> Result<Self, ConfigError> {
        Self::new(parse_hhmm(open)?, parse_hhmm(close)?)
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }

    /// Before the open or at/after the close.
    pub fn is_extended(&self, local: NaiveTime) -> bool {
        local < self.open || local >= self.close
    }
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| ConfigError::InvalidTime(s.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Intraday,
    Daily,
}

/// The observation a ticker's current price was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPrice<'a> {
    pub bar: &'a Bar,
    pub source: PriceSource,
    pub is_extended_session: bool,
}

impl CurrentPrice<'_> {
    pub fn price(&self) -> f64 {
        self.bar.close
    }

    pub fn volume(&self) -> Option<f64> {
        self.bar.volume.is_finite().then_some(self.bar.volume)
    }
}

/// Picks the newest valid intraday close, falling back to the newest daily close.
///
/// `session` is `None` when extended-session detection is disabled. Daily bars
/// carry no session information, so a daily fallback is never flagged.
pub fn resolve_current_price<'a>(
    intraday: Option<&'a BarSeries>,
    daily: Option<&'a BarSeries>,
    tz: Tz,
    session: Option<&SessionWindow>,
) -> Option<CurrentPrice<'a>> {
    if let Some(bar) = intraday.and_then(BarSeries::last_valid) {
        let is_extended_session = session
            .map(|s| s.is_extended(to_exchange_local(&bar.timestamp, tz).time()))
            .unwrap_or(false);
        return Some(CurrentPrice {
            bar,
            source: PriceSource::Intraday,
            is_extended_session,
        });
    }

    daily.and_then(BarSeries::last_valid).map(|bar| CurrentPrice {
        bar,
        source: PriceSource::Daily,
        is_extended_session: false,
    })
}
