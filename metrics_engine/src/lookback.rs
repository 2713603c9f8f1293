//! Reference-price resolution over the coarse (daily) series.
//!
//! Trailing rules count observations, not calendar days: with `n` valid closes
//! and a lookback of `k`, the reference is `closes[max(0, n - 1 - k)]` and the
//! current close is `closes[n - 1]`. Gaps (weekends, halts, missing closes)
//! therefore never shift the window.

use bar_store::models::bar_series::BarSeries;
use chrono_tz::Tz;

use crate::{error::NoDataReason, timeframe::LookbackRule, tz::exchange_year};

/// Current and reference closes for one lookback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosePair {
    pub current: f64,
    pub reference: f64,
}

impl ClosePair {
    pub fn change(&self) -> f64 {
        self.current - self.reference
    }

    pub fn change_fraction(&self) -> f64 {
        change_fraction(self.current, self.reference)
    }
}

/// `(current - reference) / reference`, or `0.0` when the reference is zero.
pub fn change_fraction(current: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (current - reference) / reference
}

pub fn reference_index(n: usize, lookback: usize) -> usize {
    n.saturating_sub(1).saturating_sub(lookback)
}

pub fn resolve_trailing(closes: &[f64], lookback: usize) -> Result<ClosePair, NoDataReason> {
    let n = closes.len();
    if n < 2 {
        return Err(NoDataReason::InsufficientHistory { available: n });
    }
    Ok(ClosePair {
        current: closes[n - 1],
        reference: closes[reference_index(n, lookback)],
    })
}

/// First and last valid closes dated in `year` on the exchange calendar.
pub fn resolve_year_to_date(series: &BarSeries, tz: Tz, year: i32) -> Result<ClosePair, NoDataReason> {
    let mut in_year = series
        .valid_bars()
        .filter(|b| exchange_year(&b.timestamp, tz) == year)
        .map(|b| b.close);
    let reference = in_year.next().ok_or(NoDataReason::NoCloseInYear { year })?;
    let current = in_year.last().unwrap_or(reference);
    Ok(ClosePair { current, reference })
}

/// Applies `rule` to `series`. Fewer than two valid closes is always no data;
/// YTD uses the year of the newest valid close.
pub fn resolve(series: &BarSeries, rule: LookbackRule, tz: Tz) -> Result<ClosePair, NoDataReason> {
    let year = series
        .last_valid()
        .map(|b| exchange_year(&b.timestamp, tz))
        .ok_or(NoDataReason::InsufficientHistory { available: 0 })?;
    resolve_in_year(series, rule, tz, year)
}

/// Like [`resolve`], with the YTD year fixed by the caller (the year of the
/// current price), so a year with no daily close yet is no data.
pub fn resolve_in_year(
    series: &BarSeries,
    rule: LookbackRule,
    tz: Tz,
    ytd_year: i32,
) -> Result<ClosePair, NoDataReason> {
    let closes = series.closes();
    if closes.len() < 2 {
        return Err(NoDataReason::InsufficientHistory {
            available: closes.len(),
        });
    }
    match rule {
        LookbackRule::Trailing(lookback) => resolve_trailing(&closes, lookback),
        LookbackRule::YearToDate => resolve_year_to_date(series, tz, ytd_year),
    }
}
