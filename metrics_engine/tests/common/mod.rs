#![allow(dead_code)]

use bar_store::models::{
    bar::{Bar, BarTime},
    bar_series::BarSeries,
    interval::Interval,
};
use chrono::{Days, NaiveDate};

/// Daily series with one bar per calendar day starting 2024-01-02.
pub fn daily(symbol: &str, closes: &[f64]) -> BarSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, c)| Bar::from_close(start + Days::new(i as u64), *c))
        .collect();
    BarSeries::try_new(symbol, Interval::daily(), bars).unwrap()
}

/// 15-minute series from RFC-3339 timestamps.
pub fn intraday(symbol: &str, points: &[(&str, f64)]) -> BarSeries {
    let bars = points
        .iter()
        .map(|(ts, c)| Bar::from_close(ts.parse::<BarTime>().unwrap(), *c))
        .collect();
    BarSeries::try_new(symbol, "15m".parse::<Interval>().unwrap(), bars).unwrap()
}
