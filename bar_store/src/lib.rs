//! Bar Store: where the dashboard gets its OHLCV bars from.
//!
//! - [`models`]: the vendor-agnostic [`Bar`](models::bar::Bar) /
//!   [`BarSeries`](models::bar_series::BarSeries) types plus request vocabulary
//!   ([`Interval`](models::interval::Interval), [`Period`](models::interval::Period)).
//! - [`providers`]: the [`BarStore`](providers::BarStore) trait and its implementations.
//! - [`cache`]: a TTL freshness cache that wraps any store.

pub mod cache;
pub mod models;
pub mod providers;
