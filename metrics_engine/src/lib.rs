//! Turns per-ticker bar series into dashboard metrics.
//!
//! The engine is synchronous and does no I/O. Hand it a [`MarketSnapshot`]
//! built from bar-store batches and a [`Timeframe`], and it returns a
//! [`TickerMetrics`] row per ticker or a [`SectorAggregate`] per sector.
//! Tickers without enough data come back as [`MetricsError::NoData`] so the
//! caller can leave the row out.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod lookback;
pub mod metrics;
pub mod session;
pub mod snapshot;
pub mod sparkline;
pub mod stats;
pub mod timeframe;
pub mod tz;

pub use aggregate::{aggregate_sector, rank_sectors};
pub use config::{EngineConfig, EngineSettings};
pub use engine::MetricsEngine;
pub use error::{ConfigError, MetricsError, NoData, NoDataReason};
pub use metrics::{RangeStats, SectorAggregate, TickerMetrics};
pub use session::{PriceSource, SessionWindow};
pub use snapshot::MarketSnapshot;
pub use timeframe::{LookbackRule, LookbackTable, Timeframe};
