//! Text dashboard over the metrics engine: configuration, one dashboard
//! session with cached stores, and plain-text rendering.

pub mod config;
pub mod dashboard;
pub mod render;

pub use config::AppConfig;
pub use dashboard::{Dashboard, PulseRow, SectorView, SharedStore, TickerView};
