//! [`BarStore`](crate::providers::BarStore) backed by Alpaca's market data REST API.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{AlpacaProvider, RetryPolicy};
