//! Provider abstraction for market data sources.
//!
//! [`BarStore`] is the one interface the dashboard uses to get bars, whatever
//! sits behind it (a vendor REST API, an in-memory fixture, a cache).
//!
//! A store must tolerate partial failure: a ticker that is missing from the
//! returned [`BarBatch`], or present with an empty series, simply has no data.
//! Only a failure of the whole call is an `Err`.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use bar_store::models::request_params::BarsRequest;
//! use bar_store::providers::{BarBatch, BarStore, ProviderError};
//!
//! struct NothingStore;
//!
//! #[async_trait]
//! impl BarStore for NothingStore {
//!     async fn fetch(&self, _request: &BarsRequest) -> Result<BarBatch, ProviderError> {
//!         Ok(BarBatch::new())
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod errors;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

pub use errors::{ProviderError, ProviderInitError};

use crate::models::{bar_series::BarSeries, request_params::BarsRequest};

/// Result of one fetch: ticker -> series, in the order the store produced them.
pub type BarBatch = IndexMap<String, BarSeries>;

/// Trait for fetching bar data from a market data source.
///
/// Supports dynamic dispatch (`Box<dyn BarStore>`) for runtime selection.
#[async_trait]
pub trait BarStore: Send + Sync {
    /// Fetches bars for every ticker in `request`.
    ///
    /// Tickers the store knows nothing about are left out of the batch.
    async fn fetch(&self, request: &BarsRequest) -> Result<BarBatch, ProviderError>;
}

#[async_trait]
impl<T: BarStore + ?Sized> BarStore for Box<T> {
    async fn fetch(&self, request: &BarsRequest) -> Result<BarBatch, ProviderError> {
        (**self).fetch(request).await
    }
}

#[async_trait]
impl<T: BarStore + ?Sized> BarStore for Arc<T> {
    async fn fetch(&self, request: &BarsRequest) -> Result<BarBatch, ProviderError> {
        (**self).fetch(request).await
    }
}
