use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    models::interval::{Interval, Period},
    providers::alpaca_rest::params::AlpacaBarsParams,
};

/// Universal parameters for requesting bars from any [`BarStore`](crate::providers::BarStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarsRequest {
    /// Symbols to request (e.g., `["AAPL", "NVDA"]`).
    pub tickers: Vec<String>,

    /// How far back to go, counted from the newest available bar.
    pub period: Period,

    /// Granularity of each bar. Validation of allowed values is performed by
    /// each provider according to its own API rules.
    pub interval: Interval,

    /// Optional, provider-specific parameters.
    #[serde(default)]
    pub provider_specific: ProviderParams,
}

impl BarsRequest {
    pub fn new<I, S>(tickers: I, period: Period, interval: Interval) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
            period,
            interval,
            provider_specific: ProviderParams::None,
        }
    }

    /// Requested tickers without duplicates, in sorted order.
    pub fn ticker_set(&self) -> BTreeSet<String> {
        self.tickers.iter().cloned().collect()
    }
}

/// Per-request options for one particular provider, kept out of the
/// universal [`BarsRequest`] fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ProviderParams {
    #[default]
    None,
    Alpaca(AlpacaBarsParams),
}
