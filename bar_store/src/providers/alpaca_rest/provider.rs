use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use tracing::{info, warn};

use crate::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequest},
    providers::{
        BarBatch, BarStore, ProviderError, ProviderInitError,
        alpaca_rest::{
            params::construct_params,
            response::{AlpacaBar, AlpacaResponse},
        },
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";

/// Retry schedule for retryable failures (see [`ProviderError::is_retryable`]).
///
/// Attempt `n` (0-based) waits `base_delay * 2^n` before trying again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }
}

pub struct AlpacaProvider {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    _api_key: SecretString,
    _secret_key: SecretString,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(get_env_var("APCA_API_KEY_ID")?.into());
        let secret_key = SecretString::new(get_env_var("APCA_API_SECRET_KEY")?.into());

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret())?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(secret_key.expose_secret())?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ProviderInitError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            _api_key: api_key,
            _secret_key: secret_key,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_page(&self, query: &[(String, String)]) -> Result<AlpacaResponse, ProviderError> {
        let response = self.client.get(&self.base_url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<AlpacaResponse>().await?)
    }

    async fn get_page_with_retry(
        &self,
        query: &[(String, String)],
    ) -> Result<AlpacaResponse, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.get_page(query).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(attempt, ?delay, error = %e, "retrying alpaca bars request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl BarStore for AlpacaProvider {
    async fn fetch(&self, request: &BarsRequest) -> Result<BarBatch, ProviderError> {
        if request.tickers.is_empty() {
            return Ok(BarBatch::new());
        }
        let base_query = construct_params(request, Utc::now())?;

        let mut all_bars: IndexMap<String, Vec<AlpacaBar>> = IndexMap::new();
        let mut next_page_token: Option<String> = None;

        loop {
            let mut query = base_query.clone();
            if let Some(token) = &next_page_token {
                query.push(("page_token".to_string(), token.clone()));
            }

            let page = self.get_page_with_retry(&query).await?;

            // Merge the bars from the current page into our collection.
            for (symbol, bars) in page.bars.unwrap_or_default() {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            match page.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        info!(
            requested = request.tickers.len(),
            returned = all_bars.len(),
            interval = %request.interval,
            period = %request.period,
            "fetched alpaca bars"
        );

        // `sort=desc` pages come back newest first; `sorted` restores time order.
        let batch = all_bars
            .into_iter()
            .map(|(symbol, bars)| {
                let bars: Vec<Bar> = bars.into_iter().map(Bar::from).collect();
                let series = BarSeries::sorted(symbol.clone(), request.interval, bars);
                (symbol, series)
            })
            .collect();

        Ok(batch)
    }
}
