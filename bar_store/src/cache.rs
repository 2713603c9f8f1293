//! Freshness cache over any [`BarStore`].
//!
//! [`CachedBarStore`] remembers each successful batch for a fixed TTL, keyed by
//! the request's ticker *set* (order and duplicates do not matter), period and
//! interval. It is an ordinary owned value: whoever renders the dashboard owns
//! one per refresh cadence (e.g. 60 s for intraday pulses, 300 s for daily
//! history) and decides when to [`invalidate`](CachedBarStore::invalidate) it.
//!
//! Failed fetches are never cached. Time comes from [`tokio::time::Instant`],
//! so expiry follows a paused test clock.

use std::{collections::BTreeSet, collections::HashMap, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::{
    models::{
        interval::{Interval, Period},
        request_params::BarsRequest,
    },
    providers::{BarBatch, BarStore, ProviderError},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub tickers: BTreeSet<String>,
    pub period: Period,
    pub interval: Interval,
}

impl From<&BarsRequest> for CacheKey {
    fn from(request: &BarsRequest) -> Self {
        Self {
            tickers: request.ticker_set(),
            period: request.period,
            interval: request.interval,
        }
    }
}

struct CacheEntry {
    fetched_at: Instant,
    batch: BarBatch,
}

pub struct CachedBarStore<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl<S: BarStore> CachedBarStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops the entry for `request`. Returns whether one was cached.
    pub fn invalidate(&self, request: &BarsRequest) -> bool {
        self.entries.lock().remove(&CacheKey::from(request)).is_some()
    }

    pub fn invalidate_all(&self) {
        self.entries.lock().clear();
    }

    /// Number of entries still within their TTL.
    pub fn fresh_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| now.duration_since(e.fetched_at) < self.ttl)
            .count()
    }

    fn lookup(&self, key: &CacheKey) -> Option<BarBatch> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        (Instant::now().duration_since(entry.fetched_at) < self.ttl).then(|| entry.batch.clone())
    }

    fn store(&self, key: CacheKey, batch: BarBatch) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, e| now.duration_since(e.fetched_at) < self.ttl);
        entries.insert(
            key,
            CacheEntry {
                fetched_at: now,
                batch,
            },
        );
    }
}

#[async_trait]
impl<S: BarStore> BarStore for CachedBarStore<S> {
    async fn fetch(&self, request: &BarsRequest) -> Result<BarBatch, ProviderError> {
        let key = CacheKey::from(request);
        if let Some(batch) = self.lookup(&key) {
            debug!(interval = %request.interval, period = %request.period, "bar cache hit");
            return Ok(batch);
        }

        debug!(interval = %request.interval, period = %request.period, "bar cache miss");
        let batch = self.inner.fetch(request).await?;
        self.store(key, batch.clone());
        Ok(batch)
    }
}
