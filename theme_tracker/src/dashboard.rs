//! One dashboard session: cached bar fetching, catalog, and the metrics engine.
//!
//! Every view fetches a fresh-enough [`MarketSnapshot`] (intraday and daily
//! batches in parallel, each behind its own TTL cache) and hands it to the
//! engine. Views are plain data; [`crate::render`] turns them into text.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use bar_store::{
    cache::CachedBarStore,
    models::request_params::BarsRequest,
    providers::{BarStore, ProviderError},
};
use metrics_engine::{
    MarketSnapshot, MetricsEngine, RangeStats, SectorAggregate, TickerMetrics, Timeframe,
    aggregate::compare_by_change, rank_sectors,
};
use sector_catalog::{CatalogHandle, SectorCatalog};
use tracing::info;

use crate::config::{AppConfig, DataSettings};

pub type SharedStore = Arc<dyn BarStore>;

/// A pulse index and its metrics, if it had data.
#[derive(Debug, Clone)]
pub struct PulseRow {
    pub label: String,
    pub ticker: String,
    pub metrics: Option<TickerMetrics>,
}

#[derive(Debug, Clone)]
pub struct SectorView {
    pub aggregate: SectorAggregate,
    /// Members with data, best performer first.
    pub rows: Vec<TickerMetrics>,
}

#[derive(Debug, Clone)]
pub struct TickerView {
    pub display_name: Option<String>,
    pub metrics: TickerMetrics,
    /// Change over every supported timeframe that has data.
    pub changes: Vec<(Timeframe, f64)>,
    pub range: Option<RangeStats>,
}

pub struct Dashboard {
    intraday: CachedBarStore<SharedStore>,
    daily: CachedBarStore<SharedStore>,
    data: DataSettings,
    engine: MetricsEngine,
    catalog: CatalogHandle,
}

impl Dashboard {
    pub fn new(store: SharedStore, catalog: CatalogHandle, config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            intraday: CachedBarStore::new(Arc::clone(&store), config.cache.intraday_ttl()),
            daily: CachedBarStore::new(store, config.cache.daily_ttl()),
            data: config.data.clone(),
            engine: MetricsEngine::new(config.engine_config()?),
            catalog,
        })
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    pub fn catalog(&self) -> Arc<SectorCatalog> {
        self.catalog.current_fresh()
    }

    /// Drops every cached batch so the next view refetches.
    pub fn invalidate(&self) {
        self.intraday.invalidate_all();
        self.daily.invalidate_all();
    }

    /// Intraday and daily bars for `tickers`, fetched concurrently.
    pub async fn snapshot(&self, tickers: &[String]) -> Result<MarketSnapshot, ProviderError> {
        let intraday_req = BarsRequest::new(
            tickers.iter().cloned(),
            self.data.intraday_period,
            self.data.intraday_interval,
        );
        let daily_req = BarsRequest::new(
            tickers.iter().cloned(),
            self.data.daily_period,
            self.data.daily_interval,
        );

        let (intraday, daily) =
            tokio::try_join!(self.intraday.fetch(&intraday_req), self.daily.fetch(&daily_req))?;
        info!(
            requested = tickers.len(),
            intraday = intraday.len(),
            daily = daily.len(),
            "snapshot ready"
        );
        Ok(MarketSnapshot::new(daily, intraday))
    }

    pub async fn pulse(&self, timeframe: Timeframe) -> anyhow::Result<Vec<PulseRow>> {
        let catalog = self.catalog();
        let tickers: Vec<String> = catalog.indices.values().cloned().collect();
        let snapshot = self.snapshot(&tickers).await.context("fetch pulse bars")?;

        let mut rows = Vec::with_capacity(tickers.len());
        for (label, ticker) in &catalog.indices {
            let metrics = match self.engine.metrics(&snapshot, ticker, timeframe) {
                Ok(m) => Some(m),
                Err(e) if e.is_no_data() => None,
                Err(e) => return Err(e.into()),
            };
            rows.push(PulseRow {
                label: label.clone(),
                ticker: ticker.clone(),
                metrics,
            });
        }
        Ok(rows)
    }

    /// One aggregate per sector, ranked best first.
    pub async fn overview(&self, timeframe: Timeframe) -> anyhow::Result<Vec<SectorAggregate>> {
        let catalog = self.catalog();
        let snapshot = self
            .snapshot(&catalog.sector_tickers())
            .await
            .context("fetch sector bars")?;

        let mut aggregates = catalog
            .sectors
            .iter()
            .map(|(name, members)| self.engine.aggregate(&snapshot, name, members, timeframe))
            .collect::<Result<Vec<_>, _>>()?;
        rank_sectors(&mut aggregates);
        Ok(aggregates)
    }

    /// Member rows for one sector, matched case-insensitively.
    pub async fn sector(&self, name: &str, timeframe: Timeframe) -> anyhow::Result<SectorView> {
        let catalog = self.catalog();
        let (name, members) = catalog
            .find_sector(name)
            .ok_or_else(|| anyhow!("unknown sector {name:?}"))?;
        let snapshot = self.snapshot(members).await.context("fetch sector bars")?;

        let aggregate = self.engine.aggregate(&snapshot, name, members, timeframe)?;
        let mut rows =
            self.engine
                .metrics_for_all(&snapshot, members.iter().map(String::as_str), timeframe)?;
        rows.sort_by(compare_by_change);
        Ok(SectorView { aggregate, rows })
    }

    pub async fn ticker(&self, symbol: &str, timeframe: Timeframe) -> anyhow::Result<TickerView> {
        let symbol = symbol.trim().to_uppercase();
        let snapshot = self
            .snapshot(std::slice::from_ref(&symbol))
            .await
            .context("fetch ticker bars")?;

        let metrics = self
            .engine
            .metrics(&snapshot, &symbol, timeframe)
            .with_context(|| format!("no metrics for {symbol}"))?;

        let changes = self
            .engine
            .config()
            .lookbacks
            .timeframes()
            .filter_map(|tf| {
                self.engine
                    .metrics(&snapshot, &symbol, tf)
                    .ok()
                    .map(|m| (tf, m.change_fraction))
            })
            .collect();

        Ok(TickerView {
            display_name: self.catalog().display_name(&symbol).map(str::to_string),
            metrics,
            changes,
            range: self.engine.range_stats(&snapshot, &symbol).ok(),
        })
    }
}
