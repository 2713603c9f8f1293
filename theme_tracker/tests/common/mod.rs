#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use bar_store::{
    models::request_params::BarsRequest,
    providers::{BarBatch, BarStore, ProviderError, memory::MemoryBarStore},
};
use sector_catalog::{CatalogHandle, DEFAULT_CATALOG_TTL, TomlFileSource};
use theme_tracker::{AppConfig, Dashboard, SharedStore};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

pub fn fixture_store() -> MemoryBarStore {
    MemoryBarStore::from_json_path(fixture("bars.json")).unwrap()
}

pub fn fixture_catalog() -> CatalogHandle {
    CatalogHandle::new(TomlFileSource::new(fixture("catalog.toml")), DEFAULT_CATALOG_TTL)
}

pub fn dashboard_over(store: SharedStore) -> Dashboard {
    Dashboard::new(store, fixture_catalog(), &AppConfig::default()).unwrap()
}

pub fn fixture_dashboard() -> Dashboard {
    dashboard_over(Arc::new(fixture_store()))
}

/// Store that counts how often it is asked for bars.
pub struct CountingStore {
    inner: MemoryBarStore,
    pub calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryBarStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BarStore for CountingStore {
    async fn fetch(&self, request: &BarsRequest) -> Result<BarBatch, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(request).await
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}
