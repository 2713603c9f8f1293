//! Lock-free, read-mostly holder for the current catalog.
//!
//! Readers call [`CatalogHandle::current`], which loads an `Arc<SectorCatalog>`
//! snapshot with no lock. [`CatalogHandle::refresh`] reloads from the source
//! and atomically swaps the new snapshot in; readers see either the old or the
//! new catalog, never a mix.
//!
//! Implementation notes:
//! - Uses `arc-swap` for atomic pointer swaps and cheap reads (no RwLock).
//! - The source is always wrapped in a [`FallbackSource`], so a snapshot is
//!   never empty.
//! - Staleness is tracked with the snapshot itself; [`CatalogHandle::current_fresh`]
//!   reloads once the TTL has passed.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use arc_swap::ArcSwap;
use tracing::info;

use crate::{
    config::SectorCatalog,
    source::{CatalogSource, FallbackSource},
};

/// Catalogs change rarely; a day matches the constituents refresh cadence.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(86_400);

struct Loaded {
    catalog: Arc<SectorCatalog>,
    loaded_at: Instant,
}

pub struct CatalogHandle {
    source: FallbackSource<Box<dyn CatalogSource>>,
    ttl: Duration,
    current: ArcSwap<Loaded>,
}

impl CatalogHandle {
    /// Loads `source` immediately, falling back to the built-in table.
    pub fn new(source: impl CatalogSource + 'static, ttl: Duration) -> Self {
        let boxed: Box<dyn CatalogSource> = Box::new(source);
        let source = FallbackSource::new(boxed);
        let loaded = Self::load(&source);
        Self {
            source,
            ttl,
            current: ArcSwap::from_pointee(loaded),
        }
    }

    fn load(source: &FallbackSource<Box<dyn CatalogSource>>) -> Loaded {
        let catalog = source.load_or_fallback();
        info!(
            source = %source.describe(),
            sectors = catalog.sectors.len(),
            "catalog loaded"
        );
        Loaded {
            catalog: Arc::new(catalog),
            loaded_at: Instant::now(),
        }
    }

    /// The current snapshot, however old.
    pub fn current(&self) -> Arc<SectorCatalog> {
        Arc::clone(&self.current.load().catalog)
    }

    /// The current snapshot, reloading first if it is older than the TTL.
    pub fn current_fresh(&self) -> Arc<SectorCatalog> {
        if self.is_stale() {
            self.refresh();
        }
        self.current()
    }

    pub fn is_stale(&self) -> bool {
        self.current.load().loaded_at.elapsed() >= self.ttl
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reloads from the source and swaps the result in.
    pub fn refresh(&self) -> Arc<SectorCatalog> {
        let loaded = Self::load(&self.source);
        let catalog = Arc::clone(&loaded.catalog);
        self.current.store(Arc::new(loaded));
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtin::builtin_catalog, source::TomlFileSource};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn readers_keep_old_snapshot_until_refresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "[sectors]\nChips = [\"NVDA\"]\n").unwrap();

        let handle = CatalogHandle::new(TomlFileSource::new(&path), DEFAULT_CATALOG_TTL);
        let before = handle.current();
        assert_eq!(before.members("Chips").unwrap(), ["NVDA"]);

        fs::write(&path, "[sectors]\nChips = [\"NVDA\", \"AMD\"]\n").unwrap();
        assert_eq!(handle.current().members("Chips").unwrap(), ["NVDA"]);

        handle.refresh();
        assert_eq!(handle.current().members("Chips").unwrap(), ["NVDA", "AMD"]);
        // an earlier snapshot is unaffected by the swap
        assert_eq!(before.members("Chips").unwrap(), ["NVDA"]);
    }

    #[test]
    fn broken_file_yields_builtin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "[sectors\n").unwrap();

        let handle = CatalogHandle::new(TomlFileSource::new(&path), DEFAULT_CATALOG_TTL);
        assert_eq!(*handle.current(), builtin_catalog());
    }

    #[test]
    fn zero_ttl_is_always_stale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, "[sectors]\nChips = [\"NVDA\"]\n").unwrap();

        let handle = CatalogHandle::new(TomlFileSource::new(&path), Duration::ZERO);
        assert!(handle.is_stale());

        fs::write(&path, "[sectors]\nSpace = [\"RKLB\"]\n").unwrap();
        assert!(handle.current_fresh().members("Space").is_some());

        let fresh = CatalogHandle::new(TomlFileSource::new(&path), DEFAULT_CATALOG_TTL);
        assert!(!fresh.is_stale());
    }
}
