//! Where a catalog comes from.
//!
//! A [`CatalogSource`] may fail. [`FallbackSource`] wraps one and never does:
//! when the primary errors or yields no sectors, it logs a warning and serves
//! the built-in table instead.

use std::path::{Path, PathBuf};

use anyhow::bail;
use tracing::warn;

use crate::{
    builtin::builtin_catalog,
    config::{SectorCatalog, load_catalog_path},
};

pub trait CatalogSource: Send + Sync {
    /// Short label for logs.
    fn describe(&self) -> String;

    fn load(&self) -> anyhow::Result<SectorCatalog>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn load(&self) -> anyhow::Result<SectorCatalog> {
        (**self).load()
    }
}

/// A TOML catalog on disk, re-read on every load.
#[derive(Debug, Clone)]
pub struct TomlFileSource {
    path: PathBuf,
}

impl TomlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for TomlFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load(&self) -> anyhow::Result<SectorCatalog> {
        load_catalog_path(&self.path)
    }
}

/// The built-in table, or any fixed catalog.
#[derive(Debug, Clone)]
pub struct StaticSource {
    catalog: SectorCatalog,
}

impl Default for StaticSource {
    fn default() -> Self {
        Self {
            catalog: builtin_catalog(),
        }
    }
}

impl StaticSource {
    pub fn new(catalog: SectorCatalog) -> Self {
        Self { catalog }
    }
}

impl CatalogSource for StaticSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    fn load(&self) -> anyhow::Result<SectorCatalog> {
        Ok(self.catalog.clone())
    }
}

/// Primary source with the built-in table behind it.
pub struct FallbackSource<P> {
    primary: P,
    fallback: StaticSource,
}

impl<P: CatalogSource> FallbackSource<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: StaticSource::default(),
        }
    }

    /// Loads the primary, or the built-in table if that fails or is empty.
    pub fn load_or_fallback(&self) -> SectorCatalog {
        let primary = self.primary.load().and_then(|cat| {
            if cat.is_empty() {
                bail!("catalog has no sectors");
            }
            Ok(cat)
        });
        match primary {
            Ok(cat) => cat,
            Err(err) => {
                warn!(
                    source = %self.primary.describe(),
                    error = ?err,
                    "catalog source failed; using built-in catalog"
                );
                self.fallback.catalog.clone()
            }
        }
    }
}

impl<P: CatalogSource> CatalogSource for FallbackSource<P> {
    fn describe(&self) -> String {
        format!("{} (fallback: static)", self.primary.describe())
    }

    fn load(&self) -> anyhow::Result<SectorCatalog> {
        Ok(self.load_or_fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct Broken;

    impl CatalogSource for Broken {
        fn describe(&self) -> String {
            "broken".into()
        }
        fn load(&self) -> anyhow::Result<SectorCatalog> {
            bail!("upstream unavailable")
        }
    }

    #[test]
    fn file_source_reads_and_normalizes() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[sectors]\nChips = [\"nvda\", \"amd\"]").unwrap();

        let cat = TomlFileSource::new(tmp.path()).load().unwrap();
        assert_eq!(cat.members("Chips").unwrap(), ["NVDA", "AMD"]);
    }

    #[test]
    fn missing_file_errors_with_path() {
        let err = TomlFileSource::new("/definitely/not/here.toml").load().unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.toml"));
    }

    #[test]
    fn fallback_on_error() {
        let cat = FallbackSource::new(Broken).load().unwrap();
        assert_eq!(cat, builtin_catalog());
    }

    #[test]
    fn fallback_on_empty_primary() {
        let cat = FallbackSource::new(StaticSource::new(SectorCatalog::default())).load_or_fallback();
        assert!(!cat.is_empty());
        assert_eq!(cat, builtin_catalog());
    }

    #[test]
    fn primary_wins_when_healthy() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[sectors]\nNuclear = [\"CEG\", \"VST\"]").unwrap();
        let cat = FallbackSource::new(TomlFileSource::new(tmp.path())).load_or_fallback();
        assert_eq!(cat.sector_names().collect::<Vec<_>>(), ["Nuclear"]);
    }

    #[test]
    fn boxed_sources_are_sources() {
        let boxed: Box<dyn CatalogSource> = Box::new(Broken);
        let cat = FallbackSource::new(boxed).load_or_fallback();
        assert_eq!(cat.sectors.len(), 14);
    }
}
