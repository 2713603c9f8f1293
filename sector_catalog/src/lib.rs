//! Sector catalog: which tickers belong to which theme, and how to load that
//! mapping without ever ending up with nothing to show.

pub mod builtin;
pub mod config;
pub mod handle;
pub mod source;

pub use builtin::builtin_catalog;
pub use config::{NormalizationReport, SectorCatalog, load_catalog_path, load_catalog_str};
pub use handle::{CatalogHandle, DEFAULT_CATALOG_TTL};
pub use source::{CatalogSource, FallbackSource, StaticSource, TomlFileSource};
