//! Application configuration.
//!
//! Loaded from `theme_tracker.toml`; every field has a default, so an empty or
//! missing file gives a working setup. Resolution order for the file itself:
//! 1. an explicit path (the `--config` flag)
//! 2. `THEME_TRACKER_CONFIG`
//! 3. `./theme_tracker.toml` when it exists
//! 4. built-in defaults
//!
//! `THEME_TRACKER_CATALOG` overrides `[catalog].path`.

use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use bar_store::models::interval::{Interval, IntervalUnit, Period, PeriodUnit};
use metrics_engine::{EngineConfig, EngineSettings};
use serde::{Deserialize, Serialize};
use shared_utils::env::get_optional_env_var;

pub const CONFIG_ENV: &str = "THEME_TRACKER_CONFIG";
pub const CATALOG_ENV: &str = "THEME_TRACKER_CATALOG";
pub const DEFAULT_CONFIG_FILE: &str = "theme_tracker.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub engine: EngineSettings,
    pub cache: CacheSettings,
    pub data: DataSettings,
    pub catalog: CatalogSettings,
}

/// Freshness TTLs in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    pub intraday_ttl_secs: u64,
    pub daily_ttl_secs: u64,
    pub catalog_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            intraday_ttl_secs: 60,
            daily_ttl_secs: 300,
            catalog_ttl_secs: 86_400,
        }
    }
}

impl CacheSettings {
    pub fn intraday_ttl(&self) -> Duration {
        Duration::from_secs(self.intraday_ttl_secs)
    }

    pub fn daily_ttl(&self) -> Duration {
        Duration::from_secs(self.daily_ttl_secs)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }
}

/// What to ask the bar store for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataSettings {
    pub intraday_period: Period,
    pub intraday_interval: Interval,
    pub daily_period: Period,
    pub daily_interval: Interval,
}

impl Default for DataSettings {
    /// Five days of 15-minute bars and a year of daily bars.
    fn default() -> Self {
        Self {
            intraday_period: Period::span(NonZeroU32::MIN.saturating_add(4), PeriodUnit::Day),
            intraday_interval: Interval::new(NonZeroU32::MIN.saturating_add(14), IntervalUnit::Minute),
            daily_period: Period::span(NonZeroU32::MIN, PeriodUnit::Year),
            daily_interval: Interval::daily(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSettings {
    /// TOML catalog file. The built-in catalog is used when unset.
    pub path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("failed to parse config TOML")
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("load config {}", path.display()))
    }

    /// Loads the config following the resolution order above, then applies
    /// environment overrides.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| get_optional_env_var(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            });

        let mut config = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading config");
                Self::from_path(&path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(path) = get_optional_env_var(CATALOG_ENV) {
            self.catalog.path = Some(PathBuf::from(path));
        }
    }

    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        EngineConfig::try_from(self.engine.clone()).context("invalid [engine] settings")
    }
}
