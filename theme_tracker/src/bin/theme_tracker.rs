use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use bar_store::providers::{alpaca_rest::AlpacaProvider, memory::MemoryBarStore};
use clap::{Parser, Subcommand};
use metrics_engine::Timeframe;
use sector_catalog::{CatalogHandle, CatalogSource, StaticSource, TomlFileSource};
use theme_tracker::{AppConfig, Dashboard, SharedStore, render};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Sector and theme performance in the terminal")]
struct Cli {
    /// Path to the config file (theme_tracker.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serve bars from a JSON fixture instead of Alpaca
    #[arg(long, global = true, value_name = "FILE")]
    fixture: Option<PathBuf>,

    /// 1D, 1W, 1M, 3M, 1Y or YTD
    #[arg(short, long, global = true, default_value = "1D")]
    timeframe: Timeframe,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index pulse (S&P 500, Nasdaq, Bitcoin)
    Pulse,
    /// Every sector, best performer first
    Overview,
    /// Members of one sector
    Sector { name: String },
    /// One ticker across every timeframe
    Ticker { symbol: String },
    /// Print the loaded catalog
    Catalog,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(fixture: Option<&PathBuf>) -> Result<SharedStore> {
    Ok(match fixture {
        Some(path) => {
            let store = MemoryBarStore::from_json_path(path)
                .with_context(|| format!("load fixture {}", path.display()))?;
            info!(path = %path.display(), series = store.len(), "using fixture bars");
            Arc::new(store)
        }
        None => Arc::new(AlpacaProvider::new().context("configure Alpaca provider")?),
    })
}

fn catalog_source(config: &AppConfig) -> Box<dyn CatalogSource> {
    match &config.catalog.path {
        Some(path) => Box::new(TomlFileSource::new(path)),
        None => Box::new(StaticSource::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let catalog = CatalogHandle::new(catalog_source(&config), config.cache.catalog_ttl());
    let store = open_store(cli.fixture.as_ref())?;
    let dashboard = Dashboard::new(store, catalog, &config)?;
    let tf = cli.timeframe;

    let mut text = String::new();
    match cli.command {
        Command::Pulse => render::write_pulse(&mut text, &dashboard.pulse(tf).await?, tf)?,
        Command::Overview => render::write_overview(&mut text, &dashboard.overview(tf).await?, tf)?,
        Command::Sector { name } => {
            render::write_sector(&mut text, &dashboard.sector(&name, tf).await?, tf)?
        }
        Command::Ticker { symbol } => {
            render::write_ticker(&mut text, &dashboard.ticker(&symbol, tf).await?)?
        }
        Command::Catalog => render::write_catalog(&mut text, &dashboard.catalog())?,
    }
    print!("{text}");
    Ok(())
}
