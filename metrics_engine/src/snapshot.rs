use bar_store::{models::bar_series::BarSeries, providers::BarBatch};

/// Everything the engine reads during one render cycle.
///
/// `daily` drives lookbacks and range statistics; `intraday` drives the current
/// price, the session flag and sparklines. Either map may lack a ticker.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub daily: BarBatch,
    pub intraday: BarBatch,
}

impl MarketSnapshot {
    pub fn new(daily: BarBatch, intraday: BarBatch) -> Self {
        Self { daily, intraday }
    }

    pub fn with_daily(mut self, series: BarSeries) -> Self {
        self.daily.insert(series.symbol.clone(), series);
        self
    }

    pub fn with_intraday(mut self, series: BarSeries) -> Self {
        self.intraday.insert(series.symbol.clone(), series);
        self
    }

    pub fn daily(&self, ticker: &str) -> Option<&BarSeries> {
        self.daily.get(ticker)
    }

    pub fn intraday(&self, ticker: &str) -> Option<&BarSeries> {
        self.intraday.get(ticker)
    }
}
