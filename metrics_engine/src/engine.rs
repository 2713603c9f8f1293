//! The facade the presentation layer calls once per render cycle.

use tracing::debug;

use crate::{
    aggregate::aggregate_sector,
    config::EngineConfig,
    error::{MetricsError, NoData, NoDataReason},
    lookback::{self, change_fraction},
    metrics::{RangeStats, SectorAggregate, TickerMetrics},
    session::resolve_current_price,
    snapshot::MarketSnapshot,
    sparkline::recent_closes,
    stats,
    timeframe::Timeframe,
    tz::exchange_year,
};

/// Pure function of its config and the snapshot it is handed.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: EngineConfig,
}

impl MetricsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Change over `timeframe` for one ticker.
    ///
    /// The reference close comes from the daily series; the current price comes
    /// from the newest intraday close when there is one, else the newest daily close.
    pub fn metrics(
        &self,
        snapshot: &MarketSnapshot,
        ticker: &str,
        timeframe: Timeframe,
    ) -> Result<TickerMetrics, MetricsError> {
        let rule = self
            .config
            .lookbacks
            .get(timeframe)
            .ok_or(MetricsError::UnsupportedTimeframe(timeframe))?;
        let no_data = |reason: NoDataReason| MetricsError::from(NoData::new(ticker, reason));

        let daily = snapshot
            .daily(ticker)
            .ok_or_else(|| no_data(NoDataReason::MissingSeries))?;
        let intraday = snapshot.intraday(ticker);
        let tz = self.config.exchange_tz;

        // daily is present, so no current price means no valid close at all
        let current = resolve_current_price(intraday, Some(daily), tz, self.config.session.as_ref())
            .ok_or_else(|| no_data(NoDataReason::InsufficientHistory { available: 0 }))?;
        let ytd_year = exchange_year(&current.bar.timestamp, tz);
        let pair = lookback::resolve_in_year(daily, rule, tz, ytd_year).map_err(no_data)?;
        let current_price = current.price();

        Ok(TickerMetrics {
            ticker: ticker.to_string(),
            timeframe,
            current_price,
            reference_price: pair.reference,
            change: current_price - pair.reference,
            change_fraction: change_fraction(current_price, pair.reference),
            is_extended_session: current.is_extended_session,
            source: current.source,
            recent_close_window: recent_closes(intraday, Some(daily), self.config.sparkline_len),
            volume: current.volume(),
        })
    }

    /// Metrics for every ticker that has data, in input order.
    pub fn metrics_for_all<'a, I>(
        &self,
        snapshot: &MarketSnapshot,
        tickers: I,
        timeframe: Timeframe,
    ) -> Result<Vec<TickerMetrics>, MetricsError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rows = Vec::new();
        for ticker in tickers {
            match self.metrics(snapshot, ticker, timeframe) {
                Ok(row) => rows.push(row),
                Err(MetricsError::NoData(no_data)) => debug!(%no_data, "no row"),
                Err(e) => return Err(e),
            }
        }
        Ok(rows)
    }

    pub fn aggregate<S: AsRef<str>>(
        &self,
        snapshot: &MarketSnapshot,
        sector: &str,
        members: &[S],
        timeframe: Timeframe,
    ) -> Result<SectorAggregate, MetricsError> {
        if !self.config.lookbacks.supports(timeframe) {
            return Err(MetricsError::UnsupportedTimeframe(timeframe));
        }
        aggregate_sector(sector, members, |ticker| {
            self.metrics(snapshot, ticker, timeframe)
        })
    }

    pub fn range_stats(&self, snapshot: &MarketSnapshot, ticker: &str) -> Result<RangeStats, MetricsError> {
        let daily = snapshot
            .daily(ticker)
            .ok_or_else(|| NoData::new(ticker, NoDataReason::MissingSeries))?;
        stats::range_stats(daily).ok_or_else(|| NoData::new(ticker, NoDataReason::EmptyRange).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{session::PriceSource, timeframe::LookbackRule, timeframe::LookbackTable};
    use bar_store::models::{
        bar::{Bar, BarTime},
        bar_series::BarSeries,
        interval::Interval,
    };
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn daily(symbol: &str, closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, c)| Bar::from_close(start + chrono::Days::new(i as u64), *c).with_volume(1_000.0))
            .collect();
        BarSeries::try_new(symbol, Interval::daily(), bars).unwrap()
    }

    fn intraday(symbol: &str, points: &[(&str, f64)]) -> BarSeries {
        let bars = points
            .iter()
            .map(|(ts, c)| Bar::from_close(ts.parse::<BarTime>().unwrap(), *c).with_volume(50.0))
            .collect();
        BarSeries::try_new(symbol, "15m".parse::<Interval>().unwrap(), bars).unwrap()
    }

    #[test]
    fn daily_only_ticker() {
        let snap = MarketSnapshot::default().with_daily(daily("NVDA", &[100.0, 105.0, 110.0]));
        let m = MetricsEngine::default()
            .metrics(&snap, "NVDA", Timeframe::OneDay)
            .unwrap();
        assert_eq!(m.current_price, 110.0);
        assert_eq!(m.reference_price, 105.0);
        assert!((m.change_fraction - 5.0 / 105.0).abs() < 1e-12);
        assert_eq!(m.source, PriceSource::Daily);
        assert!(!m.is_extended_session);
        assert_eq!(m.recent_close_window, vec![100.0, 105.0, 110.0]);
        assert_eq!(m.volume, Some(1_000.0));
    }

    #[test]
    fn intraday_price_against_daily_reference() {
        let snap = MarketSnapshot::default()
            .with_daily(daily("AMD", &[100.0, 105.0, 110.0]))
            .with_intraday(intraday(
                "AMD",
                &[("2024-03-04T14:45:00Z", 111.0), ("2024-03-04T15:00:00Z", 115.5)],
            ));
        let m = MetricsEngine::default()
            .metrics(&snap, "AMD", Timeframe::OneDay)
            .unwrap();
        assert_eq!(m.current_price, 115.5);
        assert_eq!(m.reference_price, 105.0);
        assert_eq!(m.change, 10.5);
        assert_eq!(m.source, PriceSource::Intraday);
        // 15:00Z in March before DST is 10:00 EST
        assert!(!m.is_extended_session);
        assert_eq!(m.recent_close_window, vec![111.0, 115.5]);
        assert_eq!(m.volume, Some(50.0));
    }

    #[test]
    fn ytd_follows_the_year_of_the_current_price() {
        let bars = [("2024-01-02", 50.0), ("2024-12-30", 99.0), ("2024-12-31", 100.0)]
            .iter()
            .map(|(d, c)| Bar::from_close(d.parse::<BarTime>().unwrap(), *c))
            .collect();
        let snap = MarketSnapshot::default()
            .with_daily(BarSeries::try_new("TSLA", Interval::daily(), bars).unwrap())
            .with_intraday(intraday("TSLA", &[("2025-01-02T13:00:00Z", 101.0)]));
        let engine = MetricsEngine::default();

        let err = engine.metrics(&snap, "TSLA", Timeframe::YearToDate).unwrap_err();
        assert_eq!(
            err,
            MetricsError::from(NoData::new("TSLA", NoDataReason::NoCloseInYear { year: 2025 }))
        );

        let one_day = engine.metrics(&snap, "TSLA", Timeframe::OneDay).unwrap();
        assert_eq!(one_day.current_price, 101.0);
        assert_eq!(one_day.reference_price, 99.0);
    }

    #[test]
    fn missing_and_short_series_are_no_data() {
        let snap = MarketSnapshot::default()
            .with_daily(daily("ONE", &[1.0]))
            .with_intraday(intraday("ONE", &[("2024-03-04T15:00:00Z", 1.1)]));
        let engine = MetricsEngine::default();

        let err = engine.metrics(&snap, "GONE", Timeframe::OneDay).unwrap_err();
        assert_eq!(err, MetricsError::from(NoData::new("GONE", NoDataReason::MissingSeries)));

        for tf in Timeframe::ALL {
            let err = engine.metrics(&snap, "ONE", tf).unwrap_err();
            assert!(err.is_no_data(), "{tf}: {err}");
        }
    }

    #[test]
    fn unsupported_timeframe_is_not_no_data() {
        let table = LookbackTable::new(IndexMap::from([(Timeframe::OneDay, LookbackRule::Trailing(1))])).unwrap();
        let engine = MetricsEngine::new(EngineConfig {
            lookbacks: table,
            ..EngineConfig::default()
        });
        let snap = MarketSnapshot::default().with_daily(daily("NVDA", &[1.0, 2.0]));

        let err = engine.metrics(&snap, "NVDA", Timeframe::YearToDate).unwrap_err();
        assert_eq!(err, MetricsError::UnsupportedTimeframe(Timeframe::YearToDate));
        assert!(!err.is_no_data());
        assert!(engine.aggregate::<&str>(&snap, "Empty", &[], Timeframe::YearToDate).is_err());
    }

    #[test]
    fn aggregate_and_rows_skip_missing_members() {
        let snap = MarketSnapshot::default()
            .with_daily(daily("A", &[100.0, 102.0]))
            .with_daily(daily("C", &[100.0, 96.0]));
        let engine = MetricsEngine::default();

        let agg = engine
            .aggregate(&snap, "Mixed", &["A", "B", "C"], Timeframe::OneDay)
            .unwrap();
        assert_eq!(agg.member_count, 2);
        assert!((agg.mean_change_fraction - -0.01).abs() < 1e-12);
        assert_eq!(agg.leader_trend, vec![100.0, 102.0]);

        let rows = engine
            .metrics_for_all(&snap, ["C", "B", "A"], Timeframe::OneDay)
            .unwrap();
        let tickers: Vec<_> = rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, ["C", "A"]);
    }

    #[test]
    fn range_stats_over_daily() {
        let snap = MarketSnapshot::default()
            .with_daily(daily("PLTR", &[20.0, 25.0, 18.0]))
            .with_daily(BarSeries::empty("EMPTY", Interval::daily()));
        let engine = MetricsEngine::default();

        let stats = engine.range_stats(&snap, "PLTR").unwrap();
        assert_eq!((stats.high, stats.low, stats.observations), (25.0, 18.0, 3));
        assert_eq!(stats.average_volume, Some(1_000.0));

        assert_eq!(
            engine.range_stats(&snap, "EMPTY").unwrap_err(),
            MetricsError::from(NoData::new("EMPTY", NoDataReason::EmptyRange))
        );
    }
}
