mod common;
use common::{daily, intraday};

use metrics_engine::{
    EngineConfig, MarketSnapshot, MetricsEngine, MetricsError, PriceSource, Timeframe,
    lookback::reference_index, sparkline::trailing_window,
};
use proptest::prelude::*;

fn trailing(tf: Timeframe) -> usize {
    match tf {
        Timeframe::OneDay => 1,
        Timeframe::OneWeek => 5,
        Timeframe::OneMonth => 21,
        Timeframe::ThreeMonths => 63,
        Timeframe::OneYear => 252,
        Timeframe::YearToDate => unreachable!(),
    }
}

const FIXED: [Timeframe; 5] = [
    Timeframe::OneDay,
    Timeframe::OneWeek,
    Timeframe::OneMonth,
    Timeframe::ThreeMonths,
    Timeframe::OneYear,
];

proptest! {
    #[test]
    fn change_matches_reference_index(
        closes in proptest::collection::vec(1.0f64..1_000.0, 2..300),
        tf in proptest::sample::select(FIXED.to_vec()),
    ) {
        let snap = MarketSnapshot::default().with_daily(daily("T", &closes));
        let m = MetricsEngine::default().metrics(&snap, "T", tf).unwrap();

        let n = closes.len();
        let r = closes[reference_index(n, trailing(tf))];
        prop_assert_eq!(m.reference_price, r);
        prop_assert_eq!(m.current_price, closes[n - 1]);
        prop_assert_eq!(m.change_fraction, (closes[n - 1] - r) / r);
    }

    #[test]
    fn short_history_is_always_no_data(
        closes in proptest::collection::vec(1.0f64..1_000.0, 0..2),
    ) {
        let snap = MarketSnapshot::default().with_daily(daily("T", &closes));
        let engine = MetricsEngine::default();
        for tf in Timeframe::ALL {
            let err = engine.metrics(&snap, "T", tf).unwrap_err();
            prop_assert!(err.is_no_data());
        }
    }

    #[test]
    fn sparkline_keeps_order_and_tail(
        values in proptest::collection::vec(-1e6f64..1e6, 0..60),
        k in 1usize..40,
    ) {
        let w = trailing_window(&values, k);
        prop_assert_eq!(w.len(), values.len().min(k));
        prop_assert_eq!(&w[..], &values[values.len() - w.len()..]);
    }

    #[test]
    fn metrics_are_idempotent(
        closes in proptest::collection::vec(0.0f64..500.0, 2..40),
    ) {
        let snap = MarketSnapshot::default().with_daily(daily("T", &closes));
        let engine = MetricsEngine::default();
        let a = engine.metrics(&snap, "T", Timeframe::OneDay).unwrap();
        let b = engine.metrics(&snap, "T", Timeframe::OneDay).unwrap();
        prop_assert_eq!(a.change_fraction.to_bits(), b.change_fraction.to_bits());
        prop_assert_eq!(a, b);
    }
}

#[test]
fn lookback_plus_one_closes_uses_first_as_reference() {
    let closes: Vec<f64> = (0..6).map(|i| 10.0 + i as f64).collect();
    let snap = MarketSnapshot::default().with_daily(daily("T", &closes));
    let m = MetricsEngine::default()
        .metrics(&snap, "T", Timeframe::OneWeek)
        .unwrap();
    assert_eq!(m.reference_price, 10.0);
    assert_eq!(m.current_price, 15.0);
}

#[test]
fn zero_reference_gives_zero_change() {
    let snap = MarketSnapshot::default().with_daily(daily("T", &[0.0, 3.0]));
    let m = MetricsEngine::default()
        .metrics(&snap, "T", Timeframe::OneDay)
        .unwrap();
    assert_eq!(m.change_fraction, 0.0);
    assert_eq!(m.change, 3.0);
}

#[test]
fn sector_mean_skips_missing_members() {
    // A: +2%, B: absent, C: -4%
    let snap = MarketSnapshot::default()
        .with_daily(daily("A", &[50.0, 51.0]))
        .with_daily(daily("C", &[25.0, 24.0]));
    let agg = MetricsEngine::default()
        .aggregate(&snap, "Mixed", &["A", "B", "C"], Timeframe::OneDay)
        .unwrap();
    assert_eq!(agg.member_count, 2);
    assert!((agg.mean_change_fraction + 0.01).abs() < 1e-12);

    let empty = MetricsEngine::default()
        .aggregate::<String>(&snap, "Empty", &[], Timeframe::OneDay)
        .unwrap();
    assert_eq!((empty.member_count, empty.mean_change_fraction), (0, 0.0));
}

#[test]
fn sparkline_shorter_than_window() {
    let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
    let snap = MarketSnapshot::default().with_daily(daily("T", &closes));
    let engine = MetricsEngine::new(EngineConfig {
        sparkline_len: 20,
        ..EngineConfig::default()
    });
    let m = engine.metrics(&snap, "T", Timeframe::OneDay).unwrap();
    assert_eq!(m.recent_close_window, closes.to_vec());
}

#[test]
fn session_flag_follows_exchange_clock() {
    // (UTC timestamp, extended?) on a July (EDT, UTC-4) trading day
    let cases = [
        ("2024-07-15T12:00:00Z", true),  // 08:00
        ("2024-07-15T14:00:00Z", false), // 10:00
        ("2024-07-15T19:59:00Z", false), // 15:59
        ("2024-07-15T20:00:00Z", true),  // 16:00
        ("2024-07-15T13:45:00Z", false), // 09:45
        ("2024-01-16T13:45:00Z", true),  // 08:45 EST
    ];
    let engine = MetricsEngine::default();
    for (ts, extended) in cases {
        let snap = MarketSnapshot::default()
            .with_daily(daily("T", &[10.0, 11.0]))
            .with_intraday(intraday("T", &[(ts, 11.5)]));
        let m = engine.metrics(&snap, "T", Timeframe::OneDay).unwrap();
        assert_eq!(m.source, PriceSource::Intraday);
        assert_eq!(m.is_extended_session, extended, "{ts}");
    }
}

#[test]
fn naive_intraday_timestamps_are_exchange_local() {
    let snap = MarketSnapshot::default()
        .with_daily(daily("T", &[10.0, 11.0]))
        .with_intraday(intraday("T", &[("2024-07-15 08:00:00", 11.5)]));
    let m = MetricsEngine::default()
        .metrics(&snap, "T", Timeframe::OneDay)
        .unwrap();
    assert!(m.is_extended_session);
}

#[test]
fn ytd_reference_crosses_utc_new_year() {
    let snap = MarketSnapshot::default().with_daily(intraday(
        "T",
        &[
            ("2024-12-30T21:00:00Z", 100.0),
            ("2024-12-31T21:00:00Z", 101.0),
            ("2025-01-01T03:00:00Z", 110.0),
        ],
    ));
    let m = MetricsEngine::default()
        .metrics(&snap, "T", Timeframe::YearToDate)
        .unwrap();
    // every bar is still 2024 in New York
    assert_eq!(m.reference_price, 100.0);
    assert!((m.change_fraction - 0.1).abs() < 1e-12);
}

#[test]
fn unsupported_label_is_a_caller_error() {
    let mut config = EngineConfig::default();
    config.lookbacks = metrics_engine::LookbackTable::new(
        [(Timeframe::OneDay, metrics_engine::LookbackRule::Trailing(1))]
            .into_iter()
            .collect(),
    )
    .unwrap();
    let snap = MarketSnapshot::default().with_daily(daily("T", &[1.0, 2.0]));
    assert_eq!(
        MetricsEngine::new(config).metrics(&snap, "T", Timeframe::OneYear),
        Err(MetricsError::UnsupportedTimeframe(Timeframe::OneYear))
    );
}
