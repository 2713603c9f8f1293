use bar_store::models::bar_series::BarSeries;

use crate::metrics::RangeStats;

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn fold_max(acc: Option<f64>, v: f64) -> Option<f64> {
    Some(acc.map_or(v, |a| a.max(v)))
}

fn fold_min(acc: Option<f64>, v: f64) -> Option<f64> {
    Some(acc.map_or(v, |a| a.min(v)))
}

/// Max finite high, min finite low and mean finite volume over every bar.
///
/// Each field is checked on its own, so a bar with no close still counts for
/// its high, low and volume. Closes stand in for a series that has no finite
/// high (or low) at all. Returns `None` when no bar has any finite price.
pub fn range_stats(series: &BarSeries) -> Option<RangeStats> {
    let (mut high, mut low) = (None, None);
    let (mut close_high, mut close_low) = (None, None);
    let mut observations = 0usize;
    let (mut volume_sum, mut volume_count) = (0.0, 0usize);

    for bar in &series.bars {
        let (h, l, c) = (finite(bar.high), finite(bar.low), finite(bar.close));
        if h.is_none() && l.is_none() && c.is_none() {
            continue;
        }
        observations += 1;
        high = h.map_or(high, |v| fold_max(high, v));
        low = l.map_or(low, |v| fold_min(low, v));
        close_high = c.map_or(close_high, |v| fold_max(close_high, v));
        close_low = c.map_or(close_low, |v| fold_min(close_low, v));
        if let Some(v) = finite(bar.volume) {
            volume_sum += v;
            volume_count += 1;
        }
    }

    Some(RangeStats {
        high: high.or(close_high)?,
        low: low.or(close_low)?,
        average_volume: (volume_count > 0).then(|| volume_sum / volume_count as f64),
        observations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bar_store::models::{bar::Bar, interval::Interval};
    use chrono::NaiveDate;

    fn bar(d: u32, close: f64, high: f64, low: f64, volume: f64) -> Bar {
        let mut b = Bar::from_close(NaiveDate::from_ymd_opt(2024, 6, d).unwrap(), close);
        b.high = high;
        b.low = low;
        b.with_volume(volume)
    }

    #[test]
    fn each_field_is_filtered_on_its_own() {
        let s = BarSeries::try_new(
            "PLTR",
            Interval::daily(),
            vec![
                bar(3, 20.0, 21.0, 19.5, 1_000.0),
                bar(4, 22.0, f64::NAN, f64::NAN, f64::NAN),
                bar(5, 21.0, 21.5, 18.0, 3_000.0),
                bar(6, f64::NAN, 99.0, 1.0, 5_000.0),
            ],
        )
        .unwrap();
        let stats = range_stats(&s).unwrap();
        assert_eq!(stats.high, 99.0);
        assert_eq!(stats.low, 1.0);
        assert_eq!(stats.average_volume, Some(3_000.0));
        assert_eq!(stats.observations, 4);
    }

    #[test]
    fn bar_without_close_keeps_its_range_and_volume() {
        let s = BarSeries::try_new(
            "RKLB",
            Interval::daily(),
            vec![
                bar(3, 20.0, 21.0, 19.0, f64::NAN),
                bar(4, f64::NAN, 30.0, 10.0, 5_000.0),
            ],
        )
        .unwrap();
        let stats = range_stats(&s).unwrap();
        assert_eq!((stats.high, stats.low), (30.0, 10.0));
        assert_eq!(stats.average_volume, Some(5_000.0));
    }

    #[test]
    fn closes_stand_in_when_no_high_or_low() {
        let s = BarSeries::try_new(
            "IONQ",
            Interval::daily(),
            vec![
                bar(3, 12.0, f64::NAN, f64::NAN, f64::NAN),
                bar(4, 15.0, f64::NAN, f64::NAN, f64::NAN),
            ],
        )
        .unwrap();
        let stats = range_stats(&s).unwrap();
        assert_eq!((stats.high, stats.low), (15.0, 12.0));
        assert_eq!(stats.average_volume, None);
        assert_eq!(stats.observations, 2);
    }

    #[test]
    fn all_missing_has_no_stats() {
        let s = BarSeries::try_new(
            "IONQ",
            Interval::daily(),
            vec![bar(3, f64::NAN, f64::NAN, f64::NAN, 100.0)],
        )
        .unwrap();
        assert_eq!(range_stats(&s), None);
    }

    #[test]
    fn empty_series_has_no_stats() {
        assert_eq!(range_stats(&BarSeries::empty("PLTR", Interval::daily())), None);
    }
}
