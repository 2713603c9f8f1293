//! Sector aggregation and ranking.

use std::cmp::Ordering;

use tracing::debug;

use crate::{
    error::MetricsError,
    metrics::{SectorAggregate, TickerMetrics},
};

/// Averages `change_fraction` over the members that have metrics.
///
/// Members answering "no data" are left out of both the sum and the count. Any
/// other error stops the aggregate and is returned as is.
pub fn aggregate_sector<S, F>(
    sector_name: &str,
    members: &[S],
    mut metrics_for: F,
) -> Result<SectorAggregate, MetricsError>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Result<TickerMetrics, MetricsError>,
{
    let mut sum = 0.0;
    let mut member_count = 0usize;
    let mut leader_trend = None;

    for member in members {
        let ticker: &str = member.as_ref();
        match metrics_for(ticker) {
            Ok(m) => {
                sum += m.change_fraction;
                member_count += 1;
                leader_trend.get_or_insert(m.recent_close_window);
            }
            Err(MetricsError::NoData(no_data)) => {
                debug!(sector = sector_name, %no_data, "skipping member");
            }
            Err(e) => return Err(e),
        }
    }

    let mean_change_fraction = if member_count == 0 {
        0.0
    } else {
        sum / member_count as f64
    };

    Ok(SectorAggregate {
        sector_name: sector_name.to_string(),
        member_count,
        mean_change_fraction,
        catalog_size: members.len(),
        leader_trend: leader_trend.unwrap_or_default(),
    })
}

/// Best performers first. Sectors with no valid members sink to the bottom;
/// ties are broken by name.
pub fn rank_sectors(aggregates: &mut [SectorAggregate]) {
    aggregates.sort_by(|a, b| {
        (a.member_count == 0)
            .cmp(&(b.member_count == 0))
            .then_with(|| b.mean_change_fraction.total_cmp(&a.mean_change_fraction))
            .then_with(|| a.sector_name.cmp(&b.sector_name))
    });
}

/// Orders rows by change, largest gain first.
pub fn compare_by_change(a: &TickerMetrics, b: &TickerMetrics) -> Ordering {
    b.change_fraction
        .total_cmp(&a.change_fraction)
        .then_with(|| a.ticker.cmp(&b.ticker))
}
