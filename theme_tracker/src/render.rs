//! Plain-text tables for the terminal.

use std::fmt::{self, Write};

use metrics_engine::{SectorAggregate, TickerMetrics, Timeframe};
use sector_catalog::SectorCatalog;

use crate::dashboard::{PulseRow, SectorView, TickerView};

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// `+1.23%` / `-0.40%`.
pub fn format_percent(fraction: f64) -> String {
    format!("{:+.2}%", fraction * 100.0)
}

/// `1,234.50`.
pub fn format_price(price: f64) -> String {
    let raw = format!("{:.2}", price.abs());
    let (int, frac) = raw.split_once('.').unwrap_or((&raw, "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Compact volume: `950`, `12.3K`, `4.5M`, `1.2B`.
pub fn format_volume(volume: f64) -> String {
    match volume {
        v if v >= 1e9 => format!("{:.1}B", v / 1e9),
        v if v >= 1e6 => format!("{:.1}M", v / 1e6),
        v if v >= 1e3 => format!("{:.1}K", v / 1e3),
        v => format!("{v:.0}"),
    }
}

/// Block-character sparkline scaled between the window's min and max.
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= 0.0 {
                return BLOCKS[BLOCKS.len() / 2];
            }
            let idx = ((v - min) / span * (BLOCKS.len() - 1) as f64).round() as usize;
            BLOCKS[idx.min(BLOCKS.len() - 1)]
        })
        .collect()
}

fn session_marker(m: &TickerMetrics) -> &'static str {
    if m.is_extended_session { " ext" } else { "" }
}

pub fn write_pulse(out: &mut impl Write, rows: &[PulseRow], timeframe: Timeframe) -> fmt::Result {
    writeln!(out, "Market pulse ({timeframe})")?;
    for row in rows {
        match &row.metrics {
            Some(m) => writeln!(
                out,
                "  {:<10} {:>12} {:>9}{}",
                row.label,
                format_price(m.current_price),
                format_percent(m.change_fraction),
                session_marker(m)
            )?,
            None => writeln!(out, "  {:<10} {:>12}", row.label, "n/a")?,
        }
    }
    Ok(())
}

pub fn write_overview(
    out: &mut impl Write,
    aggregates: &[SectorAggregate],
    timeframe: Timeframe,
) -> fmt::Result {
    writeln!(out, "{:<18} {:>9} {:>7}  Trend (leader)", "Sector", timeframe, "Members")?;
    for agg in aggregates {
        let perf = if agg.member_count == 0 {
            "n/a".to_string()
        } else {
            format_percent(agg.mean_change_fraction)
        };
        writeln!(
            out,
            "{:<18} {:>9} {:>7}  {}",
            agg.sector_name,
            perf,
            format!("{}/{}", agg.member_count, agg.catalog_size),
            sparkline(&agg.leader_trend)
        )?;
    }
    Ok(())
}

pub fn write_sector(out: &mut impl Write, view: &SectorView, timeframe: Timeframe) -> fmt::Result {
    let agg = &view.aggregate;
    writeln!(
        out,
        "{} ({timeframe}): {} across {}/{} members",
        agg.sector_name,
        format_percent(agg.mean_change_fraction),
        agg.member_count,
        agg.catalog_size
    )?;
    writeln!(out, "{:<8} {:>12} {:>9} {:>8}  Trend", "Symbol", "Price", "Change", "Volume")?;
    for m in &view.rows {
        writeln!(
            out,
            "{:<8} {:>12} {:>9} {:>8}  {}{}",
            m.ticker,
            format_price(m.current_price),
            format_percent(m.change_fraction),
            m.volume.map(format_volume).unwrap_or_else(|| "-".into()),
            sparkline(&m.recent_close_window),
            session_marker(m)
        )?;
    }
    Ok(())
}

pub fn write_ticker(out: &mut impl Write, view: &TickerView) -> fmt::Result {
    let m = &view.metrics;
    match &view.display_name {
        Some(name) => writeln!(out, "{} ({name})", m.ticker)?,
        None => writeln!(out, "{}", m.ticker)?,
    }
    writeln!(
        out,
        "  price      {}{}",
        format_price(m.current_price),
        if m.is_extended_session { " (extended hours)" } else { "" }
    )?;
    writeln!(
        out,
        "  {:<10} {} ({:+.2} from {})",
        m.timeframe.to_string(),
        format_percent(m.change_fraction),
        m.change,
        format_price(m.reference_price)
    )?;
    if let Some(v) = m.volume {
        writeln!(out, "  volume     {}", format_volume(v))?;
    }
    writeln!(out, "  trend      {}", sparkline(&m.recent_close_window))?;

    if !view.changes.is_empty() {
        let cells: Vec<String> = view
            .changes
            .iter()
            .map(|(tf, c)| format!("{tf} {}", format_percent(*c)))
            .collect();
        writeln!(out, "  changes    {}", cells.join("  "))?;
    }
    if let Some(r) = &view.range {
        writeln!(
            out,
            "  range      {} - {} over {} sessions",
            format_price(r.low),
            format_price(r.high),
            r.observations
        )?;
        if let Some(v) = r.average_volume {
            writeln!(out, "  avg volume {}", format_volume(v))?;
        }
    }
    Ok(())
}

pub fn write_catalog(out: &mut impl Write, catalog: &SectorCatalog) -> fmt::Result {
    for (name, members) in &catalog.sectors {
        writeln!(out, "{name} ({}): {}", members.len(), members.join(", "))?;
    }
    if !catalog.indices.is_empty() {
        let pulse: Vec<String> = catalog
            .indices
            .iter()
            .map(|(label, ticker)| format!("{label} [{ticker}]"))
            .collect();
        writeln!(out, "Pulse: {}", pulse.join(", "))?;
    }
    Ok(())
}
