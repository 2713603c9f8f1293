use bar_store::models::bar_series::BarSeries;

/// Six hours of 15-minute bars.
pub const DEFAULT_SPARKLINE_LEN: usize = 24;

/// The last `k` values in their original order.
pub fn trailing_window<T: Clone>(values: &[T], k: usize) -> Vec<T> {
    values[values.len().saturating_sub(k)..].to_vec()
}

/// Last `k` valid closes, from the intraday series when it has any, else the daily one.
pub fn recent_closes(intraday: Option<&BarSeries>, daily: Option<&BarSeries>, k: usize) -> Vec<f64> {
    let closes = intraday.map(BarSeries::closes).unwrap_or_default();
    if !closes.is_empty() {
        return trailing_window(&closes, k);
    }
    trailing_window(&daily.map(BarSeries::closes).unwrap_or_default(), k)
}
