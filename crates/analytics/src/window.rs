use core_types::{PriceSeries, Window};

/// Cuts `series` to the trailing calendar `window`.
///
/// The cutoff is the final date minus the window's interval; the result is the
/// suffix starting at the first date on or after it. `Max` and empty series
/// come back unchanged. The result may be shorter than the nominal window when
/// the source is.
pub fn slice_series(series: &PriceSeries, window: Window) -> PriceSeries {
    let Some(&end) = series.dates.last() else {
        return series.clone();
    };
    let Some(cutoff) = window.cutoff(end) else {
        return series.clone();
    };
    let start = series
        .dates
        .iter()
        .position(|d| *d >= cutoff)
        .unwrap_or(0);
    series.suffix(start)
}
