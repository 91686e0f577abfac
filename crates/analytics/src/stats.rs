//! Small numeric helpers shared by the metric calculators.

use chrono::{Datelike, NaiveDate};

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Variances this small relative to the mean square are round-off, not signal.
const RELATIVE_VARIANCE_TOLERANCE: f64 = 1e-12;

pub fn annualization() -> f64 {
    TRADING_DAYS.sqrt()
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// True when `variance` is indistinguishable from zero given the data scale.
pub fn is_negligible_variance(variance: f64, mean_square: f64) -> bool {
    variance <= RELATIVE_VARIANCE_TOLERANCE * mean_square
}

/// Running-peak drawdowns (`value / peak - 1`, always <= 0) at every point.
///
/// The peak starts at the first value, or 1.0 if that value is zero.
pub fn drawdowns(values: &[f64]) -> Vec<f64> {
    let mut peak = match values.first() {
        Some(&v) if v != 0.0 => v,
        _ => 1.0,
    };
    values
        .iter()
        .map(|&value| {
            if value > peak {
                peak = value;
            }
            value / peak - 1.0
        })
        .collect()
}

/// The most negative drawdown, 0 when the series never dips.
pub fn max_drawdown(values: &[f64]) -> f64 {
    drawdowns(values).into_iter().fold(0.0, f64::min)
}

/// Root-mean-square of drawdown depth.
pub fn ulcer_index(values: &[f64]) -> f64 {
    let squares: Vec<f64> = drawdowns(values).into_iter().map(|d| d * d).collect();
    mean(&squares).sqrt()
}

/// Calendar-month returns in order of first appearance.
///
/// Each month starts from the value preceding its first date in the series and
/// ends at its last value, so consecutive months chain without gaps.
pub fn monthly_returns(dates: &[NaiveDate], values: &[f64]) -> Vec<f64> {
    let mut buckets: Vec<((i32, u32), f64, f64)> = Vec::new();
    for i in 1..dates.len().min(values.len()) {
        let month = (dates[i].year(), dates[i].month());
        match buckets.last_mut() {
            Some((key, _, end)) if *key == month => *end = values[i],
            _ => buckets.push((month, values[i - 1], values[i])),
        }
    }
    buckets
        .into_iter()
        .map(|(_, start, end)| end / start - 1.0)
        .collect()
}

/// Sum of gains over the absolute sum of losses, 0 without losses.
pub fn profit_factor(returns: &[f64]) -> f64 {
    let gains: f64 = returns.iter().filter(|r| **r > 0.0).sum();
    let losses: f64 = returns.iter().filter(|r| **r < 0.0).sum();
    if losses == 0.0 {
        return 0.0;
    }
    gains / losses.abs()
}

/// Replaces NaN and infinities with zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_dev_is_population() {
        assert_eq!(std_dev(&[1.0, 3.0]), 1.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[5.0]), 0.0);
    }

    #[test]
    fn drawdown_tracks_running_peak() {
        let dd = drawdowns(&[1.0, 2.0, 1.0, 3.0, 1.5]);
        assert_eq!(dd, vec![0.0, 0.0, -0.5, 0.0, -0.5]);
        assert_eq!(max_drawdown(&[1.0, 2.0, 1.0, 3.0, 1.5]), -0.5);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn ulcer_is_rms_of_drawdowns() {
        let u = ulcer_index(&[1.0, 0.5, 1.0]);
        assert!((u - (0.25_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(ulcer_index(&[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn months_chain_from_previous_close() {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        let dates = [d(1, 30), d(1, 31), d(2, 1), d(2, 2)];
        let values = [1.0, 1.1, 1.21, 0.99];
        let months = monthly_returns(&dates, &values);
        assert_eq!(months.len(), 2);
        assert!((months[0] - 0.1).abs() < 1e-12);
        assert!((months[1] - (0.99 / 1.1 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn profit_factor_without_losses_is_zero() {
        assert_eq!(profit_factor(&[0.1, 0.2]), 0.0);
        assert!((profit_factor(&[0.3, -0.1, -0.05]) - 2.0).abs() < 1e-12);
    }
}
