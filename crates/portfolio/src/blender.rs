use crate::weights::{clamp_weight, normalize_weights};
use analytics::AnalyticsEngine;
use core_types::series::round_dp;
use core_types::{MetricsRecord, PriceSeries};
use serde::Serialize;

const VALUE_DECIMALS: i32 = 4;

/// The outcome of one blend.
///
/// `series` and `metrics` are absent when the constituents share fewer than
/// two points; the weights are reported either way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResult {
    /// Normalized weights, parallel to the constituents, summing to 1.
    pub weights: Vec<f64>,
    /// Sum of the raw weights after clamping negatives to zero.
    pub total_weight: f64,
    pub series: Option<PriceSeries>,
    pub metrics: Option<MetricsRecord>,
}

/// Blends already-windowed constituent series into a unit-based portfolio.
///
/// `raw_weights` is parallel to `constituents`; missing entries count as 0.
/// Constituents are right-aligned to the shortest common length, the daily
/// portfolio return is the weighted sum of constituent returns, and the result
/// compounds from 1.0 with 4-decimal rounding at every step. Benchmarks are
/// blended the same way. Dates come from the first constituent.
pub fn blend(constituents: &[PriceSeries], raw_weights: &[f64]) -> PortfolioResult {
    let padded: Vec<f64> = (0..constituents.len())
        .map(|i| raw_weights.get(i).copied().unwrap_or(0.0))
        .collect();
    let weights = normalize_weights(&padded);
    let total_weight: f64 = padded.iter().copied().map(clamp_weight).sum();

    let common = constituents.iter().map(PriceSeries::len).min().unwrap_or(0);
    if common < 2 {
        tracing::debug!(
            constituents = constituents.len(),
            common,
            "Not enough aligned points to blend a portfolio."
        );
        return PortfolioResult {
            weights,
            total_weight,
            series: None,
            metrics: None,
        };
    }

    let aligned: Vec<PriceSeries> = constituents.iter().map(|s| s.tail(common)).collect();
    let strategy_values = compound(&aligned, &weights, |s| &s.strategy_values);
    let benchmark_values = compound(&aligned, &weights, |s| &s.benchmark_values);

    let series = PriceSeries {
        dates: aligned[0].dates.clone(),
        strategy_values,
        benchmark_values,
    };
    let metrics = AnalyticsEngine::new().calculate(&series);

    PortfolioResult {
        weights,
        total_weight,
        series: Some(series),
        metrics: Some(metrics),
    }
}

/// Compounds the weighted per-day returns of the selected value column.
fn compound<F>(aligned: &[PriceSeries], weights: &[f64], column: F) -> Vec<f64>
where
    F: Fn(&PriceSeries) -> &Vec<f64>,
{
    let len = aligned.first().map(PriceSeries::len).unwrap_or(0);
    let mut values = Vec::with_capacity(len);
    let mut value = 1.0;
    values.push(value);
    for t in 1..len {
        let ret: f64 = aligned
            .iter()
            .zip(weights)
            .map(|(s, w)| {
                let col = column(s);
                w * (col[t] / col[t - 1] - 1.0)
            })
            .sum();
        value = round_dp(value * (1.0 + ret), VALUE_DECIMALS);
        values.push(value);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = start.iter_days().take(values.len()).collect();
        PriceSeries::new(dates, values.to_vec(), values.to_vec()).unwrap()
    }

    #[test]
    fn single_constituent_is_rebased_copy() {
        let result = blend(&[series(&[2.0, 2.2, 1.98])], &[5.0]);
        let s = result.series.unwrap();
        assert_eq!(s.strategy_values, vec![1.0, 1.1, 0.99]);
        assert_eq!(result.weights, vec![1.0]);
        assert_eq!(result.total_weight, 5.0);
        assert!((result.metrics.unwrap().total_return + 0.01).abs() < 1e-9);
    }

    #[test]
    fn weighted_sum_of_returns() {
        let a = series(&[1.0, 1.1, 1.1]);
        let b = series(&[1.0, 0.9, 0.9]);
        let result = blend(&[a, b], &[3.0, 1.0]);
        let s = result.series.unwrap();
        // 0.75 * 10% + 0.25 * -10% = 5%
        assert_eq!(s.strategy_values, vec![1.0, 1.05, 1.05]);
    }

    #[test]
    fn aligns_to_shortest_trailing_history() {
        let long = series(&[1.0, 1.0, 1.0, 1.0, 1.2]);
        let short = PriceSeries::new(
            long.dates[3..].to_vec(),
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        )
        .unwrap();
        let result = blend(&[long.clone(), short], &[1.0, 1.0]);
        let s = result.series.unwrap();
        assert_eq!(s.dates, long.dates[3..].to_vec());
        assert_eq!(s.strategy_values, vec![1.0, 1.1]);
    }

    #[test]
    fn zero_weights_blend_equally_and_missing_weights_count_as_zero() {
        let a = series(&[1.0, 1.2]);
        let b = series(&[1.0, 1.0]);
        let equal = blend(&[a.clone(), b.clone()], &[0.0, 0.0]);
        assert_eq!(equal.weights, vec![0.5, 0.5]);
        assert_eq!(equal.total_weight, 0.0);
        assert_eq!(equal.series.unwrap().strategy_values, vec![1.0, 1.1]);

        let partial = blend(&[a, b], &[2.0]);
        assert_eq!(partial.weights, vec![1.0, 0.0]);
    }

    #[test]
    fn too_short_reports_weights_only() {
        let result = blend(&[series(&[1.0]), series(&[1.0, 1.1])], &[1.0, 3.0]);
        assert!(result.series.is_none());
        assert!(result.metrics.is_none());
        assert_eq!(result.weights, vec![0.25, 0.75]);
        assert_eq!(result.total_weight, 4.0);

        let empty = blend(&[], &[]);
        assert!(empty.weights.is_empty() && empty.series.is_none());
    }
}
