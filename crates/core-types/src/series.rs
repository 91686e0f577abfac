use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A daily strategy/benchmark index pair.
///
/// The three vectors always have the same length. Values are compounding index
/// levels, not returns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSeries {
    pub dates: Vec<NaiveDate>,
    #[serde(alias = "strategy")]
    pub strategy_values: Vec<f64>,
    #[serde(alias = "benchmark")]
    pub benchmark_values: Vec<f64>,
}

impl PriceSeries {
    /// Builds a series, rejecting arrays of different lengths.
    pub fn new(
        dates: Vec<NaiveDate>,
        strategy_values: Vec<f64>,
        benchmark_values: Vec<f64>,
    ) -> Result<Self, CoreError> {
        let series = Self {
            dates,
            strategy_values,
            benchmark_values,
        };
        series.validate()?;
        Ok(series)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let n = self.dates.len();
        if self.strategy_values.len() != n || self.benchmark_values.len() != n {
            return Err(CoreError::LengthMismatch {
                dates: n,
                strategy: self.strategy_values.len(),
                benchmark: self.benchmark_values.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The contiguous suffix starting at `start` (clamped to the length).
    pub fn suffix(&self, start: usize) -> PriceSeries {
        let start = start.min(self.len());
        PriceSeries {
            dates: self.dates[start..].to_vec(),
            strategy_values: self.strategy_values[start..].to_vec(),
            benchmark_values: self.benchmark_values[start..].to_vec(),
        }
    }

    /// The trailing `n` points (the whole series when shorter).
    pub fn tail(&self, n: usize) -> PriceSeries {
        self.suffix(self.len().saturating_sub(n))
    }

    /// Daily simple returns of the strategy values.
    pub fn strategy_returns(&self) -> Vec<f64> {
        pct_change(&self.strategy_values)
    }

    /// Daily simple returns of the benchmark values.
    pub fn benchmark_returns(&self) -> Vec<f64> {
        pct_change(&self.benchmark_values)
    }
}

/// Ratio of consecutive values minus one. Empty for fewer than two values.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Rounds half away from zero to `digits` decimal places.
pub fn round_dp(value: f64, digits: i32) -> f64 {
    let factor = 10_f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let result = PriceSeries::new(vec![day(1), day(2)], vec![1.0], vec![1.0, 1.0]);
        assert!(matches!(result, Err(CoreError::LengthMismatch { .. })));
    }

    #[test]
    fn tail_and_suffix_keep_arrays_aligned() {
        let s = PriceSeries::new(
            vec![day(1), day(2), day(3)],
            vec![1.0, 2.0, 3.0],
            vec![1.0, 1.5, 2.0],
        )
        .unwrap();
        let t = s.tail(2);
        assert_eq!(t.dates, vec![day(2), day(3)]);
        assert_eq!(t.strategy_values, vec![2.0, 3.0]);
        assert_eq!(t.benchmark_values, vec![1.5, 2.0]);
        assert_eq!(s.tail(10), s);
        assert!(s.suffix(7).is_empty());
    }

    #[test]
    fn reads_dataset_field_names() {
        let json = r#"{"dates":["2024-01-01","2024-01-02"],"strategy":[1.0,1.1],"benchmark":[1.0,1.05]}"#;
        let s: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(s.strategy_values, vec![1.0, 1.1]);
        assert_eq!(s.benchmark_values, vec![1.0, 1.05]);
        assert_eq!(s.dates[1], day(2));
    }

    #[test]
    fn rounds_to_four_places() {
        assert_eq!(round_dp(1.234_56, 4), 1.2346);
        assert_eq!(round_dp(0.999_96, 4), 1.0);
    }

    #[test]
    fn pct_change_of_short_inputs_is_empty() {
        assert!(pct_change(&[]).is_empty());
        assert!(pct_change(&[1.0]).is_empty());
        assert_eq!(pct_change(&[2.0, 1.0]), vec![-0.5]);
    }
}
