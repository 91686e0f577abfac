use chrono::NaiveDate;
use core_types::PriceSeries;
use serde::Serialize;

/// A strategy path rebased to start at 1, for overlaying curves of
/// different scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedCurve {
    pub label: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl NormalizedCurve {
    pub fn from_series(label: impl Into<String>, series: &PriceSeries) -> Self {
        Self {
            label: label.into(),
            dates: series.dates.clone(),
            values: normalize_values(&series.strategy_values),
        }
    }
}

/// Divides every value by the first one. A missing, zero or non-finite first
/// value rebases by 1.
pub fn normalize_values(values: &[f64]) -> Vec<f64> {
    let base = match values.first() {
        Some(v) if *v != 0.0 && v.is_finite() => *v,
        _ => 1.0,
    };
    values.iter().map(|v| v / base).collect()
}
