use serde::{Deserialize, Deserializer, Serialize};

/// The full statistics record for one windowed series.
///
/// This struct is the final output of the `AnalyticsEngine` and also the shape
/// of precomputed metrics in the performance dataset, which is why every field
/// defaults to zero when absent or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsRecord {
    // I. Returns
    #[serde(deserialize_with = "null_as_default")]
    pub total_return: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cagr: f64,

    // II. Risk-adjusted ratios
    #[serde(deserialize_with = "null_as_default")]
    pub sharpe: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sortino: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub calmar: f64,

    // III. Risk
    #[serde(deserialize_with = "null_as_default")]
    pub max_drawdown: f64, // always <= 0
    #[serde(deserialize_with = "null_as_default")]
    pub volatility: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub best_month: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub worst_month: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub ulcer: f64,

    // IV. Activity proxies
    #[serde(deserialize_with = "null_as_default")]
    pub win_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub profit_factor: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub trades: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub turnover: f64,

    // V. Composite
    #[serde(deserialize_with = "null_as_default")]
    pub arena_score: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
