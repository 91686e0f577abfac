//! The three externally supplied documents: strategies catalog, performance
//! dataset and changelog. Unknown fields are ignored.

use crate::metrics::MetricsRecord;
use crate::series::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Precomputed equity for one instrument. Same shape as a `PriceSeries`.
pub type EquityEntry = PriceSeries;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyCatalog {
    #[serde(default)]
    pub strategies: Vec<StrategyDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default)]
    pub recommended_compare: Vec<String>,
    #[serde(default)]
    pub best_on: String,
}

impl StrategyDescriptor {
    pub fn trades_on(&self, instrument: &str) -> bool {
        self.instruments.iter().any(|i| i == instrument)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceDataset {
    #[serde(default)]
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub windows: Vec<String>,
    #[serde(default)]
    pub strategies: HashMap<String, StrategyPerformance>,
}

/// Per-strategy seed hints and optional precomputed data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyPerformance {
    pub seed: Option<i64>,
    pub trend: Option<f64>,
    pub vol: Option<f64>,
    /// instrument -> equity
    #[serde(default)]
    pub equity: HashMap<String, EquityEntry>,
    /// instrument -> window token -> metrics
    #[serde(default)]
    pub metrics: HashMap<String, HashMap<String, MetricsRecord>>,
}

impl PerformanceDataset {
    pub fn strategy(&self, strategy_id: &str) -> Option<&StrategyPerformance> {
        self.strategies.get(strategy_id)
    }

    pub fn precomputed_equity(&self, strategy_id: &str, instrument: &str) -> Option<&EquityEntry> {
        self.strategy(strategy_id)?.equity.get(instrument)
    }

    pub fn precomputed_metrics(
        &self,
        strategy_id: &str,
        instrument: &str,
        window_token: &str,
    ) -> Option<&MetricsRecord> {
        self.strategy(strategy_id)?
            .metrics
            .get(instrument)?
            .get(window_token)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub entries: Vec<ChangelogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntry {
    pub date: NaiveDate,
    pub title: String,
    #[serde(default, alias = "description")]
    pub details: String,
    /// The strategy the change concerns, if any.
    #[serde(default)]
    pub strategy_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_lookups_follow_nested_keys() {
        let json = r#"{
            "instruments": [{"symbol": "SPY", "name": "S&P 500"}],
            "windows": ["1M", "1Y", "Max"],
            "strategies": {
                "S001": {
                    "seed": 42,
                    "metrics": {"SPY": {"1Y": {"sharpe": 0.9}}},
                    "equity": {"QQQ": {"dates": ["2024-01-01"], "strategy": [1.0], "benchmark": [1.0]}}
                }
            }
        }"#;
        let ds: PerformanceDataset = serde_json::from_str(json).unwrap();
        assert_eq!(ds.strategy("S001").unwrap().seed, Some(42));
        assert_eq!(ds.precomputed_metrics("S001", "SPY", "1Y").unwrap().sharpe, 0.9);
        assert!(ds.precomputed_metrics("S001", "SPY", "3Y").is_none());
        assert!(ds.precomputed_equity("S001", "QQQ").is_some());
        assert!(ds.precomputed_equity("S002", "QQQ").is_none());
    }

    #[test]
    fn catalog_fields_are_optional_except_identity() {
        let c: StrategyCatalog = serde_json::from_str(
            r#"{"strategies":[{"id":"S001","name":"Trend","instruments":["SPY"],"recommendedCompare":["QQQ"]}]}"#,
        )
        .unwrap();
        let s = &c.strategies[0];
        assert!(s.trades_on("SPY"));
        assert!(!s.trades_on("GLD"));
        assert_eq!(s.recommended_compare, vec!["QQQ".to_string()]);
        assert!(s.tags.is_empty());
    }
}
