use crate::error::AnalyzerError;
use configuration::LeaderboardSettings;
use core_types::{MetricsRecord, StrategyDescriptor};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub mod error;

/// One strategy's standing on a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub strategy: StrategyDescriptor,
    pub metrics: MetricsRecord,
}

/// The metric a leaderboard is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingKey {
    #[default]
    Score,
    TotalReturn,
    Cagr,
    Sharpe,
    Sortino,
    Calmar,
    MaxDrawdown,
    Volatility,
    WinRate,
    ProfitFactor,
    Ulcer,
}

impl RankingKey {
    pub fn value(&self, m: &MetricsRecord) -> f64 {
        match self {
            RankingKey::Score => m.arena_score,
            RankingKey::TotalReturn => m.total_return,
            RankingKey::Cagr => m.cagr,
            RankingKey::Sharpe => m.sharpe,
            RankingKey::Sortino => m.sortino,
            RankingKey::Calmar => m.calmar,
            RankingKey::MaxDrawdown => m.max_drawdown,
            RankingKey::Volatility => m.volatility,
            RankingKey::WinRate => m.win_rate,
            RankingKey::ProfitFactor => m.profit_factor,
            RankingKey::Ulcer => m.ulcer,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankingKey::Score => "score",
            RankingKey::TotalReturn => "totalReturn",
            RankingKey::Cagr => "cagr",
            RankingKey::Sharpe => "sharpe",
            RankingKey::Sortino => "sortino",
            RankingKey::Calmar => "calmar",
            RankingKey::MaxDrawdown => "maxDrawdown",
            RankingKey::Volatility => "volatility",
            RankingKey::WinRate => "winRate",
            RankingKey::ProfitFactor => "profitFactor",
            RankingKey::Ulcer => "ulcer",
        }
    }
}

impl FromStr for RankingKey {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "score" | "arenaScore" => RankingKey::Score,
            "totalReturn" => RankingKey::TotalReturn,
            "cagr" => RankingKey::Cagr,
            "sharpe" => RankingKey::Sharpe,
            "sortino" => RankingKey::Sortino,
            "calmar" => RankingKey::Calmar,
            "maxDrawdown" => RankingKey::MaxDrawdown,
            "volatility" => RankingKey::Volatility,
            "winRate" => RankingKey::WinRate,
            "profitFactor" => RankingKey::ProfitFactor,
            "ulcer" => RankingKey::Ulcer,
            other => return Err(AnalyzerError::UnknownMetric(other.to_string())),
        };
        Ok(key)
    }
}

impl fmt::Display for RankingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AnalyzerError::UnknownDirection(other.to_string())),
        }
    }
}

/// How a caller wants a leaderboard cut and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RankingQuery {
    pub key: RankingKey,
    pub direction: SortDirection,
    /// Drop rows below the configured minimum trade proxy.
    pub apply_threshold: bool,
    /// Overrides the configured top-N.
    pub top: Option<usize>,
}

/// Filters, orders and truncates leaderboard rows.
pub struct Analyzer {
    config: LeaderboardSettings,
}

impl Analyzer {
    pub fn new(config: LeaderboardSettings) -> Self {
        Self { config }
    }

    pub fn rank(&self, rows: Vec<LeaderboardRow>, query: &RankingQuery) -> Vec<LeaderboardRow> {
        // 1. Filter
        let mut ranked = if query.apply_threshold {
            self.filter_rows(rows)
        } else {
            rows
        };

        // 2. Rank (stable, so catalog order breaks ties)
        ranked.sort_by(|a, b| {
            let ordering = query
                .key
                .value(&a.metrics)
                .partial_cmp(&query.key.value(&b.metrics))
                .unwrap_or(Ordering::Equal);
            match query.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        // 3. Truncate
        ranked.truncate(query.top.unwrap_or(self.config.top));
        ranked
    }

    /// Applies the minimum-trades policy threshold.
    fn filter_rows(&self, rows: Vec<LeaderboardRow>) -> Vec<LeaderboardRow> {
        let before = rows.len();
        let kept: Vec<LeaderboardRow> = rows
            .into_iter()
            .filter(|r| r.metrics.trades >= self.config.min_trades)
            .collect();
        tracing::debug!(
            before,
            after = kept.len(),
            min_trades = self.config.min_trades,
            "Applied leaderboard trade threshold."
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, score: f64, drawdown: f64, trades: u32) -> LeaderboardRow {
        LeaderboardRow {
            strategy: StrategyDescriptor {
                id: id.to_string(),
                name: id.to_string(),
                summary: String::new(),
                tags: vec![],
                instruments: vec!["SPY".to_string()],
                recommended_compare: vec![],
                best_on: String::new(),
            },
            metrics: MetricsRecord {
                arena_score: score,
                max_drawdown: drawdown,
                trades,
                ..Default::default()
            },
        }
    }

    fn ids(rows: &[LeaderboardRow]) -> Vec<&str> {
        rows.iter().map(|r| r.strategy.id.as_str()).collect()
    }

    fn rows() -> Vec<LeaderboardRow> {
        vec![
            row("A", 40.0, -0.30, 10),
            row("B", 80.0, -0.10, 50),
            row("C", 60.0, -0.05, 25),
            row("D", 60.0, -0.20, 30),
        ]
    }

    #[test]
    fn default_query_ranks_by_score_descending_with_stable_ties() {
        let ranked =
            Analyzer::new(LeaderboardSettings::default()).rank(rows(), &RankingQuery::default());
        assert_eq!(ids(&ranked), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn threshold_uses_configured_minimum() {
        let query = RankingQuery {
            apply_threshold: true,
            ..Default::default()
        };
        let ranked = Analyzer::new(LeaderboardSettings::default()).rank(rows(), &query);
        assert_eq!(ids(&ranked), vec!["B", "C", "D"]);

        let strict = LeaderboardSettings {
            min_trades: 30,
            ..Default::default()
        };
        let ranked = Analyzer::new(strict).rank(rows(), &query);
        assert_eq!(ids(&ranked), vec!["B", "D"]);
    }

    #[test]
    fn ascending_drawdown_puts_deepest_first() {
        let query = RankingQuery {
            key: RankingKey::MaxDrawdown,
            direction: SortDirection::Asc,
            ..Default::default()
        };
        let ranked = Analyzer::new(LeaderboardSettings::default()).rank(rows(), &query);
        assert_eq!(ids(&ranked), vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn top_n_truncates() {
        let query = RankingQuery {
            top: Some(2),
            ..Default::default()
        };
        let ranked = Analyzer::new(LeaderboardSettings::default()).rank(rows(), &query);
        assert_eq!(ids(&ranked), vec!["B", "C"]);
    }

    #[test]
    fn parses_keys_and_directions() {
        assert_eq!("maxDrawdown".parse::<RankingKey>(), Ok(RankingKey::MaxDrawdown));
        assert_eq!("arenaScore".parse::<RankingKey>(), Ok(RankingKey::Score));
        assert!("alpha".parse::<RankingKey>().is_err());
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("up".parse::<SortDirection>().is_err());
    }
}
