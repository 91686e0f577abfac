use crate::cache::{SeriesCache, SeriesKey};
use crate::curves::NormalizedCurve;
use crate::error::EngineError;
use analytics::{
    arena_score, correlation_matrix, rolling_metrics, slice_series, AnalyticsEngine,
    CorrelationMatrix, RollingSeries,
};
use analyzer::{Analyzer, LeaderboardRow, RankingQuery};
use chrono::{NaiveDate, Utc};
use configuration::Config;
use core_types::{
    ChangelogEntry, MetricsRecord, PriceSeries, StrategyDescriptor, StrategyPerformance, Window,
};
use dataset::DataRepository;
use portfolio::{blend, risk_parity_weights, PortfolioResult};
use rust_decimal::Decimal;
use std::sync::Arc;
use synthetic::{generate_series, instrument_offset, SeriesParams};

/// The central orchestrator: it resolves series, runs analytics on them and
/// assembles leaderboards, comparisons and portfolios.
///
/// Every operation is a synchronous computation over the loaded documents.
/// The only state that changes after construction is the series cache.
pub struct ArenaEngine {
    // --- Configuration ---
    config: Config,
    anchor: NaiveDate,

    // --- Inputs ---
    repository: DataRepository,

    // --- Components ---
    analytics: AnalyticsEngine,
    analyzer: Analyzer,
    cache: SeriesCache,
}

impl ArenaEngine {
    /// Creates an engine over already loaded documents.
    ///
    /// Synthesized dates count back from `generator.anchor_date`, or from
    /// today (UTC) when it is unset.
    pub fn new(config: Config, repository: DataRepository) -> Self {
        let anchor = config
            .generator
            .anchor_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let analyzer = Analyzer::new(config.leaderboard.clone());

        tracing::info!(
            strategies = repository.strategies().len(),
            anchor = %anchor,
            days = config.generator.days,
            "Arena engine initialized."
        );

        Self {
            config,
            anchor,
            repository,
            analytics: AnalyticsEngine::new(),
            analyzer,
            cache: SeriesCache::new(),
        }
    }

    /// Loads the documents named in `config.data` and builds the engine.
    pub fn load(config: Config) -> Result<Self, EngineError> {
        let repository = DataRepository::load(&config.data)?;
        Ok(Self::new(config, repository))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &DataRepository {
        &self.repository
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor
    }

    pub fn cached_series(&self) -> usize {
        self.cache.len()
    }

    /// The configured default window. Unknown tokens mean `Max`.
    pub fn default_window(&self) -> Window {
        Window::from_token(&self.config.leaderboard.default_window)
    }

    pub fn default_instrument(&self) -> &str {
        self.repository.default_instrument()
    }

    pub fn strategy(&self, strategy_id: &str) -> Result<&StrategyDescriptor, EngineError> {
        self.repository
            .strategy(strategy_id)
            .ok_or_else(|| EngineError::StrategyNotFound(strategy_id.to_string()))
    }

    // ==========================================================================
    // Series
    // ==========================================================================

    /// The full-length series of a strategy on an instrument.
    ///
    /// Precomputed equity wins; otherwise the series is synthesized from the
    /// strategy's seed hints. Either way it is produced once and shared.
    pub fn get_series(&self, strategy_id: &str, instrument: &str) -> Arc<PriceSeries> {
        self.cache
            .get_or_insert_with(SeriesKey::new(strategy_id, instrument), || {
                self.resolve_series(strategy_id, instrument)
            })
    }

    pub fn slice_series(&self, series: &PriceSeries, window: Window) -> PriceSeries {
        slice_series(series, window)
    }

    /// The series of a strategy rebased to start at 1 over a window.
    pub fn normalized_series(
        &self,
        strategy_id: &str,
        instrument: &str,
        window: Window,
    ) -> NormalizedCurve {
        NormalizedCurve::from_series(strategy_id, &self.windowed(strategy_id, instrument, window))
    }

    fn windowed(&self, strategy_id: &str, instrument: &str, window: Window) -> PriceSeries {
        self.slice_series(&self.get_series(strategy_id, instrument), window)
    }

    fn resolve_series(&self, strategy_id: &str, instrument: &str) -> PriceSeries {
        let performance = self.repository.performance().strategy(strategy_id);
        if let Some(equity) = performance.and_then(|p| p.equity.get(instrument)) {
            return equity.clone();
        }

        let params = self.series_params(performance, instrument);
        tracing::debug!(
            strategy = strategy_id,
            instrument,
            seed = params.effective_seed(),
            "No precomputed equity, synthesizing."
        );
        generate_series(&params, self.anchor)
    }

    /// Seed hints from the dataset. Missing or zero hints take the defaults.
    fn series_params(
        &self,
        performance: Option<&StrategyPerformance>,
        instrument: &str,
    ) -> SeriesParams {
        let defaults = &self.config.generator;
        let hint = |pick: fn(&StrategyPerformance) -> Option<f64>, fallback: f64| {
            performance
                .and_then(pick)
                .filter(|v| *v != 0.0 && !v.is_nan())
                .unwrap_or(fallback)
        };

        SeriesParams {
            seed: performance
                .and_then(|p| p.seed)
                .filter(|s| *s != 0)
                .unwrap_or(defaults.default_seed),
            days: defaults.days,
            trend: hint(|p| p.trend, defaults.default_trend),
            vol: hint(|p| p.vol, defaults.default_vol),
            instrument_offset: instrument_offset(instrument),
        }
    }

    // ==========================================================================
    // Metrics & Leaderboards
    // ==========================================================================

    /// Precomputed metrics are returned untouched; otherwise the windowed
    /// series is measured.
    pub fn get_metrics_for(
        &self,
        strategy_id: &str,
        instrument: &str,
        window: Window,
    ) -> MetricsRecord {
        let precomputed = self.repository.performance().precomputed_metrics(
            strategy_id,
            instrument,
            window.token(),
        );
        if let Some(metrics) = precomputed {
            return *metrics;
        }
        self.analytics
            .calculate(&self.windowed(strategy_id, instrument, window))
    }

    /// Catalog-order rows for every strategy trading `instrument`.
    pub fn build_leaderboard(&self, instrument: &str, window: Window) -> Vec<LeaderboardRow> {
        self.repository
            .strategies()
            .iter()
            .filter(|s| s.trades_on(instrument))
            .map(|strategy| {
                let mut metrics = self.get_metrics_for(&strategy.id, instrument, window);
                if metrics.arena_score == 0.0 || metrics.arena_score.is_nan() {
                    metrics.arena_score = arena_score(&metrics);
                }
                LeaderboardRow {
                    strategy: strategy.clone(),
                    metrics,
                }
            })
            .collect()
    }

    pub fn ranked_leaderboard(
        &self,
        instrument: &str,
        window: Window,
        query: &RankingQuery,
    ) -> Vec<LeaderboardRow> {
        self.analyzer
            .rank(self.build_leaderboard(instrument, window), query)
    }

    /// Rebased curves of the `n` best strategies by Arena Score.
    pub fn top_curves(&self, instrument: &str, window: Window, n: usize) -> Vec<NormalizedCurve> {
        let query = RankingQuery {
            top: Some(n),
            ..Default::default()
        };
        self.ranked_leaderboard(instrument, window, &query)
            .iter()
            .map(|row| self.normalized_series(&row.strategy.id, instrument, window))
            .collect()
    }

    // ==========================================================================
    // Comparisons
    // ==========================================================================

    /// Trailing-window statistics. `rolling_window` defaults to the
    /// configured length.
    pub fn rolling_metrics(
        &self,
        strategy_id: &str,
        instrument: &str,
        window: Window,
        rolling_window: Option<usize>,
    ) -> RollingSeries {
        rolling_metrics(
            &self.windowed(strategy_id, instrument, window),
            rolling_window.unwrap_or(self.config.rolling.window),
        )
    }

    pub fn correlation_matrix(
        &self,
        strategy_ids: &[String],
        instrument: &str,
        window: Window,
    ) -> CorrelationMatrix {
        let entries: Vec<(String, Vec<f64>)> = strategy_ids
            .iter()
            .map(|id| {
                let returns = self.windowed(id, instrument, window).strategy_returns();
                (id.clone(), returns)
            })
            .collect();
        correlation_matrix(&entries)
    }

    /// One strategy across several instruments, each rebased to 1.
    ///
    /// An empty instrument list means the strategy's recommended comparisons.
    pub fn compare_instruments(
        &self,
        strategy_id: &str,
        instruments: &[String],
        window: Window,
    ) -> Result<Vec<NormalizedCurve>, EngineError> {
        let strategy = self.strategy(strategy_id)?;
        let instruments: &[String] = if instruments.is_empty() {
            &strategy.recommended_compare
        } else {
            instruments
        };

        Ok(instruments
            .iter()
            .map(|instrument| {
                NormalizedCurve::from_series(
                    instrument.as_str(),
                    &self.windowed(strategy_id, instrument, window),
                )
            })
            .collect())
    }

    // ==========================================================================
    // Portfolios
    // ==========================================================================

    pub fn blend_portfolio(
        &self,
        strategy_ids: &[String],
        weights: &[f64],
        instrument: &str,
        window: Window,
    ) -> PortfolioResult {
        let constituents: Vec<PriceSeries> = strategy_ids
            .iter()
            .map(|id| self.windowed(id, instrument, window))
            .collect();
        blend(&constituents, weights)
    }

    /// Inverse-volatility weights, in percent, from each strategy's metrics.
    pub fn risk_parity_weights(
        &self,
        strategy_ids: &[String],
        instrument: &str,
        window: Window,
    ) -> Vec<Decimal> {
        let volatilities: Vec<Option<f64>> = strategy_ids
            .iter()
            .map(|id| Some(self.get_metrics_for(id, instrument, window).volatility))
            .collect();
        risk_parity_weights(&volatilities)
    }

    // ==========================================================================
    // Catalog
    // ==========================================================================

    pub fn search_strategies(&self, query: &str, tags: &[String]) -> Vec<&StrategyDescriptor> {
        self.repository.search_strategies(query, tags)
    }

    pub fn unique_tags(&self) -> Vec<String> {
        self.repository.unique_tags()
    }

    pub fn changelog(&self, limit: Option<usize>) -> &[ChangelogEntry] {
        self.repository.changelog(limit)
    }
}
