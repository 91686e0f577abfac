use crate::score::arena_score;
use crate::stats::{self, annualization, finite_or_zero};
use core_types::{MetricsRecord, PriceSeries};

/// Days per year used to turn elapsed calendar time into years.
const DAYS_PER_YEAR: f64 = 365.25;
/// The trade-count proxy never drops below this.
const MIN_TRADES: u32 = 6;
/// One proxy "trade" per this many daily returns.
const RETURNS_PER_TRADE: f64 = 8.0;

/// A stateless calculator for deriving performance metrics from a price series.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `series` - An already windowed series. Only the strategy values and
    ///   dates are used.
    ///
    /// # Returns
    ///
    /// A complete `MetricsRecord`, including the Arena Score. Empty and
    /// single-point series yield zeros (the trade proxy still reports its
    /// floor of 6).
    pub fn calculate(&self, series: &PriceSeries) -> MetricsRecord {
        let mut report = MetricsRecord::default();
        let returns = series.strategy_returns();

        self.calculate_returns(series, &mut report);
        self.calculate_ratios(&returns, &mut report);
        self.calculate_drawdown(&series.strategy_values, &mut report);
        self.calculate_monthly(series, &mut report);
        self.calculate_activity(&returns, &mut report);

        report.arena_score = arena_score(&report);
        report
    }

    /// Total return and CAGR over the elapsed calendar time.
    fn calculate_returns(&self, series: &PriceSeries, report: &mut MetricsRecord) {
        let values = &series.strategy_values;
        if values.len() > 1 {
            report.total_return = finite_or_zero(values[values.len() - 1] / values[0] - 1.0);
        }

        let years = match (series.dates.first(), series.dates.last()) {
            (Some(first), Some(last)) => (*last - *first).num_days() as f64 / DAYS_PER_YEAR,
            _ => 0.0,
        };
        if years > 0.0 {
            report.cagr = finite_or_zero((1.0 + report.total_return).powf(1.0 / years) - 1.0);
        }
    }

    /// Volatility, Sharpe and Sortino (risk-free rate of zero).
    fn calculate_ratios(&self, returns: &[f64], report: &mut MetricsRecord) {
        let mean = stats::mean(returns);
        let std_dev = stats::std_dev(returns);

        report.volatility = std_dev * annualization();
        if std_dev > 0.0 {
            report.sharpe = finite_or_zero(mean / std_dev * annualization());
        }

        let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let downside_dev = stats::std_dev(&downside);
        if !downside.is_empty() && downside_dev > 0.0 {
            report.sortino = finite_or_zero(mean / downside_dev * annualization());
        }
    }

    /// Max drawdown, Calmar and the Ulcer index.
    ///
    /// Must run after `calculate_returns`, since Calmar needs the CAGR.
    fn calculate_drawdown(&self, values: &[f64], report: &mut MetricsRecord) {
        report.max_drawdown = finite_or_zero(stats::max_drawdown(values)).max(-1.0);
        if report.max_drawdown != 0.0 {
            report.calmar = finite_or_zero(report.cagr / report.max_drawdown.abs());
        }
        report.ulcer = finite_or_zero(stats::ulcer_index(values));
    }

    fn calculate_monthly(&self, series: &PriceSeries, report: &mut MetricsRecord) {
        let months = stats::monthly_returns(&series.dates, &series.strategy_values);
        if months.is_empty() {
            return;
        }
        report.best_month = finite_or_zero(months.iter().copied().fold(f64::MIN, f64::max));
        report.worst_month = finite_or_zero(months.iter().copied().fold(f64::MAX, f64::min));
    }

    /// Win rate, profit factor and the trade/turnover proxies.
    ///
    /// `trades` is an activity proxy derived from the return count, not a
    /// detected trade count; rankings are calibrated to this exact formula.
    fn calculate_activity(&self, returns: &[f64], report: &mut MetricsRecord) {
        let n = returns.len();
        if n > 0 {
            report.win_rate = returns.iter().filter(|r| **r > 0.0).count() as f64 / n as f64;
        }
        report.profit_factor = finite_or_zero(stats::profit_factor(returns));
        report.trades = MIN_TRADES.max((n as f64 / RETURNS_PER_TRADE).round() as u32);
        if n > 0 {
            report.turnover = f64::from(report.trades) / n as f64;
        }
    }
}
