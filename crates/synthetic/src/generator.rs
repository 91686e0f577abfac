use crate::normal::standard_normal;
use crate::rng::Mulberry32;
use chrono::{Days, NaiveDate};
use core_types::series::round_dp;
use core_types::PriceSeries;

const TRADING_DAYS: f64 = 252.0;
/// Daily probability of a tail-risk jump.
const JUMP_PROBABILITY: f64 = 0.02;
/// Index levels never fall below this.
const VALUE_FLOOR: f64 = 0.2;
const BENCHMARK_TREND_SHARE: f64 = 0.6;
const BENCHMARK_SHOCK_SHARE: f64 = 0.7;
const VALUE_DECIMALS: i32 = 4;

/// Inputs of one synthetic path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesParams {
    pub seed: i64,
    pub days: usize,
    /// Annualized drift.
    pub trend: f64,
    /// Annualized volatility.
    pub vol: f64,
    /// Per-instrument seed offset, see `instrument_offset`.
    pub instrument_offset: i64,
}

impl SeriesParams {
    pub fn effective_seed(&self) -> i64 {
        self.seed + self.instrument_offset
    }
}

/// Synthesizes a strategy/benchmark pair of `params.days` daily points.
///
/// The first date is `anchor - days`, so the last one is the day before
/// `anchor`. Both paths start at 1.0 before the first step and are floored at
/// 0.2; the benchmark takes 60% of the drift and 70% of each shock and never
/// sees the jumps.
pub fn generate_series(params: &SeriesParams, anchor: NaiveDate) -> PriceSeries {
    let mut rng = Mulberry32::new(params.effective_seed());
    let daily_trend = params.trend / TRADING_DAYS;
    let daily_vol = params.vol / TRADING_DAYS.sqrt();

    let start = anchor
        .checked_sub_days(Days::new(params.days as u64))
        .unwrap_or(NaiveDate::MIN);

    let mut dates = Vec::with_capacity(params.days);
    let mut strategy = Vec::with_capacity(params.days);
    let mut benchmark = Vec::with_capacity(params.days);
    let mut value = 1.0_f64;
    let mut bench = 1.0_f64;

    for date in start.iter_days().take(params.days) {
        let shock = standard_normal(&mut rng) * daily_vol;
        let mut ret = daily_trend + shock;
        if rng.next_f64() < JUMP_PROBABILITY {
            ret -= daily_vol * (1.0 + rng.next_f64());
        }
        value = (value * (1.0 + ret)).max(VALUE_FLOOR);
        bench = (bench
            * (1.0 + daily_trend * BENCHMARK_TREND_SHARE + shock * BENCHMARK_SHOCK_SHARE))
            .max(VALUE_FLOOR);

        dates.push(date);
        strategy.push(round_dp(value, VALUE_DECIMALS));
        benchmark.push(round_dp(bench, VALUE_DECIMALS));
    }

    tracing::debug!(
        seed = params.effective_seed(),
        days = dates.len(),
        "Synthesized price series."
    );

    PriceSeries {
        dates,
        strategy_values: strategy,
        benchmark_values: benchmark,
    }
}
