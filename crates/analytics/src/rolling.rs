use crate::report::RollingSeries;
use crate::stats::{annualization, is_negligible_variance};
use core_types::PriceSeries;

/// Running sums over a sliding window of (strategy, benchmark) return pairs.
///
/// Push/pop are O(1), so a full pass over N returns is O(N) regardless of the
/// window length.
#[derive(Debug, Default)]
struct SlidingMoments {
    count: usize,
    sum_s: f64,
    sum_b: f64,
    sum_ss: f64,
    sum_bb: f64,
    sum_sb: f64,
}

impl SlidingMoments {
    #[inline]
    fn push(&mut self, s: f64, b: f64) {
        self.count += 1;
        self.sum_s += s;
        self.sum_b += b;
        self.sum_ss += s * s;
        self.sum_bb += b * b;
        self.sum_sb += s * b;
    }

    #[inline]
    fn pop(&mut self, s: f64, b: f64) {
        self.count -= 1;
        self.sum_s -= s;
        self.sum_b -= b;
        self.sum_ss -= s * s;
        self.sum_bb -= b * b;
        self.sum_sb -= s * b;
    }

    /// Population variance, snapped to zero when it is only round-off.
    fn variance(&self, sum: f64, sum_sq: f64) -> f64 {
        let n = self.count as f64;
        let mean = sum / n;
        let mean_square = sum_sq / n;
        let variance = mean_square - mean * mean;
        if is_negligible_variance(variance, mean_square) {
            0.0
        } else {
            variance
        }
    }

    fn sharpe_and_volatility(&self) -> (f64, f64) {
        let variance = self.variance(self.sum_s, self.sum_ss);
        if variance == 0.0 {
            return (0.0, 0.0);
        }
        let std_dev = variance.sqrt();
        let mean = self.sum_s / self.count as f64;
        (
            mean / std_dev * annualization(),
            std_dev * annualization(),
        )
    }

    fn beta(&self) -> f64 {
        let bench_variance = self.variance(self.sum_b, self.sum_bb);
        if bench_variance == 0.0 {
            return 0.0;
        }
        let n = self.count as f64;
        let covariance = self.sum_sb / n - (self.sum_s / n) * (self.sum_b / n);
        covariance / bench_variance
    }
}

/// Trailing-window Sharpe, annualized volatility and beta against the
/// benchmark, recomputed at every return.
///
/// Index `i` (aligned with `series.dates[i + 1]`) is defined once `window`
/// returns are available, i.e. for `i >= window - 1`. A window of 0 is
/// treated as 1.
pub fn rolling_metrics(series: &PriceSeries, window: usize) -> RollingSeries {
    let window = window.max(1);
    let strategy = series.strategy_returns();
    let benchmark = series.benchmark_returns();
    let n = strategy.len().min(benchmark.len());

    let mut out = RollingSeries {
        labels: series.dates.iter().skip(1).take(n).copied().collect(),
        sharpe: Vec::with_capacity(n),
        volatility: Vec::with_capacity(n),
        beta: Vec::with_capacity(n),
    };

    let mut moments = SlidingMoments::default();
    for i in 0..n {
        moments.push(strategy[i], benchmark[i]);
        if i >= window {
            moments.pop(strategy[i - window], benchmark[i - window]);
        }

        if i + 1 >= window {
            let (sharpe, volatility) = moments.sharpe_and_volatility();
            out.sharpe.push(Some(sharpe));
            out.volatility.push(Some(volatility));
            out.beta.push(Some(moments.beta()));
        } else {
            out.sharpe.push(None);
            out.volatility.push(None);
            out.beta.push(None);
        }
    }

    tracing::trace!(points = n, window, "Computed rolling metrics.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{mean, std_dev};
    use chrono::NaiveDate;

    fn series(strategy: Vec<f64>, benchmark: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let dates = start.iter_days().take(strategy.len()).collect();
        PriceSeries::new(dates, strategy, benchmark).unwrap()
    }

    fn wavy(n: usize, phase: f64, amp: f64) -> Vec<f64> {
        let mut v = 1.0;
        (0..n)
            .map(|i| {
                v *= 1.0 + amp * ((i as f64 * 0.7 + phase).sin() + 0.1);
                v
            })
            .collect()
    }

    #[test]
    fn labels_skip_first_date_and_prefix_is_undefined() {
        let s = series(wavy(30, 0.0, 0.01), wavy(30, 1.0, 0.01));
        let r = rolling_metrics(&s, 10);
        assert_eq!(r.len(), 29);
        assert_eq!(r.labels[0], s.dates[1]);
        assert!(r.sharpe[..9].iter().all(Option::is_none));
        assert!(r.beta[..9].iter().all(Option::is_none));
        assert_eq!(r.first_defined(), Some(9));
        assert!(r.volatility[9..].iter().all(Option::is_some));
    }

    #[test]
    fn matches_naive_recomputation() {
        let s = series(wavy(400, 0.3, 0.02), wavy(400, 2.0, 0.015));
        let w = 63;
        let r = rolling_metrics(&s, w);
        let rs = s.strategy_returns();
        let rb = s.benchmark_returns();
        for i in (w - 1)..rs.len() {
            let ws = &rs[i + 1 - w..=i];
            let wb = &rb[i + 1 - w..=i];
            let sd = std_dev(ws);
            let expected_sharpe = mean(ws) / sd * annualization();
            let mb = mean(wb);
            let ms = mean(ws);
            let cov = ws.iter().zip(wb).map(|(a, b)| (a - ms) * (b - mb)).sum::<f64>() / w as f64;
            let expected_beta = cov / std_dev(wb).powi(2);

            assert!((r.sharpe[i].unwrap() - expected_sharpe).abs() < 1e-6);
            assert!((r.volatility[i].unwrap() - sd * annualization()).abs() < 1e-9);
            assert!((r.beta[i].unwrap() - expected_beta).abs() < 1e-6);
        }
    }

    #[test]
    fn flat_benchmark_has_zero_beta() {
        let s = series(wavy(20, 0.0, 0.01), vec![1.0; 20]);
        let r = rolling_metrics(&s, 5);
        assert!(r.beta[4..].iter().all(|b| *b == Some(0.0)));
    }

    #[test]
    fn identical_paths_have_unit_beta() {
        let path = wavy(50, 0.5, 0.01);
        let r = rolling_metrics(&series(path.clone(), path), 20);
        for b in r.beta.iter().flatten() {
            assert!((b - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn window_longer_than_series_is_all_undefined() {
        let s = series(wavy(10, 0.0, 0.01), wavy(10, 0.0, 0.01));
        let r = rolling_metrics(&s, 252);
        assert_eq!(r.len(), 9);
        assert_eq!(r.first_defined(), None);
    }

    #[test]
    fn empty_and_single_point_series() {
        assert!(rolling_metrics(&PriceSeries::default(), 5).is_empty());
        assert!(rolling_metrics(&series(vec![1.0], vec![1.0]), 1).is_empty());
    }
}
