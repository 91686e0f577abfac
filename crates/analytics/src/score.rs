use core_types::MetricsRecord;

const SHARPE_WEIGHT: f64 = 40.0;
const SORTINO_WEIGHT: f64 = 20.0;
const CALMAR_WEIGHT: f64 = 10.0;
const CAGR_WEIGHT: f64 = 100.0;
const DRAWDOWN_PENALTY: f64 = 50.0;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// The Arena Score: a weighted blend of the ratio metrics and CAGR, minus a
/// drawdown penalty, clamped to [0, 100].
///
/// NaN maps to 0; infinities map to the nearest bound.
pub fn arena_score(metrics: &MetricsRecord) -> f64 {
    let raw = SHARPE_WEIGHT * metrics.sharpe
        + SORTINO_WEIGHT * metrics.sortino
        + CALMAR_WEIGHT * metrics.calmar
        + CAGR_WEIGHT * metrics.cagr
        - DRAWDOWN_PENALTY * metrics.max_drawdown.abs();
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn blends_the_documented_coefficients() {
        let m = MetricsRecord {
            sharpe: 1.0,
            sortino: 0.5,
            calmar: 0.2,
            cagr: 0.1,
            max_drawdown: -0.2,
            ..Default::default()
        };
        // 40 + 10 + 2 + 10 - 10
        assert!((arena_score(&m) - 52.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_at_both_ends() {
        let great = MetricsRecord {
            sharpe: 10.0,
            ..Default::default()
        };
        let awful = MetricsRecord {
            max_drawdown: -0.9,
            ..Default::default()
        };
        assert_eq!(arena_score(&great), 100.0);
        assert_eq!(arena_score(&awful), 0.0);
    }

    #[test]
    fn non_finite_inputs_stay_in_bounds() {
        let nan = MetricsRecord {
            sharpe: f64::NAN,
            ..Default::default()
        };
        let inf = MetricsRecord {
            cagr: f64::INFINITY,
            ..Default::default()
        };
        let neg = MetricsRecord {
            calmar: f64::NEG_INFINITY,
            ..Default::default()
        };
        assert_eq!(arena_score(&nan), 0.0);
        assert_eq!(arena_score(&inf), 100.0);
        assert_eq!(arena_score(&neg), 0.0);
    }

    proptest! {
        #[test]
        fn score_is_always_bounded(
            sharpe in proptest::num::f64::ANY,
            sortino in proptest::num::f64::ANY,
            calmar in -1e12f64..1e12,
            cagr in -1e6f64..1e6,
            max_drawdown in -1.0f64..=0.0,
        ) {
            let m = MetricsRecord {
                sharpe,
                sortino,
                calmar,
                cagr,
                max_drawdown,
                ..Default::default()
            };
            let score = arena_score(&m);
            prop_assert!((MIN_SCORE..=MAX_SCORE).contains(&score));
        }
    }
}
