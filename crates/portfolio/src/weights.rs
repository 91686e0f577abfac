use rust_decimal::prelude::*;

/// Negative, NaN and infinite raw weights count as zero.
pub(crate) fn clamp_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 { weight } else { 0.0 }
}

/// Scales raw weights to sum to 1.
///
/// Invalid entries are clamped to 0 first. When nothing positive remains, every
/// constituent gets an equal share.
pub fn normalize_weights(raw: &[f64]) -> Vec<f64> {
    if raw.is_empty() {
        return Vec::new();
    }
    let clamped: Vec<f64> = raw.iter().copied().map(clamp_weight).collect();
    let total: f64 = clamped.iter().sum();
    if total == 0.0 {
        let equal = 1.0 / raw.len() as f64;
        return vec![equal; raw.len()];
    }
    clamped.into_iter().map(|w| w / total).collect()
}

/// Inverse-volatility weights as percentages rounded to one decimal.
///
/// A missing, zero or non-finite volatility gets a raw weight of 0; if no
/// constituent has a usable volatility the result is equal-weighted.
pub fn risk_parity_weights(volatilities: &[Option<f64>]) -> Vec<Decimal> {
    let raw: Vec<f64> = volatilities
        .iter()
        .map(|vol| match vol {
            Some(v) if v.is_finite() && *v > 0.0 => 1.0 / v,
            _ => 0.0,
        })
        .collect();

    normalize_weights(&raw)
        .into_iter()
        .map(|w| {
            Decimal::from_f64(w * 100.0)
                .unwrap_or_default()
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn inverse_volatility_split() {
        let w = risk_parity_weights(&[Some(0.1), Some(0.2)]);
        assert_eq!(w, vec![dec!(66.7), dec!(33.3)]);
    }

    #[test]
    fn unusable_volatilities_get_nothing() {
        let w = risk_parity_weights(&[Some(0.2), None, Some(0.0), Some(f64::NAN)]);
        assert_eq!(w, vec![dec!(100.0), dec!(0.0), dec!(0.0), dec!(0.0)]);
    }

    #[test]
    fn no_usable_volatility_falls_back_to_equal() {
        let w = risk_parity_weights(&[None, Some(0.0)]);
        assert_eq!(w, vec![dec!(50.0), dec!(50.0)]);
    }

    #[test]
    fn negatives_are_clamped_before_normalizing() {
        assert_eq!(normalize_weights(&[3.0, -5.0, 1.0]), vec![0.75, 0.0, 0.25]);
    }

    #[test]
    fn all_zero_weights_become_equal() {
        assert_eq!(normalize_weights(&[0.0, 0.0, -1.0, 0.0]), vec![0.25; 4]);
        assert!(normalize_weights(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn positive_sum_vectors_normalize_to_one(
            raw in prop::collection::vec(-10.0f64..10.0, 1..12),
        ) {
            let w = normalize_weights(&raw);
            prop_assert_eq!(w.len(), raw.len());
            prop_assert!(w.iter().all(|x| *x >= 0.0));
            prop_assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}
