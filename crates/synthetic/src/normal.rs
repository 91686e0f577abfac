use crate::rng::Mulberry32;
use std::f64::consts::PI;

/// One standard-normal sample via the Box-Muller transform.
///
/// Draws `u` until it is non-zero, then `v` until it is non-zero, so the log
/// is always finite. Consumes at least two uniforms from `rng`.
pub fn standard_normal(rng: &mut Mulberry32) -> f64 {
    let mut u = 0.0;
    let mut v = 0.0;
    while u == 0.0 {
        u = rng.next_f64();
    }
    while v == 0.0 {
        v = rng.next_f64();
    }
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_exactly_two_uniforms_when_non_zero() {
        let mut rng = Mulberry32::new(1000);
        let z = standard_normal(&mut rng);
        let expected = (-2.0 * 0.7951949068810791_f64.ln()).sqrt()
            * (2.0 * PI * 0.8276879135519266).cos();
        assert_eq!(z, expected);
        assert_eq!(rng.next_f64(), 0.6915161057841033);
    }

    #[test]
    fn sample_moments_are_roughly_standard() {
        let mut rng = Mulberry32::new(2024);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.05, "var = {var}");
        assert!(samples.iter().all(|x| x.is_finite()));
    }
}
