use crate::error::AnalyticsError;
use crate::report::CorrelationMatrix;
use crate::stats::{is_negligible_variance, mean};
use itertools::Itertools;

/// Pearson correlation of two equal-length return slices.
///
/// Returns `Ok(None)` with fewer than two points or when either side has no
/// variance. Unequal lengths are a caller bug and fail with `LengthMismatch`.
pub fn pearson(a: &[f64], b: &[f64]) -> Result<Option<f64>, AnalyticsError> {
    if a.len() != b.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(aligned_pearson(a, b))
}

fn aligned_pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len();
    if n < 2 {
        return None;
    }
    let (mean_a, mean_b) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let square_a = a.iter().map(|x| x * x).sum::<f64>();
    let square_b = b.iter().map(|y| y * y).sum::<f64>();
    if is_negligible_variance(var_a, square_a) || is_negligible_variance(var_b, square_b) {
        return None;
    }
    let rho = cov / (var_a.sqrt() * var_b.sqrt());
    rho.is_finite().then(|| rho.clamp(-1.0, 1.0))
}

/// Right-aligns two return histories to their common trailing length.
fn common_tail<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = a.len().min(b.len());
    (&a[a.len() - n..], &b[b.len() - n..])
}

/// The pairwise correlation matrix of daily returns, in the order given.
///
/// Each pair is truncated to its shortest common trailing length, so the most
/// recent returns always line up. The diagonal is 1 by definition.
pub fn correlation_matrix(entries: &[(String, Vec<f64>)]) -> CorrelationMatrix {
    let n = entries.len();
    let mut matrix = vec![vec![None; n]; n];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = Some(1.0);
    }
    for (i, j) in (0..n).tuple_combinations() {
        let (a, b) = common_tail(&entries[i].1, &entries[j].1);
        let rho = aligned_pearson(a, b);
        matrix[i][j] = rho;
        matrix[j][i] = rho;
    }

    CorrelationMatrix {
        ids: entries.iter().map(|(id, _)| id.clone()).collect(),
        matrix,
    }
}
