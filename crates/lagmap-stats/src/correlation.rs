//! Covariance to correlation conversion and direction normalization
//!
//! Matrices are flattened `dim x dim` slices in row-major order.
//!
//! Degenerate inputs are not guarded: a zero diagonal entry or a direction
//! with a non-positive quadratic form yields NaN or infinite values, which the
//! caller is expected to inspect. [`to_correlation_strict`] is the fail-fast
//! variant for callers that prefer an error.

use crate::error::StatsError;

fn check_square(matrix: &[f64], dim: usize) -> Result<(), StatsError> {
    if dim.checked_mul(dim) == Some(matrix.len()) {
        Ok(())
    } else {
        Err(StatsError::MatrixShape {
            dim,
            len: matrix.len(),
        })
    }
}

/// Converts a covariance matrix into a correlation matrix.
///
/// Entry `(i, j)` becomes `cov[i, j] / sqrt(cov[i, i] * cov[j, j])`.
/// Non-positive diagonal entries propagate as NaN or infinity.
///
/// # Examples
///
/// ```
/// use lagmap_stats::correlation::to_correlation;
///
/// let cov = [4.0, 2.0, 2.0, 9.0];
/// let cor = to_correlation(&cov, 2).unwrap();
/// assert_eq!(cor, [1.0, 2.0 / 6.0, 2.0 / 6.0, 1.0]);
/// ```
pub fn to_correlation(cov: &[f64], dim: usize) -> Result<Vec<f64>, StatsError> {
    check_square(cov, dim)?;
    let sd = (0..dim).map(|i| cov[i * dim + i].sqrt()).collect::<Vec<_>>();
    let cor = cov
        .iter()
        .enumerate()
        .map(|(k, &v)| v / (sd[k / dim] * sd[k % dim]))
        .collect();
    Ok(cor)
}

/// Same as [`to_correlation`], but rejects a non-positive diagonal.
pub fn to_correlation_strict(cov: &[f64], dim: usize) -> Result<Vec<f64>, StatsError> {
    check_square(cov, dim)?;
    for index in 0..dim {
        let value = cov[index * dim + index];
        if value <= 0.0 || value.is_nan() {
            return Err(StatsError::NonPositiveDiagonal { index, value });
        }
    }
    to_correlation(cov, dim)
}

/// Quadratic form `sum_i sum_j v[i] * v[j] * m[i, j]`.
///
/// Only the lower triangle of `matrix` is read: off-diagonal terms are
/// counted twice, diagonal terms once. For a symmetric matrix this equals the
/// full double sum.
pub fn quadratic_form(vec: &[f64], matrix: &[f64]) -> Result<f64, StatsError> {
    let dim = vec.len();
    check_square(matrix, dim)?;
    let mut q = 0.0;
    for i in 0..dim {
        for j in 0..=i {
            let u = vec[i] * vec[j] * matrix[i * dim + j];
            q += if i == j { u } else { 2.0 * u };
        }
    }
    Ok(q)
}

/// Rescales `vec` in place so that its quadratic form under `cov` is 1.
///
/// Returns the quadratic form measured before rescaling. When it is zero or
/// negative the vector is filled with infinite or NaN values.
///
/// # Examples
///
/// ```
/// use lagmap_stats::correlation::normalize_direction;
///
/// let cov = [4.0, 0.0, 0.0, 1.0];
/// let mut dir = [1.0, 0.0];
/// let q = normalize_direction(&mut dir, &cov).unwrap();
/// assert_eq!(q, 4.0);
/// assert_eq!(dir, [0.5, 0.0]);
/// ```
pub fn normalize_direction(vec: &mut [f64], cov: &[f64]) -> Result<f64, StatsError> {
    let q = quadratic_form(vec, cov)?;
    let scale = q.sqrt().recip();
    for v in vec.iter_mut() {
        *v *= scale;
    }
    Ok(q)
}
