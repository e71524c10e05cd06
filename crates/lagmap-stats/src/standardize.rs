//! Count-weighted standardization of cell mean vectors
//!
//! Standardization is a terminal transform: it overwrites the cell means it
//! is given.

use serde::Serialize;

use crate::cell::CellMeans;

/// Global moments used to standardize a set of cell means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standardization {
    /// Count-weighted mean vector of the raw cell means.
    pub center: Vec<f64>,
    /// Count-weighted standard deviation per dimension, after centering.
    pub scale: Vec<f64>,
    /// Sum of counts over populated cells.
    pub weight: u64,
}

/// Centers and scales `means` in place using count-weighted moments.
///
/// Only cells with a positive count contribute to the moments and only they
/// are centered. Every cell is then divided by the per-dimension scale.
/// Zero-count cells keep their NaN means.
///
/// A zero scale produces NaN or infinite values in that dimension, and a grid
/// without any populated cell produces NaN moments. Both are left visible to
/// the caller.
///
/// # Examples
///
/// ```
/// use lagmap_stats::{
///     cell,
///     grid::{CellAssignment, GridShape},
///     standardize::standardize_cell_means,
/// };
///
/// let shape = GridShape::new(1, 2);
/// let cells = CellAssignment::from_parts(vec![0, 0, 0], vec![0, 0, 1]).unwrap();
/// let mut means = cell::aggregate(shape, &cells, &[&[1.0, 1.0, 4.0]], 0).unwrap();
///
/// let st = standardize_cell_means(&mut means);
/// assert_eq!(st.center, [2.0]);
/// assert_eq!(st.weight, 3);
/// // Weighted variance: (2 * 1 + 1 * 4) / 3 = 2
/// assert!((st.scale[0] - 2.0_f64.sqrt()).abs() < 1e-12);
/// assert!((means.mean(0)[0] + 1.0 / 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn standardize_cell_means(means: &mut CellMeans) -> Standardization {
    let width = means.width();
    let cells = means.shape().len();

    let mut center = vec![0.0; width];
    let mut weight = 0;
    for (_, count, mean) in means.populated() {
        for (c, m) in center.iter_mut().zip(mean) {
            *c += count as f64 * m;
        }
        weight += count;
    }
    if weight == 0 {
        tracing::warn!("no populated cells, standardization yields NaN");
    }
    let total = weight as f64;
    for c in &mut center {
        *c /= total;
    }

    for q in 0..cells {
        if means.count(q) > 0 {
            for (m, c) in means.mean_mut(q).iter_mut().zip(&center) {
                *m -= c;
            }
        }
    }

    let mut scale = vec![0.0; width];
    for (_, count, mean) in means.populated() {
        for (s, m) in scale.iter_mut().zip(mean) {
            *s += count as f64 * m * m;
        }
    }
    for (k, s) in scale.iter_mut().enumerate() {
        *s = (*s / total).sqrt();
        if *s == 0.0 {
            tracing::warn!(dimension = k, "zero variance across populated cells");
        }
    }

    for q in 0..cells {
        for (m, s) in means.mean_mut(q).iter_mut().zip(&scale) {
            *m /= s;
        }
    }

    Standardization {
        center,
        scale,
        weight,
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{
        cell,
        grid::{CellAssignment, GridShape},
    };

    #[expect(clippy::cast_precision_loss)]
    fn weighted_moments(means: &CellMeans) -> (Vec<f64>, Vec<f64>) {
        let width = means.width();
        let mut mean = vec![0.0; width];
        let mut var = vec![0.0; width];
        let mut total = 0.0;
        for (_, count, m) in means.populated() {
            let w = count as f64;
            total += w;
            for k in 0..width {
                mean[k] += w * m[k];
                var[k] += w * m[k] * m[k];
            }
        }
        for k in 0..width {
            mean[k] /= total;
            var[k] /= total;
        }
        (mean, var)
    }

    #[test]
    fn test_weighted_mean_zero_and_variance_one() {
        let mut rng = Pcg32::seed_from_u64(5);
        let shape = GridShape::new(6, 6);
        let n = 1000;
        let rows = (0..n).map(|_| rng.random_range(-1..7)).collect();
        let cols = (0..n).map(|_| rng.random_range(0..6)).collect();
        let cells = CellAssignment::from_parts(rows, cols).unwrap();
        let a = (0..n)
            .map(|_| rng.random_range(10.0..20.0))
            .collect::<Vec<f64>>();
        let b = (0..n)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect::<Vec<f64>>();

        let mut means = cell::aggregate(shape, &cells, &[a.as_slice(), b.as_slice()], 0).unwrap();
        standardize_cell_means(&mut means);

        let (mean, var) = weighted_moments(&means);
        for k in 0..2 {
            assert!(mean[k].abs() < 1e-9, "mean[{k}] = {}", mean[k]);
            assert!((var[k] - 1.0).abs() < 1e-9, "var[{k}] = {}", var[k]);
        }
    }

    #[test]
    fn test_zero_count_cells_stay_nan() {
        let shape = GridShape::new(2, 2);
        let cells = CellAssignment::from_parts(vec![0, 1], vec![0, 1]).unwrap();
        let mut means = cell::aggregate(shape, &cells, &[&[1.0, 3.0]], 0).unwrap();
        standardize_cell_means(&mut means);
        assert!(means.mean(1)[0].is_nan());
        assert!(means.mean(2)[0].is_nan());
        assert!((means.mean(0)[0] + 1.0).abs() < 1e-12);
        assert!((means.mean(3)[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_propagates_nan() {
        let shape = GridShape::new(1, 2);
        let cells = CellAssignment::from_parts(vec![0, 0], vec![0, 1]).unwrap();
        let features: [&[f64]; 2] = [&[2.0, 2.0], &[1.0, 3.0]];
        let mut means = cell::aggregate(shape, &cells, &features, 0).unwrap();
        let st = standardize_cell_means(&mut means);
        assert_eq!(st.scale[0], 0.0);
        assert!(means.mean(0)[0].is_nan());
        assert!(means.mean(1)[0].is_nan());
        assert!((means.mean(0)[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_grid_yields_nan_moments() {
        let shape = GridShape::new(2, 2);
        let cells = CellAssignment::from_parts(vec![-1], vec![0]).unwrap();
        let mut means = cell::aggregate(shape, &cells, &[&[1.0]], 0).unwrap();
        let st = standardize_cell_means(&mut means);
        assert_eq!(st.weight, 0);
        assert!(st.center[0].is_nan());
        assert!(st.scale[0].is_nan());
    }
}
