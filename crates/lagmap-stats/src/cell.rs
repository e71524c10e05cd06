//! Per-cell aggregation of lagged feature columns
//!
//! Every in-bounds observation adds its feature values to the running sums of
//! its cell. The observation counter of a cell is driven by one designated
//! *count feature*, passed explicitly, so each in-bounds observation is
//! counted exactly once however many features are tracked.
//!
//! Aggregation is a pure reduction. [`aggregate_par`] splits the observations
//! into chunks, folds each chunk into a private [`CellAccumulator`] and merges
//! the accumulators by elementwise addition.
//!
//! # Zero-count cells
//!
//! The mean of a cell that received no observation is `0 / 0`, i.e. NaN.
//! Check [`CellMeans::count`] before using [`CellMeans::mean`].
//!
//! # Examples
//!
//! ```
//! use lagmap_stats::{
//!     cell,
//!     grid::{CellAssignment, GridShape},
//! };
//!
//! let shape = GridShape::new(2, 2);
//! let cells = CellAssignment::from_parts(vec![0, 0, 1, 5], vec![0, 0, 1, 0]).unwrap();
//! let speed = [10.0, 20.0, 30.0, 40.0];
//! let range = [1.0, 3.0, 5.0, 7.0];
//!
//! let means = cell::aggregate(shape, &cells, &[&speed, &range], 0).unwrap();
//! assert_eq!(means.count(0), 2);
//! assert_eq!(means.mean(0), [15.0, 2.0]);
//! assert_eq!(means.count(3), 1);
//! assert_eq!(means.total_count(), 3);
//! assert!(means.mean(1)[0].is_nan());
//! ```

use std::ops::Range;

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::{StatsError, check_len},
    grid::{CellAssignment, GridShape},
};

/// Running per-cell sums and observation counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CellAccumulator {
    shape: GridShape,
    width: usize,
    sums: Vec<f64>,
    counts: Vec<u64>,
}

impl CellAccumulator {
    /// Creates an empty accumulator tracking `width` features per cell.
    #[must_use]
    pub fn new(shape: GridShape, width: usize) -> Self {
        Self {
            shape,
            width,
            sums: vec![0.0; shape.len() * width],
            counts: vec![0; shape.len()],
        }
    }

    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Adds one chunk of observations.
    ///
    /// `features` holds one column per tracked feature, each aligned with
    /// `cells`. Only `features[count_feature]` increments the cell counters.
    pub fn accumulate(
        &mut self,
        cells: &CellAssignment,
        features: &[&[f64]],
        count_feature: usize,
    ) -> Result<(), StatsError> {
        check_inputs(self.width, cells, features, count_feature)?;
        self.accumulate_range(cells, features, count_feature, 0..cells.len());
        Ok(())
    }

    fn accumulate_range(
        &mut self,
        cells: &CellAssignment,
        features: &[&[f64]],
        count_feature: usize,
        range: Range<usize>,
    ) {
        let rows = &cells.rows[range.clone()];
        let cols = &cells.cols[range.clone()];
        for (k, feature) in features.iter().enumerate() {
            let values = &feature[range.clone()];
            for ((&row, &col), &v) in rows.iter().zip(cols).zip(values) {
                let Some(q) = self.shape.cell_index(row, col) else {
                    continue;
                };
                self.sums[q * self.width + k] += v;
                if k == count_feature {
                    self.counts[q] += 1;
                }
            }
        }
    }

    /// Combines two partial accumulators over disjoint observations.
    pub fn merge(self, other: &Self) -> Result<Self, StatsError> {
        if self.shape != other.shape || self.width != other.width {
            return Err(StatsError::GridShapeMismatch);
        }
        Ok(self.merge_unchecked(other))
    }

    fn merge_unchecked(mut self, other: &Self) -> Self {
        for (a, b) in self.sums.iter_mut().zip(&other.sums) {
            *a += b;
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self
    }

    /// Divides every cell's sums by its count.
    ///
    /// Cells with a zero count end up with NaN means.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn into_means(self) -> CellMeans {
        let Self {
            shape,
            width,
            mut sums,
            counts,
        } = self;
        if width > 0 {
            for (cell, &count) in sums.chunks_exact_mut(width).zip(&counts) {
                let n = count as f64;
                for v in cell {
                    *v /= n;
                }
            }
        }
        CellMeans {
            shape,
            width,
            means: sums,
            counts,
        }
    }
}

fn check_inputs(
    width: usize,
    cells: &CellAssignment,
    features: &[&[f64]],
    count_feature: usize,
) -> Result<(), StatsError> {
    check_len("feature columns", width, features.len())?;
    if count_feature >= width {
        return Err(StatsError::FeatureIndexOutOfRange {
            index: count_feature,
            width,
        });
    }
    for feature in features {
        check_len("feature observations", cells.len(), feature.len())?;
    }
    Ok(())
}

/// Aggregates all observations sequentially and returns per-cell means.
pub fn aggregate(
    shape: GridShape,
    cells: &CellAssignment,
    features: &[&[f64]],
    count_feature: usize,
) -> Result<CellMeans, StatsError> {
    let mut acc = CellAccumulator::new(shape, features.len());
    acc.accumulate(cells, features, count_feature)?;
    Ok(acc.into_means())
}

/// Parallel variant of [`aggregate`].
///
/// Observations are split into chunks of `chunk_size`. Each rayon worker
/// folds its chunks into a private accumulator; the accumulators are summed
/// once at the end. Counts match [`aggregate`] exactly, means up to
/// floating-point summation order.
pub fn aggregate_par(
    shape: GridShape,
    cells: &CellAssignment,
    features: &[&[f64]],
    count_feature: usize,
    chunk_size: usize,
) -> Result<CellMeans, StatsError> {
    let width = features.len();
    check_inputs(width, cells, features, count_feature)?;

    let n = cells.len();
    let chunk_size = chunk_size.max(1);
    let acc = (0..n.div_ceil(chunk_size))
        .into_par_iter()
        .fold(
            || CellAccumulator::new(shape, width),
            |mut acc, chunk| {
                let start = chunk * chunk_size;
                let end = usize::min(start + chunk_size, n);
                acc.accumulate_range(cells, features, count_feature, start..end);
                acc
            },
        )
        .reduce(
            || CellAccumulator::new(shape, width),
            |a, b| a.merge_unchecked(&b),
        );
    Ok(acc.into_means())
}

/// Per-cell mean vectors with their observation counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellMeans {
    shape: GridShape,
    width: usize,
    means: Vec<f64>,
    counts: Vec<u64>,
}

impl CellMeans {
    #[must_use]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Number of features per cell.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn count(&self, cell: usize) -> u64 {
        self.counts[cell]
    }

    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of all cell counts, i.e. the number of in-bounds observations.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Mean vector of a cell. NaN when the cell count is zero.
    #[must_use]
    pub fn mean(&self, cell: usize) -> &[f64] {
        &self.means[cell * self.width..(cell + 1) * self.width]
    }

    pub fn mean_mut(&mut self, cell: usize) -> &mut [f64] {
        &mut self.means[cell * self.width..(cell + 1) * self.width]
    }

    /// Iterates over `(cell, count, mean)` of cells with a positive count.
    pub fn populated(&self) -> impl Iterator<Item = (usize, u64, &[f64])> {
        (0..self.counts.len())
            .filter(move |&q| self.counts[q] > 0)
            .map(move |q| (q, self.counts[q], self.mean(q)))
    }
}
