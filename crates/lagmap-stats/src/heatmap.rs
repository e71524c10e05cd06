//! Smoothed per-cell event-rate surface
//!
//! For every grid cell the heatmap counts in-bounds observations (the
//! denominator) and those with a positive outcome (the numerator). Cells with
//! more than [`HeatmapConfig::min_count`] observations get the rate
//! `(num / denom) ^ exponent`; the power transform compresses small
//! probabilities for display. Other cells carry [`HeatmapConfig::sentinel`].
//!
//! # Examples
//!
//! ```
//! use lagmap_stats::{
//!     grid::{CellAssignment, GridShape},
//!     heatmap::HeatmapConfig,
//! };
//!
//! let config = HeatmapConfig {
//!     min_count: 2,
//!     exponent: 1.0,
//!     ..HeatmapConfig::default()
//! };
//! let cells = CellAssignment::from_parts(vec![0, 0, 0, 0, 1, 9], vec![0, 0, 0, 0, 1, 0]).unwrap();
//! let outcome = [1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
//!
//! let heatmap = config.estimate(GridShape::new(2, 2), &cells, &outcome).unwrap();
//! assert_eq!(heatmap.hit, 5);
//! assert_eq!(heatmap.missed, 1);
//! assert_eq!(heatmap.denom, [4, 0, 0, 1]);
//! assert_eq!(heatmap.rate, [0.5, -1.0, -1.0, -1.0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    error::{StatsError, check_len},
    grid::{CellAssignment, GridShape},
};

/// Thresholding and transform parameters of the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// A cell needs strictly more observations than this to get a rate.
    pub min_count: u64,
    /// Power applied to the raw event rate.
    pub exponent: f64,
    /// Value reported for cells with insufficient data.
    pub sentinel: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            min_count: 100,
            exponent: 0.1,
            sentinel: -1.0,
        }
    }
}

impl HeatmapConfig {
    /// Computes the event-rate surface of a binary `outcome`.
    ///
    /// An observation counts as an event when its outcome equals `1`.
    #[expect(clippy::cast_precision_loss, clippy::float_cmp)]
    pub fn estimate(
        &self,
        shape: GridShape,
        cells: &CellAssignment,
        outcome: &[f64],
    ) -> Result<Heatmap, StatsError> {
        check_len("heatmap outcome", cells.len(), outcome.len())?;

        let mut num = vec![0_u64; shape.len()];
        let mut denom = vec![0_u64; shape.len()];
        let mut hit = 0;
        let mut missed = 0;
        for (cell, &y) in cells.cells(shape).zip(outcome) {
            let Some(q) = cell else {
                missed += 1;
                continue;
            };
            denom[q] += 1;
            if y == 1.0 {
                num[q] += 1;
            }
            hit += 1;
        }
        tracing::info!(hit, missed, "heatmap observations");

        let rate = num
            .iter()
            .zip(&denom)
            .map(|(&n, &d)| {
                if d > self.min_count {
                    (n as f64 / d as f64).powf(self.exponent)
                } else {
                    self.sentinel
                }
            })
            .collect();

        Ok(Heatmap {
            shape,
            min_count: self.min_count,
            rate,
            denom,
            hit,
            missed,
        })
    }
}

/// Event-rate surface with its per-cell denominators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub shape: GridShape,
    /// Threshold the rates were computed with.
    pub min_count: u64,
    /// Transformed event rate per cell, or the sentinel.
    pub rate: Vec<f64>,
    /// Number of in-bounds observations per cell.
    pub denom: Vec<u64>,
    /// Total in-bounds observations.
    pub hit: usize,
    /// Total out-of-bounds observations.
    pub missed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_cell(n: usize, events: usize) -> (CellAssignment, Vec<f64>) {
        let cells = CellAssignment::from_parts(vec![0; n], vec![0; n]).unwrap();
        let outcome = (0..n).map(|i| if i < events { 1.0 } else { 0.0 }).collect();
        (cells, outcome)
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = HeatmapConfig::default();
        let shape = GridShape::new(1, 1);

        let (cells, outcome) = single_cell(100, 50);
        let heatmap = config.estimate(shape, &cells, &outcome).unwrap();
        assert_eq!(heatmap.denom, [100]);
        assert_eq!(heatmap.rate, [-1.0]);

        let (cells, outcome) = single_cell(101, 0);
        let heatmap = config.estimate(shape, &cells, &outcome).unwrap();
        assert_eq!(heatmap.rate, [0.0]);
    }

    #[test]
    fn test_power_transform() {
        let config = HeatmapConfig::default();
        let (cells, outcome) = single_cell(200, 2);
        let heatmap = config
            .estimate(GridShape::new(1, 1), &cells, &outcome)
            .unwrap();
        let expected = 0.01_f64.powf(0.1);
        assert!((heatmap.rate[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_only_exact_one_is_an_event() {
        let config = HeatmapConfig {
            min_count: 0,
            exponent: 1.0,
            sentinel: f64::NAN,
        };
        let cells = CellAssignment::from_parts(vec![0; 4], vec![0; 4]).unwrap();
        let heatmap = config
            .estimate(GridShape::new(1, 1), &cells, &[1.0, 2.0, 0.5, 1.0])
            .unwrap();
        assert_eq!(heatmap.rate, [0.5]);
    }

    #[test]
    fn test_hit_matches_denominators() {
        let config = HeatmapConfig::default();
        let shape = GridShape::new(3, 3);
        let rows = vec![0, 1, 2, 3, -1, 2, 2];
        let cols = vec![0, 1, 2, 0, 0, 9, 2];
        let cells = CellAssignment::from_parts(rows, cols).unwrap();
        let heatmap = config.estimate(shape, &cells, &[0.0; 7]).unwrap();
        assert_eq!(heatmap.hit, 4);
        assert_eq!(heatmap.missed, 3);
        assert_eq!(
            heatmap.denom.iter().sum::<u64>(),
            u64::try_from(heatmap.hit).unwrap()
        );
    }

    #[test]
    fn test_config_deserializes_partially() {
        let config: HeatmapConfig = serde_json::from_str(r#"{"min_count": 5}"#).unwrap();
        assert_eq!(config.min_count, 5);
        assert_eq!(config.exponent, 0.1);
        assert_eq!(config.sentinel, -1.0);
    }

    #[test]
    fn test_outcome_length_mismatch() {
        let cells = CellAssignment::from_parts(vec![0], vec![0]).unwrap();
        assert!(
            HeatmapConfig::default()
                .estimate(GridShape::new(1, 1), &cells, &[])
                .is_err()
        );
    }
}
