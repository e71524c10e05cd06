//! Render-ready views of computed surfaces
//!
//! Plotting lives outside this workspace. The types here only attach axis
//! semantics to flattened results so a renderer can walk them as
//! `(x, y, z)` grids or `(x, y)` series.

use serde::Serialize;

use lagmap_stats::{StatsError, heatmap::Heatmap};

/// A square matrix exposed as a heat grid.
///
/// Row 0 is drawn at the top: `y(r) = dim - r`. With `correlation` set, each
/// entry is rescaled by the square roots of its diagonal entries on the fly.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    dim: usize,
    data: &'a [f64],
    correlation: bool,
}

impl<'a> MatrixView<'a> {
    pub fn new(data: &'a [f64], dim: usize, correlation: bool) -> Result<Self, StatsError> {
        if dim.checked_mul(dim) != Some(data.len()) {
            return Err(StatsError::MatrixShape {
                dim,
                len: data.len(),
            });
        }
        Ok(Self {
            dim,
            data,
            correlation,
        })
    }

    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        (self.dim, self.dim)
    }

    #[must_use]
    pub fn z(&self, row: usize, col: usize) -> f64 {
        let m = self.dim;
        let v = self.data[row * m + col];
        if self.correlation {
            v / (self.data[row * m + row] * self.data[col * m + col]).sqrt()
        } else {
            v
        }
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn x(&self, col: usize) -> f64 {
        col as f64
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn y(&self, row: usize) -> f64 {
        self.dim as f64 - row as f64
    }

    /// All entries as nested rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.dim)
            .map(|r| (0..self.dim).map(|c| self.z(r, c)).collect())
            .collect()
    }
}

/// A heatmap rate surface exposed as `(x = col, y = row, z = rate)`.
///
/// The value range is fixed to `[0, 1]`; sentinel cells fall below it.
#[derive(Debug, Clone, Copy)]
pub struct RateGrid<'a> {
    heatmap: &'a Heatmap,
}

impl<'a> RateGrid<'a> {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 1.0;

    #[must_use]
    pub fn new(heatmap: &'a Heatmap) -> Self {
        Self { heatmap }
    }

    /// `(cols, rows)`.
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        (self.heatmap.shape.cols, self.heatmap.shape.rows)
    }

    #[must_use]
    pub fn z(&self, col: usize, row: usize) -> f64 {
        self.heatmap.rate[row * self.heatmap.shape.cols + col]
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn x(&self, col: usize) -> f64 {
        col as f64
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn y(&self, row: usize) -> f64 {
        row as f64
    }

    /// Every cell as `(x, y, z)`, row by row.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let (cols, rows) = self.dims();
        (0..rows).flat_map(move |row| {
            (0..cols).map(move |col| (self.x(col), self.y(row), self.z(col, row)))
        })
    }
}

/// A line series of `(x, y)` points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Scales `values` to unit L2 norm.
///
/// An all-zero series has no direction and comes back as NaN.
#[must_use]
pub fn unit_norm_series(values: &[f64]) -> Vec<f64> {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    values.iter().map(|v| v / norm).collect()
}

/// Pairs each value with its lag index, optionally scaled to unit L2 norm.
///
/// ```
/// use lagmap_analysis::view::lag_series;
///
/// let series = lag_series("speed", &[3.0, 4.0], true);
/// assert_eq!(series.points, [(0.0, 0.6), (1.0, 0.8)]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn lag_series(name: &str, values: &[f64], unit_norm: bool) -> Series {
    let scaled;
    let values = if unit_norm {
        scaled = unit_norm_series(values);
        scaled.as_slice()
    } else {
        values
    };
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();
    Series {
        name: name.to_owned(),
        points,
    }
}

/// Elementwise `a - b` of two same-shape matrices.
pub fn covariance_difference(a: &[f64], b: &[f64]) -> Result<Vec<f64>, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::LengthMismatch {
            what: "covariance matrices",
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}
