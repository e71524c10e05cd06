//! Mapping of continuous coordinates onto a fixed 2-D grid
//!
//! Observations are placed on the grid by an affine transform per axis
//! followed by `floor`. The mapper never clamps: indices outside the grid are
//! legal output, and every consumer filters them through
//! [`GridShape::cell_index`].
//!
//! # Examples
//!
//! ```
//! use lagmap_stats::grid::{AxisTransform, GridMapper, GridShape};
//!
//! let mapper = GridMapper {
//!     row: AxisTransform::new(2.0, 1.0),
//!     col: AxisTransform::new(1.0, 0.0),
//! };
//! let cells = mapper.map(&[0.0, 1.2, -3.0], &[0.5, 2.0, 1.0]).unwrap();
//! assert_eq!(cells.rows, [1, 3, -5]);
//! assert_eq!(cells.cols, [0, 2, 1]);
//!
//! let shape = GridShape::new(4, 4);
//! let indices = cells.cells(shape).collect::<Vec<_>>();
//! assert_eq!(indices, [Some(4), Some(14), None]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, check_len};

/// Dimensions of a row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl Default for GridShape {
    fn default() -> Self {
        Self::new(100, 100)
    }
}

impl GridShape {
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened index `row * cols + col`, or `None` when the pair lies
    /// outside the grid.
    #[must_use]
    pub fn cell_index(&self, row: i64, col: i64) -> Option<usize> {
        let row = usize::try_from(row).ok().filter(|r| *r < self.rows)?;
        let col = usize::try_from(col).ok().filter(|c| *c < self.cols)?;
        Some(row * self.cols + col)
    }
}

/// Affine transform `scale * x + offset` for one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTransform {
    pub scale: f64,
    pub offset: f64,
}

impl AxisTransform {
    #[must_use]
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    /// Returns `floor(scale * x + offset)`.
    ///
    /// Results beyond the `i64` range saturate, and a NaN result maps to
    /// `i64::MIN`, so non-finite coordinates always land outside any grid.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn index(&self, x: f64) -> i64 {
        let v = (self.scale * x + self.offset).floor();
        if v.is_nan() { i64::MIN } else { v as i64 }
    }
}

/// Maps pairs of continuous coordinates to `(row, col)` grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMapper {
    pub row: AxisTransform,
    pub col: AxisTransform,
}

impl Default for GridMapper {
    fn default() -> Self {
        Self {
            row: AxisTransform::new(70.0, 50.0),
            col: AxisTransform::new(15.0, 50.0),
        }
    }
}

impl GridMapper {
    /// Maps each `(x0[i], x1[i])` to `(row[i], col[i])`.
    ///
    /// No bounds are applied here.
    pub fn map(&self, x0: &[f64], x1: &[f64]) -> Result<CellAssignment, StatsError> {
        check_len("grid coordinates", x0.len(), x1.len())?;
        let rows = x0.iter().map(|&x| self.row.index(x)).collect();
        let cols = x1.iter().map(|&x| self.col.index(x)).collect();
        Ok(CellAssignment { rows, cols })
    }
}

/// Per-observation grid indices, possibly out of range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellAssignment {
    pub rows: Vec<i64>,
    pub cols: Vec<i64>,
}

impl CellAssignment {
    pub fn from_parts(rows: Vec<i64>, cols: Vec<i64>) -> Result<Self, StatsError> {
        check_len("cell columns", rows.len(), cols.len())?;
        Ok(Self { rows, cols })
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flattened cell index of every observation, `None` when out of range.
    pub fn cells(&self, shape: GridShape) -> impl Iterator<Item = Option<usize>> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .map(move |(&r, &c)| shape.cell_index(r, c))
    }
}
