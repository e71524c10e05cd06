//! Grid and window statistics for lagged observation streams.
//!
//! This crate provides the numeric transforms that turn index-aligned
//! per-observation arrays into per-cell or per-bin summaries:
//!
//! - **Grid mapping**: Place observations on a 2-D grid by an affine transform
//! - **Correlation**: Convert covariance matrices, normalize directions
//! - **Cell aggregation**: Per-cell means of lagged features, sequential or parallel
//! - **Standardization**: Count-weighted centering and scaling of cell means
//! - **Heatmap**: Thresholded, power-transformed event rate per cell
//! - **Local probability**: Box-window event rate along a sorted score
//!
//! # Modules
//!
//! - [`grid`]: Affine mapping of coordinates to grid cells
//! - [`correlation`]: Covariance to correlation, quadratic-form normalization
//! - [`cell`]: Per-cell sums, counts and means
//! - [`standardize`]: In-place standardization of cell means
//! - [`heatmap`]: Per-cell event-rate surface
//! - [`local_prob`]: Local conditional probability curve
//!
//! # Error policy
//!
//! Malformed inputs (mismatched lengths, bad matrix shapes, unusable window
//! sizes) are rejected with a [`StatsError`]. Numeric degeneracies are not
//! errors: zero variances and empty cells surface as NaN or infinite values,
//! and under-populated heatmap cells carry a sentinel.
//!
//! # Examples
//!
//! ## Mapping observations and building a heatmap
//!
//! ```
//! use lagmap_stats::{
//!     grid::{GridMapper, GridShape},
//!     heatmap::HeatmapConfig,
//! };
//!
//! let x0 = [0.0, 0.01, 5.0];
//! let x1 = [0.0, 0.0, 0.0];
//! let outcome = [1.0, 0.0, 1.0];
//!
//! let cells = GridMapper::default().map(&x0, &x1).unwrap();
//! let heatmap = HeatmapConfig::default()
//!     .estimate(GridShape::default(), &cells, &outcome)
//!     .unwrap();
//! assert_eq!(heatmap.hit, 2);
//! assert_eq!(heatmap.missed, 1);
//! ```
//!
//! ## Estimating a local probability curve
//!
//! ```
//! use lagmap_stats::local_prob::LocalProbabilityCurve;
//!
//! let score = [0.3, 0.1, 0.2, 0.5, 0.4, 0.6];
//! let outcome = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
//! let curve = LocalProbabilityCurve::estimate(&score, &outcome, 1).unwrap();
//! assert_eq!(curve.scores, [0.2, 0.3, 0.4, 0.5]);
//! ```

pub use self::error::StatsError;

pub mod cell;
pub mod correlation;
mod error;
pub mod grid;
pub mod heatmap;
pub mod local_prob;
pub mod standardize;
