//! Analysis pipeline over lagged observation tables.
//!
//! This crate sits between data ingestion and the numeric core in
//! [`lagmap_stats`]. It takes already-resolved observation tables and fitted
//! directions, and runs the grid, heatmap and local probability stages on
//! them.
//!
//! # Modules
//!
//! - [`table`]: Named, equally long observation columns
//! - [`schema`]: Lagged column naming and resolution
//! - [`direction`]: Expansion and projection of fitted directions
//! - [`pipeline`]: Configuration and the end-to-end [`pipeline::Analysis`] run
//! - [`view`]: Render-ready matrix, grid and series views
//!
//! # Example
//!
//! ```
//! use lagmap_analysis::{
//!     direction::Direction,
//!     pipeline::{Analysis, AnalysisConfig},
//!     schema::{LagSchema, LaggedMeasure},
//!     table::ObservationTable,
//! };
//!
//! let table = ObservationTable::new(
//!     vec!["Speed[0]".into(), "Brake".into()],
//!     vec![vec![1.0, 2.0, 3.0, 4.0], vec![0.0, 0.0, 1.0, 1.0]],
//! )
//! .unwrap();
//! let config = AnalysisConfig {
//!     half_window: 1,
//!     schema: LagSchema {
//!         measures: vec![LaggedMeasure::new("Speed", 0)],
//!     },
//!     ..AnalysisConfig::default()
//! };
//! let direction = Direction {
//!     label: "speed".into(),
//!     names: vec!["Speed[0]".into()],
//!     coefficients: vec![1.0],
//!     covariance: None,
//! };
//!
//! let report = Analysis::new(config).run(&table, &[direction]).unwrap();
//! assert_eq!(report.curves[0].curve.scores, [2.0, 3.0]);
//! assert!(report.grid.is_none());
//! ```

pub use self::error::AnalysisError;

pub mod direction;
mod error;
pub mod pipeline;
pub mod schema;
pub mod table;
pub mod view;
