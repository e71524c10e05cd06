//! End-to-end analysis of one observation table
//!
//! [`Analysis::run`] chains the numeric stages:
//!
//! 1. Resolve the lag schema and project every fitted direction into a score
//!    column.
//! 2. Estimate a local probability curve of the outcome against each score,
//!    and split each direction's coefficients into one unit-norm lag series
//!    per measure.
//! 3. With at least two directions, place observations on the grid by a pair
//!    of scores (the second and third when three exist, else the first two),
//!    then compute the outcome heatmap and the standardized per-cell means of
//!    the lagged features.

use serde::{Deserialize, Serialize};

use lagmap_stats::{
    cell::{self, CellMeans},
    grid::{GridMapper, GridShape},
    heatmap::{Heatmap, HeatmapConfig},
    local_prob::LocalProbabilityCurve,
    standardize::{self, Standardization},
};

use crate::{
    AnalysisError,
    direction::{self, Direction},
    schema::{LagSchema, ResolvedSchema},
    table::ObservationTable,
    view::{self, Series},
};

/// All tunables of an analysis run.
///
/// Every field has a default, so a partial JSON file overrides only the
/// fields it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub grid: GridShape,
    pub mapper: GridMapper,
    pub heatmap: HeatmapConfig,
    /// Half window of the local probability curves.
    pub half_window: usize,
    /// Name of the binary outcome column.
    pub outcome: String,
    pub schema: LagSchema,
    /// Aggregate cells in parallel chunks of this many observations.
    pub parallel_chunk: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grid: GridShape::default(),
            mapper: GridMapper::default(),
            heatmap: HeatmapConfig::default(),
            half_window: 3000,
            outcome: "Brake".to_owned(),
            schema: LagSchema::default(),
            parallel_chunk: None,
        }
    }
}

/// Local probability curve of one direction's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionCurve {
    pub label: String,
    pub curve: LocalProbabilityCurve,
}

/// Coefficients of one direction over each lagged measure, by lag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionProfile {
    pub label: String,
    /// One unit-norm series per measure, in schema order.
    pub series: Vec<Series>,
}

impl DirectionProfile {
    fn new(label: &str, schema: &ResolvedSchema, expanded: &[f64]) -> Self {
        let series = schema
            .segments()
            .iter()
            .map(|(name, range)| {
                let values = schema.indices()[range.clone()]
                    .iter()
                    .map(|&i| expanded[i])
                    .collect::<Vec<_>>();
                view::lag_series(name, &values, true)
            })
            .collect();
        Self {
            label: label.to_owned(),
            series,
        }
    }
}

/// Grid-level results, present when at least two directions were given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridReport {
    /// Labels of the directions driving the row and column axes.
    pub row_axis: String,
    pub col_axis: String,
    pub heatmap: Heatmap,
    /// Names of the aggregated lagged features, in cell-mean order.
    pub features: Vec<String>,
    /// Standardized cell means with their counts.
    pub cell_means: CellMeans,
    pub standardization: Standardization,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub num_obs: usize,
    pub curves: Vec<DirectionCurve>,
    pub profiles: Vec<DirectionProfile>,
    pub grid: Option<GridReport>,
}

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    config: AnalysisConfig,
}

impl Analysis {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(
        &self,
        table: &ObservationTable,
        directions: &[Direction],
    ) -> Result<AnalysisReport, AnalysisError> {
        let config = &self.config;
        let schema = config.schema.resolve(table)?;
        let outcome = table.column_by_name(&config.outcome)?;
        tracing::info!(
            num_obs = table.num_obs(),
            features = schema.width(),
            directions = directions.len(),
            "starting analysis"
        );

        let mut scores = Vec::with_capacity(directions.len());
        let mut curves = Vec::with_capacity(directions.len());
        let mut profiles = Vec::with_capacity(directions.len());
        for dir in directions {
            tracing::debug!(label = %dir.label, "projecting direction");
            let expanded = dir.expand(table)?;
            let score = direction::project(table, &expanded);
            let curve = LocalProbabilityCurve::estimate(&score, outcome, config.half_window)?;
            curves.push(DirectionCurve {
                label: dir.label.clone(),
                curve,
            });
            profiles.push(DirectionProfile::new(&dir.label, &schema, &expanded));
            scores.push(score);
        }

        let axes = match directions.len() {
            0 | 1 => None,
            2 => Some((0, 1)),
            _ => Some((1, 2)),
        };
        let grid = match axes {
            Some((r, c)) => {
                tracing::info!(
                    row_axis = %directions[r].label,
                    col_axis = %directions[c].label,
                    "building grid"
                );
                let cells = config.mapper.map(&scores[r], &scores[c])?;
                let heatmap = config.heatmap.estimate(config.grid, &cells, outcome)?;

                let features = schema.columns(table);
                let mut cell_means = match config.parallel_chunk {
                    Some(chunk) => cell::aggregate_par(
                        config.grid,
                        &cells,
                        &features,
                        schema.count_feature(),
                        chunk,
                    )?,
                    None => {
                        cell::aggregate(config.grid, &cells, &features, schema.count_feature())?
                    }
                };
                let standardization = standardize::standardize_cell_means(&mut cell_means);
                Some(GridReport {
                    row_axis: directions[r].label.clone(),
                    col_axis: directions[c].label.clone(),
                    heatmap,
                    features: schema.names().to_vec(),
                    cell_means,
                    standardization,
                })
            }
            None => {
                tracing::info!("fewer than two directions, skipping grid");
                None
            }
        };

        Ok(AnalysisReport {
            num_obs: table.num_obs(),
            curves,
            profiles,
            grid,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::LaggedMeasure;

    use super::*;

    #[expect(clippy::cast_precision_loss)]
    fn table(n: usize) -> ObservationTable {
        let idx = (0..n).map(|i| i as f64).collect::<Vec<_>>();
        ObservationTable::new(
            ["S[0]", "S[-1]", "Brake", "a", "b"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            vec![
                idx.clone(),
                idx.iter().map(|x| x + 1.0).collect(),
                (0..n).map(|i| (i % 2) as f64).collect(),
                idx.clone(),
                idx.iter().map(|x| -x).collect(),
            ],
        )
        .unwrap()
    }

    fn direction(label: &str, names: &[&str], coefficients: &[f64]) -> Direction {
        Direction {
            label: label.to_owned(),
            names: names.iter().map(|&n| n.to_owned()).collect(),
            coefficients: coefficients.to_vec(),
            covariance: None,
        }
    }

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            heatmap: HeatmapConfig {
                min_count: 0,
                ..HeatmapConfig::default()
            },
            half_window: 1,
            schema: LagSchema {
                measures: vec![LaggedMeasure::new("S", 1)],
            },
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_two_directions_build_grid() {
        let table = table(8);
        let directions = [
            direction("d0", &["a"], &[0.0625]),
            direction("d1", &["b"], &[0.0625]),
        ];
        let report = Analysis::new(config()).run(&table, &directions).unwrap();

        assert_eq!(report.num_obs, 8);
        assert_eq!(report.curves.len(), 2);
        assert_eq!(report.curves[0].curve.len(), 6);

        let grid = report.grid.unwrap();
        assert_eq!((grid.row_axis.as_str(), grid.col_axis.as_str()), ("d0", "d1"));
        assert_eq!(grid.heatmap.hit, 8);
        assert_eq!(grid.heatmap.missed, 0);
        assert_eq!(grid.features, ["S[0]", "S[-1]"]);
        assert_eq!(grid.cell_means.total_count(), 8);
        assert_eq!(grid.standardization.weight, 8);
        assert_eq!(grid.standardization.center, [3.5, 4.5]);
    }

    #[test]
    fn test_three_directions_use_last_two_axes() {
        let table = table(8);
        let directions = [
            direction("d0", &["a"], &[0.0625]),
            direction("d1", &["b"], &[0.0625]),
            direction("d2", &["a", "b"], &[0.0625, 0.03125]),
        ];
        let report = Analysis::new(config()).run(&table, &directions).unwrap();
        assert_eq!(report.curves.len(), 3);
        let grid = report.grid.unwrap();
        assert_eq!((grid.row_axis.as_str(), grid.col_axis.as_str()), ("d1", "d2"));
    }

    #[test]
    fn test_profiles_split_coefficients_by_measure() {
        let table = table(8);
        let directions = [
            direction("lags", &["S[-1]", "a", "S[0]"], &[4.0, 1.0, 3.0]),
            direction("other", &["b"], &[1.0]),
        ];
        let report = Analysis::new(config()).run(&table, &directions).unwrap();
        assert_eq!(report.profiles.len(), 2);

        let lags = &report.profiles[0];
        assert_eq!(lags.label, "lags");
        assert_eq!(lags.series.len(), 1);
        assert_eq!(lags.series[0].name, "S");
        assert_eq!(lags.series[0].points, [(0.0, 0.6), (1.0, 0.8)]);

        // No weight on any lag, so the unit-norm series is undefined
        let other = &report.profiles[1].series[0];
        assert!(other.points.iter().all(|&(_, y)| y.is_nan()));
    }

    #[test]
    fn test_single_direction_skips_grid() {
        let report = Analysis::new(config())
            .run(&table(8), &[direction("d0", &["a"], &[1.0])])
            .unwrap();
        assert_eq!(report.curves.len(), 1);
        assert!(report.grid.is_none());
    }

    #[test]
    fn test_parallel_matches_sequential_counts() {
        let table = table(40);
        let directions = [
            direction("d0", &["a"], &[0.015_625]),
            direction("d1", &["b"], &[0.015_625]),
        ];
        let seq = Analysis::new(config()).run(&table, &directions).unwrap();
        let par = Analysis::new(AnalysisConfig {
            parallel_chunk: Some(7),
            ..config()
        })
        .run(&table, &directions)
        .unwrap();
        let (seq, par) = (seq.grid.unwrap(), par.grid.unwrap());
        assert_eq!(seq.cell_means.counts(), par.cell_means.counts());
        assert_eq!(seq.heatmap, par.heatmap);
    }

    #[test]
    fn test_missing_outcome_column() {
        let config = AnalysisConfig {
            outcome: "Throttle".to_owned(),
            ..config()
        };
        assert_eq!(
            Analysis::new(config).run(&table(8), &[]).unwrap_err(),
            AnalysisError::MissingColumn {
                name: "Throttle".to_owned()
            }
        );
    }

    #[test]
    fn test_window_too_large_for_table() {
        let err = Analysis::new(AnalysisConfig {
            half_window: 4,
            ..config()
        })
        .run(&table(8), &[direction("d0", &["a"], &[1.0])])
        .unwrap_err();
        assert!(matches!(err, AnalysisError::Stats(_)));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"half_window": 500, "heatmap": {"min_count": 10}}"#)
                .unwrap();
        assert_eq!(config.half_window, 500);
        assert_eq!(config.heatmap.min_count, 10);
        assert_eq!(config.heatmap.exponent, 0.1);
        assert_eq!(config.outcome, "Brake");
        assert_eq!(config.grid, GridShape::new(100, 100));
    }
}
