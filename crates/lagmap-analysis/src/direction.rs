//! Fitted directions and their projection onto observations
//!
//! A dimension-reduction fit produces coefficient vectors over its own list
//! of predictor names. Before scoring observations, each vector is expanded
//! onto the columns of the observation table: coefficients land on the column
//! with the same name, every other column gets zero.

use serde::{Deserialize, Serialize};

use lagmap_stats::correlation;

use crate::{AnalysisError, table::ObservationTable};

/// Coefficients of one fitted direction over named predictors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Display label, e.g. `"mean"` or `"cov1"`.
    pub label: String,
    /// Predictor names, aligned with `coefficients`.
    pub names: Vec<String>,
    pub coefficients: Vec<f64>,
    /// Optional flattened covariance over the same predictors. When present,
    /// the direction is rescaled to unit variance before projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covariance: Option<Vec<f64>>,
}

impl Direction {
    fn check_shape(&self) -> Result<(), AnalysisError> {
        if self.names.len() == self.coefficients.len() {
            Ok(())
        } else {
            Err(AnalysisError::DirectionShape {
                label: self.label.clone(),
                names: self.names.len(),
                coefficients: self.coefficients.len(),
            })
        }
    }

    /// Coefficients after optional unit-variance normalization.
    pub fn normalized_coefficients(&self) -> Result<Vec<f64>, AnalysisError> {
        self.check_shape()?;
        let mut coefficients = self.coefficients.clone();
        if let Some(cov) = &self.covariance {
            let q = correlation::normalize_direction(&mut coefficients, cov)?;
            if q <= 0.0 || q.is_nan() {
                tracing::warn!(label = %self.label, q, "direction has no positive variance");
            }
        }
        Ok(coefficients)
    }

    /// Expands the coefficients onto the columns of `table`.
    pub fn expand(&self, table: &ObservationTable) -> Result<Vec<f64>, AnalysisError> {
        let coefficients = self.normalized_coefficients()?;
        let mut expanded = vec![0.0; table.num_columns()];
        for (name, coef) in self.names.iter().zip(coefficients) {
            expanded[table.column_index(name)?] = coef;
        }
        Ok(expanded)
    }

    /// Score of every observation along this direction.
    pub fn project(&self, table: &ObservationTable) -> Result<Vec<f64>, AnalysisError> {
        let expanded = self.expand(table)?;
        Ok(project(table, &expanded))
    }
}

/// Linear combination `sum_k coef[k] * column_k[i]` for every observation.
///
/// `coefficients` must hold one entry per table column.
#[must_use]
pub fn project(table: &ObservationTable, coefficients: &[f64]) -> Vec<f64> {
    assert_eq!(coefficients.len(), table.num_columns());
    let mut scores = vec![0.0; table.num_obs()];
    for (k, &coef) in coefficients.iter().enumerate() {
        if coef == 0.0 {
            continue;
        }
        for (s, x) in scores.iter_mut().zip(table.column(k)) {
            *s += coef * x;
        }
    }
    scores
}
