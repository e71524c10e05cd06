//! Lagged column schema
//!
//! Lagged measurements arrive as separate columns named `Name[0]`,
//! `Name[-1]`, ..., `Name[-max_lag]`. A [`LagSchema`] lists the measures to
//! track, and [`ResolvedSchema`] binds every lagged name to a table column
//! once, before any computation runs.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{AnalysisError, table::ObservationTable};

/// One measurement tracked over lags `0..=max_lag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaggedMeasure {
    pub name: String,
    pub max_lag: usize,
}

impl LaggedMeasure {
    #[must_use]
    pub fn new(name: impl Into<String>, max_lag: usize) -> Self {
        Self {
            name: name.into(),
            max_lag,
        }
    }

    /// Column names of all lags, lag 0 first.
    pub fn column_names(&self) -> impl Iterator<Item = String> + '_ {
        (0..=self.max_lag).map(move |lag| lag_column_name(&self.name, lag))
    }
}

/// Column name of `name` lagged by `lag` steps.
///
/// ```
/// use lagmap_analysis::schema::lag_column_name;
///
/// assert_eq!(lag_column_name("Speed", 0), "Speed[0]");
/// assert_eq!(lag_column_name("FcwRange", 12), "FcwRange[-12]");
/// ```
#[must_use]
pub fn lag_column_name(name: &str, lag: usize) -> String {
    if lag == 0 {
        format!("{name}[0]")
    } else {
        format!("{name}[-{lag}]")
    }
}

/// Measures whose lags form the per-cell feature vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagSchema {
    pub measures: Vec<LaggedMeasure>,
}

impl Default for LagSchema {
    fn default() -> Self {
        Self {
            measures: vec![
                LaggedMeasure::new("Speed", 30),
                LaggedMeasure::new("FcwRange", 30),
            ],
        }
    }
}

impl LagSchema {
    /// Binds every lagged column to its index in `table`.
    pub fn resolve(&self, table: &ObservationTable) -> Result<ResolvedSchema, AnalysisError> {
        let mut names = vec![];
        let mut indices = vec![];
        let mut segments = vec![];
        for measure in &self.measures {
            let start = names.len();
            for name in measure.column_names() {
                indices.push(table.column_index(&name)?);
                names.push(name);
            }
            segments.push((measure.name.clone(), start..names.len()));
        }
        Ok(ResolvedSchema {
            names,
            indices,
            segments,
            count_feature: 0,
        })
    }
}

/// A [`LagSchema`] bound to the columns of one table.
///
/// The first resolved column, lag 0 of the first measure, is the
/// count-defining feature for cell aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    names: Vec<String>,
    indices: Vec<usize>,
    segments: Vec<(String, Range<usize>)>,
    count_feature: usize,
}

impl ResolvedSchema {
    /// Number of tracked features.
    #[must_use]
    pub fn width(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of the count-defining feature among the tracked features.
    #[must_use]
    pub fn count_feature(&self) -> usize {
        self.count_feature
    }

    /// Table column index of every tracked feature.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Feature columns in schema order.
    #[must_use]
    pub fn columns<'a>(&self, table: &'a ObservationTable) -> Vec<&'a [f64]> {
        self.indices.iter().map(|&i| table.column(i)).collect()
    }

    /// Range of feature positions belonging to each measure.
    #[must_use]
    pub fn segments(&self) -> &[(String, Range<usize>)] {
        &self.segments
    }
}
