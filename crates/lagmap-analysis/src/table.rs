//! Index-aligned observation columns
//!
//! An [`ObservationTable`] is what the ingestion side hands over: named numeric
//! columns of equal length, one entry per observation. Lag expansion, filtering
//! and segmentation have already happened upstream.
//!
//! # Serialization
//!
//! ```json
//! {
//!   "names": ["Speed[0]", "Speed[-1]", "Brake"],
//!   "columns": [[8.1, 8.3], [8.0, 8.1], [0, 1]]
//! }
//! ```
//!
//! Deserialization validates the table, so a ragged file is rejected at load
//! time.

use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Named, equally long numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableData")]
pub struct ObservationTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct TableData {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl TryFrom<TableData> for ObservationTable {
    type Error = AnalysisError;

    fn try_from(data: TableData) -> Result<Self, Self::Error> {
        Self::new(data.names, data.columns)
    }
}

impl ObservationTable {
    /// Builds a table, checking that names and columns pair up and that all
    /// columns have the same length.
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self, AnalysisError> {
        if names.len() != columns.len() {
            return Err(AnalysisError::NameCountMismatch {
                names: names.len(),
                columns: columns.len(),
            });
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            for (name, column) in names.iter().zip(&columns) {
                if column.len() != expected {
                    return Err(AnalysisError::RaggedTable {
                        name: name.clone(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }
        Ok(Self { names, columns })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of observations.
    #[must_use]
    pub fn num_obs(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    pub fn column_index(&self, name: &str) -> Result<usize, AnalysisError> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                name: name.to_owned(),
            })
    }

    pub fn column_by_name(&self, name: &str) -> Result<&[f64], AnalysisError> {
        Ok(self.column(self.column_index(name)?))
    }
}
