use lagmap_stats::StatsError;

/// Errors raised while assembling an analysis from named columns.
#[derive(
    Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From,
)]
pub enum AnalysisError {
    #[display("{_0}")]
    #[from]
    Stats(StatsError),
    #[display("column '{name}' not found")]
    MissingColumn { name: String },
    #[display("column '{name}' has {actual} observations, expected {expected}")]
    RaggedTable {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[display("{names} column names given for {columns} columns")]
    NameCountMismatch { names: usize, columns: usize },
    #[display("direction '{label}' has {names} names but {coefficients} coefficients")]
    DirectionShape {
        label: String,
        names: usize,
        coefficients: usize,
    },
}
