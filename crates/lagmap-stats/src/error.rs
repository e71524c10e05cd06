/// Structural errors raised by the cell statistics primitives.
///
/// Only malformed inputs are reported here. Numeric degeneracies such as a
/// zero variance or a non-positive quadratic form are not errors: they surface
/// as NaN or infinite values in the computed output.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    /// Two index-aligned inputs have different lengths.
    #[display("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A flattened matrix does not hold `dim * dim` entries.
    #[display("matrix of {len} entries is not {dim}x{dim}")]
    MatrixShape { dim: usize, len: usize },
    /// A covariance diagonal entry is zero or negative.
    #[display("covariance diagonal entry {index} is not positive: {value}")]
    NonPositiveDiagonal { index: usize, value: f64 },
    /// The half window does not fit the number of observations.
    #[display("half window {window} is invalid for {len} observations")]
    InvalidWindow { window: usize, len: usize },
    /// Two accumulators disagree on grid shape or feature width.
    #[display("cell accumulators have incompatible shapes")]
    GridShapeMismatch,
    /// The count-defining feature index is outside the feature list.
    #[display("count feature index {index} out of range for {width} features")]
    FeatureIndexOutOfRange { index: usize, width: usize },
}

pub(crate) fn check_len(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), StatsError> {
    if expected == actual {
        Ok(())
    } else {
        Err(StatsError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}
