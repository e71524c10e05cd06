use std::path::PathBuf;

use anyhow::Context;
use lagmap_analysis::view::{self, MatrixView};
use lagmap_stats::correlation;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CorrelationArg {
    /// Path to a square covariance matrix, as a JSON array of rows
    matrix: PathBuf,
    /// Fail on non-positive diagonal entries instead of producing NaN or inf
    #[arg(long)]
    strict: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CovDiffArg {
    /// Covariance matrix to subtract from
    minuend: PathBuf,
    /// Covariance matrix to subtract
    subtrahend: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CorrelationArg) -> anyhow::Result<()> {
    let (cov, dim) = util::read_matrix_file(&arg.matrix)?;
    let rows = correlation_rows(&cov, dim, arg.strict)
        .with_context(|| format!("Failed to convert {}", arg.matrix.display()))?;
    util::write_json(&rows, arg.output.as_deref())
}

pub(crate) fn run_diff(arg: &CovDiffArg) -> anyhow::Result<()> {
    let (a, dim) = util::read_matrix_file(&arg.minuend)?;
    let (b, _) = util::read_matrix_file(&arg.subtrahend)?;
    let rows = difference_rows(&a, &b, dim).with_context(|| {
        format!(
            "Failed to subtract {} from {}",
            arg.subtrahend.display(),
            arg.minuend.display()
        )
    })?;
    util::write_json(&rows, arg.output.as_deref())
}

fn correlation_rows(cov: &[f64], dim: usize, strict: bool) -> anyhow::Result<Vec<Vec<f64>>> {
    let rows = if strict {
        let corr = correlation::to_correlation_strict(cov, dim)?;
        MatrixView::new(&corr, dim, false)?.to_rows()
    } else {
        MatrixView::new(cov, dim, true)?.to_rows()
    };
    Ok(rows)
}

fn difference_rows(a: &[f64], b: &[f64], dim: usize) -> anyhow::Result<Vec<Vec<f64>>> {
    let diff = view::covariance_difference(a, b)?;
    Ok(MatrixView::new(&diff, dim, false)?.to_rows())
}
