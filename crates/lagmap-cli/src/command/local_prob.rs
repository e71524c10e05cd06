use std::path::PathBuf;

use anyhow::Context;
use lagmap_stats::local_prob::LocalProbabilityCurve;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LocalProbArg {
    /// Path to the observation table JSON file
    table: PathBuf,
    /// Score column to sort observations by
    #[arg(long)]
    score: String,
    /// Binary outcome column
    #[arg(long, default_value = "Brake")]
    outcome: String,
    /// Half width of the box window, in observations
    #[arg(long, default_value_t = 3000)]
    window: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &LocalProbArg) -> anyhow::Result<()> {
    let table = util::read_table_file(&arg.table)?;
    let score = table.column_by_name(&arg.score)?;
    let outcome = table.column_by_name(&arg.outcome)?;

    let curve = LocalProbabilityCurve::estimate(score, outcome, arg.window).with_context(|| {
        format!(
            "Failed to estimate local probability of {} against {}",
            arg.outcome, arg.score
        )
    })?;
    tracing::info!(points = curve.len(), "local probability curve estimated");
    util::write_json(&curve, arg.output.as_deref())
}
