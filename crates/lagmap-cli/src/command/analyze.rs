use std::path::PathBuf;

use anyhow::Context;
use lagmap_analysis::{
    direction::Direction,
    pipeline::{Analysis, AnalysisConfig},
    view::RateGrid,
};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Path to the observation table JSON file
    table: PathBuf,
    /// Path to the fitted directions JSON file (an array of directions)
    #[arg(long)]
    directions: PathBuf,
    /// Analysis configuration JSON file; omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Outcome column, overriding the configuration
    #[arg(long)]
    outcome: Option<String>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also write the heatmap as `[x, y, rate]` points to this file
    #[arg(long)]
    rate_grid: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let mut config = match &arg.config {
        Some(path) => util::read_json_file::<AnalysisConfig, _>("analysis config", path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(outcome) = &arg.outcome {
        config.outcome.clone_from(outcome);
    }

    let table = util::read_table_file(&arg.table)?;
    let directions: Vec<Direction> = util::read_json_file("directions", &arg.directions)?;

    let report = Analysis::new(config)
        .run(&table, &directions)
        .with_context(|| format!("Failed to analyze {}", arg.table.display()))?;
    util::write_json(&report, arg.output.as_deref())?;

    if let Some(path) = &arg.rate_grid {
        let Some(grid) = &report.grid else {
            anyhow::bail!("A rate grid needs at least two directions");
        };
        let points = RateGrid::new(&grid.heatmap).points().collect::<Vec<_>>();
        util::write_json(&points, Some(path.as_path()))?;
    }
    Ok(())
}
