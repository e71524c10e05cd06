use clap::{Parser, Subcommand};
use tracing::Level;

use self::{
    analyze::AnalyzeArg,
    correlation::{CorrelationArg, CovDiffArg},
    local_prob::LocalProbArg,
};

mod analyze;
mod correlation;
mod local_prob;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug events in addition to progress
    #[arg(short, long, global = true)]
    verbose: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run curves, heatmap and standardized cell means for fitted directions
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Estimate a local probability curve of one outcome against one score
    LocalProb(#[clap(flatten)] LocalProbArg),
    /// Convert a covariance matrix to a correlation matrix
    Correlation(#[clap(flatten)] CorrelationArg),
    /// Subtract one covariance matrix from another
    CovDiff(#[clap(flatten)] CovDiffArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::LocalProb(arg) => local_prob::run(&arg)?,
        Mode::Correlation(arg) => correlation::run(&arg)?,
        Mode::CovDiff(arg) => correlation::run_diff(&arg)?,
    }
    Ok(())
}
