use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

mod classify;
mod cli;
mod dataset;
mod distance;
mod error;
mod evaluate;
mod predict;
mod report;
mod split;
mod vote;

use evaluate::{EvaluateArgs, knn_evaluate};
use predict::{PredictArgs, knn_predict};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // RUST_LOG takes priority over the verbose flag
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let has_headers = !args.no_header;

    match args.cmd {
        KnnCmd::Evaluate(arg) => knn_evaluate(arg, has_headers),
        KnnCmd::Predict(arg) => knn_predict(arg, has_headers),
    }
}

/// a simple k nearest neighbors (knn) classifier that loads a csv file of
/// labeled records where the last column is the label and every other column
/// is numeric.
#[derive(Debug, Parser)]
struct CliArgs {
    /// indicates that the csv contains no header row
    #[arg(long, global = true)]
    no_header: bool,

    /// increases logging output. can be repeated
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: KnnCmd,
}

#[derive(Debug, Subcommand)]
pub enum KnnCmd {
    /// splits the dataset into training and testing records and reports the
    /// accuracy of classifying the testing records
    Evaluate(EvaluateArgs),

    /// attempts to predict a specific datapoint with the specified dataset
    Predict(PredictArgs),
}
