use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use log::info;

use crate::classify::nearest_neighbors_owned;
use crate::cli::{AlgoType, Datapoint, KValue};
use crate::dataset::open_dataset;
use crate::vote;

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// path to the csv file to load
    dataset: PathBuf,

    /// the number of neighbors to lookup
    #[arg(short, default_value = "3")]
    k: KValue,

    /// specifies the algorithm to use when calculating distances
    #[arg(long, default_value = "squared-euclidean")]
    algo: AlgoType,

    /// a comma delimitered list of numbers to estimate its group for
    #[arg(long, allow_hyphen_values = true)]
    datapoint: Datapoint,
}

/// classifies a single datapoint against every record in the dataset
pub fn knn_predict(arg: PredictArgs, has_headers: bool) -> anyhow::Result<()> {
    let dataset = open_dataset(&arg.dataset, has_headers)?;
    // parse the provided datapoint to estimate. will expect a similar amount of
    // numbers as the dataset has numeric columns
    let datapoint = arg.datapoint.into_inner();

    if datapoint.len() != dataset.features() {
        bail!(
            "number of datapoints does not match number of columns. expected: {} given: {}",
            dataset.features(),
            datapoint.len()
        );
    }

    info!("loaded {} records", dataset.len());

    let algo = arg.algo.function();

    for k in arg.k.values(dataset.len()) {
        let records = dataset
            .instances()
            .iter()
            .map(|record| (record.data(), record.label()));

        let collected = nearest_neighbors_owned(k, records, algo, &datapoint)?;
        let min = collected.len();

        print!("k value: {k} |");

        for v in &datapoint {
            print!(" {v}");
        }

        println!();

        for group in vote::tally(&collected) {
            // print the calculated percentage for each group found
            println!("  {}: {} {:.2}", group.label, group.count, group.fraction(min));
        }

        if let Some(label) = vote::majority(&collected) {
            println!("  predicted: {label}");
        }
    }

    Ok(())
}
