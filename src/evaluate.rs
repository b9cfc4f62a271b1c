//! runs the classifier over a testing partition and aggregates the results
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::classify;
use crate::cli::{AlgoType, KValue};
use crate::dataset::{Dataset, open_dataset};
use crate::error::{Error, Result};
use crate::report::{self, Format};
use crate::split::{Partition, SplitMode, SplitRate, split_proportional, split_random};

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// path to the csv file to load
    dataset: PathBuf,

    /// the fraction of each class used for training, between 0 and 1
    rate: SplitRate,

    /// the number of neighbors to lookup
    k: KValue,

    /// specifies the algorithm to use when calculating distances
    #[arg(long, default_value = "squared-euclidean")]
    algo: AlgoType,

    /// how records are divided into training and testing
    #[arg(long, default_value = "proportional")]
    split: SplitMode,

    /// seed for the random split. ignored by the proportional split
    #[arg(long)]
    seed: Option<u64>,

    /// the output format
    #[arg(long, default_value = "pretty")]
    format: Format,

    /// disables terminal colors
    #[arg(long)]
    no_color: bool,
}

/// splits the dataset and reports how well the testing records are
/// classified by the training records
pub fn knn_evaluate(arg: EvaluateArgs, has_headers: bool) -> anyhow::Result<()> {
    let dataset = open_dataset(&arg.dataset, has_headers)?;
    let color = !arg.no_color && std::io::stdout().is_terminal();
    let mut stdout = std::io::stdout().lock();

    write_evaluations(&mut stdout, &dataset, &arg, color)
}

/// runs the evaluation for every requested k value against an already
/// loaded dataset and writes the results
pub fn write_evaluations<W>(
    out: &mut W,
    dataset: &Dataset,
    arg: &EvaluateArgs,
    color: bool,
) -> anyhow::Result<()>
where
    W: Write,
{
    let labels = dataset.labels();

    info!(
        "loaded {} records with {} columns and {} classes",
        dataset.len(),
        dataset.features(),
        labels.len()
    );

    let partition = match arg.split {
        SplitMode::Proportional => split_proportional(dataset, arg.rate),
        SplitMode::Random => {
            let mut rng = match arg.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            split_random(dataset, arg.rate, &mut rng)
        }
    };

    info!(
        "train set: {} test set: {}",
        partition.train.len(),
        partition.test.len()
    );

    for k in arg.k.values(partition.train.len()) {
        let evaluation = evaluate(&partition, labels.iter().copied(), k, arg.algo.function())?;

        if arg.k.is_range() {
            writeln!(out, "k value: {k}")?;
        }

        report::write_evaluation(out, &evaluation, arg.format, color)
            .context("failed to write evaluation results")?;
    }

    Ok(())
}

/// the label predicted for a single testing instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction<'a> {
    pub predicted: &'a str,
    pub actual: &'a str,
}

impl Prediction<'_> {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }
}

/// counts of predicted labels against actual labels
///
/// rows are the predicted labels and columns are the actual labels, both in
/// sorted order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<Vec<u32>>,
}

impl ConfusionMatrix {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort();
        labels.dedup();

        let counts = vec![vec![0; labels.len()]; labels.len()];

        Self { labels, counts }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// returns the index of the label, adding a new row and column if the
    /// label has not been seen yet
    fn index_of(&mut self, label: &str) -> usize {
        match self.labels.binary_search_by(|known| known.as_str().cmp(label)) {
            Ok(index) => index,
            Err(index) => {
                self.labels.insert(index, label.to_owned());

                for row in &mut self.counts {
                    row.insert(index, 0);
                }

                self.counts.insert(index, vec![0; self.labels.len()]);

                index
            }
        }
    }

    pub fn record(&mut self, predicted: &str, actual: &str) {
        // adding the actual label can shift the predicted row
        self.index_of(predicted);
        let col = self.index_of(actual);
        let row = self.index_of(predicted);

        self.counts[row][col] += 1;
    }

    pub fn get(&self, predicted: &str, actual: &str) -> u32 {
        let find = |label: &str| {
            self.labels
                .binary_search_by(|known| known.as_str().cmp(label))
                .ok()
        };

        match (find(predicted), find(actual)) {
            (Some(row), Some(col)) => self.counts[row][col],
            _ => 0,
        }
    }

    /// the total number of recorded predictions
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }

    /// the number of predictions that matched the actual label
    pub fn correct(&self) -> u32 {
        (0..self.labels.len()).map(|i| self.counts[i][i]).sum()
    }

    /// percentage of correct predictions. [`None`] if nothing was recorded.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();

        if total == 0 {
            None
        } else {
            Some(100.0 * self.correct() as f64 / total as f64)
        }
    }
}

/// the results of classifying every instance of a testing partition
#[derive(Debug)]
pub struct Evaluation<'a> {
    pub predictions: Vec<Prediction<'a>>,
    pub matrix: ConfusionMatrix,
}

/// classifies every testing instance against the training instances of the
/// partition
///
/// `labels` seeds the confusion matrix so that classes without any testing
/// instances still show up in it.
pub fn evaluate<'a, F, L, S>(
    partition: &Partition<'a>,
    labels: L,
    k: usize,
    algo: F,
) -> Result<Evaluation<'a>>
where
    F: Fn(&[f64], &[f64]) -> f64,
    L: IntoIterator<Item = S>,
    S: Into<String>,
{
    if k == 0 {
        return Err(Error::InvalidK);
    }

    if partition.train.is_empty() {
        return Err(Error::EmptyTraining);
    }

    if k > partition.train.len() {
        warn!(
            "k value of {k} is larger than the training partition, using {}",
            partition.train.len()
        );
    }

    info!(
        "classifying {} instances against {} training instances with k = {k}",
        partition.test.len(),
        partition.train.len()
    );

    let mut matrix = ConfusionMatrix::new(labels);
    let mut predictions = Vec::with_capacity(partition.test.len());
    let mut collected = Vec::with_capacity(partition.train.len());

    for instance in partition.test.iter().copied() {
        let records = partition
            .train
            .iter()
            .copied()
            .map(|record| (record.data(), record.label()));

        let Some(predicted) =
            classify::classify_datapoint(k, records, &algo, instance.data(), &mut collected)?
        else {
            return Err(Error::EmptyTraining);
        };

        debug!("{:?} -> {predicted} neighbors: {collected:?}", instance.data());

        matrix.record(predicted, instance.label());
        predictions.push(Prediction {
            predicted,
            actual: instance.label(),
        });
    }

    Ok(Evaluation {
        predictions,
        matrix,
    })
}
