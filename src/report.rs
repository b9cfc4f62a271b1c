//! terminal output for evaluation results
use std::fmt::Display;
use std::io::Write;

use clap::ValueEnum;

use crate::evaluate::{ConfusionMatrix, Evaluation};

const RESET: &str = "\x1B[0m";
const BOLD: &str = "\x1B[1m";
const RED: &str = "\x1B[31m";
const GREEN: &str = "\x1B[32m";
const RED_BG: &str = "\x1B[41m";
const GREEN_BG: &str = "\x1B[42m";

/// the width of a single confusion matrix cell
const CELL: usize = 20;

/// how the evaluation results are written out
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Format {
    /// aligned and colored output meant for a terminal
    Pretty,

    /// one `PREDICTED,ACTUAL` line per testing instance followed by the
    /// accuracy
    Plain,
}

/// writes the evaluation results in the requested format
pub fn write_evaluation<W>(
    out: &mut W,
    evaluation: &Evaluation<'_>,
    format: Format,
    color: bool,
) -> std::io::Result<()>
where
    W: Write,
{
    match format {
        Format::Pretty => Pretty { color }.write(out, evaluation),
        Format::Plain => write_plain(out, evaluation),
    }
}

fn write_plain<W>(out: &mut W, evaluation: &Evaluation<'_>) -> std::io::Result<()>
where
    W: Write,
{
    for prediction in &evaluation.predictions {
        writeln!(out, "{},{}", prediction.predicted, prediction.actual)?;
    }

    match evaluation.matrix.accuracy() {
        Some(accuracy) => writeln!(out, "accuracy,{accuracy:.4}"),
        None => writeln!(out, "accuracy,n/a"),
    }
}

struct Pretty {
    color: bool,
}

impl Pretty {
    /// wraps the value in the given escape codes if color is enabled
    fn paint(&self, codes: &[&str], value: impl Display) -> String {
        if self.color {
            format!("{}{value}{RESET}", codes.concat())
        } else {
            value.to_string()
        }
    }

    fn write<W>(&self, out: &mut W, evaluation: &Evaluation<'_>) -> std::io::Result<()>
    where
        W: Write,
    {
        for prediction in &evaluation.predictions {
            let (fg, bg, badge) = if prediction.is_correct() {
                (GREEN, GREEN_BG, "CORRECT")
            } else {
                (RED, RED_BG, "INCORRECT")
            };

            writeln!(
                out,
                "Predicted -> {}  x  {} <- Actual    {}",
                self.paint(&[BOLD, fg], format!("{:>CELL$}", prediction.predicted)),
                self.paint(&[BOLD, fg], format!("{:<CELL$}", prediction.actual)),
                self.paint(&[bg], format!("{badge:^11}")),
            )?;
        }

        writeln!(out)?;

        let width = self.write_matrix(out, &evaluation.matrix)?;

        writeln!(out)?;

        let accuracy = match evaluation.matrix.accuracy() {
            Some(accuracy) => format!("Accuracy: {accuracy:.4} %"),
            None => String::from("Accuracy: n/a (no testing instances)"),
        };

        writeln!(out, "{accuracy:^width$}")?;
        writeln!(out)
    }

    /// writes the matrix with predicted labels as rows and actual labels as
    /// columns. returns the width of the table.
    fn write_matrix<W>(&self, out: &mut W, matrix: &ConfusionMatrix) -> std::io::Result<usize>
    where
        W: Write,
    {
        let labels = matrix.labels();
        let width = (CELL + 1) * (labels.len() + 1);
        let rule = "-".repeat(width);

        writeln!(out, "Confusion matrix (rows: predicted, columns: actual):")?;
        writeln!(out, "{rule}")?;

        write!(out, "{:CELL$}", "")?;

        for actual in labels {
            write!(out, " {}", self.paint(&[BOLD], format!("{actual:^CELL$}")))?;
        }

        writeln!(out)?;

        for predicted in labels {
            write!(out, "{}", self.paint(&[BOLD], format!("{predicted:^CELL$}")))?;

            for actual in labels {
                let count = format!("{:^CELL$}", matrix.get(predicted, actual));
                let fg = if predicted == actual { GREEN } else { RED };

                write!(out, " {}", self.paint(&[fg], count))?;
            }

            writeln!(out)?;
        }

        writeln!(out, "{rule}")?;

        Ok(width)
    }
}
