//! knn algorithm for classifying a given datapoint from the provided records
//!
//! [`nearest_neighbors_owned`] is a convienience function that will allocate
//! memory for the collected neighbors.
//!
//! [`nearest_neighbors`] performs the actual calculation based on the records
//! provided to it and stores the results in a caller provided buffer so that
//! it can be reused across many datapoints.
use std::iter::Iterator;

use crate::distance;
use crate::error::{Error, Result};
use crate::vote;

/// a training record along with its distance from the datapoint being
/// classified
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub label: &'a str,
    pub distance: f64,
}

/// convienience function that will allocate memory for the collected
/// neighbors.
///
/// refer to [`nearest_neighbors`]
pub fn nearest_neighbors_owned<'a, F, R, D>(
    k: usize,
    records: R,
    algo: F,
    datapoint: &[f64],
) -> Result<Vec<Neighbor<'a>>>
where
    D: AsRef<[f64]>,
    R: Iterator<Item = (D, &'a str)>,
    F: Fn(&[f64], &[f64]) -> f64,
{
    let (_, max_size) = records.size_hint();

    let mut collected = if let Some(max_size) = max_size {
        Vec::with_capacity(max_size)
    } else {
        Vec::new()
    };

    nearest_neighbors(k, records, algo, datapoint, &mut collected)?;

    Ok(collected)
}

/// finds the `k` closest records to the datapoint
///
/// the distance from the datapoint to every record is calculated with the
/// provided algorithm and the results are sorted with [`f64::total_cmp`]
/// using [`slice::sort_by`]. since the sort is stable, records at equal
/// distances stay in the order the iterator produced them. `collected` is
/// cleared first and is left holding the first `min(k, records)` neighbors
/// in ascending order. returns the number of neighbors kept.
pub fn nearest_neighbors<'a, F, R, D>(
    k: usize,
    records: R,
    algo: F,
    datapoint: &[f64],
    collected: &mut Vec<Neighbor<'a>>,
) -> Result<usize>
where
    // accepting any generic that can return a reference to a slice of f64's
    D: AsRef<[f64]>,
    // accepting any generic that is an iterator that returns a tuple of
    // D and the label associated with it
    R: Iterator<Item = (D, &'a str)>,
    F: Fn(&[f64], &[f64]) -> f64,
{
    if k == 0 {
        return Err(Error::InvalidK);
    }

    collected.clear();

    for (data, label) in records {
        collected.push(Neighbor {
            label,
            distance: distance::measure(&algo, datapoint, data.as_ref())?,
        });
    }

    collected.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let min = std::cmp::min(k, collected.len());

    collected.truncate(min);

    Ok(min)
}

/// finds the neighbors for the datapoint and picks the majority label. see
/// [`vote::majority`] for how ties are resolved. returns [`None`] when there
/// are no records to compare against.
pub fn classify_datapoint<'a, F, R, D>(
    k: usize,
    records: R,
    algo: F,
    datapoint: &[f64],
    collected: &mut Vec<Neighbor<'a>>,
) -> Result<Option<&'a str>>
where
    D: AsRef<[f64]>,
    R: Iterator<Item = (D, &'a str)>,
    F: Fn(&[f64], &[f64]) -> f64,
{
    nearest_neighbors(k, records, algo, datapoint, collected)?;

    Ok(vote::majority(collected))
}
