use crate::error::{Error, Result};

/// calculates the squared euclidean distance between 2 sets of datapoints
///
/// the square root is skipped since it does not change the ordering of the
/// neighbors.
pub fn squared_euclidean(a_data: &[f64], b_data: &[f64]) -> f64 {
    // we will expect the total datapoints from a and b to be the same and just
    // zip them together for the iterator chain
    a_data
        .iter()
        .zip(b_data)
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
}

/// calculates the euclidean distance between 2 sets of datapoints
pub fn euclidean(a_data: &[f64], b_data: &[f64]) -> f64 {
    squared_euclidean(a_data, b_data).sqrt()
}

/// calculates the manhattan distance between 2 sets of datapoints
pub fn manhattan(a_data: &[f64], b_data: &[f64]) -> f64 {
    // similar to the euclidean distance expectation
    a_data
        .iter()
        .zip(b_data)
        .map(|(a, b)| (a - b).abs())
        .sum::<f64>()
}

/// runs the given distance algorithm after verifying that both sets of
/// datapoints have the same length
pub fn measure<F>(algo: F, a_data: &[f64], b_data: &[f64]) -> Result<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    if a_data.len() != b_data.len() {
        return Err(Error::DimensionMismatch {
            expected: a_data.len(),
            found: b_data.len(),
        });
    }

    Ok(algo(a_data, b_data))
}
