use std::str::FromStr;

use clap::ValueEnum;

use crate::distance;

/// represents the k value to use for calculations. either a single value or
/// an inclusive range with an optional step (`low-high[,step]`). stored as
/// `(low, high, step)` with `high` inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct KValue((usize, usize, usize));

impl KValue {
    fn parse_range(given: &str) -> Result<Option<(usize, usize)>, &'static str> {
        if let Some((low, high)) = given.split_once('-') {
            let Ok(low) = usize::from_str(low) else {
                return Err("failed to parse low value for k range");
            };

            let Ok(high) = usize::from_str(high) else {
                return Err("failed to parse high value for k range");
            };

            if low == 0 {
                return Err("low value for k range cannot be 0");
            }

            if low > high {
                return Err("low value for k range cannot be greater than the high value");
            }

            Ok(Some((low, high)))
        } else {
            Ok(None)
        }
    }

    /// true if more than a single k value was requested
    pub fn is_range(&self) -> bool {
        self.0.1 > self.0.0
    }

    /// the k values to run with when `total` records are available.
    ///
    /// values larger than `total` are dropped. if that leaves nothing then
    /// the low value is kept so the caller can clamp it.
    pub fn values(&self, total: usize) -> Vec<usize> {
        let (low, high, step) = self.0;

        // values are ascending so stop at the first one past the total
        let capped: Vec<usize> = (low..=high)
            .step_by(step)
            .take_while(|k| *k <= total)
            .collect();

        if capped.is_empty() { vec![low] } else { capped }
    }
}

impl FromStr for KValue {
    type Err = &'static str;

    fn from_str(given: &str) -> Result<Self, Self::Err> {
        if let Some((range, step)) = given.split_once(',') {
            let Ok(step) = usize::from_str(step) else {
                return Err("failed to parse step size for k value");
            };

            if step == 0 {
                return Err("step size must be larger than 0");
            }

            if let Some((low, high)) = Self::parse_range(range)? {
                Ok(Self((low, high, step)))
            } else {
                Err("you must specify a range when using a k range")
            }
        } else if let Some((low, high)) = Self::parse_range(given)? {
            Ok(Self((low, high, 1)))
        } else if let Ok(value) = usize::from_str(given) {
            if value == 0 {
                Err("k value cannot be 0")
            } else {
                Ok(Self((value, value, 1)))
            }
        } else {
            Err("invalid k value specified")
        }
    }
}

/// represents the algorithm to use when calculating distances
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum AlgoType {
    /// euclidean distance without the square root
    SquaredEuclidean,
    Euclidean,
    Manhattan,
}

impl AlgoType {
    pub fn function(&self) -> fn(&[f64], &[f64]) -> f64 {
        match self {
            AlgoType::SquaredEuclidean => distance::squared_euclidean,
            AlgoType::Euclidean => distance::euclidean,
            AlgoType::Manhattan => distance::manhattan,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Datapoint(Vec<f64>);

impl Datapoint {
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl FromStr for Datapoint {
    type Err = &'static str;

    fn from_str(given: &str) -> Result<Self, Self::Err> {
        let mut rtn = Vec::new();
        let iter = given.split(',').map(|v| f64::from_str(v.trim()));

        for result in iter {
            rtn.push(result.map_err(|_| "failed to parse datapoint")?);
        }

        Ok(Self(rtn))
    }
}
