//! partitioning of a dataset into training and testing instances
use std::str::FromStr;

use clap::ValueEnum;
use log::warn;
use rand::Rng;

use crate::dataset::{Dataset, Instance};
use crate::error::{Error, Result};

/// the fraction of a dataset assigned to training. always within (0, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRate(f64);

impl SplitRate {
    pub fn new(rate: f64) -> Result<Self> {
        if rate.is_finite() && rate > 0.0 && rate < 1.0 {
            Ok(Self(rate))
        } else {
            Err(Error::InvalidSplitRate(rate))
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl FromStr for SplitRate {
    type Err = String;

    fn from_str(given: &str) -> std::result::Result<Self, Self::Err> {
        let Ok(rate) = f64::from_str(given) else {
            return Err(String::from("failed to parse split rate"));
        };

        Self::new(rate).map_err(|err| err.to_string())
    }
}

/// the policy used to decide which side an instance lands on
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum SplitMode {
    /// the first portion of each class (in file order) is used for training
    Proportional,

    /// each instance is used for training with a probability of the split
    /// rate
    Random,
}

/// two disjoint sets of instances taken from a single dataset
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub train: Vec<&'a Instance>,
    pub test: Vec<&'a Instance>,
}

/// splits each class so that the first `floor(rate * n)` instances are used
/// for training and the remaining are used for testing. classes are visited
/// in sorted label order.
pub fn split_proportional(dataset: &Dataset, rate: SplitRate) -> Partition<'_> {
    let mut partition = Partition::default();

    for (label, records) in dataset.classes() {
        let amount = (records.len() as f64 * rate.get()).floor() as usize;

        if amount == 0 {
            warn!("class {label} has no training instances");
        } else if amount == records.len() {
            warn!("class {label} has no testing instances");
        }

        let (train, test) = records.split_at(amount);

        partition.train.extend_from_slice(train);
        partition.test.extend_from_slice(test);
    }

    partition
}

/// assigns each instance to training with a probability of `rate` using the
/// given random source. file order is kept on both sides.
pub fn split_random<'a, R>(dataset: &'a Dataset, rate: SplitRate, rng: &mut R) -> Partition<'a>
where
    R: Rng,
{
    let mut partition = Partition::default();

    for instance in dataset.instances() {
        if rng.random_bool(rate.get()) {
            partition.train.push(instance);
        } else {
            partition.test.push(instance);
        }
    }

    partition
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn dataset(counts: &[(&str, usize)]) -> Dataset {
        let mut instances = Vec::new();
        let mut value = 0.0;

        for (label, count) in counts {
            for _ in 0..*count {
                instances.push(Instance::new(vec![value], *label));
                value += 1.0;
            }
        }

        Dataset::new(instances).unwrap()
    }

    fn rate(given: f64) -> SplitRate {
        SplitRate::new(given).unwrap()
    }

    #[test]
    fn split_rate_bounds() {
        assert!(SplitRate::new(0.5).is_ok());
        assert_eq!(SplitRate::new(0.0), Err(Error::InvalidSplitRate(0.0)));
        assert_eq!(SplitRate::new(1.0), Err(Error::InvalidSplitRate(1.0)));
        assert!(SplitRate::new(f64::NAN).is_err());
        assert!("0.67".parse::<SplitRate>().is_ok());
        assert!("1.5".parse::<SplitRate>().is_err());
        assert!("abc".parse::<SplitRate>().is_err());
    }

    #[test]
    fn proportional_takes_leading_instances() {
        let dataset = dataset(&[("a", 3), ("b", 4)]);
        let partition = split_proportional(&dataset, rate(0.5));

        let train: Vec<f64> = partition.train.iter().map(|i| i.data()[0]).collect();
        let test: Vec<f64> = partition.test.iter().map(|i| i.data()[0]).collect();

        // a: floor(1.5) = 1, b: floor(2.0) = 2
        assert_eq!(train, vec![0.0, 3.0, 4.0]);
        assert_eq!(test, vec![1.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn proportional_small_class_does_not_fail() {
        let dataset = dataset(&[("a", 1), ("b", 10)]);
        let partition = split_proportional(&dataset, rate(0.67));

        assert!(partition.train.iter().all(|i| i.label() == "b"));
        assert_eq!(partition.test.iter().filter(|i| i.label() == "a").count(), 1);
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let dataset = dataset(&[("a", 20), ("b", 20)]);

        let first = split_random(&dataset, rate(0.6), &mut StdRng::seed_from_u64(7));
        let second = split_random(&dataset, rate(0.6), &mut StdRng::seed_from_u64(7));

        assert_eq!(first.train, second.train);
        assert_eq!(first.test, second.test);
    }

    #[test]
    fn random_includes_the_last_instance() {
        let dataset = dataset(&[("a", 5)]);
        let last = dataset.instances().last().unwrap();

        for seed in 0..16 {
            let partition = split_random(&dataset, rate(0.5), &mut StdRng::seed_from_u64(seed));

            assert_eq!(partition.train.len() + partition.test.len(), dataset.len());
            assert!(
                partition
                    .train
                    .iter()
                    .chain(partition.test.iter())
                    .any(|i| std::ptr::eq(*i, last))
            );
        }
    }

    fn assert_disjoint_cover(dataset: &Dataset, partition: &Partition<'_>) {
        for instance in dataset.instances() {
            let in_train = partition.train.iter().filter(|i| std::ptr::eq(**i, instance)).count();
            let in_test = partition.test.iter().filter(|i| std::ptr::eq(**i, instance)).count();

            assert_eq!(in_train + in_test, 1);
        }
    }

    proptest! {
        #[test]
        fn proportional_covers_each_class(
            counts in prop::collection::vec(0usize..30, 1..5),
            given in 0.01f64..0.99,
        ) {
            let labels = ["a", "b", "c", "d"];
            let named: Vec<(&str, usize)> = labels.iter().copied().zip(counts.iter().copied()).collect();
            let dataset = dataset(&named);
            let partition = split_proportional(&dataset, rate(given));

            for (label, count) in &named {
                let train = partition.train.iter().filter(|i| i.label() == *label).count();
                let test = partition.test.iter().filter(|i| i.label() == *label).count();

                prop_assert_eq!(train + test, *count);
                prop_assert_eq!(train, (*count as f64 * given).floor() as usize);
            }

            assert_disjoint_cover(&dataset, &partition);
        }

        #[test]
        fn random_covers_dataset(count in 1usize..50, given in 0.01f64..0.99, seed: u64) {
            let dataset = dataset(&[("a", count)]);
            let partition = split_random(&dataset, rate(given), &mut StdRng::seed_from_u64(seed));

            assert_disjoint_cover(&dataset, &partition);
        }
    }
}
