use thiserror::Error;

/// errors produced by the classification core
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// two feature vectors being compared have different lengths
    #[error("dimension mismatch: expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// k must be at least 1
    #[error("k value cannot be 0")]
    InvalidK,

    /// the split rate must be within (0, 1)
    #[error("split rate must be between 0 and 1 (exclusive). given: {0}")]
    InvalidSplitRate(f64),

    /// there is nothing to search against
    #[error("the training partition is empty")]
    EmptyTraining,
}

pub type Result<T> = std::result::Result<T, Error>;
