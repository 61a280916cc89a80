use thiserror::Error;

/// Errors raised while training a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainError {
    #[error("Cannot train on an empty training set")]
    EmptyTrainingSet,

    #[error("Invalid rank {0}: must be at least 1")]
    InvalidRank(usize),

    #[error("Invalid lambda {0}: must be finite and non-negative")]
    InvalidLambda(f64),

    #[error("Failed to solve normal equations: {0}")]
    Solve(String),
}

pub type Result<T> = std::result::Result<T, TrainError>;
