use thiserror::Error;
use trainer::TrainError;

/// Errors raised by splitting and scoring
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Invalid fold count {0}: need at least one fold")]
    InvalidFoldCount(usize),

    #[error("Fold index {index} out of range for {k} folds")]
    FoldIndexOutOfRange { index: usize, k: usize },

    #[error("Invalid train fraction {0}: must be within [0, 1]")]
    InvalidTrainFraction(f64),

    #[error("No overlapping predictions to score")]
    NoOverlappingPredictions,

    #[error("Validation set of fold {0} is empty")]
    EmptyValidationFold(usize),

    #[error("Training failed: {0}")]
    Training(#[from] TrainError),
}

pub type Result<T> = std::result::Result<T, EvalError>;
