use evaluation::EvalError;
use thiserror::Error;
use trainer::TrainError;

/// Errors surfaced by the engine's training, evaluation and serving paths
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No train/test split: call with_split first")]
    NoSplit,

    #[error("No trained model: train before evaluating or recommending")]
    ModelNotTrained,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error(transparent)]
    Training(#[from] TrainError),

    #[error("Filter pipeline failed: {0}")]
    Pipeline(#[from] anyhow::Error),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
