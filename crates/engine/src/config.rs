//! Engine configuration.
//!
//! Every knob has a default, so a config file only needs the fields it
//! changes:
//!
//! ```json
//! { "rank": 12, "lambda": 0.05, "popularity_threshold": 50 }
//! ```

use evaluation::FoldOrdering;
use pipeline::filters::DEFAULT_POPULARITY_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;
use trainer::TrainingParams;

use crate::error::{EngineError, Result};

/// Fraction of ratings kept for training by default
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.75;

/// Default number of cross-validation folds
pub const DEFAULT_FOLDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Latent factor dimension
    pub rank: usize,
    pub iterations: usize,
    /// Regularization strength
    pub lambda: f64,
    /// Seeds both the train/test split and model initialization
    pub seed: u64,
    pub train_fraction: f64,
    pub folds: usize,
    /// Minimum rating count for a movie to be recommended
    pub popularity_threshold: u32,
    pub fold_ordering: FoldOrdering,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let params = TrainingParams::default();
        Self {
            rank: params.rank,
            iterations: params.iterations,
            lambda: params.lambda,
            seed: params.seed,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            folds: DEFAULT_FOLDS,
            popularity_threshold: DEFAULT_POPULARITY_THRESHOLD,
            fold_ordering: FoldOrdering::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Hyperparameters for a training call
    pub fn training_params(&self) -> TrainingParams {
        TrainingParams {
            rank: self.rank,
            iterations: self.iterations,
            lambda: self.lambda,
            seed: self.seed,
        }
    }
}
