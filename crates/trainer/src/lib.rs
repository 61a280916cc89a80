//! Model training contract for the recommender.
//!
//! The evaluation and ranking layers never look inside a model. They hand a
//! training set plus hyperparameters to a [`ModelTrainer`] and get back a
//! [`Model`] that scores `(user, movie)` pairs in batch.
//!
//! [`AlsTrainer`] is the default implementation: explicit-feedback
//! alternating least squares.
//!
//! ## Example Usage
//! ```ignore
//! use trainer::{AlsTrainer, Model, ModelTrainer, TrainingParams};
//!
//! let params = TrainingParams { rank: 8, iterations: 10, lambda: 0.1, seed: 5 };
//! let model = AlsTrainer.train(&ratings, &params)?;
//! let predictions = model.predict_all(&[(1, 31), (1, 1029)]);
//! ```

pub mod als;
pub mod error;
mod linalg;

use data_loader::{MovieId, Prediction, Rating, UserId};
use serde::{Deserialize, Serialize};

pub use als::{AlsModel, AlsTrainer};
pub use error::{Result, TrainError};

/// Hyperparameters passed to every training call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Latent factor dimension
    pub rank: usize,
    pub iterations: usize,
    /// Regularization strength
    pub lambda: f64,
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            rank: 8,
            iterations: 10,
            lambda: 0.1,
            seed: 5,
        }
    }
}

/// A trained model. Immutable once built.
pub trait Model: Send + Sync {
    /// Score a batch of `(user, movie)` pairs.
    ///
    /// Pairs the model cannot score (user or movie never seen in training)
    /// are omitted from the output, so callers must join on the key rather
    /// than zip by position.
    fn predict_all(&self, pairs: &[(UserId, MovieId)]) -> Vec<Prediction>;
}

/// Turns a training set into a [`Model`].
pub trait ModelTrainer: Send + Sync {
    type Model: Model + 'static;

    fn train(&self, training: &[Rating], params: &TrainingParams) -> Result<Self::Model>;
}

/// `(user, movie)` projection of a rating set, the input shape of
/// [`Model::predict_all`]
pub fn prediction_pairs(ratings: &[Rating]) -> Vec<(UserId, MovieId)> {
    ratings.iter().map(Rating::key).collect()
}
