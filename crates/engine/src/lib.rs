//! Recommendation engine for the movie-eval workspace.
//!
//! This crate ties the other crates together behind an immutable
//! [`EngineState`]: load ratings, split, train, measure RMSE, cross-validate
//! and serve top-N recommendations.
//!
//! ## Example Usage
//! ```ignore
//! use std::path::Path;
//! use data_loader::RatingRepository;
//! use engine::{EngineConfig, EngineState};
//! use trainer::AlsTrainer;
//!
//! let repository = RatingRepository::load_from_dir(Path::new("data/ml-latest-small"))?;
//! let state = EngineState::new(repository, AlsTrainer, EngineConfig::default())
//!     .with_split()?
//!     .train_on_training_set()?;
//! println!("test rmse = {:.4}", state.test_error()?);
//! let top = state.train_on_all()?.top_ratings(1, 10)?;
//! ```

pub mod config;
pub mod error;
pub mod recommender;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{DEFAULT_FOLDS, DEFAULT_TRAIN_FRACTION, EngineConfig};
pub use error::{EngineError, Result};
pub use recommender::Recommendation;
pub use state::{EngineState, TrainTestSplit};
