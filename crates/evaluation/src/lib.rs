//! # Evaluation Crate
//!
//! Offline evaluation of a recommender model:
//!
//! - **splitter**: seeded train/test split and contiguous-index k-fold split
//! - **metrics**: RMSE over an inner join of actual vs. predicted scores
//! - **cross_validation**: k-fold cross-validation driven by any
//!   [`trainer::ModelTrainer`]
//!
//! ## Example Usage
//! ```ignore
//! use evaluation::{FoldOrdering, k_fold_cross_validate, train_test_split};
//! use trainer::{AlsTrainer, TrainingParams};
//!
//! let (train, test) = train_test_split(repository.ratings(), 0.75, 0)?;
//! let report = k_fold_cross_validate(
//!     &AlsTrainer,
//!     &train,
//!     5,
//!     &TrainingParams::default(),
//!     FoldOrdering::AsLoaded,
//! )?;
//! println!("mean rmse {:.4}", report.mean_error);
//! ```

pub mod cross_validation;
pub mod error;
pub mod metrics;
pub mod splitter;

// Re-export main types
pub use cross_validation::{CrossValidationReport, evaluate_fold, k_fold_cross_validate};
pub use error::{EvalError, Result};
pub use metrics::compute_rmse;
pub use splitter::{FoldOrdering, fold_range, k_fold_split, ordered_for_folds, train_test_split};
