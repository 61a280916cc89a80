//! k-fold cross-validation.
//!
//! ## Algorithm
//! For each fold index `0..k`:
//! 1. `k_fold_split` the (ordered) training data
//! 2. Train a fresh model on the fold's train side
//! 3. Predict the `(user, movie)` projection of the validation side
//! 4. RMSE of validation vs. predictions
//!
//! The reported error is the unweighted mean of the k fold errors, even
//! when folds differ in size.

use crate::error::{EvalError, Result};
use crate::metrics::compute_rmse;
use crate::splitter::{FoldOrdering, k_fold_split, ordered_for_folds};
use data_loader::Rating;
use serde::Serialize;
use tracing::{info, instrument};
use trainer::{Model, ModelTrainer, TrainingParams, prediction_pairs};

/// Per-fold errors and their mean
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidationReport {
    pub fold_errors: Vec<f64>,
    pub mean_error: f64,
}

impl CrossValidationReport {
    /// Build a report from fold errors in fold order
    pub fn from_fold_errors(fold_errors: Vec<f64>) -> Result<Self> {
        if fold_errors.is_empty() {
            return Err(EvalError::InvalidFoldCount(0));
        }
        let mean_error = fold_errors.iter().sum::<f64>() / fold_errors.len() as f64;
        Ok(Self {
            fold_errors,
            mean_error,
        })
    }
}

/// Run k-fold cross-validation of `trainer` over `training_data`.
#[instrument(skip(trainer, training_data), fields(ratings = training_data.len()))]
pub fn k_fold_cross_validate<T: ModelTrainer>(
    trainer: &T,
    training_data: &[Rating],
    k: usize,
    params: &TrainingParams,
    ordering: FoldOrdering,
) -> Result<CrossValidationReport> {
    if k == 0 {
        return Err(EvalError::InvalidFoldCount(k));
    }
    info!(
        "Cross-validating lambda:{} rank:{} iterations:{} k:{}",
        params.lambda, params.rank, params.iterations, k
    );

    let dataset = ordered_for_folds(training_data, ordering);
    let fold_errors = (0..k)
        .map(|fold_index| evaluate_fold(trainer, &dataset, k, fold_index, params))
        .collect::<Result<Vec<f64>>>()?;

    let report = CrossValidationReport::from_fold_errors(fold_errors)?;
    info!("k-fold done! mean rmse = {:.4}", report.mean_error);
    Ok(report)
}

/// Train on one fold's train side and score its validation side.
///
/// `dataset` must already be in fold enumeration order.
pub fn evaluate_fold<T: ModelTrainer>(
    trainer: &T,
    dataset: &[Rating],
    k: usize,
    fold_index: usize,
    params: &TrainingParams,
) -> Result<f64> {
    let (train, validation) = k_fold_split(dataset, k, fold_index)?;
    if validation.is_empty() {
        return Err(EvalError::EmptyValidationFold(fold_index));
    }

    let model = trainer.train(&train, params)?;
    let predictions = model.predict_all(&prediction_pairs(&validation));
    let error = compute_rmse(&validation, &predictions)?;

    info!(
        "Fold {}/{}: train={} validation={} predicted={} rmse={:.4}",
        fold_index + 1,
        k,
        train.len(),
        validation.len(),
        predictions.len(),
        error
    );
    Ok(error)
}
