//! # Engine State
//!
//! An immutable snapshot of everything the evaluation and serving paths
//! read: ratings, catalog, train/test split and trained model.
//!
//! Operations that would "update" the engine (splitting, retraining)
//! return a new `EngineState` instead of mutating this one. A caller still
//! holding the previous snapshot keeps seeing a consistent model, split and
//! catalog, so no lock is needed around "retrain then re-evaluate".
//! The heavy parts are behind `Arc`, so cloning a state is cheap.

use std::sync::Arc;
use std::time::Instant;

use data_loader::{MovieCatalog, Rating, RatingRepository};
use evaluation::{
    CrossValidationReport, EvalError, compute_rmse, evaluate_fold, k_fold_cross_validate,
    ordered_for_folds, train_test_split,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use trainer::{Model, ModelTrainer, TrainingParams, prediction_pairs};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// A seeded train/test partition of the rating set
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<Rating>,
    pub test: Vec<Rating>,
    pub train_fraction: f64,
    pub seed: u64,
}

/// Snapshot of the engine; see the module docs
pub struct EngineState<T: ModelTrainer> {
    pub(crate) config: EngineConfig,
    pub(crate) trainer: Arc<T>,
    pub(crate) repository: Arc<RatingRepository>,
    pub(crate) catalog: Arc<MovieCatalog>,
    pub(crate) split: Option<Arc<TrainTestSplit>>,
    pub(crate) model: Option<Arc<T::Model>>,
}

impl<T: ModelTrainer> Clone for EngineState<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            trainer: Arc::clone(&self.trainer),
            repository: Arc::clone(&self.repository),
            catalog: Arc::clone(&self.catalog),
            split: self.split.clone(),
            model: self.model.clone(),
        }
    }
}

impl<T: ModelTrainer> EngineState<T> {
    /// Build the initial state: computes the movie catalog, no split, no
    /// model.
    pub fn new(repository: RatingRepository, trainer: T, config: EngineConfig) -> Self {
        info!("Starting up the recommendation engine");
        let catalog = MovieCatalog::from_repository(&repository);
        Self {
            config,
            trainer: Arc::new(trainer),
            repository: Arc::new(repository),
            catalog: Arc::new(catalog),
            split: None,
            model: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &RatingRepository {
        &self.repository
    }

    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }

    pub fn split(&self) -> Option<&TrainTestSplit> {
        self.split.as_deref()
    }

    pub fn model(&self) -> Option<&T::Model> {
        self.model.as_deref()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// New state with a different config. Split and model are carried over;
    /// the new values apply to the next split, training or ranking call.
    pub fn with_config(&self, config: EngineConfig) -> Self {
        let mut next = self.clone();
        next.config = config;
        next
    }

    /// New state with a fresh train/test split using the configured
    /// `train_fraction` and `seed`. The current model is carried over.
    pub fn with_split(&self) -> Result<Self> {
        self.with_split_using(self.config.train_fraction, self.config.seed)
    }

    /// New state with a train/test split using explicit parameters
    pub fn with_split_using(&self, train_fraction: f64, seed: u64) -> Result<Self> {
        let (train, test) = train_test_split(self.repository.ratings(), train_fraction, seed)?;
        info!(
            "Split {} ratings: {} train, {} test",
            self.repository.ratings().len(),
            train.len(),
            test.len()
        );

        let mut next = self.clone();
        next.split = Some(Arc::new(TrainTestSplit {
            train,
            test,
            train_fraction,
            seed,
        }));
        Ok(next)
    }

    /// New state whose model is trained on the train side of the split
    /// with the configured hyperparameters
    pub fn train_on_training_set(&self) -> Result<Self> {
        self.train_on_training_set_with(&self.config.training_params())
    }

    /// New state whose model is trained on the train side of the split
    /// with explicit hyperparameters
    pub fn train_on_training_set_with(&self, params: &TrainingParams) -> Result<Self> {
        let split = self.require_split()?;
        self.trained_on(&split.train, params)
    }

    /// New state whose model is trained on every rating
    pub fn train_on_all(&self) -> Result<Self> {
        self.trained_on(self.repository.ratings(), &self.config.training_params())
    }

    /// RMSE of the current model over the train side of the split
    pub fn train_error(&self) -> Result<f64> {
        let split = self.require_split()?;
        self.error_over(&split.train)
    }

    /// RMSE of the current model over the held-out test side of the split
    pub fn test_error(&self) -> Result<f64> {
        let split = self.require_split()?;
        self.error_over(&split.test)
    }

    /// k-fold cross-validation over the train side of the split, folds run
    /// one after another on the calling thread
    pub fn cross_validate(&self, k: usize) -> Result<CrossValidationReport> {
        let split = self.require_split()?;
        Ok(k_fold_cross_validate(
            self.trainer.as_ref(),
            &split.train,
            k,
            &self.config.training_params(),
            self.config.fold_ordering,
        )?)
    }

    pub(crate) fn require_split(&self) -> Result<&TrainTestSplit> {
        self.split.as_deref().ok_or(EngineError::NoSplit)
    }

    pub(crate) fn require_model(&self) -> Result<&T::Model> {
        self.model.as_deref().ok_or(EngineError::ModelNotTrained)
    }

    fn trained_on(&self, ratings: &[Rating], params: &TrainingParams) -> Result<Self> {
        let start = Instant::now();
        let model = self.trainer.train(ratings, params)?;
        info!(
            "Trained model on {} ratings (rank {}, iterations {}, lambda {}) in {:.2?}",
            ratings.len(),
            params.rank,
            params.iterations,
            params.lambda,
            start.elapsed()
        );

        let mut next = self.clone();
        next.model = Some(Arc::new(model));
        Ok(next)
    }

    fn error_over(&self, ratings: &[Rating]) -> Result<f64> {
        let model = self.require_model()?;
        let predictions = model.predict_all(&prediction_pairs(ratings));
        Ok(compute_rmse(ratings, &predictions)?)
    }
}

impl<T: ModelTrainer + 'static> EngineState<T> {
    /// k-fold cross-validation over the train side of the split with each
    /// fold trained on a blocking worker thread.
    ///
    /// Fold errors are collected in fold order, so the report equals the
    /// one from [`EngineState::cross_validate`].
    pub async fn cross_validate_parallel(&self, k: usize) -> Result<CrossValidationReport> {
        if k == 0 {
            return Err(EvalError::InvalidFoldCount(k).into());
        }
        let split = self.require_split()?;
        let dataset = Arc::new(ordered_for_folds(&split.train, self.config.fold_ordering));
        let params = self.config.training_params();

        info!(
            "Cross-validating lambda:{} rank:{} iterations:{} k:{} on {} ratings",
            params.lambda,
            params.rank,
            params.iterations,
            k,
            dataset.len()
        );

        let mut handles = Vec::with_capacity(k);
        for fold_index in 0..k {
            let trainer = Arc::clone(&self.trainer);
            let dataset = Arc::clone(&dataset);
            handles.push(tokio::task::spawn_blocking(move || {
                evaluate_fold(trainer.as_ref(), &dataset, k, fold_index, &params)
            }));
        }

        let mut fold_errors = Vec::with_capacity(k);
        let mut handles = handles.into_iter();
        while let Some(handle) = handles.next() {
            let outcome = handle
                .await
                .map_err(|e| EngineError::Worker(e.to_string()))
                .and_then(|fold| fold.map_err(EngineError::from));
            match outcome {
                Ok(error) => fold_errors.push(error),
                Err(err) => {
                    warn!("Fold failed, cancelling the remaining folds: {}", err);
                    cancel_and_drain(handles).await;
                    return Err(err);
                }
            }
        }

        let report = CrossValidationReport::from_fold_errors(fold_errors)?;
        info!("k-fold done! mean rmse = {:.4}", report.mean_error);
        Ok(report)
    }
}

/// Abort folds that have not started and wait for running ones, so no
/// training outlives the call that spawned it
async fn cancel_and_drain<R>(handles: impl Iterator<Item = JoinHandle<R>>) {
    let handles: Vec<JoinHandle<R>> = handles.collect();
    for handle in &handles {
        handle.abort();
    }
    for handle in handles {
        let _ = handle.await;
    }
}
