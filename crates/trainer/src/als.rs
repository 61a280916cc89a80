//! Explicit-feedback alternating least squares.
//!
//! ## Algorithm
//! 1. Map user and movie ids to dense indices in first-seen order
//! 2. Initialize both factor matrices from a seeded RNG
//! 3. Each iteration:
//!    - fix movie factors, solve every user row in closed form
//!    - fix user factors, solve every movie row in closed form
//!
//! A row with `n` observations minimizes
//! `sum (r - u·v)^2 + lambda * n * |u|^2`, i.e. the regularization is
//! scaled by the row's observation count.
//!
//! Row solves are independent, so each half-iteration runs on rayon.

use crate::error::{Result, TrainError};
use crate::linalg::cholesky_solve;
use crate::{Model, ModelTrainer, TrainingParams};
use data_loader::{MovieId, Prediction, Rating, UserId};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Default [`ModelTrainer`]: alternating least squares
#[derive(Debug, Clone, Copy, Default)]
pub struct AlsTrainer;

/// Factor matrices learned by [`AlsTrainer`]
#[derive(Debug, Clone)]
pub struct AlsModel {
    user_index: HashMap<UserId, usize>,
    movie_index: HashMap<MovieId, usize>,
    /// `users x rank`
    user_factors: Array2<f32>,
    /// `movies x rank`
    movie_factors: Array2<f32>,
}

/// Observations of one row: (index into the opposite factor matrix, score)
type Row = Vec<(usize, f32)>;

impl ModelTrainer for AlsTrainer {
    type Model = AlsModel;

    #[instrument(skip(self, training), fields(ratings = training.len(), rank = params.rank))]
    fn train(&self, training: &[Rating], params: &TrainingParams) -> Result<AlsModel> {
        validate(training, params)?;

        let mut user_index: HashMap<UserId, usize> = HashMap::new();
        let mut movie_index: HashMap<MovieId, usize> = HashMap::new();
        let mut user_rows: Vec<Row> = Vec::new();
        let mut movie_rows: Vec<Row> = Vec::new();

        for rating in training {
            let u = *user_index.entry(rating.user_id).or_insert_with(|| {
                user_rows.push(Vec::new());
                user_rows.len() - 1
            });
            let m = *movie_index.entry(rating.movie_id).or_insert_with(|| {
                movie_rows.push(Vec::new());
                movie_rows.len() - 1
            });
            user_rows[u].push((m, rating.score));
            movie_rows[m].push((u, rating.score));
        }

        info!(
            "Training ALS model: {} users, {} movies, {} ratings",
            user_rows.len(),
            movie_rows.len(),
            training.len()
        );

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut user_factors = random_factors(&mut rng, user_rows.len(), params.rank);
        let mut movie_factors = random_factors(&mut rng, movie_rows.len(), params.rank);

        for iteration in 0..params.iterations {
            user_factors = solve_rows(&user_rows, &movie_factors, params)?;
            movie_factors = solve_rows(&movie_rows, &user_factors, params)?;

            debug!(
                "ALS iteration {}: training rmse = {:.4}",
                iteration,
                training_rmse(&user_rows, &user_factors, &movie_factors)
            );
        }

        info!("ALS model built!");
        Ok(AlsModel {
            user_index,
            movie_index,
            user_factors,
            movie_factors,
        })
    }
}

impl AlsModel {
    /// Predicted score for one pair, if both ids were seen in training
    pub fn predict(&self, user_id: UserId, movie_id: MovieId) -> Option<f32> {
        let u = self.user_index.get(&user_id)?;
        let m = self.movie_index.get(&movie_id)?;
        Some(self.user_factors.row(*u).dot(&self.movie_factors.row(*m)))
    }
}

impl Model for AlsModel {
    fn predict_all(&self, pairs: &[(UserId, MovieId)]) -> Vec<Prediction> {
        pairs
            .par_iter()
            .filter_map(|&(user_id, movie_id)| {
                self.predict(user_id, movie_id)
                    .map(|score| Prediction::new(user_id, movie_id, score))
            })
            .collect()
    }
}

fn validate(training: &[Rating], params: &TrainingParams) -> Result<()> {
    if training.is_empty() {
        return Err(TrainError::EmptyTrainingSet);
    }
    if params.rank == 0 {
        return Err(TrainError::InvalidRank(params.rank));
    }
    if !params.lambda.is_finite() || params.lambda < 0.0 {
        return Err(TrainError::InvalidLambda(params.lambda));
    }
    Ok(())
}

fn random_factors(rng: &mut StdRng, rows: usize, rank: usize) -> Array2<f32> {
    let scale = 1.0 / (rank as f32).sqrt();
    Array2::from_shape_fn((rows, rank), |_| rng.random::<f32>() * scale)
}

/// Re-solve every row against the fixed `other` factor matrix
fn solve_rows(rows: &[Row], other: &Array2<f32>, params: &TrainingParams) -> Result<Array2<f32>> {
    let solved: Vec<Array1<f32>> = rows
        .par_iter()
        .map(|row| solve_row(row, other, params.rank, params.lambda))
        .collect::<Result<_>>()?;

    let mut factors = Array2::<f32>::zeros((rows.len(), params.rank));
    for (i, x) in solved.iter().enumerate() {
        factors.row_mut(i).assign(x);
    }
    Ok(factors)
}

/// Normal equations for one row:
/// `(sum v v^T + lambda * n * I) x = sum r v`
fn solve_row(row: &Row, other: &Array2<f32>, rank: usize, lambda: f64) -> Result<Array1<f32>> {
    let mut a = Array2::<f64>::zeros((rank, rank));
    let mut b = Array1::<f64>::zeros(rank);

    for &(idx, score) in row {
        let v = other.row(idx).mapv(f64::from);
        for i in 0..rank {
            for j in 0..rank {
                a[[i, j]] += v[i] * v[j];
            }
        }
        b.scaled_add(score as f64, &v);
    }

    let reg = lambda * row.len() as f64;
    a.diag_mut().mapv_inplace(|d| d + reg);

    let x = cholesky_solve(&a, &b)?;
    Ok(x.mapv(|v| v as f32))
}

fn training_rmse(user_rows: &[Row], user_factors: &Array2<f32>, movie_factors: &Array2<f32>) -> f64 {
    let (sum, n) = user_rows
        .par_iter()
        .enumerate()
        .map(|(u, row)| {
            row.iter().fold((0.0f64, 0usize), |(sum, n), &(m, score)| {
                let err = (score - user_factors.row(u).dot(&movie_factors.row(m))) as f64;
                (sum + err * err, n + 1)
            })
        })
        .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    if n == 0 { f64::NAN } else { (sum / n as f64).sqrt() }
}
