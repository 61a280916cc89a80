//! Root-mean-square error over a key join of actual and predicted scores.

use crate::error::{EvalError, Result};
use data_loader::{MovieId, Prediction, Rating, UserId};
use std::collections::HashMap;

/// RMSE between `actual` ratings and `predicted` scores.
///
/// The two sides are inner-joined on `(user_id, movie_id)`:
/// - actual rows with no prediction are left out, not penalized
/// - duplicate keys join as a multiset, every actual row pairs with every
///   prediction for the same key
///
/// Returns [`EvalError::NoOverlappingPredictions`] when nothing matches.
pub fn compute_rmse(actual: &[Rating], predicted: &[Prediction]) -> Result<f64> {
    let mut by_key: HashMap<(UserId, MovieId), Vec<f32>> = HashMap::with_capacity(predicted.len());
    for prediction in predicted {
        by_key
            .entry(prediction.key())
            .or_default()
            .push(prediction.predicted_score);
    }

    let mut sum = 0.0f64;
    let mut matched = 0usize;
    for rating in actual {
        if let Some(scores) = by_key.get(&rating.key()) {
            for &score in scores {
                let err = rating.score as f64 - score as f64;
                sum += err * err;
                matched += 1;
            }
        }
    }

    if matched == 0 {
        return Err(EvalError::NoOverlappingPredictions);
    }
    Ok((sum / matched as f64).sqrt())
}
