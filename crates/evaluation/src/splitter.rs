//! Train/test and k-fold partitioning.
//!
//! Both splitters keep the relative order of the input within each side,
//! so a k-fold split of a train side enumerates records in load order
//! unless a [`FoldOrdering`] says otherwise.

use crate::error::{EvalError, Result};
use data_loader::Rating;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Enumeration order used to assign fold indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoldOrdering {
    /// Order of the slice as given
    #[default]
    AsLoaded,
    /// Stable sort by `(user_id, movie_id)` first
    ByUserMovie,
}

/// Randomized split: each record independently goes to train with
/// probability `train_fraction`, otherwise to test.
///
/// Side sizes are binomial around `train_fraction`, not exact. The same
/// `seed` on the same input always yields the same partition.
pub fn train_test_split<T: Clone>(
    records: &[T],
    train_fraction: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>)> {
    if !(0.0..=1.0).contains(&train_fraction) {
        return Err(EvalError::InvalidTrainFraction(train_fraction));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity((records.len() as f64 * train_fraction) as usize);
    let mut test = Vec::new();

    for record in records {
        if rng.random::<f64>() < train_fraction {
            train.push(record.clone());
        } else {
            test.push(record.clone());
        }
    }

    debug!(
        "Split {} records into {} train / {} test (seed {})",
        records.len(),
        train.len(),
        test.len(),
        seed
    );
    Ok((train, test))
}

/// Contiguous-index k-fold split: returns `(train, validation)`.
///
/// With `part_size = len / k` (floor), record `i` is in validation iff
/// `fold_index * part_size <= i < (fold_index + 1) * part_size`.
///
/// When `len` is not a multiple of `k`, the trailing `len % k` records
/// never land in any validation set; they are in every fold's train side.
pub fn k_fold_split<T: Clone>(
    dataset: &[T],
    k: usize,
    fold_index: usize,
) -> Result<(Vec<T>, Vec<T>)> {
    let range = fold_range(dataset.len(), k, fold_index)?;

    let mut train = Vec::with_capacity(dataset.len() - range.len());
    let mut validation = Vec::with_capacity(range.len());
    for (index, record) in dataset.iter().enumerate() {
        if range.contains(&index) {
            validation.push(record.clone());
        } else {
            train.push(record.clone());
        }
    }
    Ok((train, validation))
}

/// Index range of the validation part of fold `fold_index`
pub fn fold_range(len: usize, k: usize, fold_index: usize) -> Result<std::ops::Range<usize>> {
    if k == 0 {
        return Err(EvalError::InvalidFoldCount(k));
    }
    if fold_index >= k {
        return Err(EvalError::FoldIndexOutOfRange {
            index: fold_index,
            k,
        });
    }
    let part_size = len / k;
    Ok(fold_index * part_size..(fold_index + 1) * part_size)
}

/// Apply `ordering` to a dataset before fold assignment
pub fn ordered_for_folds(dataset: &[Rating], ordering: FoldOrdering) -> Vec<Rating> {
    let mut ordered = dataset.to_vec();
    if ordering == FoldOrdering::ByUserMovie {
        ordered.sort_by_key(Rating::key);
    }
    ordered
}
