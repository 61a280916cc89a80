//! Popularity-confidence filter.
//!
//! A prediction for a movie with only a handful of ratings is not trusted
//! enough to recommend, no matter how high it is.

use crate::traits::Filter;
use anyhow::Result;
use sources::ScoredCandidate;

/// Minimum number of ratings a movie needs by default
pub const DEFAULT_POPULARITY_THRESHOLD: u32 = 25;

/// Removes candidates whose rating count is below `min_count`.
#[derive(Debug, Clone, Copy)]
pub struct PopularityFilter {
    min_count: u32,
}

impl PopularityFilter {
    /// Create a new PopularityFilter.
    ///
    /// # Arguments
    /// * `min_count` - Minimum number of ratings to keep a movie (typically 25)
    pub fn new(min_count: u32) -> Self {
        Self { min_count }
    }
}

impl Default for PopularityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_POPULARITY_THRESHOLD)
    }
}

impl Filter for PopularityFilter {
    fn name(&self) -> &str {
        "PopularityFilter"
    }

    fn apply(&self, candidates: Vec<ScoredCandidate>) -> Result<Vec<ScoredCandidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.rating_count >= self.min_count)
            .collect())
    }
}
