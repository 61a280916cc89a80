//! Unrated candidate source
//!
//! ## Algorithm
//! 1. Drop every rating made by the target user
//! 2. Take the distinct movie ids of what remains
//! 3. Pair each with the target user
//!
//! This is "movies someone else rated", not "movies the user hasn't rated":
//! a movie the user rated that others also rated is still a candidate, and
//! a movie rated only by the user is not.

use crate::types::Candidate;
use data_loader::{MovieId, RatingRepository, UserId};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Generates the candidate set for a user from the full rating table
#[derive(Debug, Clone)]
pub struct UnratedCandidateSource {
    /// Shared reference to the ratings (read-only, so no Mutex needed)
    repository: Arc<RatingRepository>,
}

impl UnratedCandidateSource {
    pub fn new(repository: Arc<RatingRepository>) -> Self {
        Self { repository }
    }

    /// Candidates for `user_id`, ordered by movie id
    #[instrument(skip(self))]
    pub fn get_candidates(&self, user_id: UserId) -> Vec<Candidate> {
        let movie_ids = self
            .repository
            .ratings()
            .par_iter()
            .filter(|rating| rating.user_id != user_id)
            .fold(HashSet::new, |mut local: HashSet<MovieId>, rating| {
                local.insert(rating.movie_id);
                local
            })
            .reduce(HashSet::new, |mut acc, local| {
                acc.extend(local);
                acc
            });

        let mut movie_ids: Vec<MovieId> = movie_ids.into_iter().collect();
        movie_ids.sort_unstable();

        debug!("Generated {} candidates for user {}", movie_ids.len(), user_id);
        movie_ids
            .into_iter()
            .map(|movie_id| Candidate::new(user_id, movie_id))
            .collect()
    }
}
