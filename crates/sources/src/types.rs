//! Types shared by candidate generation and the filtering pipeline.

use data_loader::{MovieId, UserId};
use serde::{Deserialize, Serialize};

/// A `(user, movie)` pair eligible to be scored for recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub user_id: UserId,
    pub movie_id: MovieId,
}

impl Candidate {
    pub fn new(user_id: UserId, movie_id: MovieId) -> Self {
        Self { user_id, movie_id }
    }

    /// The pair in the shape `Model::predict_all` expects
    pub fn pair(&self) -> (UserId, MovieId) {
        (self.user_id, self.movie_id)
    }
}

/// A candidate after scoring and joining with the movie catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub movie_id: MovieId,
    pub title: String,
    pub predicted_score: f32,
    /// Number of ratings the movie received in the whole dataset
    pub rating_count: u32,
}
