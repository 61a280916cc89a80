//! Core domain types for the ratings dataset.
//!
//! Ratings, movies and predictions are plain `Copy`/`Clone` records so that
//! every derived view (splits, folds, joins) can be built from slices
//! without sharing mutable state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Records
// =============================================================================

/// A single observed rating: one user scoring one movie.
///
/// No range is enforced on `score`; whatever scale the dataset uses is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: f32,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, score: f32) -> Self {
        Self {
            user_id,
            movie_id,
            score,
        }
    }

    /// The `(user, movie)` join key of this rating
    pub fn key(&self) -> (UserId, MovieId) {
        (self.user_id, self.movie_id)
    }
}

/// A row of the movies table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Raw pipe-separated genre list, e.g. `"Adventure|Comedy"`
    pub genres: String,
}

/// A model's predicted score for a `(user, movie)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub predicted_score: f32,
}

impl Prediction {
    pub fn new(user_id: UserId, movie_id: MovieId, predicted_score: f32) -> Self {
        Self {
            user_id,
            movie_id,
            predicted_score,
        }
    }

    pub fn key(&self) -> (UserId, MovieId) {
        (self.user_id, self.movie_id)
    }
}

/// Number of ratings and mean score received by one movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingCount {
    pub movie_id: MovieId,
    pub count: u32,
    pub average: f32,
}

// =============================================================================
// RatingRepository
// =============================================================================

/// Owns the raw ratings and movies exactly as loaded.
///
/// This is the single source of truth; everything else (catalog, splits,
/// models) is a snapshot computed from it. Ratings keep their load order,
/// which is the enumeration order used for fold assignment.
#[derive(Debug, Clone, Default)]
pub struct RatingRepository {
    pub(crate) ratings: Vec<Rating>,
    pub(crate) movies: Vec<Movie>,
}

impl RatingRepository {
    pub fn new(ratings: Vec<Rating>, movies: Vec<Movie>) -> Self {
        Self { ratings, movies }
    }

    /// All ratings in load order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// All movies in load order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Ratings made by `user_id`
    pub fn ratings_for_user(&self, user_id: UserId) -> impl Iterator<Item = &Rating> + '_ {
        self.ratings.iter().filter(move |r| r.user_id == user_id)
    }

    /// Scores grouped by movie id
    pub fn scores_by_movie(&self) -> HashMap<MovieId, Vec<f32>> {
        let mut groups: HashMap<MovieId, Vec<f32>> = HashMap::new();
        for rating in &self.ratings {
            groups.entry(rating.movie_id).or_default().push(rating.score);
        }
        groups
    }

    /// Get counts for debugging/validation: (distinct users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut users: Vec<UserId> = self.ratings.iter().map(|r| r.user_id).collect();
        users.sort_unstable();
        users.dedup();
        (users.len(), self.movies.len(), self.ratings.len())
    }
}
