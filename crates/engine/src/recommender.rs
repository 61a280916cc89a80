//! # Recommender
//!
//! The serving path over an [`EngineState`]:
//! 1. Generate candidates (movies other users rated, paired with the user)
//! 2. Score them with the state's model
//! 3. Inner-join with catalog titles and rating counts
//! 4. Apply the filter pipeline (popularity threshold)
//! 5. Rank by predicted score and take the top N
//!
//! Ties on predicted score are broken by ascending movie id, so the output
//! is deterministic for a given state.

use std::time::Instant;

use data_loader::{MovieId, Prediction, UserId};
use pipeline::FilterPipeline;
use pipeline::filters::PopularityFilter;
use serde::Serialize;
use sources::{ScoredCandidate, UnratedCandidateSource};
use tracing::{debug, info, instrument};
use trainer::{Model, ModelTrainer};

use crate::error::Result;
use crate::state::EngineState;

/// Final recommendation returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub predicted_score: f32,
    /// How many ratings the movie has across the whole dataset
    pub rating_count: u32,
}

impl From<ScoredCandidate> for Recommendation {
    fn from(candidate: ScoredCandidate) -> Self {
        Self {
            movie_id: candidate.movie_id,
            title: candidate.title,
            predicted_score: candidate.predicted_score,
            rating_count: candidate.rating_count,
        }
    }
}

impl<T: ModelTrainer> EngineState<T> {
    /// Up to `count` recommendations for `user_id`, best first.
    #[instrument(skip(self))]
    pub fn top_ratings(&self, user_id: UserId, count: usize) -> Result<Vec<Recommendation>> {
        let start_time = Instant::now();
        let model = self.require_model()?;

        let source = UnratedCandidateSource::new(self.repository.clone());
        let pairs: Vec<(UserId, MovieId)> = source
            .get_candidates(user_id)
            .iter()
            .map(|c| c.pair())
            .collect();

        let scored = self.join_with_catalog(model.predict_all(&pairs));
        debug!("Joined {} predictions with the catalog", scored.len());

        let filtered = self.filter_pipeline().apply(scored)?;
        debug!(
            "{} candidates pass the popularity threshold of {}",
            filtered.len(),
            self.config.popularity_threshold
        );

        let recommendations = rank_and_select(filtered, count);
        info!(
            "Selected top {} recommendations for user {} in {:.2?}",
            recommendations.len(),
            user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Predicted scores of specific movies for `user_id`, best first.
    ///
    /// No popularity filter and no truncation; movies the model cannot
    /// score or the catalog does not know are dropped.
    pub fn predict_for_movies(
        &self,
        user_id: UserId,
        movie_ids: &[MovieId],
    ) -> Result<Vec<Recommendation>> {
        let model = self.require_model()?;
        let pairs: Vec<(UserId, MovieId)> = movie_ids.iter().map(|&m| (user_id, m)).collect();

        let scored = self.join_with_catalog(model.predict_all(&pairs));
        Ok(rank_and_select(scored, usize::MAX))
    }

    fn filter_pipeline(&self) -> FilterPipeline {
        FilterPipeline::new().add_filter(PopularityFilter::new(self.config.popularity_threshold))
    }

    /// Inner join of predictions with titles and rating counts
    fn join_with_catalog(&self, predictions: Vec<Prediction>) -> Vec<ScoredCandidate> {
        predictions
            .into_iter()
            .filter_map(|prediction| {
                let title = self.catalog.title(prediction.movie_id)?;
                let counts = self.catalog.rating_count(prediction.movie_id)?;
                Some(ScoredCandidate {
                    movie_id: prediction.movie_id,
                    title: title.to_string(),
                    predicted_score: prediction.predicted_score,
                    rating_count: counts.count,
                })
            })
            .collect()
    }
}

/// Sort by predicted score DESC, movie id ASC, and keep `limit`.
/// Non-finite scores are dropped; they have no meaningful rank.
fn rank_and_select(mut scored: Vec<ScoredCandidate>, limit: usize) -> Vec<Recommendation> {
    scored.retain(|candidate| candidate.predicted_score.is_finite());
    scored.sort_by(|a, b| {
        b.predicted_score
            .total_cmp(&a.predicted_score)
            .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
    scored.truncate(limit);
    scored.into_iter().map(Recommendation::from).collect()
}
