//! Integration tests for the pipeline.
//!
//! These tests run candidates from a real rating repository through
//! scoring, the catalog join and the popularity filter.

use data_loader::{Movie, MovieCatalog, Rating, RatingRepository};
use pipeline::FilterPipeline;
use pipeline::filters::*;
use sources::{ScoredCandidate, UnratedCandidateSource};
use std::sync::Arc;

fn create_test_setup() -> (Arc<RatingRepository>, MovieCatalog) {
    let mut ratings = Vec::new();

    // Movie 1: popular, 30 ratings from users 2..=31
    for user_id in 2..=31 {
        ratings.push(Rating::new(user_id, 1, 4.5));
    }
    // Movie 2: 5 ratings, below the default threshold
    for user_id in 2..=6 {
        ratings.push(Rating::new(user_id, 2, 2.0));
    }
    // Movie 3: exactly at the threshold, one rating from user 1
    for user_id in 1..=25 {
        ratings.push(Rating::new(user_id, 3, 3.5));
    }
    // Movie 4: only user 1 rated it
    ratings.push(Rating::new(1, 4, 5.0));

    let movies = [
        (1, "Popular Action (2000)"),
        (2, "Obscure Drama (1995)"),
        (3, "Borderline SciFi (2005)"),
        (4, "Private Favourite (2001)"),
    ]
    .into_iter()
    .map(|(id, title)| Movie {
        id,
        title: title.to_string(),
        genres: "Action".to_string(),
    })
    .collect();

    let repository = RatingRepository::new(ratings, movies);
    let catalog = MovieCatalog::from_repository(&repository);
    (Arc::new(repository), catalog)
}

/// Stand-in for a model: every candidate scores its movie's average
fn score_candidates(
    repository: Arc<RatingRepository>,
    catalog: &MovieCatalog,
    user_id: u32,
) -> Vec<ScoredCandidate> {
    UnratedCandidateSource::new(repository)
        .get_candidates(user_id)
        .into_iter()
        .filter_map(|candidate| {
            let counts = catalog.rating_count(candidate.movie_id)?;
            Some(ScoredCandidate {
                movie_id: candidate.movie_id,
                title: catalog.title(candidate.movie_id)?.to_string(),
                predicted_score: counts.average,
                rating_count: counts.count,
            })
        })
        .collect()
}

#[test]
fn test_full_pipeline_filters_correctly() {
    let (repository, catalog) = create_test_setup();
    let scored = score_candidates(repository, &catalog, 1);

    // Movie 4 is rated only by user 1, so it is never a candidate
    assert!(scored.iter().all(|c| c.movie_id != 4));
    assert_eq!(scored.len(), 3);

    let pipeline = FilterPipeline::new().add_filter(PopularityFilter::default());
    let filtered = pipeline.apply(scored).unwrap();

    let mut ids: Vec<u32> = filtered.iter().map(|c| c.movie_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 3], "movie 2 has too few ratings");
}

#[test]
fn test_other_users_see_the_private_favourite() {
    let (repository, catalog) = create_test_setup();
    let scored = score_candidates(repository, &catalog, 2);

    let favourite = scored.iter().find(|c| c.movie_id == 4).unwrap();
    assert_eq!(favourite.rating_count, 1);

    let filtered = FilterPipeline::new()
        .add_filter(PopularityFilter::default())
        .apply(scored)
        .unwrap();
    assert!(filtered.iter().all(|c| c.movie_id != 4));
}

#[test]
fn test_high_threshold_empties_the_result() {
    let (repository, catalog) = create_test_setup();
    let scored = score_candidates(repository, &catalog, 1);

    let filtered = FilterPipeline::new()
        .add_filter(PopularityFilter::new(100))
        .apply(scored)
        .unwrap();
    assert!(filtered.is_empty());
}
