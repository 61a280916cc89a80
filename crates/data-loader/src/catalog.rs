//! MovieCatalog: titles plus per-movie rating aggregates.
//!
//! Built once from a RatingRepository. The catalog is a snapshot; if the
//! repository changes it must be rebuilt.

use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info;

/// `movieId -> title` and `movieId -> (count, average)` lookups
#[derive(Debug, Clone, Default)]
pub struct MovieCatalog {
    titles: HashMap<MovieId, String>,
    rating_counts: HashMap<MovieId, RatingCount>,
}

impl MovieCatalog {
    /// Derive titles and rating aggregates from the repository.
    ///
    /// Movies that nobody rated have a title but no RatingCount; rated
    /// movies missing from the movies table have a RatingCount but no title.
    pub fn from_repository(repository: &RatingRepository) -> Self {
        info!("Counting movie ratings...");

        let titles = repository
            .movies()
            .iter()
            .map(|movie| (movie.id, movie.title.clone()))
            .collect();

        let rating_counts = repository
            .scores_by_movie()
            .into_par_iter()
            .map(|(movie_id, scores)| (movie_id, count_and_average(movie_id, &scores)))
            .collect();

        Self {
            titles,
            rating_counts,
        }
    }

    /// Title of a movie, if it is in the movies table
    pub fn title(&self, movie_id: MovieId) -> Option<&str> {
        self.titles.get(&movie_id).map(String::as_str)
    }

    /// Rating aggregate of a movie, if anyone rated it
    pub fn rating_count(&self, movie_id: MovieId) -> Option<&RatingCount> {
        self.rating_counts.get(&movie_id)
    }

    /// All rating aggregates, most-rated first (ties by movie id)
    pub fn most_rated(&self, limit: usize) -> Vec<RatingCount> {
        let mut counts: Vec<RatingCount> = self.rating_counts.values().copied().collect();
        counts.sort_unstable_by(|a, b| b.count.cmp(&a.count).then(a.movie_id.cmp(&b.movie_id)));
        counts.truncate(limit);
        counts
    }

    /// (titled movies, rated movies)
    pub fn counts(&self) -> (usize, usize) {
        (self.titles.len(), self.rating_counts.len())
    }
}

/// Aggregate one movie's score group into a RatingCount
fn count_and_average(movie_id: MovieId, scores: &[f32]) -> RatingCount {
    let count = scores.len() as u32;
    let average = if count > 0 {
        let total: f64 = scores.iter().map(|&s| s as f64).sum();
        (total / count as f64) as f32
    } else {
        0.0
    };
    RatingCount {
        movie_id,
        count,
        average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> RatingRepository {
        RatingRepository::new(
            vec![
                Rating::new(1, 10, 5.0),
                Rating::new(2, 10, 3.0),
                Rating::new(3, 10, 4.0),
                Rating::new(1, 20, 2.0),
                Rating::new(4, 30, 1.0),
            ],
            vec![
                Movie {
                    id: 10,
                    title: "Heat (1995)".to_string(),
                    genres: "Action".to_string(),
                },
                Movie {
                    id: 20,
                    title: "Sabrina (1995)".to_string(),
                    genres: "Comedy".to_string(),
                },
                Movie {
                    id: 40,
                    title: "Unrated (1999)".to_string(),
                    genres: "Drama".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_count_and_average() {
        let catalog = MovieCatalog::from_repository(&repository());

        let heat = catalog.rating_count(10).unwrap();
        assert_eq!(heat.count, 3);
        assert!((heat.average - 4.0).abs() < 1e-6);

        let sabrina = catalog.rating_count(20).unwrap();
        assert_eq!(sabrina.count, 1);
        assert_eq!(sabrina.average, 2.0);
    }

    #[test]
    fn test_titles_and_counts_are_independent() {
        let catalog = MovieCatalog::from_repository(&repository());

        // Rated but not in movies table
        assert!(catalog.title(30).is_none());
        assert!(catalog.rating_count(30).is_some());

        // In movies table but never rated
        assert_eq!(catalog.title(40), Some("Unrated (1999)"));
        assert!(catalog.rating_count(40).is_none());

        assert_eq!(catalog.counts(), (3, 3));
    }

    #[test]
    fn test_most_rated() {
        let catalog = MovieCatalog::from_repository(&repository());
        let top = catalog.most_rated(2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].movie_id, 10);
        // 20 and 30 both have one rating; lower id wins
        assert_eq!(top[1].movie_id, 20);
    }
}
