//! # Data Loader Crate
//!
//! Loads the ratings and movies tables and derives the movie catalog.
//!
//! ## Main Components
//!
//! - **types**: Core records (Rating, Movie, Prediction, RatingCount) and
//!   the RatingRepository that owns them
//! - **parser**: Parse the CSV tables into Rust structs
//! - **repository**: Load a RatingRepository from a dataset directory
//! - **catalog**: Titles and per-movie rating aggregates
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{MovieCatalog, RatingRepository};
//! use std::path::Path;
//!
//! let repository = RatingRepository::load_from_dir(Path::new("data/ml-latest-small"))?;
//! let catalog = MovieCatalog::from_repository(&repository);
//!
//! let toy_story = catalog.rating_count(1).unwrap();
//! println!("{} ratings, mean {:.2}", toy_story.count, toy_story.average);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod repository;
pub mod catalog;

// Re-export commonly used types for convenience
pub use catalog::MovieCatalog;
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Rating,
    Movie,
    Prediction,
    RatingCount,
    RatingRepository,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_repository() {
        let repository = RatingRepository::default();
        assert_eq!(repository.counts(), (0, 0, 0));
        assert!(repository.ratings().is_empty());
    }

    #[test]
    fn test_user_views() {
        let repository = RatingRepository::new(
            vec![
                Rating::new(1, 10, 4.0),
                Rating::new(2, 10, 3.0),
                Rating::new(1, 20, 2.0),
            ],
            vec![],
        );

        assert_eq!(repository.ratings_for_user(1).count(), 2);
        assert_eq!(repository.ratings_for_user(3).count(), 0);

        let grouped = repository.scores_by_movie();
        assert_eq!(grouped[&10], vec![4.0, 3.0]);
        assert_eq!(grouped[&20], vec![2.0]);
    }
}
