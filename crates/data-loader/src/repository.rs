//! Loading a RatingRepository from a dataset directory.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

/// File names expected inside a dataset directory
pub const RATINGS_FILE: &str = "ratings.csv";
pub const MOVIES_FILE: &str = "movies.csv";

impl RatingRepository {
    /// Load `ratings.csv` and `movies.csv` from `data_dir`.
    ///
    /// Both files are parsed in parallel with `rayon::join`; the first
    /// parse failure is returned.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading ratings dataset from {:?}", data_dir);

        let ratings_path = data_dir.join(RATINGS_FILE);
        let movies_path = data_dir.join(MOVIES_FILE);

        let (ratings, movies) = rayon::join(
            || parser::parse_ratings(&ratings_path),
            || parser::parse_movies(&movies_path),
        );
        let ratings = ratings?;
        let movies = movies?;

        info!("Loaded {} ratings and {} movies", ratings.len(), movies.len());

        Ok(Self::new(ratings, movies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataLoadError;
    use std::fs;

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(RATINGS_FILE),
            "userId,movieId,rating,timestamp\n1,10,4.0,0\n2,10,3.5,0\n2,20,1.0,0\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(MOVIES_FILE),
            "movieId,title,genres\n10,Heat (1995),Action\n20,Sabrina (1995),Comedy\n",
        )
        .unwrap();

        let repo = RatingRepository::load_from_dir(dir.path()).unwrap();
        assert_eq!(repo.counts(), (2, 2, 3));
        assert_eq!(repo.ratings()[2], Rating::new(2, 20, 1.0));
    }

    #[test]
    fn test_load_from_dir_missing_movies() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RATINGS_FILE), "userId,movieId,rating\n1,10,4.0\n").unwrap();

        let err = RatingRepository::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
