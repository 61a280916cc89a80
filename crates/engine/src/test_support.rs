//! Fixtures shared by the engine's unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use data_loader::{Movie, MovieId, Prediction, Rating, RatingRepository, UserId};
use trainer::{Model, ModelTrainer, TrainError, TrainingParams};

/// Titled movie that only user 1 rated
pub const ONLY_USER_ONE_MOVIE: MovieId = 7;

/// Movie with ratings but no entry in the movie table
pub const UNTITLED_MOVIE: MovieId = 6;

/// Which users rated each movie. Counts: 1→30, 2→26, 3→10, 4→30, 5→36,
/// 6→39, 7→1.
const RATERS: &[(MovieId, UserId, UserId)] = &[
    (1, 2, 31),
    (2, 2, 27),
    (3, 2, 11),
    (4, 1, 30),
    (5, 5, 40),
    (UNTITLED_MOVIE, 2, 40),
    (ONLY_USER_ONE_MOVIE, 1, 1),
];

fn score(user_id: UserId, movie_id: MovieId) -> f32 {
    1.0 + ((user_id * 7 + movie_id * 3) % 9) as f32 * 0.5
}

/// Small deterministic dataset, ordered user-major like a ratings export.
/// Every `(user, movie)` pair appears at most once.
pub fn sample_repository() -> RatingRepository {
    let mut ratings = Vec::new();
    for user_id in 1..=40 {
        for &(movie_id, first, last) in RATERS {
            if (first..=last).contains(&user_id) {
                ratings.push(Rating::new(user_id, movie_id, score(user_id, movie_id)));
            }
        }
    }

    let movies = [
        (1, "Movie One (1995)"),
        (2, "Movie Two (1995)"),
        (3, "Movie Three (1996)"),
        (4, "Movie Four (1997)"),
        (5, "Movie Five (1998)"),
        (ONLY_USER_ONE_MOVIE, "Movie Seven (1999)"),
    ]
    .into_iter()
    .map(|(id, title)| Movie {
        id,
        title: title.to_string(),
        genres: "Drama".to_string(),
    })
    .collect();

    RatingRepository::new(ratings, movies)
}

/// Remembers every training rating. Known pairs score exactly; unseen
/// pairs on a known movie score the movie's training mean.
pub struct TableModelTrainer;

pub struct TableModel {
    exact: HashMap<(UserId, MovieId), f32>,
    movie_means: HashMap<MovieId, f32>,
}

impl Model for TableModel {
    fn predict_all(&self, pairs: &[(UserId, MovieId)]) -> Vec<Prediction> {
        pairs
            .iter()
            .filter_map(|&(user_id, movie_id)| {
                self.exact
                    .get(&(user_id, movie_id))
                    .or_else(|| self.movie_means.get(&movie_id))
                    .map(|&score| Prediction::new(user_id, movie_id, score))
            })
            .collect()
    }
}

impl ModelTrainer for TableModelTrainer {
    type Model = TableModel;

    fn train(&self, training: &[Rating], _params: &TrainingParams) -> trainer::Result<TableModel> {
        if training.is_empty() {
            return Err(TrainError::EmptyTrainingSet);
        }

        let mut sums: HashMap<MovieId, (f32, u32)> = HashMap::new();
        for rating in training {
            let entry = sums.entry(rating.movie_id).or_insert((0.0, 0));
            entry.0 += rating.score;
            entry.1 += 1;
        }

        Ok(TableModel {
            exact: training.iter().map(|r| (r.key(), r.score)).collect(),
            movie_means: sums
                .into_iter()
                .map(|(movie_id, (sum, n))| (movie_id, sum / n as f32))
                .collect(),
        })
    }
}

/// Ignores training and scores every user the same per movie
pub struct FixedScoreTrainer {
    scores: HashMap<MovieId, f32>,
}

impl FixedScoreTrainer {
    pub fn new(scores: &[(MovieId, f32)]) -> Self {
        Self {
            scores: scores.iter().copied().collect(),
        }
    }
}

pub struct FixedScoreModel {
    scores: HashMap<MovieId, f32>,
}

impl Model for FixedScoreModel {
    fn predict_all(&self, pairs: &[(UserId, MovieId)]) -> Vec<Prediction> {
        pairs
            .iter()
            .filter_map(|&(user_id, movie_id)| {
                self.scores
                    .get(&movie_id)
                    .map(|&score| Prediction::new(user_id, movie_id, score))
            })
            .collect()
    }
}

impl ModelTrainer for FixedScoreTrainer {
    type Model = FixedScoreModel;

    fn train(&self, _training: &[Rating], _params: &TrainingParams) -> trainer::Result<FixedScoreModel> {
        Ok(FixedScoreModel {
            scores: self.scores.clone(),
        })
    }
}

/// Takes a moment on every training call and then fails. Counts calls
/// entering and leaving `train`.
#[derive(Default)]
pub struct FailingTrainer {
    pub started: AtomicUsize,
    pub finished: AtomicUsize,
}

impl ModelTrainer for FailingTrainer {
    type Model = FixedScoreModel;

    fn train(&self, _training: &[Rating], _params: &TrainingParams) -> trainer::Result<FixedScoreModel> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        self.finished.fetch_add(1, Ordering::SeqCst);
        Err(TrainError::Solve("singular system".to_string()))
    }
}
