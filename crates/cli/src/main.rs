use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{RatingRepository, UserId};
use engine::{EngineConfig, EngineState, Recommendation};
use evaluation::{CrossValidationReport, FoldOrdering};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use trainer::AlsTrainer;

type AlsState = EngineState<AlsTrainer>;

/// movie-eval - train, evaluate and serve a matrix-factorization recommender
#[derive(Parser)]
#[command(name = "movie-eval")]
#[command(about = "Matrix-factorization movie recommender with RMSE evaluation", long_about = None)]
struct Cli {
    /// Directory containing ratings.csv and movies.csv
    #[arg(short, long, default_value = "data/ml-latest-small", global = true)]
    data_dir: PathBuf,

    /// JSON engine config; flags below override its fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Latent factor dimension
    #[arg(long, global = true)]
    rank: Option<usize>,

    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// Regularization strength
    #[arg(long, global = true)]
    lambda: Option<f64>,

    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Fraction of ratings used for training in the train/test split
    #[arg(long, global = true)]
    train_fraction: Option<f64>,

    /// Minimum number of ratings a movie needs to be recommended
    #[arg(long, global = true)]
    popularity_threshold: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train on every rating and recommend movies for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Train on the training split and report train and test RMSE
    Evaluate,

    /// k-fold cross-validation over the training split
    CrossValidate {
        /// Number of folds (defaults to the config value)
        #[arg(long)]
        folds: Option<usize>,

        /// How ratings are ordered before being cut into folds
        #[arg(long, value_enum)]
        ordering: Option<OrderingArg>,
    },

    /// Dataset counts and the most-rated movies
    Stats {
        /// Number of movies to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderingArg {
    AsLoaded,
    ByUserMovie,
}

impl From<OrderingArg> for FoldOrdering {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::AsLoaded => FoldOrdering::AsLoaded,
            OrderingArg::ByUserMovie => FoldOrdering::ByUserMovie,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    info!("Engine config: {:?}", config);

    println!("Loading ratings from {}...", cli.data_dir.display());
    let start = Instant::now();
    let repository = load_repository(cli.data_dir.clone()).await?;
    let (users, movies, ratings) = repository.counts();
    println!(
        "{} Loaded {} ratings from {} users on {} movies in {:?}",
        "✓".green(),
        ratings,
        users,
        movies,
        start.elapsed()
    );

    let state = EngineState::new(repository, AlsTrainer, config);

    match cli.command {
        Commands::Recommend { user_id, limit } => handle_recommend(state, user_id, limit).await?,
        Commands::Evaluate => handle_evaluate(state).await?,
        Commands::CrossValidate { folds, ordering } => {
            handle_cross_validate(state, folds, ordering).await?
        }
        Commands::Stats { top } => handle_stats(&state, top),
    }

    Ok(())
}

/// Defaults, then the config file, then individual flags
fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(rank) = cli.rank {
        config.rank = rank;
    }
    if let Some(iterations) = cli.iterations {
        config.iterations = iterations;
    }
    if let Some(lambda) = cli.lambda {
        config.lambda = lambda;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(train_fraction) = cli.train_fraction {
        config.train_fraction = train_fraction;
    }
    if let Some(threshold) = cli.popularity_threshold {
        config.popularity_threshold = threshold;
    }
    Ok(config)
}

async fn load_repository(data_dir: PathBuf) -> Result<RatingRepository> {
    tokio::task::spawn_blocking(move || RatingRepository::load_from_dir(Path::new(&data_dir)))
        .await
        .context("Loader task failed")?
        .context("Failed to load ratings dataset")
}

/// Handle the 'recommend' command
async fn handle_recommend(state: AlsState, user_id: UserId, limit: usize) -> Result<()> {
    let own_ratings = state.repository().ratings_for_user(user_id).count();
    if own_ratings == 0 {
        println!(
            "{} User {} has no ratings; the model cannot score them",
            "!".yellow(),
            user_id
        );
    } else {
        println!("User {} has rated {} movies", user_id, own_ratings);
    }

    let start = Instant::now();
    let recommendations = tokio::task::spawn_blocking(move || {
        let trained = state.train_on_all()?;
        trained.top_ratings(user_id, limit)
    })
    .await
    .context("Training task failed")?
    .with_context(|| format!("Failed to recommend for user {}", user_id))?;

    println!("{} Trained and ranked in {:?}", "✓".green(), start.elapsed());
    print_recommendations(user_id, &recommendations);
    Ok(())
}

#[derive(Default)]
struct SplitSummary {
    train_len: usize,
    test_len: usize,
    train_fraction: f64,
    seed: u64,
}

/// Handle the 'evaluate' command
async fn handle_evaluate(state: AlsState) -> Result<()> {
    let start = Instant::now();
    let (train_rmse, test_rmse, split) = tokio::task::spawn_blocking(move || {
        let trained = state.with_split()?.train_on_training_set()?;
        let split = trained
            .split()
            .map(|split| SplitSummary {
                train_len: split.train.len(),
                test_len: split.test.len(),
                train_fraction: split.train_fraction,
                seed: split.seed,
            })
            .unwrap_or_default();
        Ok::<_, engine::EngineError>((trained.train_error()?, trained.test_error()?, split))
    })
    .await
    .context("Training task failed")?
    .context("Evaluation failed")?;

    println!("{}", "Evaluation:".bold().blue());
    println!(
        "{}Split: {:.2} train fraction, seed {}",
        "• ".cyan(),
        split.train_fraction,
        split.seed
    );
    println!("{}Training ratings: {}", "• ".cyan(), split.train_len);
    println!("{}Test ratings: {}", "• ".cyan(), split.test_len);
    println!("{}Train RMSE: {:.4}", "• ".green(), train_rmse);
    println!("{}Test RMSE: {:.4}", "• ".green(), test_rmse);
    println!("Finished in {:?}", start.elapsed());
    Ok(())
}

/// Handle the 'cross-validate' command
async fn handle_cross_validate(
    state: AlsState,
    folds: Option<usize>,
    ordering: Option<OrderingArg>,
) -> Result<()> {
    let mut config = state.config().clone();
    if let Some(ordering) = ordering {
        config.fold_ordering = ordering.into();
    }
    let k = folds.unwrap_or(config.folds);

    let state = state.with_config(config).with_split()?;
    let start = Instant::now();
    let report = state
        .cross_validate_parallel(k)
        .await
        .with_context(|| format!("{}-fold cross-validation failed", k))?;

    print_report(&report);
    println!("Finished in {:?}", start.elapsed());
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(state: &AlsState, top: usize) {
    let (users, movies, ratings) = state.repository().counts();
    let (titled, rated) = state.catalog().counts();

    println!("{}", "Dataset:".bold().blue());
    println!("{}Users: {}", "• ".green(), users);
    println!("{}Movies: {}", "• ".green(), movies);
    println!("{}Ratings: {}", "• ".green(), ratings);
    println!("{}Movies with titles: {}", "• ".cyan(), titled);
    println!("{}Movies with rating counts: {}", "• ".cyan(), rated);

    println!("{}", format!("Top {} most rated movies:", top).bold().blue());
    for (rank, counts) in state.catalog().most_rated(top).iter().enumerate() {
        let title = state.catalog().title(counts.movie_id).unwrap_or("<untitled>");
        println!(
            "{}. {} - {} ratings, avg {:.2}",
            (rank + 1).to_string().green(),
            title,
            counts.count,
            counts.average
        );
    }
}

fn print_recommendations(user_id: UserId, recommendations: &[Recommendation]) {
    println!("{}", format!("Recommendations for user {}:", user_id).bold().blue());
    if recommendations.is_empty() {
        println!("  (no movie passes the popularity threshold)");
        return;
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.2} ({} ratings)",
            (rank + 1).to_string().green(),
            rec.title,
            rec.predicted_score,
            rec.rating_count
        );
    }
}

fn print_report(report: &CrossValidationReport) {
    println!("{}", "Cross-validation:".bold().blue());
    for (fold, rmse) in report.fold_errors.iter().enumerate() {
        println!("{}Fold {}: RMSE {:.4}", "• ".cyan(), fold, rmse);
    }
    println!("{}Mean RMSE: {:.4}", "• ".green(), report.mean_error);
}
