use data_loader::{MovieCatalog, RatingRepository};
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data/ml-latest-small");

    println!("Loading ratings dataset...\n");

    let start = Instant::now();
    let repository = RatingRepository::load_from_dir(data_dir)
        .expect("Failed to load dataset");
    let loaded = start.elapsed();

    let catalog = MovieCatalog::from_repository(&repository);
    let aggregated = start.elapsed() - loaded;

    let (users, movies, ratings) = repository.counts();

    println!("\n=== Load Complete ===");
    println!("Load time: {:?}", loaded);
    println!("Catalog time: {:?}", aggregated);
    println!("Users: {}", users);
    println!("Movies: {}", movies);
    println!("Ratings: {}", ratings);
    println!("Rated movies: {}", catalog.counts().1);
    println!("\nPerformance: {:.0} ratings/second",
             ratings as f64 / loaded.as_secs_f64());
}
