//! Filter implementations for the recommendation pipeline.
//!
//! ## Available Filters
//! - PopularityFilter: Removes movies with too few ratings to trust

pub mod popularity;

pub use popularity::{DEFAULT_POPULARITY_THRESHOLD, PopularityFilter};
