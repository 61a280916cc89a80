//! Pipeline for filtering scored recommendation candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Candidates reach the pipeline already scored by the model and joined
//! with the movie catalog. Filters then drop what should not be shown,
//! before the caller ranks and truncates.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::PopularityFilter;
//!
//! let pipeline = FilterPipeline::new().add_filter(PopularityFilter::new(25));
//! let filtered = pipeline.apply(scored)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
