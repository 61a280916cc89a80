//! # Sources Crate
//!
//! Candidate generation for recommendations.
//!
//! ## Components
//!
//! ### UnratedCandidateSource
//! Every movie that some *other* user rated, paired with the target user.
//! The set is derived from the rating table with the target user's rows
//! removed first, so a movie only the target user rated is never a
//! candidate.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::UnratedCandidateSource;
//! use std::sync::Arc;
//!
//! let source = UnratedCandidateSource::new(Arc::new(repository));
//! let candidates = source.get_candidates(user_id);
//! ```

// Public modules
pub mod types;
pub mod unrated;

// Re-export commonly used types
pub use types::{Candidate, ScoredCandidate};
pub use unrated::UnratedCandidateSource;
