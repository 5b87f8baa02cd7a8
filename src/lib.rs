//! Caro Rating - competitive points (CP) for a Caro game
//!
//! This crate maps CP to rank badges, computes Elo-style CP deltas after a
//! match, and records matches against an external rating store.

pub mod config;
pub mod error;
pub mod metrics;
pub mod rank;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rank::{resolve_rank, RankResolver, RankTable, RankTier};
pub use rating::{compute_delta, EloRatingCalculator, MatchRecorder, RatingCalculator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
