//! CP rating system
//!
//! This module provides the Elo-style CP update, the calculator seam used by
//! the match flow, the storage interface to the external account store and
//! the recorder that ties them together.

pub mod calculator;
pub mod elo;
pub mod recorder;
pub mod storage;

// Re-export commonly used types
pub use calculator::{NoOpRatingCalculator, RatingCalculator};
pub use elo::{compute_delta, EloConfig, EloRatingCalculator};
pub use recorder::MatchRecorder;
pub use storage::{InMemoryRatingStorage, RatingEntry, RatingStorage};
