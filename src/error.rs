//! Error types for the rating service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate. The pure rank and delta functions never fail; errors
//! only arise from table validation, configuration and match recording.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid rank table: {reason}")]
    InvalidRankTable { reason: String },

    #[error("Invalid player id: {player_id:?}")]
    InvalidPlayerId { player_id: String },

    #[error("Player cannot be matched against themself: {player_id}")]
    SelfMatch { player_id: String },

    #[error("Invalid match result: {value}")]
    InvalidMatchResult { value: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
