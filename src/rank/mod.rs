//! Rank tiers and rating-to-rank resolution
//!
//! This module provides the static rank ladder and the resolver that turns a
//! CP value into the badge shown next to a player's name.

pub mod resolver;
pub mod table;

// Re-export commonly used types
pub use resolver::{resolve_rank, RankResolver};
pub use table::{RankTable, RankTier, SUB_TIER_WIDTH};
