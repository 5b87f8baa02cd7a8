//! Utility functions for the rating service

use crate::types::{Cp, MatchId};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique match ID
pub fn generate_match_id() -> MatchId {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Coerce an optional, possibly malformed rating into whole CP.
///
/// Missing, non-finite and negative values become 0. Fractions are truncated.
pub fn sanitize_rating(rating: Option<f64>) -> Cp {
    match rating {
        Some(value) if value.is_finite() && value > 0.0 => value.trunc() as Cp,
        _ => 0,
    }
}

/// Roman numeral label for a sub-tier number
pub fn roman_label(sub_tier: i64) -> Option<&'static str> {
    match sub_tier {
        3 => Some("III"),
        2 => Some("II"),
        1 => Some("I"),
        _ => None,
    }
}
