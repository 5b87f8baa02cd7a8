//! Rating calculator trait and implementations
//!
//! This module defines the interface the match flow uses to turn a match
//! result into a CP delta, plus a no-op calculator for unranked play.

use crate::types::{Cp, DeltaPreview, MatchResult};

/// Trait for calculating CP changes after games
pub trait RatingCalculator: Send + Sync {
    /// Signed CP delta for `player` after a match against `opponent`.
    ///
    /// The caller applies the delta; the resulting rating is not clamped here.
    fn compute_delta(&self, player: Cp, opponent: Cp, result: MatchResult) -> Cp;

    /// Get the initial rating for new players
    fn initial_rating(&self) -> Cp;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// All three possible deltas for `player` before the match is played
    fn preview(&self, player: Cp, opponent: Cp) -> DeltaPreview {
        DeltaPreview {
            win: self.compute_delta(player, opponent, MatchResult::Win),
            draw: self.compute_delta(player, opponent, MatchResult::Draw),
            loss: self.compute_delta(player, opponent, MatchResult::Loss),
        }
    }
}

/// Calculator for unranked matches; ratings never move
#[derive(Debug, Clone, Default)]
pub struct NoOpRatingCalculator {
    initial_rating: Cp,
}

impl NoOpRatingCalculator {
    /// Create a new no-op rating calculator
    pub fn new(initial_rating: Cp) -> Self {
        Self { initial_rating }
    }
}

impl RatingCalculator for NoOpRatingCalculator {
    fn compute_delta(&self, _player: Cp, _opponent: Cp, _result: MatchResult) -> Cp {
        0
    }

    fn initial_rating(&self) -> Cp {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "no_op",
            "initial_rating": self.initial_rating
        })
    }
}
