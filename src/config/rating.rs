//! Rating system configuration

use crate::rank::RankTier;
use crate::rating::elo::{
    EloConfig, DEFAULT_INITIAL_RATING, DEFAULT_K_FACTOR, DEFAULT_MINIMUM_SWING,
};
use crate::types::Cp;
use serde::{Deserialize, Serialize};

/// CP update settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// Maximum CP swing per match
    pub k_factor: f64,
    /// Smallest gain for a win and smallest loss for a loss
    pub minimum_swing: Cp,
    /// CP for players seen for the first time
    pub initial_rating: Cp,
    /// Keep ratings at or above zero after a loss
    pub clamp_non_negative: bool,
    /// Capacity of the in-memory store
    pub max_stored_players: usize,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            minimum_swing: DEFAULT_MINIMUM_SWING,
            initial_rating: DEFAULT_INITIAL_RATING,
            clamp_non_negative: true,
            max_stored_players: 10000,
        }
    }
}

impl RatingSettings {
    pub fn elo_config(&self) -> EloConfig {
        EloConfig {
            k_factor: self.k_factor,
            minimum_swing: self.minimum_swing,
            initial_rating: self.initial_rating,
        }
    }
}

/// Rank ladder settings; the built-in ladder is used when no tiers are given
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankSettings {
    pub tiers: Option<Vec<RankTier>>,
}
