//! Elo-style CP updates
//!
//! This module computes the signed CP delta for one player after a finished
//! match. The expected score comes from the skillratings Elo model; the K
//! factor and the minimum swing rule are ours.

use crate::error::RatingError;
use crate::rating::calculator::RatingCalculator;
use crate::types::{Cp, MatchResult};
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};
use tracing::debug;

/// Default K factor, the largest possible swing for a single match
pub const DEFAULT_K_FACTOR: f64 = 40.0;

/// Default smallest swing granted for a win (and taken for a loss)
pub const DEFAULT_MINIMUM_SWING: Cp = 1;

/// Default CP for players without a stored rating
pub const DEFAULT_INITIAL_RATING: Cp = 0;

/// Configuration for the Elo calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloConfig {
    /// Maximum rating swing per match
    pub k_factor: f64,
    /// Wins grant at least this much and losses cost at least this much
    pub minimum_swing: Cp,
    /// Rating assigned to players the first time they are seen
    pub initial_rating: Cp,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            minimum_swing: DEFAULT_MINIMUM_SWING,
            initial_rating: DEFAULT_INITIAL_RATING,
        }
    }
}

impl EloConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: format!("K factor must be a positive number, got {}", self.k_factor),
            }
            .into());
        }

        if self.minimum_swing < 0 {
            return Err(RatingError::ConfigurationError {
                message: format!(
                    "Minimum swing must be non-negative, got {}",
                    self.minimum_swing
                ),
            }
            .into());
        }

        if self.initial_rating < 0 {
            return Err(RatingError::ConfigurationError {
                message: format!(
                    "Initial rating must be non-negative, got {}",
                    self.initial_rating
                ),
            }
            .into());
        }

        Ok(())
    }
}

/// Expected score of `player` against `opponent` on the 400-point logistic curve
pub fn expected(player: Cp, opponent: Cp) -> f64 {
    let (player_expected, _) = expected_score(
        &EloRating {
            rating: player as f64,
        },
        &EloRating {
            rating: opponent as f64,
        },
    );
    player_expected
}

/// Elo rating calculator
#[derive(Debug, Clone, Default)]
pub struct EloRatingCalculator {
    config: EloConfig,
}

impl EloRatingCalculator {
    /// Create a new Elo calculator
    pub fn new(config: EloConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Unrounded `K * (score - expected)`
    pub fn raw_delta(&self, player: Cp, opponent: Cp, result: MatchResult) -> f64 {
        self.config.k_factor * (result.score() - expected(player, opponent))
    }
}

impl RatingCalculator for EloRatingCalculator {
    fn compute_delta(&self, player: Cp, opponent: Cp, result: MatchResult) -> Cp {
        let raw = self.raw_delta(player, opponent, result);
        // Half away from zero
        let rounded = raw.round() as Cp;

        let delta = match result {
            MatchResult::Win => rounded.max(self.config.minimum_swing),
            MatchResult::Loss => rounded.min(-self.config.minimum_swing),
            MatchResult::Draw => rounded,
        };

        debug!(
            player,
            opponent,
            result = %result,
            raw,
            delta,
            "Computed CP delta"
        );

        delta
    }

    fn initial_rating(&self) -> Cp {
        self.config.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "elo",
            "k_factor": self.config.k_factor,
            "minimum_swing": self.config.minimum_swing,
            "initial_rating": self.config.initial_rating
        })
    }
}

/// CP delta for `player` after a match against `opponent`, with K = 40
pub fn compute_delta(player: Cp, opponent: Cp, result: MatchResult) -> Cp {
    EloRatingCalculator::default().compute_delta(player, opponent, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_match() {
        assert_eq!(compute_delta(1500, 1500, MatchResult::Win), 20);
        assert_eq!(compute_delta(1500, 1500, MatchResult::Loss), -20);
        assert_eq!(compute_delta(1500, 1500, MatchResult::Draw), 0);
    }

    #[test]
    fn test_expected_score() {
        assert_eq!(expected(1500, 1500), 0.5);
        assert!((expected(1900, 1500) - 10.0 / 11.0).abs() < 1e-12);
        assert!(expected(0, 2000) < 0.001);
    }

    #[test]
    fn test_underdog_gains_more() {
        let underdog = compute_delta(1000, 1400, MatchResult::Win);
        let favourite = compute_delta(1400, 1000, MatchResult::Win);

        assert_eq!(underdog, 36);
        assert_eq!(favourite, 4);
    }

    #[test]
    fn test_lopsided_win_still_grants_one() {
        assert_eq!(compute_delta(2000, 0, MatchResult::Win), 1);
        assert_eq!(compute_delta(5000, 0, MatchResult::Win), 1);
    }

    #[test]
    fn test_lopsided_loss_still_costs_one() {
        assert_eq!(compute_delta(0, 2000, MatchResult::Loss), -1);
        assert_eq!(compute_delta(0, 5000, MatchResult::Loss), -1);
    }

    #[test]
    fn test_lopsided_draw_can_be_zero_or_move() {
        // Expected score is almost 1, so a draw costs the favourite nearly K/2
        assert_eq!(compute_delta(2000, 0, MatchResult::Draw), -20);
        assert_eq!(compute_delta(0, 2000, MatchResult::Draw), 20);
        assert_eq!(compute_delta(1510, 1500, MatchResult::Draw), -1);
        assert_eq!(compute_delta(1503, 1500, MatchResult::Draw), 0);
    }

    #[test]
    fn test_half_rounds_away_from_zero() {
        let calculator = EloRatingCalculator::new(EloConfig {
            k_factor: 41.0,
            ..EloConfig::default()
        })
        .unwrap();

        let win = calculator.compute_delta(1500, 1500, MatchResult::Win);
        let loss = calculator.compute_delta(1500, 1500, MatchResult::Loss);

        // 20.5 and -20.5
        assert_eq!(win, 21);
        assert_eq!(loss, -21);
    }

    #[test]
    fn test_zero_minimum_swing() {
        let calculator = EloRatingCalculator::new(EloConfig {
            minimum_swing: 0,
            ..EloConfig::default()
        })
        .unwrap();

        assert_eq!(calculator.compute_delta(2000, 0, MatchResult::Win), 0);
        assert_eq!(calculator.compute_delta(0, 2000, MatchResult::Loss), 0);
    }

    #[test]
    fn test_config_validation() {
        assert!(EloConfig::default().validate().is_ok());

        for k_factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = EloConfig {
                k_factor,
                ..EloConfig::default()
            };
            assert!(config.validate().is_err(), "k_factor {}", k_factor);
        }

        let config = EloConfig {
            minimum_swing: -1,
            ..EloConfig::default()
        };
        assert!(EloRatingCalculator::new(config).is_err());

        let config = EloConfig {
            initial_rating: -5,
            ..EloConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_calculator_config_json() {
        let calculator = EloRatingCalculator::default();
        let config = calculator.config();

        assert_eq!(config["type"], "elo");
        assert_eq!(config["k_factor"], 40.0);
        assert_eq!(config["minimum_swing"], 1);
        assert_eq!(calculator.initial_rating(), 0);
    }
}
