//! Common types used throughout the rating service

use crate::error::RatingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for players and bots
pub type PlayerId = String;

/// Unique identifier for recorded matches
pub type MatchId = Uuid;

/// Caro Points, the competitive rating value
pub type Cp = i64;

/// Outcome of a finished match, from the point of view of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    /// Actual score used by the Elo formula
    pub fn score(self) -> f64 {
        match self {
            MatchResult::Win => 1.0,
            MatchResult::Draw => 0.5,
            MatchResult::Loss => 0.0,
        }
    }

    /// The same match seen from the opponent's side
    pub fn opposite(self) -> Self {
        match self {
            MatchResult::Win => MatchResult::Loss,
            MatchResult::Loss => MatchResult::Win,
            MatchResult::Draw => MatchResult::Draw,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Win => "win",
            MatchResult::Loss => "loss",
            MatchResult::Draw => "draw",
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchResult {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win" | "w" => Ok(MatchResult::Win),
            "loss" | "lose" | "l" => Ok(MatchResult::Loss),
            "draw" | "d" => Ok(MatchResult::Draw),
            _ => Err(RatingError::InvalidMatchResult {
                value: s.to_string(),
            }),
        }
    }
}

/// What a player's rank badge shows for a given rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDisplay {
    /// "{tier} {roman}", or just the tier name for the terminal rank
    pub display_name: String,
    /// Points into the current sub-tier (0-99), or the raw rating for the terminal rank
    pub sub_tier_progress: i64,
    pub icon: String,
    pub tier_name: String,
    pub tier_index: usize,
    /// Sub-tier number, counting down as rating increases; None for the terminal rank
    pub sub_tier: Option<u32>,
    /// Rating at which the next sub-tier or rank begins; None for the terminal rank
    pub next_threshold: Option<Cp>,
}

impl RankDisplay {
    /// Whether this display belongs to the terminal (top) rank
    pub fn is_terminal(&self) -> bool {
        self.sub_tier.is_none()
    }
}

impl std::fmt::Display for RankDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon, self.display_name)
    }
}

/// Direction a player's rank moved after a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMovement {
    Promoted,
    Demoted,
    Unchanged,
}

impl RankMovement {
    /// Compare two resolved ranks; higher tier wins, then the lower sub-tier number
    pub fn between(before: &RankDisplay, after: &RankDisplay) -> Self {
        let key = |rank: &RankDisplay| {
            (
                rank.tier_index,
                std::cmp::Reverse(rank.sub_tier.unwrap_or(0)),
            )
        };

        match key(after).cmp(&key(before)) {
            std::cmp::Ordering::Greater => RankMovement::Promoted,
            std::cmp::Ordering::Less => RankMovement::Demoted,
            std::cmp::Ordering::Equal => RankMovement::Unchanged,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankMovement::Promoted => "promoted",
            RankMovement::Demoted => "demoted",
            RankMovement::Unchanged => "unchanged",
        }
    }
}

/// Rating change information for one side of a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub result: MatchResult,
    pub old_cp: Cp,
    pub new_cp: Cp,
    /// Delta as computed, before any clamping of the new rating
    pub delta: Cp,
    pub old_rank: RankDisplay,
    pub new_rank: RankDisplay,
    pub rank_movement: RankMovement,
}

/// Outcome of recording a completed match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub player: RatingChange,
    pub opponent: RatingChange,
    pub timestamp: DateTime<Utc>,
}

/// All three possible deltas for a player before a match starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaPreview {
    pub win: Cp,
    pub draw: Cp,
    pub loss: Cp,
}
