//! Rank tier table
//!
//! This module holds the ordered list of rank tiers and the validation that
//! keeps the resolver's sub-tier arithmetic sound.

use crate::error::RatingError;
use crate::types::Cp;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Rating points covered by one sub-tier
pub const SUB_TIER_WIDTH: Cp = 100;

/// Largest sub-tier count that still has a Roman numeral label
pub const MAX_SUB_TIERS: u32 = 3;

/// A single named rank band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    /// Display label shown to players
    pub name: String,
    /// Number of sub-tiers; 0 marks the terminal rank
    pub sub_tier_count: u32,
    /// Inclusive lower bound of the rank
    pub min_rating: Cp,
    /// Opaque display token
    pub icon: String,
}

impl RankTier {
    pub fn new(name: &str, sub_tier_count: u32, min_rating: Cp, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            sub_tier_count,
            min_rating,
            icon: icon.to_string(),
        }
    }

    /// The terminal rank has no sub-tiers and no ceiling
    pub fn is_terminal(&self) -> bool {
        self.sub_tier_count == 0
    }

    /// Rating points spanned by a non-terminal tier
    pub fn span(&self) -> Cp {
        Cp::from(self.sub_tier_count) * SUB_TIER_WIDTH
    }
}

/// Ordered, validated list of rank tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

static STANDARD_TABLE: OnceLock<Arc<RankTable>> = OnceLock::new();

fn standard_tiers() -> Vec<RankTier> {
    vec![
        RankTier::new("Đồng", 3, 0, "🥉"),
        RankTier::new("Bạc", 3, 300, "🥈"),
        RankTier::new("Vàng", 3, 600, "🥇"),
        RankTier::new("Bạch Kim", 3, 900, "💠"),
        RankTier::new("Kim Cương", 3, 1200, "💎"),
        RankTier::new("Cao Thủ", 0, 1500, "👑"),
    ]
}

impl RankTable {
    /// Build a table, rejecting any tier list that breaks the ordering invariants
    pub fn new(tiers: Vec<RankTier>) -> crate::error::Result<Self> {
        validate_tiers(&tiers)?;
        Ok(Self { tiers })
    }

    /// The game's built-in ladder, initialised once per process
    pub fn standard() -> Arc<RankTable> {
        STANDARD_TABLE
            .get_or_init(|| {
                Arc::new(RankTable {
                    tiers: standard_tiers(),
                })
            })
            .clone()
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The top rank, which is always the last tier
    pub fn terminal(&self) -> &RankTier {
        &self.tiers[self.tiers.len() - 1]
    }

    /// Highest tier whose threshold the rating has reached.
    ///
    /// Falls back to the first tier when nothing qualifies.
    pub fn tier_for(&self, rating: Cp) -> (usize, &RankTier) {
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tier)| rating >= tier.min_rating)
            .unwrap_or((0, &self.tiers[0]))
    }
}

fn invalid(reason: impl Into<String>) -> anyhow::Error {
    RatingError::InvalidRankTable {
        reason: reason.into(),
    }
    .into()
}

fn validate_tiers(tiers: &[RankTier]) -> crate::error::Result<()> {
    let first = tiers
        .first()
        .ok_or_else(|| invalid("table must contain at least one tier"))?;

    if first.min_rating != 0 {
        return Err(invalid(format!(
            "first tier {} must start at 0, found {}",
            first.name, first.min_rating
        )));
    }

    let terminal_count = tiers.iter().filter(|tier| tier.is_terminal()).count();
    if terminal_count != 1 {
        return Err(invalid(format!(
            "expected exactly one terminal tier, found {}",
            terminal_count
        )));
    }

    if let Some(last) = tiers.last() {
        if !last.is_terminal() {
            return Err(invalid(format!(
                "terminal tier must be last, but {} has {} sub-tiers",
                last.name, last.sub_tier_count
            )));
        }
    }

    for tier in tiers {
        if tier.name.trim().is_empty() {
            return Err(invalid("tier names cannot be empty"));
        }
        if tier.sub_tier_count > MAX_SUB_TIERS {
            return Err(invalid(format!(
                "tier {} has {} sub-tiers, at most {} are supported",
                tier.name, tier.sub_tier_count, MAX_SUB_TIERS
            )));
        }
    }

    for pair in tiers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);

        if upper.min_rating <= lower.min_rating {
            return Err(invalid(format!(
                "tiers must ascend: {} ({}) is not above {} ({})",
                upper.name, upper.min_rating, lower.name, lower.min_rating
            )));
        }

        let width = upper.min_rating - lower.min_rating;
        if width != lower.span() {
            return Err(invalid(format!(
                "tier {} spans {} points but its {} sub-tiers need {}",
                lower.name,
                width,
                lower.sub_tier_count,
                lower.span()
            )));
        }
    }

    Ok(())
}
