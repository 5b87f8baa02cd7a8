//! Rating to rank resolution
//!
//! Maps a CP value onto a rank badge: tier name, Roman numeral sub-tier and
//! progress through the current sub-tier. Sub-tiers count down as rating
//! rises, so "III" is the entry sub-tier of a rank and "I" the last one
//! before promotion.

use crate::rank::table::{RankTable, SUB_TIER_WIDTH};
use crate::types::{Cp, RankDisplay};
use crate::utils::{roman_label, sanitize_rating};
use std::sync::Arc;
use tracing::warn;

/// Resolves ratings against a rank table
#[derive(Debug, Clone)]
pub struct RankResolver {
    table: Arc<RankTable>,
}

impl RankResolver {
    pub fn new(table: Arc<RankTable>) -> Self {
        Self { table }
    }

    /// Resolver over the built-in ladder
    pub fn standard() -> Self {
        Self::new(RankTable::standard())
    }

    pub fn table(&self) -> &RankTable {
        &self.table
    }

    /// Resolve a possibly missing or malformed rating.
    ///
    /// Missing, non-finite and negative ratings resolve as 0.
    pub fn resolve(&self, rating: Option<f64>) -> RankDisplay {
        self.resolve_cp(sanitize_rating(rating))
    }

    /// Resolve a whole CP value. Negative values resolve as 0.
    pub fn resolve_cp(&self, cp: Cp) -> RankDisplay {
        let rating = cp.max(0);
        let (tier_index, tier) = self.table.tier_for(rating);

        if tier.is_terminal() {
            return RankDisplay {
                display_name: tier.name.clone(),
                sub_tier_progress: rating,
                icon: tier.icon.clone(),
                tier_name: tier.name.clone(),
                tier_index,
                sub_tier: None,
                next_threshold: None,
            };
        }

        let offset = rating - tier.min_rating;
        let sub_tier = Cp::from(tier.sub_tier_count) - offset / SUB_TIER_WIDTH;
        let sub_tier_progress = offset % SUB_TIER_WIDTH;

        // A validated table never lands outside 1..=3; reaching the fallback is a bug
        debug_assert!(
            roman_label(sub_tier).is_some(),
            "sub-tier {} out of range for tier {} at rating {}",
            sub_tier,
            tier.name,
            rating
        );
        let (roman, sub_tier) = match roman_label(sub_tier) {
            Some(label) => (label, sub_tier as u32),
            None => {
                warn!(
                    rating,
                    tier = %tier.name,
                    sub_tier,
                    "Sub-tier index outside the numeral table, falling back to I"
                );
                ("I", 1)
            }
        };

        RankDisplay {
            display_name: format!("{} {}", tier.name, roman),
            sub_tier_progress,
            icon: tier.icon.clone(),
            tier_name: tier.name.clone(),
            tier_index,
            sub_tier: Some(sub_tier),
            next_threshold: Some(rating - sub_tier_progress + SUB_TIER_WIDTH),
        }
    }
}

/// Resolve a rating against the built-in ladder
pub fn resolve_rank(rating: Option<f64>) -> RankDisplay {
    RankResolver::standard().resolve(rating)
}
