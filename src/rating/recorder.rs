//! Match resolution flow
//!
//! After a ranked game ends, the recorder computes each player's CP delta
//! from the pre-match ratings, applies it, persists both entries in one
//! batch and reports how each player's rank moved.

use crate::error::RatingError;
use crate::metrics::MetricsCollector;
use crate::rank::RankResolver;
use crate::rating::calculator::RatingCalculator;
use crate::rating::storage::{RatingEntry, RatingStorage};
use crate::types::{
    Cp, DeltaPreview, MatchReport, MatchResult, PlayerId, RankMovement, RatingChange,
};
use crate::utils::{current_timestamp, generate_match_id};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Applies finished matches to stored ratings.
///
/// Matches recorded through one recorder are applied one at a time, so two
/// matches that share a player never read the same pre-match entry.
pub struct MatchRecorder {
    storage: Arc<dyn RatingStorage>,
    calculator: Arc<dyn RatingCalculator>,
    resolver: RankResolver,
    metrics: Option<Arc<MetricsCollector>>,
    clamp_non_negative: bool,
    write_lock: Mutex<()>,
}

impl MatchRecorder {
    /// Create a recorder; new ratings are clamped at zero by default
    pub fn new(
        storage: Arc<dyn RatingStorage>,
        calculator: Arc<dyn RatingCalculator>,
        resolver: RankResolver,
    ) -> Self {
        Self {
            storage,
            calculator,
            resolver,
            metrics: None,
            clamp_non_negative: true,
            write_lock: Mutex::new(()),
        }
    }

    /// Attach a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Whether a rating may go below zero after a loss
    pub fn with_clamp(mut self, clamp_non_negative: bool) -> Self {
        self.clamp_non_negative = clamp_non_negative;
        self
    }

    pub fn resolver(&self) -> &RankResolver {
        &self.resolver
    }

    /// Current rating for a player, or the calculator's initial rating
    pub async fn current_cp(&self, player_id: &PlayerId) -> crate::error::Result<Cp> {
        Ok(self
            .storage
            .get_rating(player_id)
            .await?
            .map(|entry| entry.cp)
            .unwrap_or_else(|| self.calculator.initial_rating()))
    }

    /// Possible deltas for `player_id` against `opponent_id` before the match
    pub async fn preview(
        &self,
        player_id: &PlayerId,
        opponent_id: &PlayerId,
    ) -> crate::error::Result<DeltaPreview> {
        let player_cp = self.current_cp(player_id).await?;
        let opponent_cp = self.current_cp(opponent_id).await?;
        Ok(self.calculator.preview(player_cp, opponent_cp))
    }

    /// Record a finished match. `result` is from `player_id`'s point of view.
    pub async fn record_match(
        &self,
        player_id: &PlayerId,
        opponent_id: &PlayerId,
        result: MatchResult,
    ) -> crate::error::Result<MatchReport> {
        validate_player_id(player_id)?;
        validate_player_id(opponent_id)?;
        if player_id == opponent_id {
            return Err(RatingError::SelfMatch {
                player_id: player_id.clone(),
            }
            .into());
        }

        let started = Instant::now();

        // Held from the first read until both entries are stored
        let guard = self.write_lock.lock().await;

        let mut player_entry = self.load_or_create(player_id).await?;
        let mut opponent_entry = self.load_or_create(opponent_id).await?;

        let player_cp = player_entry.cp;
        let opponent_cp = opponent_entry.cp;

        let player_change = self.apply(&mut player_entry, opponent_cp, result);
        let opponent_change = self.apply(&mut opponent_entry, player_cp, result.opposite());

        self.storage
            .store_ratings(vec![player_entry, opponent_entry])
            .await?;
        drop(guard);

        if let Some(metrics) = &self.metrics {
            metrics.record_match(result, started.elapsed());
            for change in [&player_change, &opponent_change] {
                metrics.record_rating_change(change.new_cp - change.old_cp, change.rank_movement);
            }
        }

        let report = MatchReport {
            match_id: generate_match_id(),
            player: player_change,
            opponent: opponent_change,
            timestamp: current_timestamp(),
        };

        info!(
            match_id = %report.match_id,
            player = %report.player.player_id,
            opponent = %report.opponent.player_id,
            result = %result,
            player_delta = report.player.delta,
            opponent_delta = report.opponent.delta,
            "Recorded match"
        );

        Ok(report)
    }

    async fn load_or_create(&self, player_id: &PlayerId) -> crate::error::Result<RatingEntry> {
        match self.storage.get_rating(player_id).await? {
            Some(entry) => Ok(entry),
            None => {
                debug!(player = %player_id, "No stored rating, starting fresh");
                Ok(RatingEntry::new(
                    player_id.clone(),
                    self.calculator.initial_rating(),
                ))
            }
        }
    }

    /// Apply one side of a match to an entry, returning the change
    fn apply(&self, entry: &mut RatingEntry, opponent_cp: Cp, result: MatchResult) -> RatingChange {
        let old_cp = entry.cp;
        let delta = self.calculator.compute_delta(old_cp, opponent_cp, result);

        let mut new_cp = old_cp + delta;
        if self.clamp_non_negative {
            new_cp = new_cp.max(0);
        }

        entry.record_match(result, new_cp);

        let old_rank = self.resolver.resolve_cp(old_cp);
        let new_rank = self.resolver.resolve_cp(new_cp);
        let rank_movement = RankMovement::between(&old_rank, &new_rank);

        if rank_movement != RankMovement::Unchanged {
            info!(
                player = %entry.player_id,
                from = %old_rank.display_name,
                to = %new_rank.display_name,
                movement = rank_movement.as_str(),
                "Rank changed"
            );
        }

        RatingChange {
            player_id: entry.player_id.clone(),
            result,
            old_cp,
            new_cp,
            delta,
            old_rank,
            new_rank,
            rank_movement,
        }
    }
}

fn validate_player_id(player_id: &PlayerId) -> crate::error::Result<()> {
    if player_id.trim().is_empty() {
        return Err(RatingError::InvalidPlayerId {
            player_id: player_id.clone(),
        }
        .into());
    }
    Ok(())
}
