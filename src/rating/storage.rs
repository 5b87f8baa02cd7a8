//! Rating storage interface and implementations
//!
//! The account store that owns persisted CP lives outside this crate. This
//! module defines the interface the match flow needs from it, plus an
//! in-memory implementation used by the CLI and tests.

use crate::types::{Cp, MatchResult, PlayerId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage entry for a player's rating with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub player_id: PlayerId,
    pub cp: Cp,
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RatingEntry {
    /// Create a new rating entry for a new player
    pub fn new(player_id: PlayerId, initial_cp: Cp) -> Self {
        let now = Utc::now();
        Self {
            player_id,
            cp: initial_cp,
            games_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            last_updated: now,
            created_at: now,
        }
    }

    /// Record a finished match and its resulting rating
    pub fn record_match(&mut self, result: MatchResult, new_cp: Cp) {
        self.cp = new_cp;
        self.games_played += 1;
        match result {
            MatchResult::Win => self.wins += 1,
            MatchResult::Loss => self.losses += 1,
            MatchResult::Draw => self.draws += 1,
        }
        self.last_updated = Utc::now();
    }

    /// Fraction of games won, 0.0 before the first game
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games_played as f64
    }
}

/// Trait for rating storage operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingStorage: Send + Sync {
    /// Get a player's rating entry
    async fn get_rating(&self, player_id: &PlayerId) -> crate::error::Result<Option<RatingEntry>>;

    /// Store or update a player's rating
    async fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()>;

    /// Store multiple rating updates atomically
    async fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()>;

    /// Remove a player's rating
    async fn remove_rating(&self, player_id: &PlayerId) -> crate::error::Result<bool>;

    /// Highest rated players, best first
    async fn top_ratings(&self, limit: usize) -> crate::error::Result<Vec<RatingEntry>>;

    /// Get total number of rated players
    async fn player_count(&self) -> crate::error::Result<usize>;
}

/// In-memory rating storage implementation
#[derive(Debug)]
pub struct InMemoryRatingStorage {
    ratings: RwLock<HashMap<PlayerId, RatingEntry>>,
    max_entries: usize,
}

impl InMemoryRatingStorage {
    /// Create a new in-memory rating storage
    pub fn new(max_entries: usize) -> Self {
        Self {
            ratings: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Drop the least recently updated entries beyond `max_entries`
    fn evict_oldest(ratings: &mut HashMap<PlayerId, RatingEntry>, max_entries: usize) {
        if ratings.len() <= max_entries {
            return;
        }

        let mut entries: Vec<_> = ratings
            .iter()
            .map(|(id, entry)| (id.clone(), entry.last_updated))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1));

        let to_remove = ratings.len() - max_entries;
        for (player_id, _) in entries.into_iter().take(to_remove) {
            ratings.remove(&player_id);
        }
    }
}

impl Default for InMemoryRatingStorage {
    fn default() -> Self {
        Self::new(10000)
    }
}

#[async_trait]
impl RatingStorage for InMemoryRatingStorage {
    async fn get_rating(&self, player_id: &PlayerId) -> crate::error::Result<Option<RatingEntry>> {
        let ratings = self.ratings.read().await;
        Ok(ratings.get(player_id).cloned())
    }

    async fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()> {
        let mut ratings = self.ratings.write().await;
        ratings.insert(entry.player_id.clone(), entry);
        Self::evict_oldest(&mut ratings, self.max_entries);
        Ok(())
    }

    async fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()> {
        let mut ratings = self.ratings.write().await;
        for entry in entries {
            ratings.insert(entry.player_id.clone(), entry);
        }
        Self::evict_oldest(&mut ratings, self.max_entries);
        Ok(())
    }

    async fn remove_rating(&self, player_id: &PlayerId) -> crate::error::Result<bool> {
        let mut ratings = self.ratings.write().await;
        Ok(ratings.remove(player_id).is_some())
    }

    async fn top_ratings(&self, limit: usize) -> crate::error::Result<Vec<RatingEntry>> {
        let ratings = self.ratings.read().await;

        let mut entries: Vec<RatingEntry> = ratings.values().cloned().collect();
        entries.sort_by(|a, b| b.cp.cmp(&a.cp).then_with(|| a.player_id.cmp(&b.player_id)));
        entries.truncate(limit);

        Ok(entries)
    }

    async fn player_count(&self) -> crate::error::Result<usize> {
        Ok(self.ratings.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_entry_record_match() {
        let mut entry = RatingEntry::new("player1".to_string(), 0);
        assert_eq!(entry.games_played, 0);
        assert_eq!(entry.win_rate(), 0.0);

        entry.record_match(MatchResult::Win, 20);
        entry.record_match(MatchResult::Loss, 3);
        entry.record_match(MatchResult::Draw, 4);
        entry.record_match(MatchResult::Win, 25);

        assert_eq!(entry.cp, 25);
        assert_eq!(entry.games_played, 4);
        assert_eq!(entry.wins, 2);
        assert_eq!(entry.losses, 1);
        assert_eq!(entry.draws, 1);
        assert_eq!(entry.win_rate(), 0.5);
        assert!(entry.last_updated >= entry.created_at);
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let storage = InMemoryRatingStorage::default();
        let id = "player1".to_string();

        assert!(storage.get_rating(&id).await.unwrap().is_none());

        storage
            .store_rating(RatingEntry::new(id.clone(), 450))
            .await
            .unwrap();

        let entry = storage.get_rating(&id).await.unwrap().unwrap();
        assert_eq!(entry.cp, 450);
        assert_eq!(storage.player_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_store_ratings_batch() {
        let storage = InMemoryRatingStorage::default();

        storage
            .store_ratings(vec![
                RatingEntry::new("a".to_string(), 10),
                RatingEntry::new("b".to_string(), 20),
            ])
            .await
            .unwrap();

        assert_eq!(storage.player_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_remove_rating() {
        let storage = InMemoryRatingStorage::default();
        let id = "player1".to_string();

        storage
            .store_rating(RatingEntry::new(id.clone(), 100))
            .await
            .unwrap();

        assert!(storage.remove_rating(&id).await.unwrap());
        assert!(!storage.remove_rating(&id).await.unwrap());
        assert_eq!(storage.player_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_top_ratings_order() {
        let storage = InMemoryRatingStorage::default();

        storage
            .store_ratings(vec![
                RatingEntry::new("carol".to_string(), 900),
                RatingEntry::new("alice".to_string(), 1600),
                RatingEntry::new("bob".to_string(), 900),
                RatingEntry::new("dave".to_string(), 10),
            ])
            .await
            .unwrap();

        let top = storage.top_ratings(3).await.unwrap();
        let ids: Vec<&str> = top.iter().map(|e| e.player_id.as_str()).collect();

        assert_eq!(ids, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn test_eviction_keeps_most_recent() {
        let storage = InMemoryRatingStorage::new(2);

        let mut old = RatingEntry::new("old".to_string(), 1);
        old.last_updated = Utc::now() - chrono::Duration::hours(1);
        storage.store_rating(old).await.unwrap();
        storage
            .store_rating(RatingEntry::new("mid".to_string(), 2))
            .await
            .unwrap();
        storage
            .store_rating(RatingEntry::new("new".to_string(), 3))
            .await
            .unwrap();

        assert_eq!(storage.player_count().await.unwrap(), 2);
        assert!(storage
            .get_rating(&"old".to_string())
            .await
            .unwrap()
            .is_none());
    }
}
