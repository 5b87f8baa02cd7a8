//! Test fixtures and storage wrappers for integration testing

use async_trait::async_trait;
use caro_rating::error::Result;
use caro_rating::rating::{InMemoryRatingStorage, RatingEntry, RatingStorage};
use caro_rating::types::{Cp, PlayerId};
use std::sync::{Arc, Mutex};

/// Storage that forwards to memory and records every batch it was asked to store
#[derive(Debug, Default)]
pub struct RecordingRatingStorage {
    inner: InMemoryRatingStorage,
    stored_batches: Arc<Mutex<Vec<Vec<RatingEntry>>>>,
}

impl RecordingRatingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all stored batches (for testing)
    pub fn stored_batches(&self) -> Vec<Vec<RatingEntry>> {
        self.stored_batches
            .lock()
            .map(|batches| batches.clone())
            .unwrap_or_default()
    }

    /// Count stored batches
    pub fn batch_count(&self) -> usize {
        self.stored_batches().len()
    }
}

#[async_trait]
impl RatingStorage for RecordingRatingStorage {
    async fn get_rating(&self, player_id: &PlayerId) -> Result<Option<RatingEntry>> {
        self.inner.get_rating(player_id).await
    }

    async fn store_rating(&self, entry: RatingEntry) -> Result<()> {
        if let Ok(mut batches) = self.stored_batches.lock() {
            batches.push(vec![entry.clone()]);
        }
        self.inner.store_rating(entry).await
    }

    async fn store_ratings(&self, entries: Vec<RatingEntry>) -> Result<()> {
        if let Ok(mut batches) = self.stored_batches.lock() {
            batches.push(entries.clone());
        }
        self.inner.store_ratings(entries).await
    }

    async fn remove_rating(&self, player_id: &PlayerId) -> Result<bool> {
        self.inner.remove_rating(player_id).await
    }

    async fn top_ratings(&self, limit: usize) -> Result<Vec<RatingEntry>> {
        self.inner.top_ratings(limit).await
    }

    async fn player_count(&self) -> Result<usize> {
        self.inner.player_count().await
    }
}

/// Storage that yields to the scheduler after every read, like a remote store
#[derive(Debug, Default)]
pub struct YieldingRatingStorage {
    inner: InMemoryRatingStorage,
}

impl YieldingRatingStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingStorage for YieldingRatingStorage {
    async fn get_rating(&self, player_id: &PlayerId) -> Result<Option<RatingEntry>> {
        let entry = self.inner.get_rating(player_id).await;
        tokio::task::yield_now().await;
        entry
    }

    async fn store_rating(&self, entry: RatingEntry) -> Result<()> {
        self.inner.store_rating(entry).await
    }

    async fn store_ratings(&self, entries: Vec<RatingEntry>) -> Result<()> {
        self.inner.store_ratings(entries).await
    }

    async fn remove_rating(&self, player_id: &PlayerId) -> Result<bool> {
        self.inner.remove_rating(player_id).await
    }

    async fn top_ratings(&self, limit: usize) -> Result<Vec<RatingEntry>> {
        self.inner.top_ratings(limit).await
    }

    async fn player_count(&self) -> Result<usize> {
        self.inner.player_count().await
    }
}

/// In-memory storage pre-loaded with the given players
pub async fn seeded_storage(players: &[(&str, Cp)]) -> Arc<InMemoryRatingStorage> {
    let storage = Arc::new(InMemoryRatingStorage::default());
    for (player_id, cp) in players {
        storage
            .store_rating(RatingEntry::new(player_id.to_string(), *cp))
            .await
            .expect("seeding in-memory storage cannot fail");
    }
    storage
}
