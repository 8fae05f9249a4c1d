use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::domain::{DishId, MatchId, MatchRecord};
use tokio::sync::RwLock;

use crate::MatchStore;

/// Non-durable store keeping the log in process memory.
#[derive(Default)]
pub struct InMemoryMatchStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    records: Vec<MatchRecord>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn insert_match(
        &self,
        round: u32,
        winner: DishId,
        loser: DishId,
        recorded_at: DateTime<Utc>,
    ) -> Result<MatchRecord> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let record = MatchRecord {
            match_id: MatchId(inner.next_id),
            round,
            winner,
            loser,
            recorded_at,
        };
        inner.records.push(record.clone());
        inner
            .records
            .sort_by_key(|record| (record.recorded_at, record.match_id));
        Ok(record)
    }

    async fn latest_match(&self) -> Result<Option<MatchRecord>> {
        Ok(self.inner.read().await.records.last().cloned())
    }

    async fn remove_latest_match(&self) -> Result<Option<MatchRecord>> {
        Ok(self.inner.write().await.records.pop())
    }

    async fn list_matches(&self) -> Result<Vec<MatchRecord>> {
        Ok(self.inner.read().await.records.clone())
    }
}
