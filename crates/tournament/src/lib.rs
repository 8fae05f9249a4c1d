use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    domain::{DishId, DishStatus, MatchRecord, Roster},
    error::{ApiError, ErrorCode},
    protocol::{BracketTable, ProgressionEntry},
};
use thiserror::Error;

pub mod bracket;
pub mod match_log;
pub mod memory;
pub mod progression;
pub mod status;

pub use match_log::MatchLog;

/// Durable backing for the match log. Implementations must finish the write
/// before returning and must order records by `(recorded_at, insertion)`.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn insert_match(
        &self,
        round: u32,
        winner: DishId,
        loser: DishId,
        recorded_at: DateTime<Utc>,
    ) -> Result<MatchRecord>;
    async fn latest_match(&self) -> Result<Option<MatchRecord>>;
    /// Removes the latest record (ties broken by insertion order) in one step.
    async fn remove_latest_match(&self) -> Result<Option<MatchRecord>>;
    async fn list_matches(&self) -> Result<Vec<MatchRecord>>;
}

#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("invalid match: {0}")]
    InvalidMatch(String),
    #[error("match log is empty")]
    EmptyLog,
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<TournamentError> for ApiError {
    fn from(value: TournamentError) -> Self {
        let code = match &value {
            TournamentError::InvalidMatch(_) => ErrorCode::InvalidMatch,
            TournamentError::EmptyLog => ErrorCode::EmptyLog,
            TournamentError::Storage(_) => ErrorCode::Internal,
        };
        ApiError::new(code, value.to_string())
    }
}

/// Command/query surface used by the presentation layers. Every query
/// re-reads the whole log and derives its view from scratch.
pub struct Tournament<S> {
    log: MatchLog<S>,
}

impl<S: MatchStore> Tournament<S> {
    pub fn new(store: S, roster: Roster) -> Self {
        Self {
            log: MatchLog::new(store, roster),
        }
    }

    pub fn roster(&self) -> Roster {
        self.log.roster()
    }

    pub fn store(&self) -> &S {
        self.log.store()
    }

    pub async fn add_match(
        &self,
        round: u32,
        winner: DishId,
        loser: DishId,
    ) -> Result<MatchRecord, TournamentError> {
        self.log.append(round, winner, loser).await
    }

    pub async fn remove_last(&self) -> Result<MatchRecord, TournamentError> {
        self.log.remove_last().await
    }

    pub async fn matches(&self) -> Result<Vec<MatchRecord>, TournamentError> {
        self.log.all().await
    }

    pub async fn status(&self) -> Result<BTreeMap<DishId, DishStatus>, TournamentError> {
        let records = self.log.all().await?;
        Ok(status::derive_status(self.roster(), &records))
    }

    pub async fn bracket_table(&self) -> Result<BracketTable, TournamentError> {
        let records = self.log.all().await?;
        Ok(bracket::build_bracket(self.roster(), &records))
    }

    pub async fn progression(&self) -> Result<Vec<ProgressionEntry>, TournamentError> {
        let records = self.log.all().await?;
        Ok(progression::derive_progression(self.roster(), &records))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
