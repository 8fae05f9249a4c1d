use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{DishId, MatchId, MatchRecord};
use tournament::MatchStore;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/tastetest.db";

/// Fixed-width UTC text so that `ORDER BY recorded_at` is chronological.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn match_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM match_log")
            .fetch_one(&self.pool)
            .await
            .context("failed to count match_log rows")?;
        Ok(count as u64)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn encode_timestamp(recorded_at: DateTime<Utc>) -> String {
    recorded_at.format(TIMESTAMP_FORMAT).to_string()
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("invalid recorded_at value '{raw}'"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn match_from_row(row: &SqliteRow) -> Result<MatchRecord> {
    let round: i64 = row.try_get("round")?;
    let recorded_at: String = row.try_get("recorded_at")?;
    Ok(MatchRecord {
        match_id: MatchId(row.try_get("id")?),
        round: u32::try_from(round).with_context(|| format!("round {round} out of range"))?,
        winner: DishId(row.try_get("winner")?),
        loser: DishId(row.try_get("loser")?),
        recorded_at: decode_timestamp(&recorded_at)?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[async_trait]
impl MatchStore for Storage {
    async fn insert_match(
        &self,
        round: u32,
        winner: DishId,
        loser: DishId,
        recorded_at: DateTime<Utc>,
    ) -> Result<MatchRecord> {
        let rec = sqlx::query(
            "INSERT INTO match_log (round, winner, loser, recorded_at) VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(i64::from(round))
        .bind(winner.0)
        .bind(loser.0)
        .bind(encode_timestamp(recorded_at))
        .fetch_one(&self.pool)
        .await
        .context("failed to insert match_log row")?;
        Ok(MatchRecord {
            match_id: MatchId(rec.get::<i64, _>(0)),
            round,
            winner,
            loser,
            recorded_at,
        })
    }

    async fn latest_match(&self) -> Result<Option<MatchRecord>> {
        let row = sqlx::query(
            "SELECT id, round, winner, loser, recorded_at
             FROM match_log
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .context("failed to load latest match_log row")?;
        row.as_ref().map(match_from_row).transpose()
    }

    async fn remove_latest_match(&self) -> Result<Option<MatchRecord>> {
        let row = sqlx::query(
            "DELETE FROM match_log
             WHERE id = (
                 SELECT id FROM match_log ORDER BY recorded_at DESC, id DESC LIMIT 1
             )
             RETURNING id, round, winner, loser, recorded_at",
        )
        .fetch_optional(&self.pool)
        .await
        .context("failed to delete latest match_log row")?;
        row.as_ref().map(match_from_row).transpose()
    }

    async fn list_matches(&self) -> Result<Vec<MatchRecord>> {
        let rows = sqlx::query(
            "SELECT id, round, winner, loser, recorded_at
             FROM match_log
             ORDER BY recorded_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list match_log rows")?;
        rows.iter().map(match_from_row).collect()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
