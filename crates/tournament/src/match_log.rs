use chrono::{SubsecRound, Utc};
use shared::domain::{DishId, MatchRecord, Roster};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{MatchStore, TournamentError};

/// Timestamps are kept at the precision the store persists.
const TIMESTAMP_DIGITS: u16 = 6;

/// Append-only log of match results over a fixed roster.
///
/// Mutations are serialized behind `write_lock` so that timestamps stay
/// monotonic and `remove_last` always sees the record `append` just wrote.
/// Reads go straight to the store.
pub struct MatchLog<S> {
    store: S,
    roster: Roster,
    write_lock: Mutex<()>,
}

impl<S: MatchStore> MatchLog<S> {
    pub fn new(store: S, roster: Roster) -> Self {
        Self {
            store,
            roster,
            write_lock: Mutex::new(()),
        }
    }

    pub fn roster(&self) -> Roster {
        self.roster
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn append(
        &self,
        round: u32,
        winner: DishId,
        loser: DishId,
    ) -> Result<MatchRecord, TournamentError> {
        if let Err(err) = self.validate(round, winner, loser) {
            warn!(round, winner = winner.0, loser = loser.0, %err, "match rejected");
            return Err(err);
        }

        let _guard = self.write_lock.lock().await;
        let mut recorded_at = Utc::now().trunc_subsecs(TIMESTAMP_DIGITS);
        if let Some(newest) = self.store.latest_match().await.map_err(storage_failure)? {
            // a clock step backwards must not reorder the log
            recorded_at = recorded_at.max(newest.recorded_at);
        }

        let record = self
            .store
            .insert_match(round, winner, loser, recorded_at)
            .await
            .map_err(storage_failure)?;
        info!(
            match_id = record.match_id.0,
            round,
            winner = winner.0,
            loser = loser.0,
            "match recorded"
        );
        Ok(record)
    }

    pub async fn remove_last(&self) -> Result<MatchRecord, TournamentError> {
        let _guard = self.write_lock.lock().await;
        let removed = self
            .store
            .remove_latest_match()
            .await
            .map_err(storage_failure)?;
        let Some(record) = removed else {
            warn!("remove_last on empty match log");
            return Err(TournamentError::EmptyLog);
        };
        info!(
            match_id = record.match_id.0,
            round = record.round,
            winner = record.winner.0,
            loser = record.loser.0,
            "match retracted"
        );
        Ok(record)
    }

    pub async fn all(&self) -> Result<Vec<MatchRecord>, TournamentError> {
        self.store.list_matches().await.map_err(storage_failure)
    }

    fn validate(&self, round: u32, winner: DishId, loser: DishId) -> Result<(), TournamentError> {
        if winner == loser {
            return Err(TournamentError::InvalidMatch(format!(
                "dish {winner} cannot play against itself"
            )));
        }
        for dish in [winner, loser] {
            if !self.roster.contains(dish) {
                return Err(TournamentError::InvalidMatch(format!(
                    "dish {dish} is outside the roster 1..={}",
                    self.roster.size()
                )));
            }
        }
        let max_rounds = self.roster.max_rounds();
        if !(1..=max_rounds).contains(&round) {
            return Err(TournamentError::InvalidMatch(format!(
                "round {round} is outside 1..={max_rounds}"
            )));
        }
        Ok(())
    }
}

fn storage_failure(err: anyhow::Error) -> TournamentError {
    let message = format!("{err:#}");
    error!(%message, "match log storage failure");
    TournamentError::Storage(err)
}

#[cfg(test)]
#[path = "tests/match_log_tests.rs"]
mod tests;
