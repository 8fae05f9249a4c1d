use std::collections::BTreeMap;

use shared::domain::{DishId, DishStatus, MatchRecord, Roster};

/// Current status of every dish on the roster.
///
/// Records are applied in log order, loser first and then winner, so each
/// dish ends up with the role of its most recent appearance regardless of
/// round. Ids outside the roster are ignored so the map keys are exactly
/// the roster.
pub fn derive_status(roster: Roster, log: &[MatchRecord]) -> BTreeMap<DishId, DishStatus> {
    let mut statuses: BTreeMap<DishId, DishStatus> = roster
        .dishes()
        .map(|dish| (dish, DishStatus::Neutral))
        .collect();

    for record in log {
        if let Some(status) = statuses.get_mut(&record.loser) {
            *status = DishStatus::Loser;
        }
        if let Some(status) = statuses.get_mut(&record.winner) {
            *status = DishStatus::Winner;
        }
    }

    statuses
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
