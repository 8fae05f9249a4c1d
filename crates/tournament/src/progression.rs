use std::collections::BTreeMap;

use shared::{
    domain::{DishId, MatchRecord, Roster},
    protocol::ProgressionEntry,
};

/// Stage reached by each dish, counted as wins in the log. Sorted by stage
/// descending, ties by dish id.
pub fn derive_progression(roster: Roster, log: &[MatchRecord]) -> Vec<ProgressionEntry> {
    let mut stages: BTreeMap<DishId, u32> = roster.dishes().map(|dish| (dish, 0)).collect();
    for record in log {
        if let Some(stage) = stages.get_mut(&record.winner) {
            *stage += 1;
        }
    }

    let mut entries: Vec<ProgressionEntry> = stages
        .into_iter()
        .map(|(dish, stage)| ProgressionEntry { dish, stage })
        .collect();
    entries.sort_by(|a, b| b.stage.cmp(&a.stage).then(a.dish.cmp(&b.dish)));
    entries
}

#[cfg(test)]
#[path = "tests/progression_tests.rs"]
mod tests;
