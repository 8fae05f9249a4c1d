use shared::{
    domain::{MatchRecord, Roster},
    protocol::{BracketCell, BracketColumn, BracketTable},
};

/// Lays the log out as one column per round, `1..=max(round)`.
///
/// The log carries no slot or seed, so the layout only approximates a
/// bracket: round 1 emits `winner, loser, blank` per match, later rounds
/// emit a block of `2^(round+1) - 1` cells with the winner in the middle.
/// Columns are padded with blanks to a common height. Records whose round
/// is outside the roster's bracket depth are skipped.
pub fn build_bracket(roster: Roster, log: &[MatchRecord]) -> BracketTable {
    let max_rounds = roster.max_rounds();
    let shown: Vec<&MatchRecord> = log
        .iter()
        .filter(|record| (1..=max_rounds).contains(&record.round))
        .collect();

    let Some(last_round) = shown.iter().map(|record| record.round).max() else {
        return BracketTable::default();
    };

    let mut columns: Vec<BracketColumn> = (1..=last_round)
        .map(|round| BracketColumn {
            round,
            label: round_label(round),
            cells: Vec::new(),
        })
        .collect();

    for record in shown {
        let cells = &mut columns[(record.round - 1) as usize].cells;
        if record.round == 1 {
            cells.extend([
                BracketCell::Dish(record.winner),
                BracketCell::Dish(record.loser),
                BracketCell::Blank,
            ]);
        } else {
            let block = block_len(record.round);
            let middle = block / 2;
            cells.extend((0..block).map(|row| {
                if row == middle {
                    BracketCell::Dish(record.winner)
                } else {
                    BracketCell::Blank
                }
            }));
        }
    }

    let height = columns
        .iter()
        .map(|column| column.cells.len())
        .max()
        .unwrap_or(0);
    for column in &mut columns {
        column.cells.resize(height, BracketCell::Blank);
    }

    BracketTable { columns }
}

pub fn round_label(round: u32) -> String {
    format!("Round {round}")
}

fn block_len(round: u32) -> usize {
    (1usize << (round + 1)) - 1
}

#[cfg(test)]
#[path = "tests/bracket_tests.rs"]
mod tests;
