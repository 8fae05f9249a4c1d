//! Plain-text views for the terminal.

use std::collections::BTreeMap;

use shared::{
    domain::{DishId, DishStatus, MatchRecord},
    protocol::{BracketCell, BracketTable, ProgressionEntry},
};

pub fn render_matches(matches: &[MatchRecord]) -> String {
    if matches.is_empty() {
        return "no matches recorded\n".to_string();
    }
    matches
        .iter()
        .map(|record| {
            format!(
                "#{} round {}: {} beat {} at {}\n",
                record.match_id,
                record.round,
                record.winner,
                record.loser,
                record.recorded_at.format("%Y-%m-%d %H:%M:%S")
            )
        })
        .collect()
}

pub fn render_status(statuses: &BTreeMap<DishId, DishStatus>) -> String {
    statuses
        .iter()
        .map(|(dish, status)| {
            let label = match status {
                DishStatus::Neutral => "neutral",
                DishStatus::Winner => "winner",
                DishStatus::Loser => "loser",
            };
            format!("Dish {:>2}: {label}\n", dish.0)
        })
        .collect()
}

pub fn render_bracket(table: &BracketTable) -> String {
    if table.is_empty() {
        return "no matches recorded\n".to_string();
    }

    let width = table
        .columns
        .iter()
        .map(|column| column.label.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .map(|column| format!("{:<width$}", column.label))
        .collect();
    push_row(&mut out, &header);

    for row in 0..table.height() {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|column| match column.cells[row] {
                BracketCell::Dish(dish) => format!("{:<width$}", dish.0),
                BracketCell::Blank => " ".repeat(width),
            })
            .collect();
        push_row(&mut out, &cells);
    }
    out
}

/// One line per dish, one arrow per stage reached.
pub fn render_progression(entries: &[ProgressionEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("Dish {}: {}\n", entry.dish, "→ ".repeat(entry.stage as usize)))
        .collect()
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str(cells.join(" | ").trim_end());
    out.push('\n');
}
