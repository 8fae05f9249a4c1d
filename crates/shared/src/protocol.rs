use serde::{Deserialize, Serialize};

use crate::domain::{DishId, DishStatus, Roster};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMatchRequest {
    pub round: u32,
    pub winner: DishId,
    pub loser: DishId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    pub size: u32,
    pub max_rounds: u32,
}

impl From<Roster> for RosterSummary {
    fn from(roster: Roster) -> Self {
        Self {
            size: roster.size(),
            max_rounds: roster.max_rounds(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishStatusEntry {
    pub dish: DishId,
    pub status: DishStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionEntry {
    pub dish: DishId,
    pub stage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketCell {
    Dish(DishId),
    Blank,
}

impl BracketCell {
    pub fn dish(&self) -> Option<DishId> {
        match self {
            Self::Dish(dish) => Some(*dish),
            Self::Blank => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketColumn {
    pub round: u32,
    pub label: String,
    pub cells: Vec<BracketCell>,
}

/// Per-round display grid. Adjacent cells are illustrative, not seeding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    pub columns: Vec<BracketColumn>,
}

impl BracketTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, |column| column.cells.len())
    }
}
