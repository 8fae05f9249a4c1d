use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidRosterSize;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(DishId);
id_newtype!(MatchId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishStatus {
    #[default]
    Neutral,
    Winner,
    Loser,
}

/// The closed set of dishes taking part, numbered `1..=size`.
///
/// Only constructible through [`Roster::new`], which keeps `size` within
/// `2..=MAX_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roster {
    size: u32,
}

impl Roster {
    pub const DEFAULT_SIZE: u32 = 31;
    pub const MAX_SIZE: u32 = 1024;

    pub fn new(size: u32) -> Result<Self, InvalidRosterSize> {
        if !(2..=Self::MAX_SIZE).contains(&size) {
            return Err(InvalidRosterSize(size));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn contains(&self, dish: DishId) -> bool {
        (1..=i64::from(self.size)).contains(&dish.0)
    }

    pub fn dishes(&self) -> impl Iterator<Item = DishId> {
        (1..=i64::from(self.size)).map(DishId)
    }

    /// Number of rounds a single-elimination bracket over this roster needs.
    pub fn max_rounds(&self) -> u32 {
        u32::BITS - self.size.saturating_sub(1).leading_zeros()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub round: u32,
    pub winner: DishId,
    pub loser: DishId,
    pub recorded_at: DateTime<Utc>,
}
