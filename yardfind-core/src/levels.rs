//! Hunter level table and XP-to-level resolution.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single entry in the level table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub level: u32,
    pub title: String,
    pub xp_required: u32,
}

/// Ordered table mapping XP thresholds to hunter levels.
///
/// Entries are ascending by `xp_required`; the first entry is the level-0
/// floor every profile starts at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    pub levels: Vec<LevelDef>,
}

/// Validation failures for a level table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelTableError {
    #[error("level table is empty")]
    Empty,
    #[error("first level must require 0 xp (got {0})")]
    NonZeroFloor(u32),
    #[error("levels must strictly increase at index {index} (level {level}, xp {xp_required})")]
    NotStrictlyIncreasing {
        index: usize,
        level: u32,
        xp_required: u32,
    },
}

impl LevelTable {
    /// Load a level table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the structural invariants: non-empty, zero floor, and both
    /// `level` and `xp_required` strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns `LevelTableError` describing the first violation found.
    pub fn validate(&self) -> Result<(), LevelTableError> {
        let Some(first) = self.levels.first() else {
            return Err(LevelTableError::Empty);
        };
        if first.xp_required != 0 {
            return Err(LevelTableError::NonZeroFloor(first.xp_required));
        }
        for (index, pair) in self.levels.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.level <= prev.level || next.xp_required <= prev.xp_required {
                return Err(LevelTableError::NotStrictlyIncreasing {
                    index: index + 1,
                    level: next.level,
                    xp_required: next.xp_required,
                });
            }
        }
        Ok(())
    }

    /// Resolve the level reached at `xp`: the highest entry whose
    /// `xp_required` does not exceed it. Scans from the top since thresholds
    /// are strictly increasing.
    #[must_use]
    pub fn level_for(&self, xp: u32) -> &LevelDef {
        self.levels
            .iter()
            .rev()
            .find(|def| xp >= def.xp_required)
            .unwrap_or_else(|| &self.levels[0])
    }

    /// XP still needed to reach the next level, if any.
    #[must_use]
    pub fn xp_to_next(&self, xp: u32) -> Option<u32> {
        self.levels
            .iter()
            .find(|def| def.xp_required > xp)
            .map(|def| def.xp_required - xp)
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        let entry = |level: u32, title: &str, xp_required: u32| LevelDef {
            level,
            title: title.to_string(),
            xp_required,
        };
        Self {
            levels: vec![
                entry(0, "Newbie Hunter", 0),
                entry(1, "Curious Browser", 50),
                entry(2, "Bargain Scout", 150),
                entry(3, "Treasure Seeker", 350),
                entry(4, "Deal Finder", 600),
                entry(5, "Yard Sale Warrior", 1000),
                entry(6, "Thrift Master", 1500),
                entry(7, "Haggle King", 2200),
                entry(8, "Garage Sale Guru", 3000),
                entry(9, "Estate Legend", 4000),
                entry(10, "Yard Sale L33T", 5500),
            ],
        }
    }
}
