//! Meta-narrative revelations - moments where the story steps back and
//! names what the player has been doing all along.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use story_state::{Pattern, PatternLevels};

/// The three shapes a revelation requirement can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevelationRequirement {
    /// Any single pattern at or above the threshold.
    AnyPattern { threshold: u32 },
    /// All patterns summed.
    PatternSum { total: u32 },
    /// Both named patterns at or above the threshold.
    PatternPair {
        first: Pattern,
        second: Pattern,
        threshold: u32,
    },
}

impl RevelationRequirement {
    pub fn is_met(&self, patterns: &PatternLevels) -> bool {
        match self {
            RevelationRequirement::AnyPattern { threshold } => {
                patterns.iter().any(|(_, level)| level >= *threshold)
            }
            RevelationRequirement::PatternSum { total } => patterns.total() >= *total,
            RevelationRequirement::PatternPair {
                first,
                second,
                threshold,
            } => patterns.get(*first) >= *threshold && patterns.get(*second) >= *threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revelation {
    pub id: String,
    pub title: String,
    pub text: String,
    pub requirement: RevelationRequirement,
}

impl Revelation {
    pub fn is_unlocked(&self, patterns: &PatternLevels) -> bool {
        self.requirement.is_met(patterns)
    }

    /// Manifestation key persisted once the revelation is shown.
    pub fn dedup_key(&self) -> String {
        format!("revelation_{}", self.id)
    }
}

/// Unlocked revelations not yet shown, in authored order.
pub fn unseen_revelations<'a>(
    revelations: &'a [Revelation],
    patterns: &PatternLevels,
    already_shown: &HashSet<String>,
) -> Vec<&'a Revelation> {
    revelations
        .iter()
        .filter(|r| r.is_unlocked(patterns))
        .filter(|r| !already_shown.contains(&r.dedup_key()))
        .collect()
}
