//! Behavioral patterns - the five counters inferred from player choices.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The five behavioral patterns a player accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Analytical,
    Patience,
    Exploring,
    Helping,
    Building,
}

impl Pattern {
    /// Every pattern, in canonical order.
    pub const ALL: [Pattern; 5] = [
        Pattern::Analytical,
        Pattern::Patience,
        Pattern::Exploring,
        Pattern::Helping,
        Pattern::Building,
    ];

    /// Stable lowercase name, also used in dedup keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Analytical => "analytical",
            Pattern::Patience => "patience",
            Pattern::Exploring => "exploring",
            Pattern::Helping => "helping",
            Pattern::Building => "building",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pattern '{0}'")]
pub struct ParsePatternError(pub String);

impl FromStr for Pattern {
    type Err = ParsePatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePatternError(s.to_string()))
    }
}

/// Named milestones on a single pattern counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTier {
    Dormant,
    Emerging,
    Developing,
    Flourishing,
}

impl PatternTier {
    pub const EMERGING: u32 = 3;
    pub const DEVELOPING: u32 = 6;
    pub const FLOURISHING: u32 = 9;

    /// Tier reached by a counter value.
    pub fn for_level(level: u32) -> Self {
        match level {
            l if l >= Self::FLOURISHING => PatternTier::Flourishing,
            l if l >= Self::DEVELOPING => PatternTier::Developing,
            l if l >= Self::EMERGING => PatternTier::Emerging,
            _ => PatternTier::Dormant,
        }
    }

    /// Lowest counter value belonging to this tier.
    pub fn floor(&self) -> u32 {
        match self {
            PatternTier::Dormant => 0,
            PatternTier::Emerging => Self::EMERGING,
            PatternTier::Developing => Self::DEVELOPING,
            PatternTier::Flourishing => Self::FLOURISHING,
        }
    }
}

/// Current level of every pattern. Counters only grow during normal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatternLevels {
    #[serde(default)]
    pub analytical: u32,
    #[serde(default)]
    pub patience: u32,
    #[serde(default)]
    pub exploring: u32,
    #[serde(default)]
    pub helping: u32,
    #[serde(default)]
    pub building: u32,
}

impl PatternLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, pattern: Pattern, level: u32) -> Self {
        *self.slot_mut(pattern) = level;
        self
    }

    pub fn get(&self, pattern: Pattern) -> u32 {
        match pattern {
            Pattern::Analytical => self.analytical,
            Pattern::Patience => self.patience,
            Pattern::Exploring => self.exploring,
            Pattern::Helping => self.helping,
            Pattern::Building => self.building,
        }
    }

    fn slot_mut(&mut self, pattern: Pattern) -> &mut u32 {
        match pattern {
            Pattern::Analytical => &mut self.analytical,
            Pattern::Patience => &mut self.patience,
            Pattern::Exploring => &mut self.exploring,
            Pattern::Helping => &mut self.helping,
            Pattern::Building => &mut self.building,
        }
    }

    /// Grow a pattern. Counters saturate rather than wrap.
    pub fn bump(&mut self, pattern: Pattern, amount: u32) {
        let slot = self.slot_mut(pattern);
        *slot = slot.saturating_add(amount);
    }

    pub fn tier(&self, pattern: Pattern) -> PatternTier {
        PatternTier::for_level(self.get(pattern))
    }

    /// Sum of all five counters.
    /// Sum of every counter. Saturates like `bump`.
    pub fn total(&self) -> u32 {
        Pattern::ALL
            .iter()
            .fold(0_u32, |acc, p| acc.saturating_add(self.get(*p)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pattern, u32)> + '_ {
        Pattern::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// The strictly highest pattern, if it has at least reached `Emerging`.
    ///
    /// Ties at the top mean the player has no dominant pattern.
    pub fn dominant(&self) -> Option<Pattern> {
        let mut best: Option<(Pattern, u32)> = None;
        let mut tied = false;

        for (pattern, level) in self.iter() {
            match best {
                Some((_, top)) if level == top => tied = true,
                Some((_, top)) if level < top => {}
                _ => {
                    best = Some((pattern, level));
                    tied = false;
                }
            }
        }

        match best {
            Some((pattern, level)) if !tied && level >= PatternTier::EMERGING => Some(pattern),
            _ => None,
        }
    }

    /// Patterns whose tier rose between `self` and `after`.
    pub fn tier_changes(&self, after: &PatternLevels) -> Vec<(Pattern, PatternTier, PatternTier)> {
        Pattern::ALL
            .into_iter()
            .filter_map(|p| {
                let from = self.tier(p);
                let to = after.tier(p);
                (to > from).then_some((p, from, to))
            })
            .collect()
    }
}
