//! Proposed mutations returned by the consequence pipeline.
//!
//! The engine never writes world state itself; it hands a `StateDelta` back
//! and the caller folds it in with [`WorldState::apply_delta`].
//!
//! [`WorldState::apply_delta`]: super::WorldState::apply_delta

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::characters::CharacterId;
use crate::patterns::{Pattern, PatternTier};

/// Why a trust adjustment was proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustReason {
    /// Drift from not visiting a character.
    Decay,
    /// A cascade degree touched this character.
    Cascade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustAdjustment {
    pub character: CharacterId,
    pub delta: i32,
    pub reason: TrustReason,
}

/// A pattern crossing into a higher tier during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEvolution {
    pub pattern: Pattern,
    pub from: PatternTier,
    pub to: PatternTier,
}

/// A batch of state changes. Every field is additive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateDelta {
    #[serde(default)]
    pub global_flags: BTreeSet<String>,

    #[serde(default)]
    pub knowledge_flags: BTreeMap<CharacterId, BTreeSet<String>>,

    #[serde(default)]
    pub trust_adjustments: Vec<TrustAdjustment>,

    /// Characters whose last-interaction stamp moves to the current session.
    #[serde(default)]
    pub interaction_stamps: BTreeSet<CharacterId>,

    #[serde(default)]
    pub pattern_evolutions: Vec<PatternEvolution>,
}

impl StateDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flag(&mut self, flag: impl Into<String>) {
        self.global_flags.insert(flag.into());
    }

    pub fn add_knowledge(&mut self, character: CharacterId, flag: impl Into<String>) {
        self.knowledge_flags
            .entry(character)
            .or_default()
            .insert(flag.into());
    }

    pub fn adjust_trust(&mut self, character: CharacterId, delta: i32, reason: TrustReason) {
        if delta != 0 {
            self.trust_adjustments.push(TrustAdjustment {
                character,
                delta,
                reason,
            });
        }
    }

    pub fn stamp_interaction(&mut self, character: CharacterId) {
        self.interaction_stamps.insert(character);
    }

    pub fn record_evolution(&mut self, evolution: PatternEvolution) {
        self.pattern_evolutions.push(evolution);
    }

    /// Fold another delta into this one, preserving order of list entries.
    pub fn merge(&mut self, other: StateDelta) {
        self.global_flags.extend(other.global_flags);
        for (character, flags) in other.knowledge_flags {
            self.knowledge_flags.entry(character).or_default().extend(flags);
        }
        self.trust_adjustments.extend(other.trust_adjustments);
        self.interaction_stamps.extend(other.interaction_stamps);
        self.pattern_evolutions.extend(other.pattern_evolutions);
    }

    pub fn is_empty(&self) -> bool {
        self.global_flags.is_empty()
            && self.knowledge_flags.is_empty()
            && self.trust_adjustments.is_empty()
            && self.interaction_stamps.is_empty()
            && self.pattern_evolutions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_trust_adjustment_is_dropped() {
        let mut delta = StateDelta::new();
        delta.adjust_trust(CharacterId::from("maya"), 0, TrustReason::Decay);
        assert!(delta.is_empty());
    }

    #[test]
    fn test_merge_unions_flags() {
        let mut a = StateDelta::new();
        a.add_flag("devon_arc_complete");
        a.add_knowledge("maya".into(), "knows_parents");

        let mut b = StateDelta::new();
        b.add_flag("devon_arc_complete");
        b.add_knowledge("maya".into(), "robotics_secret");
        b.adjust_trust("samuel".into(), -1, TrustReason::Cascade);

        a.merge(b);

        assert_eq!(a.global_flags.len(), 1);
        assert_eq!(a.knowledge_flags[&CharacterId::from("maya")].len(), 2);
        assert_eq!(a.trust_adjustments.len(), 1);
    }
}
