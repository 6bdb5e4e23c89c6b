//! Relationship bands and nervous-system states.

use serde::{Deserialize, Serialize};

/// Relationship status derived from trust bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    /// Trust pushed below zero by rejection.
    Strained,
    Stranger,
    Acquaintance,
    Friend,
    Confidant,
}

impl RelationshipStatus {
    /// Map a trust value onto its band.
    pub fn from_trust(trust: i32) -> Self {
        match trust {
            t if t < 0 => RelationshipStatus::Strained,
            0..=2 => RelationshipStatus::Stranger,
            3..=5 => RelationshipStatus::Acquaintance,
            6..=8 => RelationshipStatus::Friend,
            _ => RelationshipStatus::Confidant,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RelationshipStatus::Strained => "strained",
            RelationshipStatus::Stranger => "stranger",
            RelationshipStatus::Acquaintance => "acquaintance",
            RelationshipStatus::Friend => "friend",
            RelationshipStatus::Confidant => "confidant",
        }
    }
}

/// Polyvagal-style state a character is in during a conversation.
/// Content variants may key off this to soften or sharpen a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NervousSystemState {
    /// Safe and socially engaged.
    #[default]
    Ventral,
    /// Mobilized - anxious or defensive.
    Sympathetic,
    /// Shut down.
    Dorsal,
}
