//! Per-character progress: trust, knowledge and conversation history.

mod relationship;

pub use relationship::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Soft bounds applied whenever trust is adjusted.
pub const TRUST_MIN: i32 = -10;
pub const TRUST_MAX: i32 = 10;

/// Identifier of a cast member (e.g. "samuel", "maya").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub String);

impl CharacterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CharacterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CharacterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the world remembers about one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub id: CharacterId,

    /// Signed and soft-bounded; rejection choices can push it negative.
    pub trust: i32,

    /// Band derived from `trust`, kept in sync by `adjust_trust`.
    pub relationship: RelationshipStatus,

    #[serde(default)]
    pub nervous_state: NervousSystemState,

    /// Things this character has learned or revealed.
    #[serde(default)]
    pub knowledge_flags: HashSet<String>,

    /// Pattern-unlock choices already taken with this character.
    #[serde(default)]
    pub visited_pattern_unlocks: HashSet<String>,

    /// Node ids visited in conversation with this character, in order.
    #[serde(default)]
    pub conversation_history: Vec<String>,

    /// Session of the most recent interaction, if any.
    #[serde(default)]
    pub last_interaction_session: Option<u32>,
}

impl CharacterState {
    pub fn new(id: impl Into<CharacterId>) -> Self {
        Self {
            id: id.into(),
            trust: 0,
            relationship: RelationshipStatus::Stranger,
            nervous_state: NervousSystemState::default(),
            knowledge_flags: HashSet::new(),
            visited_pattern_unlocks: HashSet::new(),
            conversation_history: Vec::new(),
            last_interaction_session: None,
        }
    }

    /// Set the starting trust.
    pub fn with_trust(mut self, trust: i32) -> Self {
        self.set_trust(trust);
        self
    }

    pub fn with_knowledge(mut self, flag: impl Into<String>) -> Self {
        self.knowledge_flags.insert(flag.into());
        self
    }

    pub fn with_last_interaction(mut self, session: u32) -> Self {
        self.last_interaction_session = Some(session);
        self
    }

    /// Overwrite trust, clamped to the soft bounds.
    pub fn set_trust(&mut self, trust: i32) {
        self.trust = trust.clamp(TRUST_MIN, TRUST_MAX);
        self.relationship = RelationshipStatus::from_trust(self.trust);
    }

    /// Shift trust by a signed amount. Returns the change actually applied.
    pub fn adjust_trust(&mut self, delta: i32) -> i32 {
        let before = self.trust;
        self.set_trust(before.saturating_add(delta));
        self.trust - before
    }

    pub fn knows(&self, flag: &str) -> bool {
        self.knowledge_flags.contains(flag)
    }

    pub fn has_visited_unlock(&self, unlock_id: &str) -> bool {
        self.visited_pattern_unlocks.contains(unlock_id)
    }

    /// Record a visited node.
    pub fn record_visit(&mut self, node_id: impl Into<String>, session: u32) {
        self.conversation_history.push(node_id.into());
        self.last_interaction_session = Some(session);
    }

    /// Sessions elapsed since the last interaction. Characters never met
    /// have not been "absent".
    pub fn sessions_absent(&self, current_session: u32) -> u32 {
        self.last_interaction_session
            .map(|last| current_session.saturating_sub(last))
            .unwrap_or(0)
    }
}
