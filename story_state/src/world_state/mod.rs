//! World state management - the single mutable aggregate per player.

mod delta;

pub use delta::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::characters::{CharacterId, CharacterState};
use crate::patterns::PatternLevels;
use crate::skills::SkillLevels;

/// Unique identifier for a player's playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The complete record of one player's progress.
///
/// Callers own it and pass it explicitly; the engine only ever reads it.
/// `version` increases with every applied mutation batch, so two snapshots
/// of the same playthrough can be ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldState {
    pub player_id: PlayerId,

    /// Snapshot version.
    #[serde(default)]
    pub version: u64,

    /// Play-session counter, used to measure absence.
    #[serde(default)]
    pub session: u32,

    #[serde(default)]
    pub patterns: PatternLevels,

    #[serde(default)]
    pub characters: HashMap<CharacterId, CharacterState>,

    /// Irreversible story facts. Union-only.
    #[serde(default)]
    pub global_flags: HashSet<String>,

    #[serde(default)]
    pub skills: SkillLevels,

    /// Tier crossings recorded so far.
    #[serde(default)]
    pub pattern_history: Vec<PatternEvolution>,
}

impl WorldState {
    /// Fresh state for a new game.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, character: CharacterState) -> Self {
        self.add_character(character);
        self
    }

    pub fn add_character(&mut self, character: CharacterState) -> CharacterId {
        let id = character.id.clone();
        self.characters.insert(id.clone(), character);
        id
    }

    pub fn character(&self, id: &CharacterId) -> Option<&CharacterState> {
        self.characters.get(id)
    }

    /// Mutable access, creating the character on first contact.
    pub fn character_mut(&mut self, id: &CharacterId) -> &mut CharacterState {
        self.characters
            .entry(id.clone())
            .or_insert_with(|| CharacterState::new(id.clone()))
    }

    /// Trust with a character; unknown characters read as zero.
    pub fn trust(&self, id: &CharacterId) -> i32 {
        self.character(id).map(|c| c.trust).unwrap_or(0)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.global_flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: impl Into<String>) {
        self.global_flags.insert(flag.into());
    }

    /// Whether a character holds a knowledge flag.
    pub fn character_knows(&self, id: &CharacterId, flag: &str) -> bool {
        self.character(id).map(|c| c.knows(flag)).unwrap_or(false)
    }

    /// Start a new play session.
    pub fn begin_session(&mut self) {
        self.session += 1;
        self.version += 1;
    }

    /// Fold a pipeline delta into the world. This is the only write path
    /// for derived consequences.
    pub fn apply_delta(&mut self, delta: &StateDelta) {
        self.global_flags.extend(delta.global_flags.iter().cloned());

        for (character, flags) in &delta.knowledge_flags {
            self.character_mut(character)
                .knowledge_flags
                .extend(flags.iter().cloned());
        }

        for adjustment in &delta.trust_adjustments {
            self.character_mut(&adjustment.character)
                .adjust_trust(adjustment.delta);
        }

        let session = self.session;
        for character in &delta.interaction_stamps {
            self.character_mut(character).last_interaction_session = Some(session);
        }

        self.pattern_history
            .extend(delta.pattern_evolutions.iter().copied());
        self.version += 1;
    }

    /// Serialize for the persistence collaborator.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load a save. Trust is re-clamped and every relationship band is
    /// re-derived from it, so a hand-edited band never survives loading.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut state: Self = serde_json::from_str(json)?;
        for character in state.characters.values_mut() {
            character.set_trust(character.trust);
        }
        Ok(state)
    }
}
