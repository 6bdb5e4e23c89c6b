//! Pattern-gated content: gates that need trust and a pattern together,
//! and bonus choices granted purely by pattern growth.

use serde::{Deserialize, Serialize};
use story_state::{CharacterId, Pattern, WorldState};

use crate::content::Choice;

/// Content that opens only when trust AND a pattern are both high enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternGate {
    pub id: String,
    pub character: CharacterId,
    pub pattern: Pattern,
    pub min_pattern: u32,
    pub min_trust: i32,
    /// Line shown when the gate first opens.
    pub reveal: String,
}

impl PatternGate {
    /// Strict conjunction - no partial credit.
    pub fn is_open(&self, world: &WorldState) -> bool {
        world.trust(&self.character) >= self.min_trust
            && world.patterns.get(self.pattern) >= self.min_pattern
    }

    /// Global flag recording that the gate has been opened.
    pub fn flag(&self) -> String {
        format!("gate:{}", self.id)
    }
}

/// A bonus choice appended to a character's nodes once a pattern crosses
/// a threshold. Taken at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternUnlock {
    pub id: String,
    pub character: CharacterId,
    pub pattern: Pattern,
    pub threshold: u32,
    pub choice: Choice,
}

impl PatternUnlock {
    pub fn is_available(&self, world: &WorldState) -> bool {
        let visited = world
            .character(&self.character)
            .map(|c| c.has_visited_unlock(&self.id))
            .unwrap_or(false);

        !visited && world.patterns.get(self.pattern) >= self.threshold
    }
}
