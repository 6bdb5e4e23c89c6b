//! Pattern recognition - characters noticing how the player behaves.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use story_state::{CharacterId, Pattern, PatternLevels};

use crate::echo::EmotionTag;

/// A milestone remark a character makes once a pattern is high enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionComment {
    pub character: CharacterId,
    pub pattern: Pattern,
    pub threshold: u32,
    pub comment: String,
    pub emotion: EmotionTag,
}

impl RecognitionComment {
    /// `character_pattern_threshold`, the key persisted once shown.
    pub fn dedup_key(&self) -> String {
        format!("{}_{}_{}", self.character, self.pattern, self.threshold)
    }

    pub fn is_reached(&self, patterns: &PatternLevels) -> bool {
        patterns.get(self.pattern) >= self.threshold
    }
}

/// Comments this character could make now, skipping any already shown.
///
/// Higher thresholds come first, so a player who jumps two milestones in
/// one turn hears the bigger one.
pub fn eligible_comments<'a>(
    comments: &'a [RecognitionComment],
    character: &CharacterId,
    patterns: &PatternLevels,
    already_shown: &HashSet<String>,
) -> Vec<&'a RecognitionComment> {
    let mut eligible: Vec<_> = comments
        .iter()
        .filter(|c| &c.character == character)
        .filter(|c| c.is_reached(patterns))
        .filter(|c| !already_shown.contains(&c.dedup_key()))
        .collect();

    eligible.sort_by(|a, b| b.threshold.cmp(&a.threshold));
    eligible
}
