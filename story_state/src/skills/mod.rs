//! Skill competence levels on a 0-10 scale.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SKILL_MIN: f64 = 0.0;
pub const SKILL_MAX: f64 = 10.0;

/// Identifier of a skill (e.g. "critical_thinking").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SkillId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SkillId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Skill levels. Missing skills read as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillLevels {
    levels: HashMap<SkillId, f64>,
}

impl SkillLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, skill: impl Into<SkillId>, level: f64) -> Self {
        self.set(skill, level);
        self
    }

    pub fn get(&self, skill: &SkillId) -> f64 {
        self.levels.get(skill).copied().unwrap_or(SKILL_MIN)
    }

    /// Set a level directly, clamped to the scale. Used for explicit decay
    /// and fixtures; normal play goes through `gain`.
    pub fn set(&mut self, skill: impl Into<SkillId>, level: f64) {
        self.levels.insert(skill.into(), level.clamp(SKILL_MIN, SKILL_MAX));
    }

    /// Raise a skill. Negative amounts are ignored so levels never drop
    /// during normal play.
    pub fn gain(&mut self, skill: impl Into<SkillId>, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        let skill = skill.into();
        let next = self.get(&skill) + amount;
        self.set(skill, next);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, f64)> {
        self.levels.iter().map(|(id, level)| (id, *level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_skill_reads_zero() {
        let skills = SkillLevels::new();
        assert_eq!(skills.get(&SkillId::from("empathy")), 0.0);
    }

    #[test]
    fn test_gain_is_monotonic_and_clamped() {
        let mut skills = SkillLevels::new().with("empathy", 9.5);
        skills.gain("empathy", -3.0);
        assert_eq!(skills.get(&"empathy".into()), 9.5);

        skills.gain("empathy", 2.0);
        assert_eq!(skills.get(&"empathy".into()), SKILL_MAX);
    }

    #[test]
    fn test_set_allows_explicit_decay() {
        let mut skills = SkillLevels::new().with("coding", 6.0);
        skills.set("coding", 4.0);
        assert_eq!(skills.get(&"coding".into()), 4.0);
    }
}
