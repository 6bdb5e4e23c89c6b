//! Skill combos - unlocks that need several skills at once.

use serde::{Deserialize, Serialize};
use story_state::{SkillId, SkillLevels, SKILL_MAX, SKILL_MIN};

use crate::error::ContentError;

/// One skill and the level it must reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub skill: SkillId,
    pub minimum: f64,
}

/// What a combo opens up once unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ComboUnlock {
    Dialogue(String),
    Career(String),
    Achievement(String),
}

impl ComboUnlock {
    /// Global flag recording this unlock.
    pub fn flag(&self) -> String {
        match self {
            ComboUnlock::Dialogue(id) => format!("dialogue_unlocked:{}", id),
            ComboUnlock::Career(id) => format!("career_unlocked:{}", id),
            ComboUnlock::Achievement(id) => format!("achievement:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCombo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub requirements: Vec<SkillRequirement>,
    #[serde(default)]
    pub unlocks: Vec<ComboUnlock>,
}

impl SkillCombo {
    /// Strict all-of: every requirement must meet its minimum.
    pub fn is_unlocked(&self, skills: &SkillLevels) -> bool {
        self.requirements
            .iter()
            .all(|req| skills.get(&req.skill) >= req.minimum)
    }

    /// Average completion across requirements, 0-100. For display only;
    /// unlocking is decided by `is_unlocked`.
    pub fn progress(&self, skills: &SkillLevels) -> f64 {
        if self.requirements.is_empty() {
            return 100.0;
        }

        let total: f64 = self
            .requirements
            .iter()
            .map(|req| {
                if req.minimum <= 0.0 {
                    1.0
                } else {
                    (skills.get(&req.skill) / req.minimum).min(1.0)
                }
            })
            .sum();

        total / self.requirements.len() as f64 * 100.0
    }

    /// Requirements not yet met, with the remaining gap.
    pub fn missing<'a>(&'a self, skills: &SkillLevels) -> Vec<(&'a SkillId, f64)> {
        self.requirements
            .iter()
            .filter_map(|req| {
                let gap = req.minimum - skills.get(&req.skill);
                (gap > 0.0).then_some((&req.skill, gap))
            })
            .collect()
    }

    /// Global flag set when the combo unlocks.
    pub fn flag(&self) -> String {
        format!("combo:{}", self.id)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.requirements.is_empty() {
            return Err(ContentError::EmptyCombo(self.id.clone()));
        }

        for req in &self.requirements {
            if !(SKILL_MIN..=SKILL_MAX).contains(&req.minimum) {
                return Err(ContentError::ComboMinimumOutOfRange {
                    combo: self.id.clone(),
                    skill: req.skill.to_string(),
                    minimum: req.minimum,
                });
            }
        }

        Ok(())
    }
}

/// All known combos, in authored order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillComboCatalog {
    combos: Vec<SkillCombo>,
}

impl SkillComboCatalog {
    pub fn new(combos: Vec<SkillCombo>) -> Self {
        Self { combos }
    }

    pub fn get(&self, id: &str) -> Option<&SkillCombo> {
        self.combos.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Unknown combos are never unlocked.
    pub fn is_unlocked(&self, id: &str, skills: &SkillLevels) -> bool {
        self.get(id).map(|c| c.is_unlocked(skills)).unwrap_or(false)
    }

    pub fn unlocked<'a>(
        &'a self,
        skills: &'a SkillLevels,
    ) -> impl Iterator<Item = &'a SkillCombo> + 'a {
        self.combos.iter().filter(move |c| c.is_unlocked(skills))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCombo> {
        self.combos.iter()
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}
