//! Resonance - multiplicative bonuses one subsystem grants another.

use serde::{Deserialize, Serialize};
use story_state::{CharacterId, Pattern, SkillId, WorldState};

use crate::error::ContentError;

/// Where a bonus reads its level from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResonanceSource {
    Pattern { pattern: Pattern },
    Skill { skill: SkillId },
    Trust { character: CharacterId },
}

impl ResonanceSource {
    pub fn level(&self, world: &WorldState) -> f64 {
        match self {
            ResonanceSource::Pattern { pattern } => world.patterns.get(*pattern) as f64,
            ResonanceSource::Skill { skill } => world.skills.get(skill),
            ResonanceSource::Trust { character } => world.trust(character) as f64,
        }
    }
}

/// Subsystem outputs a bonus can scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResonanceTarget {
    ExpertiseScoring,
    SkillGrowth,
    TrustGain,
    CareerMatching,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceBonus {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub source: ResonanceSource,
    /// Active once the source level reaches this.
    pub floor: f64,
    pub target: ResonanceTarget,
    pub multiplier: f64,
}

impl ResonanceBonus {
    pub fn is_active(&self, world: &WorldState) -> bool {
        self.source.level(world) >= self.floor
    }

    /// The multiplier if active, identity otherwise.
    pub fn effective_multiplier(&self, world: &WorldState) -> f64 {
        if self.is_active(world) {
            self.multiplier
        } else {
            1.0
        }
    }

    /// The multiplier must be finite and positive, the floor finite.
    pub fn validate(&self) -> Result<(), ContentError> {
        if !self.multiplier.is_finite() || self.multiplier <= 0.0 {
            return Err(ContentError::InvalidResonance {
                bonus: self.id.clone(),
                field: "multiplier",
                value: self.multiplier,
            });
        }
        if !self.floor.is_finite() {
            return Err(ContentError::InvalidResonance {
                bonus: self.id.clone(),
                field: "floor",
                value: self.floor,
            });
        }
        Ok(())
    }
}

/// Product of every bonus aimed at `target`. Inactive bonuses contribute 1.0.
pub fn combined_multiplier(
    bonuses: &[ResonanceBonus],
    target: ResonanceTarget,
    world: &WorldState,
) -> f64 {
    bonuses
        .iter()
        .filter(|b| b.target == target)
        .fold(1.0, |acc, b| acc * b.effective_multiplier(world))
}

pub fn active_bonuses<'a>(
    bonuses: &'a [ResonanceBonus],
    target: ResonanceTarget,
    world: &WorldState,
) -> Vec<&'a ResonanceBonus> {
    bonuses
        .iter()
        .filter(|b| b.target == target && b.is_active(world))
        .collect()
}
