//! Cascades - chains of dependent consequences that ripple through the cast.
//!
//! Progress is never stored separately. Degree N counts as resolved when
//! its effect flag is set, so the next pending degree can always be read
//! straight off the world state and a chain resumes across turns.

use serde::{Deserialize, Serialize};
use story_state::{CharacterId, StateDelta, TrustReason, WorldState};

use crate::error::ContentError;

/// Knowledge flag on a character that starts the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeTrigger {
    pub character: CharacterId,
    pub flag: String,
}

/// What resolving a degree does to the world.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeEffect {
    pub trust_delta: i32,
    pub set_flag: Option<String>,
    pub unlock_dialogue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeDegree {
    pub character: CharacterId,
    pub description: String,
    /// Set when this degree resolves.
    pub effect_flag: String,
    #[serde(default)]
    pub effect: CascadeEffect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    pub id: String,
    pub name: String,
    pub trigger: CascadeTrigger,
    /// Line shown when the chain first starts.
    pub on_trigger: String,
    pub degrees: Vec<CascadeDegree>,
}

/// The next unresolved degree of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLink<'a> {
    pub cascade: &'a Cascade,
    /// One-based degree number.
    pub degree: usize,
    pub link: &'a CascadeDegree,
}

impl PendingLink<'_> {
    /// State changes that resolve this degree.
    pub fn resolution(&self) -> StateDelta {
        let mut delta = StateDelta::new();
        delta.add_flag(self.link.effect_flag.clone());
        if let Some(flag) = &self.link.effect.set_flag {
            delta.add_flag(flag.clone());
        }
        if let Some(node) = &self.link.effect.unlock_dialogue {
            delta.add_flag(format!("dialogue_unlocked:{}", node));
        }
        delta.adjust_trust(
            self.link.character.clone(),
            self.link.effect.trust_delta,
            TrustReason::Cascade,
        );
        delta
    }
}

impl Cascade {
    pub fn is_triggered(&self, world: &WorldState) -> bool {
        world.character_knows(&self.trigger.character, &self.trigger.flag)
    }

    /// The first degree whose effect flag is missing, once triggered.
    /// Never skips ahead of an unresolved degree.
    pub fn pending_link(&self, world: &WorldState) -> Option<PendingLink<'_>> {
        if !self.is_triggered(world) {
            return None;
        }

        self.degrees
            .iter()
            .enumerate()
            .find(|(_, degree)| !world.has_flag(&degree.effect_flag))
            .map(|(index, link)| PendingLink {
                cascade: self,
                degree: index + 1,
                link,
            })
    }

    /// Number of leading degrees already resolved.
    pub fn resolved_degrees(&self, world: &WorldState) -> usize {
        if !self.is_triggered(world) {
            return 0;
        }
        self.degrees
            .iter()
            .take_while(|d| world.has_flag(&d.effect_flag))
            .count()
    }

    pub fn is_complete(&self, world: &WorldState) -> bool {
        self.is_triggered(world) && self.pending_link(world).is_none()
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.degrees.len() < 2 {
            return Err(ContentError::ShortCascade(self.id.clone()));
        }

        let mut seen = std::collections::HashSet::new();
        for degree in &self.degrees {
            if !seen.insert(degree.effect_flag.as_str()) {
                return Err(ContentError::DuplicateCascadeFlag {
                    cascade: self.id.clone(),
                    flag: degree.effect_flag.clone(),
                });
            }
        }

        // A side flag that equals an effect flag would resolve that degree early
        for degree in &self.degrees {
            let side_flags = degree
                .effect
                .set_flag
                .iter()
                .cloned()
                .chain(
                    degree
                        .effect
                        .unlock_dialogue
                        .iter()
                        .map(|node| format!("dialogue_unlocked:{}", node)),
                );
            for flag in side_flags {
                if seen.contains(flag.as_str()) {
                    return Err(ContentError::CascadeFlagCollision {
                        cascade: self.id.clone(),
                        flag,
                    });
                }
            }
        }

        Ok(())
    }
}
