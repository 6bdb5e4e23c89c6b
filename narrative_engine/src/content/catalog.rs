//! The derived-system catalog: combos, gates, recognition comments,
//! pattern unlocks, cascades, revelations and resonance bonuses.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ContentError;
use crate::systems::{
    Cascade, PatternGate, PatternUnlock, RecognitionComment, ResonanceBonus, Revelation,
    SkillComboCatalog,
};

const BUILTIN_CATALOG: &str = include_str!("builtin_catalog.toml");

/// Static tables consumed by the derived systems.
///
/// Every section is optional in TOML so a catalog can be assembled from
/// only the systems a scene needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalog {
    pub combos: SkillComboCatalog,
    pub gates: Vec<PatternGate>,
    pub recognition: Vec<RecognitionComment>,
    pub pattern_unlocks: Vec<PatternUnlock>,
    pub cascades: Vec<Cascade>,
    pub revelations: Vec<Revelation>,
    pub resonance: Vec<ResonanceBonus>,
}

impl ContentCatalog {
    /// Parse and validate a catalog.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ContentError> {
        let catalog: Self = toml::from_str(toml_str)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog for the core cast shipped with the engine.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        unique_ids("skill combo", self.combos.iter().map(|c| c.id.as_str()))?;
        unique_ids("gate", self.gates.iter().map(|g| g.id.as_str()))?;
        unique_ids("pattern unlock", self.pattern_unlocks.iter().map(|u| u.id.as_str()))?;
        unique_ids("cascade", self.cascades.iter().map(|c| c.id.as_str()))?;
        unique_ids("revelation", self.revelations.iter().map(|r| r.id.as_str()))?;
        unique_ids("resonance bonus", self.resonance.iter().map(|r| r.id.as_str()))?;

        let recognition_keys: Vec<String> =
            self.recognition.iter().map(|c| c.dedup_key()).collect();
        unique_ids("recognition comment", recognition_keys.iter().map(String::as_str))?;

        for combo in self.combos.iter() {
            combo.validate()?;
        }
        for cascade in &self.cascades {
            cascade.validate()?;
        }
        for bonus in &self.resonance {
            bonus.validate()?;
        }

        for unlock in &self.pattern_unlocks {
            for condition in &unlock.choice.conditions {
                for combo in condition.combo_references() {
                    if !self.combos.contains(combo) {
                        return Err(ContentError::UnknownCombo {
                            location: format!("pattern_unlock:{}", unlock.id),
                            combo: combo.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn gate(&self, id: &str) -> Option<&PatternGate> {
        self.gates.iter().find(|g| g.id == id)
    }

    pub fn cascade(&self, id: &str) -> Option<&Cascade> {
        self.cascades.iter().find(|c| c.id == id)
    }
}

fn unique_ids<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
