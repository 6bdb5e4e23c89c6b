//! The built-in evaluators and their default registration order.

mod cascades;
mod chance;
mod growth;
mod relationships;

#[cfg(test)]
mod testing;

pub use cascades::{CascadeRipple, CascadeTrigger};
pub use chance::{TrustAsymmetry, VulnerabilityHint};
pub use growth::{GateUnlock, MetaRevelation, PatternRecognition, SkillComboUnlock};
pub use relationships::{RelationshipShift, TrustDecay};

use std::sync::Arc;
use story_state::CharacterId;

use super::registry::{Evaluator, EvaluatorRegistry};
use crate::config::EngineConfig;
use crate::content::ContentCatalog;
use crate::error::RegistryError;

/// All ten built-in evaluators in their canonical order.
pub fn default_evaluators(
    catalog: Arc<ContentCatalog>,
    config: &EngineConfig,
) -> Vec<Box<dyn Evaluator>> {
    vec![
        Box::new(RelationshipShift),
        Box::new(CascadeTrigger::new(catalog.clone())),
        Box::new(TrustDecay::new(config.trust_decay.clone())),
        Box::new(PatternRecognition::new(catalog.clone())),
        Box::new(GateUnlock::new(catalog.clone())),
        Box::new(CascadeRipple::new(catalog.clone())),
        Box::new(SkillComboUnlock::new(catalog.clone())),
        Box::new(MetaRevelation::new(catalog)),
        Box::new(TrustAsymmetry::new(config.echoes.clone())),
        Box::new(VulnerabilityHint::new(config.echoes.clone())),
    ]
}

pub fn default_registry(
    catalog: Arc<ContentCatalog>,
    config: &EngineConfig,
) -> Result<EvaluatorRegistry, RegistryError> {
    EvaluatorRegistry::new(default_evaluators(catalog, config))
}

/// `samuel` -> `Samuel`.
pub(crate) fn display_name(character: &CharacterId) -> String {
    let mut chars = character.as_str().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
