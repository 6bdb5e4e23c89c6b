//! Evaluator trait and the validated, ordered registry.

use rand::RngCore;
use std::collections::HashMap;
use story_state::StateDelta;

use super::events::EventRequest;
use super::EvaluatorContext;
use crate::echo::ConsequenceEcho;
use crate::error::RegistryError;

/// Echo priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Tier 1. Runs first and may overwrite the echo slot.
    Primary,
    /// Tier 2. Fills the echo slot only while it is empty.
    Secondary,
}

/// A dedup key that becomes consumed when its echo is surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    PatternComment(String),
    Manifestation(String),
}

/// What one evaluator proposes for the turn. An empty output means the
/// evaluator had nothing to say.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluatorOutput {
    pub echo: Option<ConsequenceEcho>,
    pub delta: StateDelta,
    pub events: Vec<EventRequest>,
    /// Keys tied to `echo`.
    pub dedup_keys: Vec<DedupKey>,
}

impl EvaluatorOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_echo(mut self, echo: ConsequenceEcho) -> Self {
        self.echo = Some(echo);
        self
    }

    pub fn with_event(mut self, event: EventRequest) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_dedup_key(mut self, key: DedupKey) -> Self {
        self.dedup_keys.push(key);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.echo.is_none() && self.delta.is_empty() && self.events.is_empty()
    }
}

/// One rule that inspects a turn and proposes consequences.
///
/// Evaluators are read-only. They see the world only through the context
/// and never write state themselves.
pub trait Evaluator: Send + Sync {
    /// Unique name, used for dependencies and logging.
    fn name(&self) -> &'static str;

    fn tier(&self) -> Tier;

    /// Evaluators that must be registered before this one.
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, rng: &mut dyn RngCore) -> EvaluatorOutput;
}

/// Evaluators in a validated order.
///
/// Construction rejects duplicate names, unknown dependencies, forward
/// references and tier inversions, so a registry that exists is always
/// runnable.
pub struct EvaluatorRegistry {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl std::fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.evaluators.iter().map(|e| e.name()))
            .finish()
    }
}

impl EvaluatorRegistry {
    pub fn new(evaluators: Vec<Box<dyn Evaluator>>) -> Result<Self, RegistryError> {
        let mut positions: HashMap<&'static str, (usize, Tier)> = HashMap::new();
        for (index, evaluator) in evaluators.iter().enumerate() {
            if positions
                .insert(evaluator.name(), (index, evaluator.tier()))
                .is_some()
            {
                return Err(RegistryError::DuplicateEvaluator(evaluator.name().to_string()));
            }
        }

        for (index, evaluator) in evaluators.iter().enumerate() {
            for &dependency in evaluator.dependencies() {
                let (dep_index, dep_tier) = positions.get(dependency).copied().ok_or_else(|| {
                    RegistryError::UnknownDependency {
                        evaluator: evaluator.name().to_string(),
                        dependency: dependency.to_string(),
                    }
                })?;

                if dep_index >= index {
                    return Err(RegistryError::ForwardDependency {
                        evaluator: evaluator.name().to_string(),
                        dependency: dependency.to_string(),
                    });
                }

                if evaluator.tier() == Tier::Primary && dep_tier == Tier::Secondary {
                    return Err(RegistryError::TierInversion {
                        evaluator: evaluator.name().to_string(),
                        dependency: dependency.to_string(),
                    });
                }
            }
        }

        Ok(Self { evaluators })
    }

    /// Tier 1 in registration order, then Tier 2 in registration order.
    pub fn execution_order(&self) -> impl Iterator<Item = &dyn Evaluator> {
        let primary = self
            .evaluators
            .iter()
            .filter(|e| e.tier() == Tier::Primary);
        let secondary = self
            .evaluators
            .iter()
            .filter(|e| e.tier() == Tier::Secondary);
        primary.chain(secondary).map(|e| e.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.execution_order().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}
