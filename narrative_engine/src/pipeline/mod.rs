//! Consequence Pipeline - turns one applied choice into at most one echo
//! plus proposed state changes and event requests.
//!
//! A turn runs as follows:
//! 1. **Tier 1**: evaluators run in registration order; each echo
//!    overwrites the slot
//! 2. **Tier 2**: evaluators run in registration order; an echo fills the
//!    slot only while it is empty
//! 3. **Collection**: every evaluator's delta and events are kept, even
//!    when its echo lost the slot
//! 4. **Surfacing**: the winning echo's dedup keys are reported consumed
//!    and its sound cue is requested first
//!
//! The pipeline never writes world state. The caller applies the delta.

mod events;
pub mod evaluators;
mod registry;

pub use events::*;
pub use registry::*;

use rand::RngCore;
use std::collections::{BTreeSet, HashSet};
use story_state::{StateDelta, WorldState};
use tracing::{debug, trace};

use crate::content::{Choice, DialogueNode};
use crate::echo::ConsequenceEcho;

/// Everything an evaluator may look at for one turn.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatorContext<'a> {
    /// World before the choice was applied.
    pub pre: &'a WorldState,
    /// World after the choice's direct effects.
    pub post: &'a WorldState,
    pub choice: &'a Choice,
    pub node: &'a DialogueNode,
    /// Trust change already applied to the speaker.
    pub trust_delta: i32,
    pub shown_pattern_comments: &'a HashSet<String>,
    pub shown_manifestations: &'a HashSet<String>,
}

/// The outcome of one turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineResult {
    pub echo: Option<ConsequenceEcho>,
    /// Name of the evaluator whose echo won.
    pub echo_source: Option<&'static str>,
    pub delta: StateDelta,
    pub events: Vec<EventRequest>,
    /// Pattern-comment keys the caller must persist.
    pub consumed_pattern_comments: BTreeSet<String>,
    /// Manifestation keys the caller must persist.
    pub consumed_manifestations: BTreeSet<String>,
}

/// Runs a registry against a turn.
#[derive(Debug)]
pub struct ConsequencePipeline {
    registry: EvaluatorRegistry,
}

impl ConsequencePipeline {
    pub fn new(registry: EvaluatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    pub fn evaluate(&self, ctx: &EvaluatorContext<'_>, rng: &mut dyn RngCore) -> PipelineResult {
        debug!(
            node = %ctx.node.id,
            choice = %ctx.choice.id,
            trust_delta = ctx.trust_delta,
            "Evaluating consequences"
        );

        let mut result = PipelineResult::default();
        let mut winning_keys: Vec<DedupKey> = Vec::new();

        for evaluator in self.registry.execution_order() {
            let output = evaluator.evaluate(ctx, rng);
            if output.is_empty() {
                trace!(evaluator = evaluator.name(), "No consequence");
                continue;
            }

            result.delta.merge(output.delta);
            result.events.extend(output.events);

            if let Some(echo) = output.echo {
                let takes_slot = match evaluator.tier() {
                    Tier::Primary => true,
                    Tier::Secondary => result.echo.is_none(),
                };

                if takes_slot {
                    trace!(evaluator = evaluator.name(), "Echo slot taken");
                    result.echo = Some(echo);
                    result.echo_source = Some(evaluator.name());
                    winning_keys = output.dedup_keys;
                } else {
                    trace!(evaluator = evaluator.name(), "Echo discarded, slot already filled");
                }
            }
        }

        for key in winning_keys {
            match key {
                DedupKey::PatternComment(key) => {
                    result.consumed_pattern_comments.insert(key);
                }
                DedupKey::Manifestation(key) => {
                    result.consumed_manifestations.insert(key);
                }
            }
        }

        if let Some(cue) = result.echo.as_ref().and_then(|e| e.sound) {
            result.events.insert(0, EventRequest::sound(cue));
        }

        debug!(
            echo_source = result.echo_source.unwrap_or("none"),
            events = result.events.len(),
            "Consequences evaluated"
        );

        result
    }
}
