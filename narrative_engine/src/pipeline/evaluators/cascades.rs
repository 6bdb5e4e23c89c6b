//! Cascade evaluators: starting a chain and advancing it.

use rand::RngCore;
use std::sync::Arc;
use tracing::debug;

use crate::content::ContentCatalog;
use crate::echo::{ConsequenceEcho, EmotionTag, SoundCue};
use crate::pipeline::{EvaluatorContext, EventRequest, UiTrigger};
use crate::pipeline::{Evaluator, EvaluatorOutput, Tier};

/// Fires on the turn a cascade's trigger flag first appears.
#[derive(Debug, Clone)]
pub struct CascadeTrigger {
    catalog: Arc<ContentCatalog>,
}

impl CascadeTrigger {
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }
}

impl Evaluator for CascadeTrigger {
    fn name(&self) -> &'static str {
        "cascade_trigger"
    }

    fn tier(&self) -> Tier {
        Tier::Primary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["relationship_shift"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let mut output = EvaluatorOutput::empty();

        let started = self
            .catalog
            .cascades
            .iter()
            .filter(|c| !c.is_triggered(ctx.pre) && c.is_triggered(ctx.post));

        for cascade in started {
            debug!(cascade = %cascade.id, "Cascade triggered");
            if output.echo.is_none() {
                output.echo = Some(
                    ConsequenceEcho::new(cascade.on_trigger.clone())
                        .with_emotion(EmotionTag::Reflective)
                        .with_sound(SoundCue::Ripple),
                );
            }
            output.events.push(EventRequest::toast(
                cascade.name.clone(),
                "Something has been set in motion.",
            ));
        }

        output
    }
}

/// Resolves the next pending degree of every cascade that was already
/// running before this turn. One degree per cascade per turn.
#[derive(Debug, Clone)]
pub struct CascadeRipple {
    catalog: Arc<ContentCatalog>,
}

impl CascadeRipple {
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }
}

impl Evaluator for CascadeRipple {
    fn name(&self) -> &'static str {
        "cascade_ripple"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["cascade_trigger"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let mut output = EvaluatorOutput::empty();

        let pending = self
            .catalog
            .cascades
            .iter()
            .filter(|c| c.is_triggered(ctx.pre))
            .filter_map(|c| c.pending_link(ctx.post));

        for link in pending {
            debug!(cascade = %link.cascade.id, degree = link.degree, "Cascade degree resolved");
            output.delta.merge(link.resolution());
            output.events.push(EventRequest::ui(UiTrigger::CascadeRipple {
                cascade_id: link.cascade.id.clone(),
                degree: link.degree,
            }));
            if output.echo.is_none() {
                output.echo = Some(
                    ConsequenceEcho::new(link.link.description.clone())
                        .with_emotion(EmotionTag::Reflective)
                        .with_sound(SoundCue::Ripple),
                );
            }
        }

        output
    }
}
