//! Growth evaluators: pattern recognition, gates, combos and revelations.

use rand::RngCore;
use std::sync::Arc;
use story_state::PatternEvolution;
use tracing::debug;

use crate::content::ContentCatalog;
use crate::echo::{ConsequenceEcho, EmotionTag, SoundCue};
use crate::pipeline::{DedupKey, EvaluatorContext, EventRequest, UiTrigger};
use crate::pipeline::{Evaluator, EvaluatorOutput, Tier};
use crate::systems::{eligible_comments, unseen_revelations};

/// Records tier crossings and lets the speaker remark on the player's
/// patterns.
#[derive(Debug, Clone)]
pub struct PatternRecognition {
    catalog: Arc<ContentCatalog>,
}

impl PatternRecognition {
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }
}

impl Evaluator for PatternRecognition {
    fn name(&self) -> &'static str {
        "pattern_recognition"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["trust_decay"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let mut output = EvaluatorOutput::empty();

        // Evolutions are recorded whether or not a comment is surfaced
        for (pattern, from, to) in ctx.pre.patterns.tier_changes(&ctx.post.patterns) {
            debug!(%pattern, ?from, ?to, "Pattern evolved");
            output
                .delta
                .record_evolution(PatternEvolution { pattern, from, to });
            output
                .events
                .push(EventRequest::ui(UiTrigger::PatternEvolved { pattern, tier: to }));
        }

        let eligible = eligible_comments(
            &self.catalog.recognition,
            &ctx.node.speaker,
            &ctx.post.patterns,
            ctx.shown_pattern_comments,
        );

        match eligible.first() {
            Some(comment) => output
                .with_echo(
                    ConsequenceEcho::new(comment.comment.clone())
                        .with_emotion(comment.emotion)
                        .with_sound(SoundCue::Insight),
                )
                .with_dedup_key(DedupKey::PatternComment(comment.dedup_key())),
            None => output,
        }
    }
}

/// Opens pattern gates the turn they first qualify.
#[derive(Debug, Clone)]
pub struct GateUnlock {
    catalog: Arc<ContentCatalog>,
}

impl GateUnlock {
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }
}

impl Evaluator for GateUnlock {
    fn name(&self) -> &'static str {
        "gate_unlock"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["pattern_recognition"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let mut output = EvaluatorOutput::empty();

        let opened = self
            .catalog
            .gates
            .iter()
            .filter(|g| g.is_open(ctx.post) && !ctx.post.has_flag(&g.flag()));

        for gate in opened {
            debug!(gate = %gate.id, "Gate opened");
            output.delta.add_flag(gate.flag());
            output.events.push(EventRequest::ui(UiTrigger::GateOpened {
                gate_id: gate.id.clone(),
            }));
            if output.echo.is_none() {
                output.echo = Some(
                    ConsequenceEcho::new(gate.reveal.clone())
                        .with_emotion(EmotionTag::Vulnerable)
                        .with_sound(SoundCue::Unlock),
                );
            }
        }

        output
    }
}

/// Unlocks skill combos the turn every minimum is first met.
#[derive(Debug, Clone)]
pub struct SkillComboUnlock {
    catalog: Arc<ContentCatalog>,
}

impl SkillComboUnlock {
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }
}

impl Evaluator for SkillComboUnlock {
    fn name(&self) -> &'static str {
        "skill_combo"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["gate_unlock"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let mut output = EvaluatorOutput::empty();

        let unlocked = self
            .catalog
            .combos
            .unlocked(&ctx.post.skills)
            .filter(|c| !ctx.post.has_flag(&c.flag()));

        for combo in unlocked {
            debug!(combo = %combo.id, "Skill combo unlocked");
            output.delta.add_flag(combo.flag());
            for unlock in &combo.unlocks {
                output.delta.add_flag(unlock.flag());
            }
            output
                .events
                .push(EventRequest::toast("Skill combo unlocked", combo.name.clone()));
            output.events.push(EventRequest::ui(UiTrigger::ComboUnlocked {
                combo_id: combo.id.clone(),
            }));

            if output.echo.is_none() {
                let text = if combo.description.is_empty() {
                    combo.name.clone()
                } else {
                    format!("{}. {}", combo.name, combo.description)
                };
                output.echo = Some(
                    ConsequenceEcho::new(text)
                        .with_emotion(EmotionTag::Proud)
                        .with_sound(SoundCue::Unlock),
                );
            }
        }

        output
    }
}

/// Surfaces the first unlocked revelation not yet shown.
#[derive(Debug, Clone)]
pub struct MetaRevelation {
    catalog: Arc<ContentCatalog>,
}

impl MetaRevelation {
    pub fn new(catalog: Arc<ContentCatalog>) -> Self {
        Self { catalog }
    }
}

impl Evaluator for MetaRevelation {
    fn name(&self) -> &'static str {
        "meta_revelation"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["skill_combo"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let unseen = unseen_revelations(
            &self.catalog.revelations,
            &ctx.post.patterns,
            ctx.shown_manifestations,
        );

        match unseen.first() {
            Some(revelation) => EvaluatorOutput::empty()
                .with_echo(
                    ConsequenceEcho::new(revelation.text.clone())
                        .with_emotion(EmotionTag::Reflective)
                        .with_sound(SoundCue::Revelation),
                )
                .with_dedup_key(DedupKey::Manifestation(revelation.dedup_key())),
            None => EvaluatorOutput::empty(),
        }
    }
}
