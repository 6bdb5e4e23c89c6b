//! Chance-gated echoes. Each evaluator draws exactly one roll per turn,
//! before looking at anything else, so the random stream stays aligned
//! no matter which conditions hold.

use rand::{Rng, RngCore};
use story_state::{CharacterId, WorldState};
use tracing::trace;

use super::display_name;
use crate::config::EchoConfig;
use crate::echo::{ConsequenceEcho, EmotionTag};
use crate::pipeline::{DedupKey, EvaluatorContext};
use crate::pipeline::{Evaluator, EvaluatorOutput, Tier};

fn draw(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Fires when the speaker trusts the player noticeably more than the rest
/// of the cast does.
#[derive(Debug, Clone)]
pub struct TrustAsymmetry {
    config: EchoConfig,
}

impl TrustAsymmetry {
    pub fn new(config: EchoConfig) -> Self {
        Self { config }
    }

    fn is_asymmetric(&self, world: &WorldState, speaker: &CharacterId) -> bool {
        let others: Vec<i32> = world
            .characters
            .values()
            .filter(|c| &c.id != speaker)
            .map(|c| c.trust)
            .collect();
        if others.is_empty() {
            return false;
        }

        let average = others.iter().sum::<i32>() as f64 / others.len() as f64;
        world.trust(speaker) as f64 >= average + self.config.trust_asymmetry_margin as f64
    }
}

impl Evaluator for TrustAsymmetry {
    fn name(&self) -> &'static str {
        "trust_asymmetry"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["meta_revelation"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, rng: &mut dyn RngCore) -> EvaluatorOutput {
        let roll = draw(rng);
        if roll >= self.config.trust_asymmetry_chance {
            trace!(roll, "Trust asymmetry roll missed");
            return EvaluatorOutput::empty();
        }

        let speaker = &ctx.node.speaker;
        if !self.is_asymmetric(ctx.post, speaker) {
            return EvaluatorOutput::empty();
        }

        EvaluatorOutput::empty().with_echo(
            ConsequenceEcho::new(format!(
                "{} seems to trust you more than anyone else here does.",
                display_name(speaker)
            ))
            .with_emotion(EmotionTag::Reflective)
            .delayed(self.config.delayed_echo_ms),
        )
    }
}

/// A one-time hint that a trusted character is close to opening up.
#[derive(Debug, Clone)]
pub struct VulnerabilityHint {
    config: EchoConfig,
}

impl VulnerabilityHint {
    pub fn new(config: EchoConfig) -> Self {
        Self { config }
    }
}

impl Evaluator for VulnerabilityHint {
    fn name(&self) -> &'static str {
        "vulnerability_hint"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["trust_asymmetry"]
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, rng: &mut dyn RngCore) -> EvaluatorOutput {
        let roll = draw(rng);
        if roll >= self.config.vulnerability_chance {
            trace!(roll, "Vulnerability roll missed");
            return EvaluatorOutput::empty();
        }

        let speaker = &ctx.node.speaker;
        let key = format!("vulnerability_{}", speaker);
        if ctx.post.trust(speaker) < self.config.vulnerability_min_trust
            || ctx.shown_manifestations.contains(&key)
        {
            return EvaluatorOutput::empty();
        }

        EvaluatorOutput::empty()
            .with_echo(
                ConsequenceEcho::new(format!(
                    "{} hesitates, as if about to tell you something, then changes the subject.",
                    display_name(speaker)
                ))
                .with_emotion(EmotionTag::Vulnerable)
                .delayed(self.config.delayed_echo_ms),
            )
            .with_dedup_key(DedupKey::Manifestation(key))
    }
}
