//! Relationship-level evaluators: band changes and trust decay.

use rand::RngCore;
use story_state::{RelationshipStatus, TrustReason};
use tracing::debug;

use super::display_name;
use crate::config::TrustDecayConfig;
use crate::echo::{ConsequenceEcho, EmotionTag, SoundCue};
use crate::pipeline::{EvaluatorContext, EventRequest, UiTrigger};
use crate::pipeline::{Evaluator, EvaluatorOutput, Tier};
use crate::systems::trust_decay;

/// Fires when the speaker's relationship band changed this turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipShift;

impl Evaluator for RelationshipShift {
    fn name(&self) -> &'static str {
        "relationship_shift"
    }

    fn tier(&self) -> Tier {
        Tier::Primary
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let speaker = &ctx.node.speaker;
        let before = RelationshipStatus::from_trust(ctx.pre.trust(speaker));
        let after = RelationshipStatus::from_trust(ctx.post.trust(speaker));
        if before == after {
            return EvaluatorOutput::empty();
        }

        let name = display_name(speaker);
        let (echo, title) = if after > before {
            (
                ConsequenceEcho::new(format!(
                    "Something shifts between you and {}. You are not a {} anymore.",
                    name,
                    before.name()
                ))
                .with_emotion(EmotionTag::Warm)
                .with_sound(SoundCue::TrustUp),
                "Relationship deepened",
            )
        } else {
            (
                ConsequenceEcho::new(format!("{} pulls back, just a little.", name))
                    .with_emotion(EmotionTag::Guarded)
                    .with_sound(SoundCue::TrustDown),
                "Relationship cooled",
            )
        };

        EvaluatorOutput::empty()
            .with_echo(echo)
            .with_event(EventRequest::toast(title, format!("{}: {}", name, after.name())))
            .with_event(EventRequest::ui(UiTrigger::RelationshipChanged {
                character: speaker.clone(),
                status: after,
            }))
    }
}

/// Realises trust lost while the speaker went unvisited, then stamps the
/// interaction so the same absence is never charged twice.
#[derive(Debug, Clone)]
pub struct TrustDecay {
    config: TrustDecayConfig,
}

impl TrustDecay {
    pub fn new(config: TrustDecayConfig) -> Self {
        Self { config }
    }
}

impl Evaluator for TrustDecay {
    fn name(&self) -> &'static str {
        "trust_decay"
    }

    fn tier(&self) -> Tier {
        Tier::Secondary
    }

    fn evaluate(&self, ctx: &EvaluatorContext<'_>, _rng: &mut dyn RngCore) -> EvaluatorOutput {
        let speaker = &ctx.node.speaker;
        let mut output = EvaluatorOutput::empty();
        output.delta.stamp_interaction(speaker.clone());

        let before = match ctx.pre.character(speaker) {
            Some(character) => character,
            None => return output,
        };

        let absent = before.sessions_absent(ctx.post.session);
        let amount = trust_decay::decay_amount(absent, &ctx.pre.patterns, &self.config);
        let current = ctx.post.trust(speaker);
        let change = trust_decay::decayed_trust(current, amount, self.config.floor) - current;
        if change == 0 {
            return output;
        }

        debug!(character = %speaker, sessions_absent = absent, change, "Trust decayed");
        output
            .delta
            .adjust_trust(speaker.clone(), change, TrustReason::Decay);
        output.with_echo(
            ConsequenceEcho::new(format!(
                "{} seems a little distant. It has been a while.",
                display_name(speaker)
            ))
            .with_emotion(EmotionTag::Wistful)
            .with_sound(SoundCue::TrustDown),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{lucky, Turn};
    use super::*;
    use story_state::{CharacterId, CharacterState, Pattern, WorldState};

    #[test]
    fn test_band_change_up() {
        let mut turn = Turn::new(
            "maya",
            WorldState::new().with_character(CharacterState::new("maya").with_trust(5)),
        );
        turn.post.character_mut(&"maya".into()).adjust_trust(1);

        let output = RelationshipShift.evaluate(&turn.ctx(), &mut lucky());
        let echo = output.echo.unwrap();
        assert_eq!(echo.sound, Some(SoundCue::TrustUp));
        assert!(output.events.contains(&EventRequest::ui(UiTrigger::RelationshipChanged {
            character: "maya".into(),
            status: RelationshipStatus::Friend,
        })));
    }

    #[test]
    fn test_band_change_down() {
        let mut turn = Turn::new(
            "devon",
            WorldState::new().with_character(CharacterState::new("devon").with_trust(0)),
        );
        turn.post.character_mut(&"devon".into()).adjust_trust(-1);

        let output = RelationshipShift.evaluate(&turn.ctx(), &mut lucky());
        assert_eq!(output.echo.unwrap().emotion, Some(EmotionTag::Guarded));
    }

    #[test]
    fn test_same_band_is_silent() {
        let mut turn = Turn::new(
            "maya",
            WorldState::new().with_character(CharacterState::new("maya").with_trust(3)),
        );
        turn.post.character_mut(&"maya".into()).adjust_trust(1);

        assert!(RelationshipShift.evaluate(&turn.ctx(), &mut lucky()).is_empty());
    }

    fn decay() -> TrustDecay {
        TrustDecay::new(TrustDecayConfig::default())
    }

    fn absent_samuel(trust: i32, last_seen: u32, session: u32) -> Turn {
        let mut world = WorldState::new().with_character(
            CharacterState::new("samuel")
                .with_trust(trust)
                .with_last_interaction(last_seen),
        );
        world.session = session;
        Turn::new("samuel", world)
    }

    #[test]
    fn test_decay_after_absence() {
        let turn = absent_samuel(6, 1, 5);
        let output = decay().evaluate(&turn.ctx(), &mut lucky());

        // 4 sessions x 0.5 = 2
        assert_eq!(output.delta.trust_adjustments.len(), 1);
        assert_eq!(output.delta.trust_adjustments[0].delta, -2);
        assert_eq!(output.delta.trust_adjustments[0].reason, TrustReason::Decay);
        assert!(output.delta.interaction_stamps.contains(&CharacterId::from("samuel")));
        assert!(output.echo.is_some());
    }

    #[test]
    fn test_patience_slows_decay() {
        let mut turn = absent_samuel(6, 1, 5);
        turn.pre.patterns.bump(Pattern::Patience, 10);

        let output = decay().evaluate(&turn.ctx(), &mut lucky());
        assert_eq!(output.delta.trust_adjustments[0].delta, -1);
    }

    #[test]
    fn test_within_grace_only_stamps() {
        let turn = absent_samuel(6, 4, 5);
        let output = decay().evaluate(&turn.ctx(), &mut lucky());

        assert!(output.delta.trust_adjustments.is_empty());
        assert!(output.echo.is_none());
        assert!(output.delta.interaction_stamps.contains(&CharacterId::from("samuel")));
    }

    #[test]
    fn test_decay_stops_at_floor() {
        let turn = absent_samuel(1, 0, 10);
        let output = decay().evaluate(&turn.ctx(), &mut lucky());
        assert_eq!(output.delta.trust_adjustments[0].delta, -1);

        let strained = absent_samuel(-3, 0, 10);
        let output = decay().evaluate(&strained.ctx(), &mut lucky());
        assert!(output.delta.trust_adjustments.is_empty());
    }

    #[test]
    fn test_first_meeting_never_decays() {
        let mut turn = Turn::new("maya", WorldState::new());
        turn.post.session = 9;
        let output = decay().evaluate(&turn.ctx(), &mut lucky());

        assert!(output.delta.trust_adjustments.is_empty());
        assert_eq!(output.delta.interaction_stamps.len(), 1);
    }
}
