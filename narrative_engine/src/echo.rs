//! Consequence echoes - short reactive lines surfaced after a choice.

use serde::{Deserialize, Serialize};

/// Emotional colouring for a line of dialogue or an echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionTag {
    Warm,
    Curious,
    Proud,
    Grateful,
    Wistful,
    Guarded,
    Concerned,
    Vulnerable,
    Reflective,
    Surprised,
}

/// When the renderer should show an echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EchoTiming {
    #[default]
    Immediate,
    Delayed { ms: u32 },
}

/// Sound cues the event sink knows how to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    TrustUp,
    TrustDown,
    Insight,
    Unlock,
    Ripple,
    Revelation,
}

/// An immutable reactive line. At most one is shown per turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceEcho {
    pub text: String,
    #[serde(default)]
    pub emotion: Option<EmotionTag>,
    #[serde(default)]
    pub timing: EchoTiming,
    #[serde(default)]
    pub sound: Option<SoundCue>,
}

impl ConsequenceEcho {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emotion: None,
            timing: EchoTiming::Immediate,
            sound: None,
        }
    }

    pub fn with_emotion(mut self, emotion: EmotionTag) -> Self {
        self.emotion = Some(emotion);
        self
    }

    pub fn with_sound(mut self, sound: SoundCue) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn delayed(mut self, ms: u32) -> Self {
        self.timing = EchoTiming::Delayed { ms };
        self
    }
}
