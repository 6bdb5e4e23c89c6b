//! Side-effect requests the caller's event sink executes.

use serde::{Deserialize, Serialize};
use story_state::{CharacterId, Pattern, PatternTier, RelationshipStatus};

use crate::echo::SoundCue;

/// UI moments worth a dedicated animation or panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiTrigger {
    GateOpened {
        gate_id: String,
    },
    ComboUnlocked {
        combo_id: String,
    },
    CascadeRipple {
        cascade_id: String,
        degree: usize,
    },
    RelationshipChanged {
        character: CharacterId,
        status: RelationshipStatus,
    },
    PatternEvolved {
        pattern: Pattern,
        tier: PatternTier,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRequest {
    PlaySound { cue: SoundCue },
    ShowToast { title: String, body: String },
    TriggerUi { trigger: UiTrigger },
}

impl EventRequest {
    pub fn sound(cue: SoundCue) -> Self {
        EventRequest::PlaySound { cue }
    }

    pub fn toast(title: impl Into<String>, body: impl Into<String>) -> Self {
        EventRequest::ShowToast {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn ui(trigger: UiTrigger) -> Self {
        EventRequest::TriggerUi { trigger }
    }
}
