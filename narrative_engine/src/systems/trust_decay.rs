//! Trust decay - characters drift when they go unvisited.
//!
//! Attentive players get more slack: a dominant patience or helping pattern
//! slows the drift, a dominant exploring pattern speeds it up.

use story_state::{CharacterState, Pattern, PatternLevels};

use crate::config::TrustDecayConfig;

/// Multiplier applied to the base rate for the player's dominant pattern.
pub fn decay_modifier(patterns: &PatternLevels, config: &TrustDecayConfig) -> f64 {
    match patterns.dominant() {
        Some(Pattern::Patience) => config.patience_modifier,
        Some(Pattern::Helping) => config.helping_modifier,
        Some(Pattern::Exploring) => config.exploring_modifier,
        _ => 1.0,
    }
}

/// Trust lost over `sessions_absent` sessions. Never negative.
pub fn decay_amount(
    sessions_absent: u32,
    patterns: &PatternLevels,
    config: &TrustDecayConfig,
) -> f64 {
    if sessions_absent < config.grace_sessions {
        return 0.0;
    }

    let amount = sessions_absent as f64 * config.base_rate * decay_modifier(patterns, config);
    amount.max(0.0)
}

/// Trust after losing `amount`, held at `floor`.
///
/// Trust already at or below the floor (e.g. after a rejection) is left
/// where it is; decay never pushes further down.
pub fn decayed_trust(current: i32, amount: f64, floor: i32) -> i32 {
    if current <= floor {
        return current;
    }

    let loss = amount.max(0.0).round();
    let target = current as f64 - loss;
    if target <= floor as f64 {
        floor
    } else {
        target as i32
    }
}

/// Signed trust change owed by a character whose last visit was a while
/// ago. Zero or negative.
pub fn pending_decay(
    character: &CharacterState,
    current_session: u32,
    patterns: &PatternLevels,
    config: &TrustDecayConfig,
) -> i32 {
    let absent = character.sessions_absent(current_session);
    let amount = decay_amount(absent, patterns, config);
    decayed_trust(character.trust, amount, config.floor) - character.trust
}
