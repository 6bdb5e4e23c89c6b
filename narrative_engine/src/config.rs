//! Engine tuning, loadable from TOML.
//!
//! Every section has defaults, so a config file only needs the values it
//! overrides:
//!
//! ```toml
//! [trust_decay]
//! base_rate = 0.4
//!
//! [echoes]
//! trust_asymmetry_chance = 0.2
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How trust drifts while a character goes unvisited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustDecayConfig {
    /// Trust lost per absent session before pattern modifiers.
    pub base_rate: f64,

    /// Absences shorter than this cost nothing.
    pub grace_sessions: u32,

    /// Decay never pushes trust below this value.
    pub floor: i32,

    /// Multiplier when patience dominates.
    pub patience_modifier: f64,

    /// Multiplier when helping dominates.
    pub helping_modifier: f64,

    /// Multiplier when exploring dominates.
    pub exploring_modifier: f64,
}

impl Default for TrustDecayConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.5,
            grace_sessions: 2,
            floor: 0,
            patience_modifier: 0.5,
            helping_modifier: 0.75,
            exploring_modifier: 1.5,
        }
    }
}

/// Chances and thresholds for the probabilistic echoes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoConfig {
    /// Per-turn chance to remark on lopsided trust.
    pub trust_asymmetry_chance: f64,

    /// How far above the cast average the speaker's trust must sit.
    pub trust_asymmetry_margin: i32,

    /// Per-turn chance to hint at a character's vulnerability.
    pub vulnerability_chance: f64,

    /// Trust needed before a vulnerability hint can appear.
    pub vulnerability_min_trust: i32,

    /// Delay used for echoes that land after the line they react to.
    pub delayed_echo_ms: u32,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            trust_asymmetry_chance: 0.15,
            trust_asymmetry_margin: 3,
            vulnerability_chance: 0.20,
            vulnerability_min_trust: 6,
            delayed_echo_ms: 1200,
        }
    }
}

/// Dialogue navigation knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Upper bound on pattern-unlock choices appended to one node.
    pub max_pattern_unlocks: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            max_pattern_unlocks: 2,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub trust_decay: TrustDecayConfig,
    pub echoes: EchoConfig,
    pub navigator: NavigatorConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chances = [
            ("trust_asymmetry_chance", self.echoes.trust_asymmetry_chance),
            ("vulnerability_chance", self.echoes.vulnerability_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        if self.trust_decay.base_rate < 0.0 {
            return Err(ConfigError::NegativeDecayRate(self.trust_decay.base_rate));
        }

        Ok(())
    }
}
