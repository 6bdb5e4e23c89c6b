//! Error types.
//!
//! Content defects and evaluator ordering problems are caught when content
//! is loaded or the registry is built. The only play-time failure,
//! a missing node, is recovered by the engine facade.

use thiserror::Error;

use crate::content::NodeId;

/// Defects in authored content, raised at load time.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse dialogue JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("safe-start node '{0}' is not in the dialogue graph")]
    MissingSafeStart(NodeId),

    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),

    #[error("choice '{choice}' on node '{node}' leads to unknown node '{target}'")]
    DanglingChoice {
        node: NodeId,
        choice: String,
        target: NodeId,
    },

    #[error("condition on '{location}' references unknown skill combo '{combo}'")]
    UnknownCombo { location: String, combo: String },

    #[error("cascade '{0}' needs at least two degrees")]
    ShortCascade(String),

    #[error("cascade '{cascade}' reuses effect flag '{flag}'")]
    DuplicateCascadeFlag { cascade: String, flag: String },

    #[error("cascade '{cascade}' sets '{flag}', which resolves one of its own degrees")]
    CascadeFlagCollision { cascade: String, flag: String },

    #[error("resonance bonus '{bonus}' has invalid {field} {value}")]
    InvalidResonance {
        bonus: String,
        field: &'static str,
        value: f64,
    },

    #[error("skill combo '{0}' has no requirements")]
    EmptyCombo(String),

    #[error("skill combo '{combo}' requires {skill} at {minimum}, outside 0-10")]
    ComboMinimumOutOfRange {
        combo: String,
        skill: String,
        minimum: f64,
    },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

/// Evaluator ordering violations, raised when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("evaluator '{0}' is registered twice")]
    DuplicateEvaluator(String),

    #[error("evaluator '{evaluator}' depends on unknown evaluator '{dependency}'")]
    UnknownDependency {
        evaluator: String,
        dependency: String,
    },

    #[error("evaluator '{evaluator}' depends on '{dependency}', which is registered after it")]
    ForwardDependency {
        evaluator: String,
        dependency: String,
    },

    #[error("tier 1 evaluator '{evaluator}' cannot depend on tier 2 evaluator '{dependency}'")]
    TierInversion {
        evaluator: String,
        dependency: String,
    },
}

/// Bad engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse engine config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("probability '{name}' must be within 0.0..=1.0, got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("trust decay base rate must be non-negative, got {0}")]
    NegativeDecayRate(f64),
}

/// A node lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("dialogue node '{0}' not found")]
    NodeNotFound(NodeId),
}

/// Everything that can go wrong while building an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
