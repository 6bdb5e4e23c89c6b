//! The engine facade: content selection and consequence evaluation for a
//! turn, over one loaded graph and catalog.

use rand::RngCore;
use std::sync::Arc;
use story_state::WorldState;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::content::{
    Choice, ChoiceMultipliers, ContentCatalog, DialogueGraph, DialogueNode, NodeId,
};
use crate::error::{EngineError, NavigationError};
use crate::navigator::{Navigator, SelectedContent};
use crate::pipeline::evaluators::default_registry;
use crate::pipeline::{ConsequencePipeline, EvaluatorContext, PipelineResult};
use crate::systems::{combined_multiplier, ResonanceTarget};

/// Read-only narrative engine. World state stays with the caller.
#[derive(Debug)]
pub struct NarrativeEngine {
    graph: DialogueGraph,
    catalog: Arc<ContentCatalog>,
    config: EngineConfig,
    navigator: Navigator,
    pipeline: ConsequencePipeline,
}

impl NarrativeEngine {
    /// Validate everything up front and build the default evaluator set.
    pub fn new(
        graph: DialogueGraph,
        catalog: ContentCatalog,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        catalog.validate()?;
        graph.validate_against(&catalog)?;

        let catalog = Arc::new(catalog);
        let registry = default_registry(catalog.clone(), &config)?;

        info!(
            nodes = graph.len(),
            evaluators = registry.len(),
            cascades = catalog.cascades.len(),
            "Narrative engine ready"
        );

        Ok(Self {
            navigator: Navigator::new(config.navigator.clone()),
            pipeline: ConsequencePipeline::new(registry),
            graph,
            catalog,
            config,
        })
    }

    /// Engine over the built-in catalog with default tuning.
    pub fn with_builtin_catalog(graph: DialogueGraph) -> Result<Self, EngineError> {
        Self::new(graph, ContentCatalog::builtin()?, EngineConfig::default())
    }

    /// What to show for `node_id`. A missing node never fails the turn:
    /// the safe-start node is shown instead.
    pub fn select_content(&self, node_id: &NodeId, world: &WorldState) -> SelectedContent {
        match self.graph.node(node_id) {
            Ok(node) => self.navigator.select(node, world, &self.catalog),
            Err(err) => {
                warn!(
                    error = %err,
                    fallback = %self.graph.safe_start_id(),
                    "Falling back to safe start"
                );
                let mut selected = self
                    .navigator
                    .select(self.graph.safe_start(), world, &self.catalog);
                selected.fell_back = true;
                selected
            }
        }
    }

    /// Run the consequence pipeline. Proposes changes; writes nothing.
    pub fn evaluate_consequences(
        &self,
        ctx: &EvaluatorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> PipelineResult {
        self.pipeline.evaluate(ctx, rng)
    }

    /// Apply a choice's direct effects and record the visit. Returns the
    /// trust change applied to the speaker, for the evaluator context.
    pub fn apply_choice(
        &self,
        node: &DialogueNode,
        choice: &Choice,
        world: &mut WorldState,
    ) -> i32 {
        let multipliers = self.choice_multipliers(world);
        let session = world.session;
        world
            .character_mut(&node.speaker)
            .record_visit(node.id.as_str(), session);
        choice.consequence.apply_to(&node.speaker, world, multipliers)
    }

    /// Product of the active resonance bonuses aimed at `target`.
    pub fn resonance_multiplier(&self, target: ResonanceTarget, world: &WorldState) -> f64 {
        combined_multiplier(&self.catalog.resonance, target, world)
    }

    pub fn choice_multipliers(&self, world: &WorldState) -> ChoiceMultipliers {
        ChoiceMultipliers {
            trust_gain: self.resonance_multiplier(ResonanceTarget::TrustGain, world),
            skill_growth: self.resonance_multiplier(ResonanceTarget::SkillGrowth, world),
        }
    }

    pub fn node(&self, id: &NodeId) -> Result<&DialogueNode, NavigationError> {
        self.graph.node(id)
    }

    pub fn graph(&self) -> &DialogueGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &ConsequencePipeline {
        &self.pipeline
    }
}
