//! Dialogue Navigator - picks what a node shows for the current world.
//!
//! Selection works as follows:
//! 1. **Content**: the first variant whose conditions all hold, else the
//!    node's default content
//! 2. **Authored choices**: every choice whose conditions all hold, in
//!    declared order
//! 3. **Pattern unlocks**: bonus choices for the speaker whose pattern
//!    threshold holds and which have not been taken, appended last

use serde::Serialize;
use story_state::{CharacterId, WorldState};

use crate::conditions::ConditionEvaluator;
use crate::config::NavigatorConfig;
use crate::content::{Choice, Content, ContentCatalog, DialogueNode, NodeId};

/// Where a visible choice came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChoiceOrigin {
    Authored,
    PatternUnlock { unlock_id: String },
}

/// A choice the player can pick this turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableChoice {
    pub choice: Choice,
    pub origin: ChoiceOrigin,
}

/// What the renderer shows for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedContent {
    pub node_id: NodeId,
    pub speaker: CharacterId,
    pub content: Content,
    pub choices: Vec<AvailableChoice>,
    /// True when the requested node was missing and the safe start was
    /// shown instead.
    pub fell_back: bool,
}

impl SelectedContent {
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices
            .iter()
            .map(|c| &c.choice)
            .find(|c| c.id == id)
    }
}

/// Read-only content selection.
#[derive(Debug, Clone)]
pub struct Navigator {
    config: NavigatorConfig,
}

impl Navigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(NavigatorConfig::default())
    }

    pub fn select(
        &self,
        node: &DialogueNode,
        world: &WorldState,
        catalog: &ContentCatalog,
    ) -> SelectedContent {
        let evaluator = ConditionEvaluator::new(&catalog.combos);

        let content = node
            .variants
            .iter()
            .find(|v| evaluator.evaluate_all(&v.conditions, world))
            .map(|v| v.content.clone())
            .unwrap_or_else(|| node.content.clone());

        let mut choices: Vec<AvailableChoice> = node
            .choices
            .iter()
            .filter(|c| evaluator.evaluate_all(&c.conditions, world))
            .map(|c| AvailableChoice {
                choice: c.clone(),
                origin: ChoiceOrigin::Authored,
            })
            .collect();

        let unlocks = catalog
            .pattern_unlocks
            .iter()
            .filter(|u| u.character == node.speaker)
            .filter(|u| u.is_available(world))
            .filter(|u| evaluator.evaluate_all(&u.choice.conditions, world))
            .take(self.config.max_pattern_unlocks);

        for unlock in unlocks {
            let mut choice = unlock.choice.clone();
            choice.consequence.visit_unlock = Some(unlock.id.clone());
            choices.push(AvailableChoice {
                choice,
                origin: ChoiceOrigin::PatternUnlock {
                    unlock_id: unlock.id.clone(),
                },
            });
        }

        SelectedContent {
            node_id: node.id.clone(),
            speaker: node.speaker.clone(),
            content,
            choices,
            fell_back: false,
        }
    }
}
