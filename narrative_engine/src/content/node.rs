//! Dialogue nodes, content variants and choices.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use story_state::{CharacterId, NervousSystemState, Pattern, SkillId, WorldState};

use super::NodeId;
use crate::conditions::Condition;
use crate::echo::EmotionTag;

/// A line of dialogue as the renderer receives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    #[serde(default)]
    pub emotion: Option<EmotionTag>,
}

impl Content {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emotion: None,
        }
    }

    pub fn with_emotion(mut self, emotion: EmotionTag) -> Self {
        self.emotion = Some(emotion);
        self
    }
}

/// Alternative content shown when all of its conditions hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentVariant {
    pub conditions: Vec<Condition>,
    pub content: Content,
}

fn default_pattern_amount() -> u32 {
    1
}

/// Direct effects of taking a choice. The caller applies them before the
/// consequence pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceConsequence {
    /// Trust change with the node's speaker.
    #[serde(default)]
    pub trust_change: i32,

    #[serde(default)]
    pub pattern: Option<Pattern>,

    #[serde(default = "default_pattern_amount")]
    pub pattern_amount: u32,

    #[serde(default)]
    pub global_flags: Vec<String>,

    /// Knowledge flags added to the speaker.
    #[serde(default)]
    pub knowledge_flags: Vec<String>,

    #[serde(default)]
    pub skill_gains: BTreeMap<SkillId, f64>,

    #[serde(default)]
    pub nervous_state: Option<NervousSystemState>,

    /// Set on pattern-unlock choices so they are offered only once.
    #[serde(default)]
    pub visit_unlock: Option<String>,
}

impl Default for ChoiceConsequence {
    fn default() -> Self {
        Self {
            trust_change: 0,
            pattern: None,
            pattern_amount: default_pattern_amount(),
            global_flags: Vec::new(),
            knowledge_flags: Vec::new(),
            skill_gains: BTreeMap::new(),
            nervous_state: None,
            visit_unlock: None,
        }
    }
}

/// Resonance multipliers the caller passes when applying a choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceMultipliers {
    pub trust_gain: f64,
    pub skill_growth: f64,
}

impl Default for ChoiceMultipliers {
    fn default() -> Self {
        Self {
            trust_gain: 1.0,
            skill_growth: 1.0,
        }
    }
}

impl ChoiceConsequence {
    /// Apply the direct effects to `world`. Returns the trust change
    /// actually applied to the speaker.
    ///
    /// Only positive trust changes are scaled; rejection is never softened
    /// or amplified by resonance.
    pub fn apply_to(
        &self,
        speaker: &CharacterId,
        world: &mut WorldState,
        multipliers: ChoiceMultipliers,
    ) -> i32 {
        let trust_change = if self.trust_change > 0 {
            (self.trust_change as f64 * multipliers.trust_gain).round() as i32
        } else {
            self.trust_change
        };

        if let Some(pattern) = self.pattern {
            world.patterns.bump(pattern, self.pattern_amount);
        }

        for flag in &self.global_flags {
            world.set_flag(flag.clone());
        }

        for (skill, amount) in &self.skill_gains {
            world.skills.gain(skill.clone(), amount * multipliers.skill_growth);
        }

        let character = world.character_mut(speaker);
        let applied = character.adjust_trust(trust_change);
        character
            .knowledge_flags
            .extend(self.knowledge_flags.iter().cloned());
        if let Some(state) = self.nervous_state {
            character.nervous_state = state;
        }
        if let Some(unlock) = &self.visit_unlock {
            character.visited_pattern_unlocks.insert(unlock.clone());
        }

        world.version += 1;
        applied
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Where the conversation goes next; `None` ends it.
    #[serde(default)]
    pub next_node: Option<NodeId>,
    #[serde(default)]
    pub consequence: ChoiceConsequence,
}

impl Choice {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            conditions: Vec::new(),
            next_node: None,
            consequence: ChoiceConsequence::default(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn leads_to(mut self, node: impl Into<NodeId>) -> Self {
        self.next_node = Some(node.into());
        self
    }

    pub fn with_consequence(mut self, consequence: ChoiceConsequence) -> Self {
        self.consequence = consequence;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: NodeId,
    pub speaker: CharacterId,
    /// Default content when no variant matches.
    pub content: Content,
    /// Checked in declared order; first match wins.
    #[serde(default)]
    pub variants: Vec<ContentVariant>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DialogueNode {
    pub fn new(
        id: impl Into<NodeId>,
        speaker: impl Into<CharacterId>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            speaker: speaker.into(),
            content: Content::new(text),
            variants: Vec::new(),
            choices: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_variant(mut self, conditions: Vec<Condition>, content: Content) -> Self {
        self.variants.push(ContentVariant {
            conditions,
            content,
        });
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }

    /// Every condition on the node, for load-time checks.
    pub fn all_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.variants
            .iter()
            .flat_map(|v| v.conditions.iter())
            .chain(self.choices.iter().flat_map(|c| c.conditions.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_state::CharacterState;

    #[test]
    fn test_choice_consequence_defaults_from_json() {
        let choice: Choice = serde_json::from_str(
            r#"{"id": "listen", "text": "Keep listening.", "consequence": {"pattern": "patience"}}"#,
        )
        .unwrap();

        assert_eq!(choice.consequence.pattern, Some(Pattern::Patience));
        assert_eq!(choice.consequence.pattern_amount, 1);
        assert!(choice.next_node.is_none());
    }

    #[test]
    fn test_apply_consequence() {
        let mut world =
            WorldState::new().with_character(CharacterState::new("maya").with_trust(2));
        let mut skill_gains = BTreeMap::new();
        skill_gains.insert(SkillId::from("engineering"), 1.0);

        let consequence = ChoiceConsequence {
            trust_change: 2,
            pattern: Some(Pattern::Building),
            pattern_amount: 2,
            global_flags: vec!["saw_maya_robot".to_string()],
            knowledge_flags: vec!["robotics_secret".to_string()],
            skill_gains,
            nervous_state: Some(NervousSystemState::Sympathetic),
            visit_unlock: Some("maya_build_together".to_string()),
        };

        let applied =
            consequence.apply_to(&"maya".into(), &mut world, ChoiceMultipliers::default());

        assert_eq!(applied, 2);
        let maya = world.character(&"maya".into()).unwrap();
        assert_eq!(maya.trust, 4);
        assert!(maya.knows("robotics_secret"));
        assert!(maya.has_visited_unlock("maya_build_together"));
        assert_eq!(maya.nervous_state, NervousSystemState::Sympathetic);
        assert_eq!(world.patterns.get(Pattern::Building), 2);
        assert!(world.has_flag("saw_maya_robot"));
        assert_eq!(world.skills.get(&"engineering".into()), 1.0);
    }

    #[test]
    fn test_multipliers_scale_gains_only() {
        let mut world = WorldState::new();
        let multipliers = ChoiceMultipliers {
            trust_gain: 1.5,
            skill_growth: 2.0,
        };

        let mut skill_gains = BTreeMap::new();
        skill_gains.insert(SkillId::from("empathy"), 1.5);
        let warm = ChoiceConsequence {
            trust_change: 2,
            skill_gains,
            ..Default::default()
        };
        assert_eq!(warm.apply_to(&"devon".into(), &mut world, multipliers), 3);
        assert_eq!(world.skills.get(&"empathy".into()), 3.0);

        let cold = ChoiceConsequence {
            trust_change: -2,
            ..Default::default()
        };
        assert_eq!(cold.apply_to(&"devon".into(), &mut world, multipliers), -2);
    }

    #[test]
    fn test_node_builder_and_conditions() {
        let node = DialogueNode::new("maya_intro", "maya", "Hi! Are you lost?")
            .with_variant(
                vec![Condition::trust_at_least("maya", 5)],
                Content::new("Oh, it's you again!"),
            )
            .with_choice(
                Choice::new("ask_robot", "What are you building?")
                    .with_condition(Condition::pattern_at_least(Pattern::Building, 1)),
            );

        assert_eq!(node.all_conditions().count(), 2);
        assert!(node.choice("ask_robot").is_some());
        assert!(node.choice("missing").is_none());
    }
}
