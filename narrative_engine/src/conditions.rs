//! Gating conditions for content variants and choices.
//!
//! `Condition` is a closed set. Content naming a kind that does not exist
//! fails to deserialize, so an unknown condition can never reach
//! evaluation.

use serde::{Deserialize, Serialize};
use story_state::{CharacterId, NervousSystemState, Pattern, WorldState};

use crate::systems::SkillComboCatalog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    TrustAtLeast {
        character: CharacterId,
        min: i32,
    },
    PatternAtLeast {
        pattern: Pattern,
        min: u32,
    },
    FlagPresent {
        flag: String,
    },
    FlagAbsent {
        flag: String,
    },
    KnowledgePresent {
        character: CharacterId,
        flag: String,
    },
    KnowledgeAbsent {
        character: CharacterId,
        flag: String,
    },
    SkillComboUnlocked {
        combo: String,
    },
    NervousState {
        character: CharacterId,
        state: NervousSystemState,
    },
    /// Composite AND.
    All {
        conditions: Vec<Condition>,
    },
}

impl Condition {
    pub fn trust_at_least(character: impl Into<CharacterId>, min: i32) -> Self {
        Condition::TrustAtLeast {
            character: character.into(),
            min,
        }
    }

    pub fn pattern_at_least(pattern: Pattern, min: u32) -> Self {
        Condition::PatternAtLeast { pattern, min }
    }

    pub fn flag_present(flag: impl Into<String>) -> Self {
        Condition::FlagPresent { flag: flag.into() }
    }

    pub fn flag_absent(flag: impl Into<String>) -> Self {
        Condition::FlagAbsent { flag: flag.into() }
    }

    pub fn combo_unlocked(combo: impl Into<String>) -> Self {
        Condition::SkillComboUnlocked {
            combo: combo.into(),
        }
    }

    /// Every combo id referenced by this condition, including nested ones.
    pub fn combo_references(&self) -> Vec<&str> {
        match self {
            Condition::SkillComboUnlocked { combo } => vec![combo.as_str()],
            Condition::All { conditions } => conditions
                .iter()
                .flat_map(|c| c.combo_references())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Evaluates conditions against a world snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ConditionEvaluator<'a> {
    combos: &'a SkillComboCatalog,
}

impl<'a> ConditionEvaluator<'a> {
    pub fn new(combos: &'a SkillComboCatalog) -> Self {
        Self { combos }
    }

    pub fn evaluate(&self, condition: &Condition, world: &WorldState) -> bool {
        match condition {
            Condition::TrustAtLeast { character, min } => world.trust(character) >= *min,

            Condition::PatternAtLeast { pattern, min } => world.patterns.get(*pattern) >= *min,

            Condition::FlagPresent { flag } => world.has_flag(flag),

            Condition::FlagAbsent { flag } => !world.has_flag(flag),

            Condition::KnowledgePresent { character, flag } => {
                world.character_knows(character, flag)
            }

            Condition::KnowledgeAbsent { character, flag } => {
                !world.character_knows(character, flag)
            }

            Condition::SkillComboUnlocked { combo } => {
                self.combos.is_unlocked(combo, &world.skills)
            }

            Condition::NervousState { character, state } => world
                .character(character)
                .map(|c| c.nervous_state == *state)
                .unwrap_or(false),

            Condition::All { conditions } => self.evaluate_all(conditions, world),
        }
    }

    /// True when every condition holds. An empty list always holds.
    pub fn evaluate_all(&self, conditions: &[Condition], world: &WorldState) -> bool {
        conditions.iter().all(|c| self.evaluate(c, world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{SkillCombo, SkillRequirement};
    use story_state::CharacterState;

    fn combos() -> SkillComboCatalog {
        SkillComboCatalog::new(vec![SkillCombo {
            id: "mentor".to_string(),
            name: "Mentor".to_string(),
            description: String::new(),
            requirements: vec![
                SkillRequirement {
                    skill: "empathy".into(),
                    minimum: 5.0,
                },
                SkillRequirement {
                    skill: "communication".into(),
                    minimum: 5.0,
                },
            ],
            unlocks: Vec::new(),
        }])
    }

    fn world() -> WorldState {
        let mut world = WorldState::new().with_character(
            CharacterState::new("maya")
                .with_trust(6)
                .with_knowledge("robotics_secret"),
        );
        world.patterns.bump(Pattern::Building, 4);
        world.set_flag("met_maya");
        world
    }

    #[test]
    fn test_trust_threshold() {
        let combos = combos();
        let eval = ConditionEvaluator::new(&combos);
        let world = world();

        assert!(eval.evaluate(&Condition::trust_at_least("maya", 6), &world));
        assert!(!eval.evaluate(&Condition::trust_at_least("maya", 7), &world));
        // Unknown characters have zero trust
        assert!(eval.evaluate(&Condition::trust_at_least("devon", 0), &world));
    }

    #[test]
    fn test_pattern_and_flags() {
        let combos = combos();
        let eval = ConditionEvaluator::new(&combos);
        let world = world();

        assert!(eval.evaluate(&Condition::pattern_at_least(Pattern::Building, 4), &world));
        assert!(!eval.evaluate(&Condition::pattern_at_least(Pattern::Helping, 1), &world));
        assert!(eval.evaluate(&Condition::flag_present("met_maya"), &world));
        assert!(eval.evaluate(&Condition::flag_absent("met_devon"), &world));
        assert!(!eval.evaluate(&Condition::flag_absent("met_maya"), &world));
    }

    #[test]
    fn test_knowledge_and_nervous_state() {
        let combos = combos();
        let eval = ConditionEvaluator::new(&combos);
        let world = world();

        let knows = Condition::KnowledgePresent {
            character: "maya".into(),
            flag: "robotics_secret".to_string(),
        };
        let unaware = Condition::KnowledgeAbsent {
            character: "maya".into(),
            flag: "parents_pressure".to_string(),
        };
        let calm = Condition::NervousState {
            character: "maya".into(),
            state: NervousSystemState::Ventral,
        };
        let stranger_calm = Condition::NervousState {
            character: "devon".into(),
            state: NervousSystemState::Ventral,
        };

        assert!(eval.evaluate(&knows, &world));
        assert!(eval.evaluate(&unaware, &world));
        assert!(eval.evaluate(&calm, &world));
        assert!(!eval.evaluate(&stranger_calm, &world));
    }

    #[test]
    fn test_skill_combo_condition() {
        let combos = combos();
        let eval = ConditionEvaluator::new(&combos);
        let mut world = world();
        let cond = Condition::combo_unlocked("mentor");

        assert!(!eval.evaluate(&cond, &world));

        world.skills.set("empathy", 5.0);
        world.skills.set("communication", 6.0);
        assert!(eval.evaluate(&cond, &world));
    }

    #[test]
    fn test_composite_and() {
        let combos = combos();
        let eval = ConditionEvaluator::new(&combos);
        let world = world();

        let both = Condition::All {
            conditions: vec![
                Condition::trust_at_least("maya", 5),
                Condition::flag_present("met_maya"),
            ],
        };
        let one_fails = Condition::All {
            conditions: vec![
                Condition::trust_at_least("maya", 5),
                Condition::flag_present("met_devon"),
            ],
        };

        assert!(eval.evaluate(&both, &world));
        assert!(!eval.evaluate(&one_fails, &world));
        assert!(eval.evaluate_all(&[], &world));
    }

    #[test]
    fn test_unknown_condition_fails_to_parse() {
        let json = r#"{"type": "moon_phase", "phase": "full"}"#;
        assert!(serde_json::from_str::<Condition>(json).is_err());

        let json = r#"{"type": "trust_at_least", "character": "maya", "min": 3}"#;
        let parsed: Condition = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, Condition::trust_at_least("maya", 3));
    }

    #[test]
    fn test_combo_references_are_collected() {
        let cond = Condition::All {
            conditions: vec![
                Condition::combo_unlocked("mentor"),
                Condition::All {
                    conditions: vec![Condition::combo_unlocked("builder")],
                },
            ],
        };
        assert_eq!(cond.combo_references(), vec!["mentor", "builder"]);
    }
}
