//! End-to-end turns, driving the engine the way a game loop would.

use narrative_engine::{
    DialogueGraph, EvaluatorContext, EventRequest, NarrativeEngine, PipelineResult, UiTrigger,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use story_state::{CharacterState, PatternTier, RelationshipStatus, WorldState};

const GRAPH: &str = r#"{
    "safe_start": "station_platform",
    "nodes": [
        {
            "id": "station_platform",
            "speaker": "samuel",
            "content": { "text": "Welcome to Grand Central Terminus.", "emotion": "warm" },
            "variants": [
                {
                    "conditions": [{ "type": "flag_present", "flag": "gate:samuel_backstory" }],
                    "content": { "text": "Sit a while. I'll tell you how this place began." }
                }
            ],
            "choices": [
                {
                    "id": "listen",
                    "text": "Keep listening.",
                    "consequence": { "trust_change": 1, "pattern": "patience" }
                },
                { "id": "wave", "text": "Wave and move on." }
            ]
        },
        {
            "id": "maya_intro",
            "speaker": "maya",
            "content": { "text": "Hi! Are you lost?" },
            "choices": [
                {
                    "id": "ask_robot",
                    "text": "What are you building?",
                    "consequence": { "trust_change": 1, "pattern": "building", "skill_gains": { "engineering": 1.0 } }
                }
            ]
        },
        {
            "id": "devon_intro",
            "speaker": "devon",
            "content": { "text": "..." },
            "choices": [
                {
                    "id": "share_letter",
                    "text": "Do you want to talk about the letter?",
                    "consequence": { "trust_change": 1, "knowledge_flags": ["shared_father_letter"] }
                },
                { "id": "nod", "text": "Nod." }
            ]
        }
    ]
}"#;

/// Plays the caller's part: snapshots, applies, persists.
struct Playthrough {
    engine: NarrativeEngine,
    world: WorldState,
    shown_comments: HashSet<String>,
    shown_manifestations: HashSet<String>,
    rng: ChaCha8Rng,
}

impl Playthrough {
    fn new(seed: u64) -> Self {
        let graph = DialogueGraph::from_json_str(GRAPH).unwrap();
        let world = WorldState::new()
            .with_character(CharacterState::new("samuel"))
            .with_character(CharacterState::new("maya"))
            .with_character(CharacterState::new("devon"));

        Self {
            engine: NarrativeEngine::with_builtin_catalog(graph).unwrap(),
            world,
            shown_comments: HashSet::new(),
            shown_manifestations: HashSet::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn take(&mut self, node_id: &str, choice_id: &str) -> PipelineResult {
        let selected = self.engine.select_content(&node_id.into(), &self.world);
        let choice = selected
            .choice(choice_id)
            .unwrap_or_else(|| panic!("choice '{}' not visible at '{}'", choice_id, node_id))
            .clone();
        let node = self.engine.node(&selected.node_id).unwrap().clone();

        let pre = self.world.clone();
        let trust_delta = self.engine.apply_choice(&node, &choice, &mut self.world);

        let result = {
            let ctx = EvaluatorContext {
                pre: &pre,
                post: &self.world,
                choice: &choice,
                node: &node,
                trust_delta,
                shown_pattern_comments: &self.shown_comments,
                shown_manifestations: &self.shown_manifestations,
            };
            self.engine.evaluate_consequences(&ctx, &mut self.rng)
        };

        self.world.apply_delta(&result.delta);
        self.shown_comments
            .extend(result.consumed_pattern_comments.iter().cloned());
        self.shown_manifestations
            .extend(result.consumed_manifestations.iter().cloned());
        result
    }

    fn echo_texts(results: &[PipelineResult]) -> Vec<String> {
        results
            .iter()
            .filter_map(|r| r.echo.as_ref().map(|e| e.text.clone()))
            .collect()
    }
}

#[test]
fn test_patience_run_surfaces_each_comment_once() {
    let mut play = Playthrough::new(1);
    let results: Vec<_> = (0..10).map(|_| play.take("station_platform", "listen")).collect();
    let echoes = Playthrough::echo_texts(&results);

    let count = |needle: &str| echoes.iter().filter(|t| t.contains(needle)).count();
    assert_eq!(count("You don't rush people"), 1);
    assert_eq!(count("You wait for the whole story"), 1);

    assert!(play.shown_comments.contains("samuel_patience_3"));
    assert!(play.shown_comments.contains("samuel_patience_6"));
}

#[test]
fn test_relationship_shift_takes_priority() {
    let mut play = Playthrough::new(2);
    play.take("station_platform", "listen");
    play.take("station_platform", "listen");

    // Trust 2 -> 3 and patience 2 -> 3 on the same turn
    let result = play.take("station_platform", "listen");
    assert_eq!(result.echo_source, Some("relationship_shift"));
    assert!(result.events.contains(&EventRequest::ui(UiTrigger::RelationshipChanged {
        character: "samuel".into(),
        status: RelationshipStatus::Acquaintance,
    })));

    // The comment was not consumed, so it is still owed
    assert!(!play.shown_comments.contains("samuel_patience_3"));
    let next = play.take("station_platform", "listen");
    assert_eq!(next.echo_source, Some("pattern_recognition"));
}

#[test]
fn test_pattern_evolution_recorded_in_history() {
    let mut play = Playthrough::new(3);
    for _ in 0..6 {
        play.take("station_platform", "listen");
    }

    let tiers: Vec<_> = play.world.pattern_history.iter().map(|e| e.to).collect();
    assert_eq!(tiers, vec![PatternTier::Emerging, PatternTier::Developing]);
}

#[test]
fn test_gate_opens_and_changes_content() {
    let mut play = Playthrough::new(4);
    for _ in 0..6 {
        play.take("station_platform", "listen");
    }

    assert!(play.world.has_flag("gate:samuel_backstory"));
    let selected = play
        .engine
        .select_content(&"station_platform".into(), &play.world);
    assert_eq!(selected.content.text, "Sit a while. I'll tell you how this place began.");
    // Patience 6 also offers the bonus choice
    assert!(selected.choice("sit_quietly").is_some());
}

#[test]
fn test_pattern_unlock_offered_once() {
    let mut play = Playthrough::new(5);
    for _ in 0..6 {
        play.take("station_platform", "listen");
    }

    play.take("station_platform", "sit_quietly");
    let selected = play
        .engine
        .select_content(&"station_platform".into(), &play.world);
    assert!(selected.choice("sit_quietly").is_none());
}

#[test]
fn test_cascade_triggers_then_ripples_in_order() {
    let mut play = Playthrough::new(6);

    let trigger = play.take("devon_intro", "share_letter");
    assert_eq!(trigger.echo_source, Some("cascade_trigger"));

    let mut degrees = Vec::new();
    for _ in 0..4 {
        let result = play.take("station_platform", "wave");
        for event in &result.events {
            if let EventRequest::TriggerUi {
                trigger: UiTrigger::CascadeRipple { cascade_id, degree },
            } = event
            {
                assert_eq!(cascade_id, "devon_opens_up");
                degrees.push(*degree);
            }
        }
    }

    assert_eq!(degrees, vec![1, 2, 3]);
    assert!(play.world.has_flag("maya_knows_about_devon"));
    assert!(play.world.has_flag("dialogue_unlocked:samuel_ripples"));
    assert_eq!(play.world.trust(&"maya".into()), 1);
    // Share (+1) and degree one (+1)
    assert_eq!(play.world.trust(&"devon".into()), 2);
}

#[test]
fn test_trust_decays_on_return() {
    let mut play = Playthrough::new(7);
    play.world.character_mut(&"devon".into()).set_trust(6);
    play.take("devon_intro", "nod");

    for _ in 0..4 {
        play.world.begin_session();
    }

    let result = play.take("devon_intro", "nod");
    assert_eq!(result.echo_source, Some("trust_decay"));
    // 4 sessions x 0.5, no dominant pattern
    assert_eq!(play.world.trust(&"devon".into()), 4);

    // Stamped: coming straight back costs nothing
    let again = play.take("devon_intro", "nod");
    assert!(again.delta.trust_adjustments.is_empty());
}

#[test]
fn test_missing_node_recovers_to_safe_start() {
    let play = Playthrough::new(8);
    let selected = play
        .engine
        .select_content(&"removed_in_patch".into(), &play.world);

    assert!(selected.fell_back);
    assert_eq!(selected.content.text, "Welcome to Grand Central Terminus.");
}

#[test]
fn test_vulnerability_hint_never_repeats() {
    let mut play = Playthrough::new(9);
    play.world.character_mut(&"devon".into()).set_trust(7);
    play.world.character_mut(&"devon".into()).last_interaction_session = Some(0);

    let results: Vec<_> = (0..40).map(|_| play.take("devon_intro", "nod")).collect();
    let hints = Playthrough::echo_texts(&results)
        .into_iter()
        .filter(|t| t.contains("hesitates"))
        .count();

    assert!(hints <= 1);
    assert_eq!(hints == 1, play.shown_manifestations.contains("vulnerability_devon"));
}

#[test]
fn test_same_seed_same_story() {
    let run = |seed| {
        let mut play = Playthrough::new(seed);
        play.world.character_mut(&"devon".into()).set_trust(8);
        let results: Vec<_> = (0..15)
            .map(|i| match i % 3 {
                0 => play.take("devon_intro", "nod"),
                1 => play.take("maya_intro", "ask_robot"),
                _ => play.take("station_platform", "listen"),
            })
            .collect();
        Playthrough::echo_texts(&results)
    };

    assert_eq!(run(42), run(42));
}
