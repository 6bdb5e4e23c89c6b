//! Turn fixture shared by the evaluator tests.

use rand::rngs::mock::StepRng;
use rand::RngCore;
use std::collections::HashSet;
use story_state::WorldState;

use crate::content::{Choice, DialogueNode};
use crate::pipeline::EvaluatorContext;

pub struct Turn {
    pub pre: WorldState,
    pub post: WorldState,
    pub choice: Choice,
    pub node: DialogueNode,
    pub trust_delta: i32,
    pub shown_comments: HashSet<String>,
    pub shown_manifestations: HashSet<String>,
}

impl Turn {
    /// A turn at a node spoken by `speaker`, with `world` as both snapshots.
    pub fn new(speaker: &str, world: WorldState) -> Self {
        Self {
            pre: world.clone(),
            post: world,
            choice: Choice::new("continue", "Go on."),
            node: DialogueNode::new("scene", speaker, "..."),
            trust_delta: 0,
            shown_comments: HashSet::new(),
            shown_manifestations: HashSet::new(),
        }
    }

    pub fn ctx(&self) -> EvaluatorContext<'_> {
        EvaluatorContext {
            pre: &self.pre,
            post: &self.post,
            choice: &self.choice,
            node: &self.node,
            trust_delta: self.trust_delta,
            shown_pattern_comments: &self.shown_comments,
            shown_manifestations: &self.shown_manifestations,
        }
    }
}

/// Every roll comes out 0.0, so every chance succeeds.
pub fn lucky() -> StepRng {
    StepRng::new(0, 0)
}

/// Every roll comes out just under 1.0, so every chance fails.
pub fn unlucky() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Counts how many times the wrapped generator is drawn from.
pub struct CountingRng<R> {
    pub inner: R,
    pub draws: usize,
}

impl<R: RngCore> CountingRng<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, draws: 0 }
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws += 1;
        self.inner.try_fill_bytes(dest)
    }
}
