//! # Story State
//!
//! The world-state store for the career story: trust and relationship per
//! character, the five behavioral patterns, skill levels, global flags and
//! conversation history. This crate holds data and the rules for folding
//! changes into it; it makes no narrative decisions.

pub mod characters;
pub mod patterns;
pub mod skills;
pub mod world_state;

pub use characters::*;
pub use patterns::*;
pub use skills::*;
pub use world_state::*;
