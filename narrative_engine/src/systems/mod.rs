//! Derived-system library.
//!
//! Each module owns one concern and is a set of pure functions over world
//! snapshots. The consequence pipeline composes them; none of them writes
//! state.

mod cascades;
mod meta_narrative;
mod pattern_gates;
mod recognition;
mod resonance;
mod skill_combos;
pub mod trust_decay;

pub use cascades::*;
pub use meta_narrative::*;
pub use pattern_gates::*;
pub use recognition::*;
pub use resonance::*;
pub use skill_combos::*;
