//! # Narrative Engine
//!
//! The consequence engine of the career story. It reads `story_state`
//! snapshots, decides what a dialogue node shows, and turns each choice into
//! proposed consequences. It never writes world state; the caller applies
//! what it proposes.
//!
//! ## Core Components
//!
//! - **content**: Dialogue graph, choices and the derived-system catalog
//! - **conditions**: Closed set of gating conditions and their evaluator
//! - **navigator**: Picks content variants and visible choices for a node
//! - **systems**: Trust decay, gates, recognition, cascades, combos, revelations, resonance
//! - **pipeline**: Ordered evaluators producing one echo, state deltas and event requests
//! - **engine**: Facade tying a loaded graph, catalog and config together
//!
//! ## Turn Flow
//!
//! 1. `select_content` for the current node
//! 2. The player picks a choice; the caller snapshots `pre`, applies the
//!    choice to get `post`
//! 3. `evaluate_consequences` with both snapshots
//! 4. The caller applies the returned delta, persists dedup keys and runs
//!    the event requests

pub mod conditions;
pub mod config;
pub mod content;
pub mod echo;
pub mod engine;
pub mod error;
pub mod navigator;
pub mod pipeline;
pub mod systems;

pub use conditions::*;
pub use config::*;
pub use content::*;
pub use echo::*;
pub use engine::*;
pub use error::*;
pub use navigator::*;
pub use pipeline::*;
pub use systems::*;
