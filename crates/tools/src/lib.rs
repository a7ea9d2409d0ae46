//! Developer tooling: ASCII maze views, light-map dumps, engine inspector.
//!
//! # Invariants
//! - Tools only read engine state. Nothing here mutates a running engine.

pub mod ascii;
pub mod inspector;

pub use ascii::{render_light_map, render_maze, render_maze_with};
pub use inspector::{EngineInspector, EngineSummary, EntityInfo, cardinal_name};

pub fn crate_info() -> &'static str {
    "mazeworld-tools v0.1.0"
}
