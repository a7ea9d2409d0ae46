//! Engine: owns the maze, the entities and their scripts, the render scene
//! and the asset registry, and drives them through phased ticks.
//!
//! # Invariants
//! - Every phase runs over the whole live entity set before the next phase
//!   starts.
//! - A destroyed entity stays live until the sweep at the start of the next
//!   tick; its visual root is still drawn in the tick that destroyed it.
//! - Entities spawned during a tick join after the late phases and are
//!   attached to the scene on the following tick.
//! - `intro_scale` only grows, and never past 1.0.
//! - Ticking is refused until every registered asset has loaded.

pub mod behavior;
pub mod config;
pub mod context;
pub mod debug;
pub mod engine;
pub mod entity;
pub mod host;
pub mod kinds;
pub mod scenes;
pub mod script;
pub mod time;

use mazeworld_assets::{AssetError, LoadProgress};
use mazeworld_common::EntityId;
use mazeworld_maze::MazeError;
use std::time::Duration;

pub use behavior::Behavior;
pub use config::{EngineConfig, LaunchOptions, LoadFailurePolicy, LoadingHooks};
pub use context::{Commands, Others, TickContext};
pub use debug::{EntitySnapshot, Inspector};
pub use engine::Engine;
pub use entity::{Entity, EntityState, Phase, RootSlot};
pub use host::{FixedStepHost, FrameHost};
pub use kinds::{CameraRig, EntityKind, Marble, MarbleState, Prefab};
pub use scenes::{SinglePlayerScene, load_single_player_test};
pub use script::{
    AutoRunner, CellAlphaReceiver, CellLightSource, FourCornerLightReceiver, RunMode, Script,
    SingleLightReceiver, Spin,
};
pub use time::{FrameClock, FrameTime, FrameTimer};

/// How often a host polls the asset loader while the gate is closed.
pub const ASSET_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine has not been started")]
    NotStarted,
    #[error("assets still loading ({0})")]
    AssetsPending(LoadProgress),
    #[error("asset {name} failed to load after {attempts} attempt(s): {reason}")]
    AssetLoad {
        name: String,
        attempts: u32,
        reason: String,
    },
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("entity {id} has no {script} script")]
    MissingScript { id: EntityId, script: &'static str },
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub fn crate_info() -> &'static str {
    "mazeworld-engine v0.1.0"
}
