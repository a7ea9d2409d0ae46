use mazeworld_common::{EntityId, GridPos};
use mazeworld_engine::{Behavior, Engine, Entity};
use mazeworld_render::Renderer;
use std::f32::consts::{PI, TAU};

/// Read-only queries against a running engine for debugging and
/// development output.
pub struct EngineInspector;

impl EngineInspector {
    /// Produce a summary of the engine state.
    pub fn summary<R: Renderer>(engine: &Engine<R>) -> EngineSummary {
        let time = engine.time();
        let progress = engine.assets().progress();
        EngineSummary {
            frame: time.frame,
            elapsed: time.elapsed,
            started: engine.is_started(),
            intro_scale: engine.intro_scale(),
            entity_count: engine.entities().len(),
            scene_roots: engine.scene().roots().count(),
            assets_loaded: progress.loaded,
            assets_total: progress.total,
            maze_size: (engine.maze().width(), engine.maze().height()),
            fps: engine.frame_stats().fps(),
        }
    }

    pub fn inspect_entity<R: Renderer>(engine: &Engine<R>, id: EntityId) -> Option<EntityInfo> {
        engine.entity(id).map(EntityInfo::of)
    }

    /// List all entity ids in creation order.
    pub fn list_entities<R: Renderer>(engine: &Engine<R>) -> Vec<EntityId> {
        engine.entities().iter().map(Entity::id).collect()
    }
}

/// Summary of engine state for the inspector.
#[derive(Debug, Clone)]
pub struct EngineSummary {
    pub frame: u64,
    pub elapsed: f64,
    pub started: bool,
    pub intro_scale: f32,
    pub entity_count: usize,
    pub scene_roots: usize,
    pub assets_loaded: usize,
    pub assets_total: usize,
    pub maze_size: (usize, usize),
    pub fps: f32,
}

impl std::fmt::Display for EngineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Engine: frame={} elapsed={:.2}s started={} intro={:.2} entities={} roots={} assets={}/{} maze={}x{} fps={:.1}",
            self.frame,
            self.elapsed,
            self.started,
            self.intro_scale,
            self.entity_count,
            self.scene_roots,
            self.assets_loaded,
            self.assets_total,
            self.maze_size.0,
            self.maze_size.1,
            self.fps
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub kind: String,
    pub grid: GridPos,
    pub position: [f32; 3],
    pub yaw: f32,
    pub scripts: Vec<String>,
}

impl EntityInfo {
    fn of(entity: &Entity) -> Self {
        let t = &entity.state.transform;
        Self {
            id: entity.id(),
            name: entity.state.name.clone(),
            kind: entity.kind.label().to_string(),
            grid: entity.state.grid_position(),
            position: t.position.to_array(),
            yaw: t.rotation.y,
            scripts: entity.scripts.iter().map(|s| s.label().to_string()).collect(),
        }
    }

    pub fn facing(&self) -> &'static str {
        cardinal_name(self.yaw)
    }
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity {} {} [{}] cell={} pos=({:.2}, {:.2}, {:.2}) facing={}",
            self.id,
            self.name,
            self.kind,
            self.grid,
            self.position[0],
            self.position[1],
            self.position[2],
            self.facing()
        )?;
        if !self.scripts.is_empty() {
            write!(f, " scripts={}", self.scripts.join(","))?;
        }
        Ok(())
    }
}

/// Compass name of a yaw in radians. Yaw 0 faces +y (North) and increases
/// counter-clockwise, so π/2 is West.
pub fn cardinal_name(yaw: f32) -> &'static str {
    let yaw = yaw.rem_euclid(TAU);
    if yaw < PI * 0.25 || yaw > PI * 1.75 {
        "North"
    } else if yaw < PI * 0.75 {
        "West"
    } else if yaw < PI * 1.25 {
        "South"
    } else {
        "East"
    }
}
