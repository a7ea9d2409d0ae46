//! The entity variants a scene is built from, and the prefabs that build
//! them.

use crate::EngineError;
use crate::behavior::Behavior;
use crate::context::TickContext;
use crate::entity::{Entity, EntityState};
use crate::script::{
    CellAlphaReceiver, FourCornerLightReceiver, Script, SingleLightReceiver, Spin,
};
use glam::Vec3;
use mazeworld_assets::{AssetRegistry, ShaderKind};
use mazeworld_common::{EntityId, GridPos};
use mazeworld_maze::{CELL_SIDE, Direction, HALF_SIDE, MazeGrid, grid_to_world};
use mazeworld_render::VisualNode;
use std::f32::consts::FRAC_PI_2;
use std::fmt;

/// Follows a target entity at eye height, matching its yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub target: Option<EntityId>,
    pub eye_height: f32,
}

impl CameraRig {
    pub fn following(target: Option<EntityId>) -> Self {
        Self {
            target,
            eye_height: HALF_SIDE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarbleState {
    Idle,
    Shrinking,
}

/// Decorative prop that shrinks away once the player reaches its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marble {
    pub state: MarbleState,
}

const MARBLE_SHRINK_RATE: f32 = 0.1;

impl Marble {
    fn update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        match self.state {
            MarbleState::Idle => {
                let here = entity.grid_position();
                if ctx.player_state().map(EntityState::grid_position) == Some(here) {
                    tracing::debug!(id = %entity.id(), %here, "player reached marble");
                    self.state = MarbleState::Shrinking;
                }
            }
            MarbleState::Shrinking => {
                let scale = &mut entity.transform.scale.y;
                *scale -= MARBLE_SHRINK_RATE * ctx.time.delta;
                if *scale < 0.0 {
                    *scale = 0.0;
                    entity.destroy();
                }
            }
        }
        ctx.debug_note(entity.name.clone(), format!("{:?}", self.state));
    }
}

/// Every kind of entity the engine runs.
pub enum EntityKind {
    Player,
    Camera(CameraRig),
    Floor,
    Ceiling,
    /// The maze walls.
    Walls,
    Marble(Marble),
    /// Clears the light map before anything runs and fills corner lighting
    /// once every source has run.
    LightManager,
    /// Named grouping with no behaviour of its own.
    SceneRoot,
    Custom(Box<dyn Behavior>),
}

impl EntityKind {
    pub fn is_camera(&self) -> bool {
        matches!(self, EntityKind::Camera(_))
    }
}

impl Behavior for EntityKind {
    fn pre_update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        match self {
            EntityKind::LightManager => ctx.maze.clear_lighting(),
            EntityKind::Custom(b) => b.pre_update(entity, ctx),
            _ => {}
        }
    }

    fn update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        match self {
            EntityKind::Marble(marble) => marble.update(entity, ctx),
            EntityKind::Custom(b) => b.update(entity, ctx),
            _ => {}
        }
    }

    fn update2(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        match self {
            EntityKind::LightManager => ctx.maze.compute_corner_lighting(),
            EntityKind::Custom(b) => b.update2(entity, ctx),
            _ => {}
        }
    }

    fn late_update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        match self {
            EntityKind::Camera(rig) => {
                let Some(target) = rig.target.and_then(|id| ctx.others.get(id)) else {
                    return;
                };
                let p = target.transform.position;
                entity.transform.position = Vec3::new(p.x, rig.eye_height, p.z);
                entity.transform.rotation = Vec3::new(0.0, target.transform.rotation.y, 0.0);
            }
            EntityKind::Custom(b) => b.late_update(entity, ctx),
            _ => {}
        }
    }

    fn label(&self) -> &str {
        match self {
            EntityKind::Player => "Player",
            EntityKind::Camera(_) => "Camera",
            EntityKind::Floor => "Floor",
            EntityKind::Ceiling => "Ceiling",
            EntityKind::Walls => "Walls",
            EntityKind::Marble(_) => "Marble",
            EntityKind::LightManager => "LightManager",
            EntityKind::SceneRoot => "SceneRoot",
            EntityKind::Custom(b) => b.label(),
        }
    }
}

/// Recipe for a new entity. The engine builds it with a fresh id.
pub enum Prefab {
    Player,
    Camera { target: Option<EntityId> },
    Floor,
    Ceiling,
    Walls,
    Marble { x: i32, y: i32 },
    LightManager,
    SceneRoot { name: String },
    Custom {
        name: String,
        root: Option<VisualNode>,
        behavior: Box<dyn Behavior>,
    },
}

impl fmt::Debug for Prefab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefab::Player => f.write_str("Player"),
            Prefab::Camera { target } => f.debug_struct("Camera").field("target", target).finish(),
            Prefab::Floor => f.write_str("Floor"),
            Prefab::Ceiling => f.write_str("Ceiling"),
            Prefab::Walls => f.write_str("Walls"),
            Prefab::Marble { x, y } => f.debug_struct("Marble").field("x", x).field("y", y).finish(),
            Prefab::LightManager => f.write_str("LightManager"),
            Prefab::SceneRoot { name } => f.debug_struct("SceneRoot").field("name", name).finish(),
            Prefab::Custom { name, behavior, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("behavior", &behavior.label())
                .finish_non_exhaustive(),
        }
    }
}

impl Prefab {
    /// Build the entity. Fails if an asset it needs is missing or not
    /// loaded yet.
    pub(crate) fn build(
        self,
        id: EntityId,
        assets: &AssetRegistry,
        maze: &MazeGrid,
    ) -> Result<Entity, EngineError> {
        let entity = match self {
            Prefab::Player => {
                let mut state = EntityState::new(id, "Player");
                state.set_root(VisualNode::group("Player"));
                state.transform.position = grid_to_world(0.0, 0.0);
                state.scale_with_global_y = false;
                Entity::new(state, EntityKind::Player)
            }
            Prefab::Camera { target } => Entity::new(
                EntityState::new(id, "Camera"),
                EntityKind::Camera(CameraRig::following(target)),
            ),
            Prefab::Floor => {
                let mut state = EntityState::new(id, "Floor");
                state.set_root(surface(assets, maze, "floor", 0.0, -FRAC_PI_2)?);
                state.scale_with_global_y = false;
                let mut entity = Entity::new(state, EntityKind::Floor);
                entity.scripts.extend(surface_receiver(assets.image_shader(), false));
                entity
            }
            Prefab::Ceiling => {
                let mut state = EntityState::new(id, "Ceiling");
                state.set_root(surface(assets, maze, "ceiling", CELL_SIDE, FRAC_PI_2)?);
                let mut entity = Entity::new(state, EntityKind::Ceiling);
                entity.scripts.extend(surface_receiver(assets.image_shader(), true));
                entity
            }
            Prefab::Walls => {
                let mut state = EntityState::new(id, "Maze");
                state.set_root(walls(assets, maze)?);
                let mut entity = Entity::new(state, EntityKind::Walls);
                if assets.image_shader() != ShaderKind::Standard {
                    entity.scripts.push(Script::SingleLightReceiver(SingleLightReceiver));
                }
                entity
            }
            Prefab::Marble { x, y } => {
                let mut state = EntityState::new(id, format!("MarbleTest{}", id.0));
                state.set_root(assets.instantiate("marbletest")?);
                state.transform.position = grid_to_world(x as f32, y as f32);
                state.transform.scale = Vec3::splat(3.0);
                let mut entity = Entity::new(
                    state,
                    EntityKind::Marble(Marble {
                        state: MarbleState::Idle,
                    }),
                );
                entity.scripts.push(Script::Spin(Spin {
                    speed: (x + y + 1) as f32,
                }));
                entity
                    .scripts
                    .push(Script::CellAlphaReceiver(CellAlphaReceiver::default()));
                entity
            }
            Prefab::LightManager => {
                Entity::new(EntityState::new(id, "LightManager"), EntityKind::LightManager)
            }
            Prefab::SceneRoot { name } => {
                Entity::new(EntityState::new(id, name), EntityKind::SceneRoot)
            }
            Prefab::Custom {
                name,
                root,
                behavior,
            } => {
                let mut state = EntityState::new(id, name);
                if let Some(root) = root {
                    state.set_root(root);
                }
                Entity::new(state, EntityKind::Custom(behavior))
            }
        };
        Ok(entity)
    }
}

/// The light receiver matching the shader image tiles were built with.
fn surface_receiver(shader: ShaderKind, flip_vertical: bool) -> Option<Script> {
    match shader {
        ShaderKind::FourCornerLit => Some(Script::FourCornerLightReceiver(
            FourCornerLightReceiver { flip_vertical },
        )),
        ShaderKind::SingleLit => Some(Script::SingleLightReceiver(SingleLightReceiver)),
        ShaderKind::Standard => None,
    }
}

/// One horizontal tile per cell at height `y`, tilted by `tilt` about X.
fn surface(
    assets: &AssetRegistry,
    maze: &MazeGrid,
    asset: &str,
    y: f32,
    tilt: f32,
) -> Result<VisualNode, EngineError> {
    let mut root = VisualNode::group(asset);
    for cell in maze.cells() {
        let pos = cell.pos();
        let mut tile = assets.instantiate(asset)?;
        let centre = grid_to_world(pos.x as f32, pos.y as f32);
        tile.transform.position = Vec3::new(centre.x, y, centre.z);
        tile.transform.rotation.x = tilt;
        tile.transform.scale = Vec3::new(CELL_SIDE, CELL_SIDE, 1.0);
        tile.cell = Some(pos);
        root.children.push(tile);
    }
    Ok(root)
}

/// Wall tiles: every cell's top and right walls, plus the bottom and left
/// walls along the grid edge.
fn walls(assets: &AssetRegistry, maze: &MazeGrid) -> Result<VisualNode, EngineError> {
    let mut root = VisualNode::group("Maze");
    for cell in maze.cells() {
        let pos = cell.pos();
        let x0 = pos.x as f32 * CELL_SIDE;
        let z0 = -(pos.y as f32) * CELL_SIDE;
        let mut sides = vec![Direction::Up, Direction::Right];
        if pos.y == 0 {
            sides.push(Direction::Down);
        }
        if pos.x == 0 {
            sides.push(Direction::Left);
        }
        for dir in sides {
            if !cell.has_wall(dir) {
                continue;
            }
            let (position, yaw) = match dir {
                Direction::Up => (Vec3::new(x0 + HALF_SIDE, HALF_SIDE, z0 - CELL_SIDE), 0.0),
                Direction::Down => (Vec3::new(x0 + HALF_SIDE, HALF_SIDE, z0), 0.0),
                Direction::Right => (Vec3::new(x0 + CELL_SIDE, HALF_SIDE, z0 - HALF_SIDE), FRAC_PI_2),
                Direction::Left => (Vec3::new(x0, HALF_SIDE, z0 - HALF_SIDE), FRAC_PI_2),
            };
            root.children.push(wall_tile(assets, pos, position, yaw)?);
        }
    }
    Ok(root)
}

fn wall_tile(
    assets: &AssetRegistry,
    cell: GridPos,
    position: Vec3,
    yaw: f32,
) -> Result<VisualNode, EngineError> {
    let mut tile = assets.instantiate("wall")?;
    tile.transform.position = position;
    tile.transform.rotation.y = yaw;
    tile.transform.scale = Vec3::new(CELL_SIDE, CELL_SIDE, 1.0);
    tile.cell = Some(cell);
    Ok(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazeworld_assets::{AssetKind, BuiltinLoader};

    fn loaded_assets(shader: ShaderKind) -> AssetRegistry {
        let mut assets = AssetRegistry::new(".", Box::new(BuiltinLoader::new()));
        assets.set_image_shader(shader);
        assets.register_defaults();
        assets.poll();
        assert!(assets.all_loaded());
        assets
    }

    fn build(prefab: Prefab, assets: &AssetRegistry, maze: &MazeGrid) -> Entity {
        prefab.build(EntityId(7), assets, maze).unwrap()
    }

    fn root_of(entity: &Entity) -> &VisualNode {
        match entity.state.root_slot() {
            crate::entity::RootSlot::Detached(node) => node,
            other => panic!("expected detached root, got {other:?}"),
        }
    }

    #[test]
    fn floor_has_one_tile_per_cell() {
        let assets = loaded_assets(ShaderKind::FourCornerLit);
        let maze = MazeGrid::new(3, 2);
        let floor = build(Prefab::Floor, &assets, &maze);

        let root = root_of(&floor);
        assert_eq!(root.children.len(), 6);
        let last = &root.children[5];
        assert_eq!(last.cell, Some(GridPos::new(2, 1)));
        assert_eq!(last.transform.position, Vec3::new(800.0, 0.0, -480.0));
        assert_eq!(last.transform.rotation.x, -FRAC_PI_2);
        assert!(!floor.state.scale_with_global_y);
        assert_eq!(floor.scripts.len(), 1);
        assert_eq!(floor.scripts[0].label(), "FourCornerLightReceiver");
    }

    #[test]
    fn ceiling_receiver_follows_shader() {
        let maze = MazeGrid::new(1, 1);
        let single = build(Prefab::Ceiling, &loaded_assets(ShaderKind::SingleLit), &maze);
        assert_eq!(single.scripts[0].label(), "SingleLightReceiver");
        assert_eq!(root_of(&single).children[0].transform.position.y, CELL_SIDE);

        let standard = build(Prefab::Ceiling, &loaded_assets(ShaderKind::Standard), &maze);
        assert!(standard.scripts.is_empty());
    }

    #[test]
    fn secluded_cell_gets_four_walls_and_open_grid_only_the_boundary() {
        let assets = loaded_assets(ShaderKind::FourCornerLit);
        let walls = build(Prefab::Walls, &assets, &MazeGrid::new(1, 1));
        assert_eq!(root_of(&walls).children.len(), 4);
        assert_eq!(walls.state.name, "Maze");

        // 2x2 open grid: 2 top + 2 right + 2 bottom + 2 left
        let open = build(Prefab::Walls, &assets, &MazeGrid::open(2, 2));
        assert_eq!(root_of(&open).children.len(), 8);
    }

    #[test]
    fn marble_is_named_scaled_and_scripted() {
        let assets = loaded_assets(ShaderKind::FourCornerLit);
        let marble = build(Prefab::Marble { x: 1, y: 2 }, &assets, &MazeGrid::new(3, 3));
        assert_eq!(marble.state.name, "MarbleTest7");
        assert_eq!(marble.state.transform.scale, Vec3::splat(3.0));
        assert_eq!(marble.state.grid_position(), GridPos::new(1, 2));
        let labels: Vec<_> = marble.scripts.iter().map(|s| s.label().to_string()).collect();
        assert_eq!(labels, ["Spin", "CellAlphaReceiver"]);
        match &marble.scripts[0] {
            Script::Spin(spin) => assert_eq!(spin.speed, 4.0),
            _ => panic!("expected spin"),
        }
    }

    #[test]
    fn missing_asset_fails_the_build() {
        let mut assets = AssetRegistry::new(".", Box::new(BuiltinLoader::new().with_latency(5)));
        assets.register("floor", "floor.png", AssetKind::Image);
        let err = Prefab::Floor
            .build(EntityId(0), &assets, &MazeGrid::new(1, 1))
            .unwrap_err();
        assert!(matches!(err, EngineError::Asset(_)));
    }

    #[test]
    fn player_starts_in_the_first_cell() {
        let assets = loaded_assets(ShaderKind::FourCornerLit);
        let player = build(Prefab::Player, &assets, &MazeGrid::new(2, 2));
        assert_eq!(player.state.grid_position(), GridPos::new(0, 0));
        assert!(!player.state.scale_with_global_y);
        assert!(player.state.has_root());
    }
}
