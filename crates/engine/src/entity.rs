use crate::behavior::Behavior;
use crate::context::TickContext;
use crate::kinds::EntityKind;
use crate::script::Script;
use glam::Vec3;
use mazeworld_common::{EntityId, GridPos, Transform};
use mazeworld_maze::{CELL_SIDE, HALF_SIDE, world_to_grid};
use mazeworld_render::{Scene, VisualId, VisualNode};

/// Where an entity's visual root currently lives.
#[derive(Debug, Default)]
pub enum RootSlot {
    #[default]
    None,
    /// Built but not yet in the scene.
    Detached(VisualNode),
    /// Owned by the scene.
    Attached(VisualId),
}

/// The data every entity carries, independent of its kind.
#[derive(Debug)]
pub struct EntityState {
    id: EntityId,
    pub name: String,
    pub transform: Transform,
    /// Position at the start of this tick's update phase.
    pub last_position: Vec3,
    /// Whether the intro ramp multiplies this entity's Y scale.
    pub scale_with_global_y: bool,
    root: RootSlot,
    added_to_scene: bool,
    destroyed: bool,
}

impl EntityState {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transform: Transform::default(),
            last_position: Vec3::ZERO,
            scale_with_global_y: true,
            root: RootSlot::None,
            added_to_scene: false,
            destroyed: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Mark for removal. The entity stays live until the next tick's sweep.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            tracing::debug!(id = %self.id, name = %self.name, "entity marked destroyed");
        }
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn added_to_scene(&self) -> bool {
        self.added_to_scene
    }

    pub fn has_root(&self) -> bool {
        !matches!(self.root, RootSlot::None)
    }

    pub fn root_slot(&self) -> &RootSlot {
        &self.root
    }

    /// Give the entity a visual root. Replacing an attached root is not
    /// supported; the new root is dropped with a warning.
    pub fn set_root(&mut self, root: VisualNode) {
        if let RootSlot::Attached(_) = self.root {
            tracing::warn!(id = %self.id, "visual root already attached; ignoring replacement");
            return;
        }
        self.root = RootSlot::Detached(root);
    }

    /// The visual root, wherever it lives.
    pub fn root_mut<'s>(&'s mut self, scene: &'s mut Scene) -> Option<&'s mut VisualNode> {
        match &mut self.root {
            RootSlot::None => None,
            RootSlot::Detached(node) => Some(node),
            RootSlot::Attached(id) => scene.get_mut(*id),
        }
    }

    pub fn root<'s>(&'s self, scene: &'s Scene) -> Option<&'s VisualNode> {
        match &self.root {
            RootSlot::None => None,
            RootSlot::Detached(node) => Some(node),
            RootSlot::Attached(id) => scene.get(*id),
        }
    }

    /// Move a detached root into the scene. Returns true if one was added.
    pub(crate) fn attach(&mut self, scene: &mut Scene) -> bool {
        match std::mem::take(&mut self.root) {
            RootSlot::Detached(node) => {
                self.root = RootSlot::Attached(scene.add(node));
                self.added_to_scene = true;
                true
            }
            other => {
                self.root = other;
                false
            }
        }
    }

    /// Take the root back out of the scene, if it is there.
    pub(crate) fn detach(&mut self, scene: &mut Scene) {
        if let RootSlot::Attached(id) = self.root {
            scene.remove(id);
            self.root = RootSlot::None;
        }
    }

    /// Copy the transform into the visual root. `y_scale` multiplies the Y
    /// scale when the entity follows the intro ramp.
    pub(crate) fn commit_transform(&mut self, scene: &mut Scene, y_scale: f32) {
        let mut transform = self.transform;
        if self.scale_with_global_y {
            transform.scale.y *= y_scale;
        }
        if let Some(root) = self.root_mut(scene) {
            root.transform = transform;
        }
    }

    /// The grid cell the entity stands in.
    pub fn grid_position(&self) -> GridPos {
        world_to_grid(self.transform.position)
    }

    /// Place the entity over a (possibly fractional) grid coordinate,
    /// leaving its height alone.
    pub fn set_position_from_grid(&mut self, x: f32, y: f32) {
        self.transform.position.x = x * CELL_SIDE + HALF_SIDE;
        self.transform.position.z = -y * CELL_SIDE - HALF_SIDE;
    }
}

/// Lifecycle phases, in the order the engine runs them each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreUpdate,
    PreUpdateScripts,
    Update,
    UpdateScripts,
    Update2,
    UpdateScripts2,
    LateUpdate,
    LateUpdateScripts,
}

impl Phase {
    /// Phases before the transform commit.
    pub const EARLY: [Phase; 6] = [
        Phase::PreUpdate,
        Phase::PreUpdateScripts,
        Phase::Update,
        Phase::UpdateScripts,
        Phase::Update2,
        Phase::UpdateScripts2,
    ];

    /// Phases after the transform commit.
    pub const LATE: [Phase; 2] = [Phase::LateUpdate, Phase::LateUpdateScripts];
}

/// A live actor: shared state, its kind's behaviour and its scripts.
pub struct Entity {
    pub state: EntityState,
    pub kind: EntityKind,
    pub scripts: Vec<Script>,
}

impl Entity {
    pub fn new(state: EntityState, kind: EntityKind) -> Self {
        Self {
            state,
            kind,
            scripts: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.state.id
    }

    pub(crate) fn run(&mut self, phase: Phase, ctx: &mut TickContext<'_>) {
        let state = &mut self.state;
        match phase {
            Phase::PreUpdate => self.kind.pre_update(state, ctx),
            Phase::PreUpdateScripts => {
                for script in &mut self.scripts {
                    script.pre_update(state, ctx);
                }
            }
            Phase::Update => {
                state.last_position = state.transform.position;
                self.kind.update(state, ctx);
            }
            Phase::UpdateScripts => {
                for script in &mut self.scripts {
                    script.update(state, ctx);
                }
            }
            Phase::Update2 => self.kind.update2(state, ctx),
            Phase::UpdateScripts2 => {
                for script in &mut self.scripts {
                    script.update2(state, ctx);
                }
            }
            Phase::LateUpdate => self.kind.late_update(state, ctx),
            Phase::LateUpdateScripts => {
                for script in &mut self.scripts {
                    script.late_update(state, ctx);
                }
            }
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("state", &self.state)
            .field("kind", &self.kind.label())
            .field("scripts", &self.scripts.iter().map(Script::label).collect::<Vec<_>>())
            .finish()
    }
}
