use crate::debug::Inspector;
use crate::entity::{Entity, EntityState};
use crate::kinds::Prefab;
use crate::time::FrameTime;
use glam::Vec3;
use mazeworld_assets::AssetRegistry;
use mazeworld_common::EntityId;
use mazeworld_maze::MazeGrid;
use mazeworld_render::Scene;
use std::fmt;

/// Everything a behaviour may touch while the engine runs one entity's hook.
pub struct TickContext<'a> {
    pub maze: &'a mut MazeGrid,
    pub scene: &'a mut Scene,
    pub assets: &'a AssetRegistry,
    pub time: FrameTime,
    /// Intro ramp in `[0, 1]`.
    pub intro_scale: f32,
    /// Every live entity except the one being run.
    pub others: Others<'a>,
    pub commands: &'a mut Commands,
    pub inspector: Option<&'a mut Inspector>,
    pub noclip: bool,
    /// The player entity, once one exists.
    pub player: Option<EntityId>,
}

impl TickContext<'_> {
    /// Wall proximity at a world position. Always false under noclip.
    pub fn is_colliding_with_walls(&self, position: Vec3) -> bool {
        !self.noclip && self.maze.is_near_wall(position)
    }

    /// The player's state, when the running entity is not the player itself.
    pub fn player_state(&self) -> Option<&EntityState> {
        self.player.and_then(|id| self.others.get(id))
    }

    /// Record a value on the inspector, if inspection is on.
    pub fn debug_note(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        if let Some(inspector) = self.inspector.as_deref_mut() {
            inspector.note(key, value.to_string());
        }
    }
}

/// Read-only view of the entities around the one being run.
#[derive(Clone, Copy)]
pub struct Others<'a> {
    pub(crate) before: &'a [Entity],
    pub(crate) after: &'a [Entity],
}

impl<'a> Others<'a> {
    pub fn get(&self, id: EntityId) -> Option<&'a EntityState> {
        self.iter().find(|s| s.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&'a EntityState> {
        self.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EntityState> + 'a {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(|e| &e.state)
    }

    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Structural changes requested from inside a tick. Applied after the late
/// phases.
#[derive(Debug, Default)]
pub struct Commands {
    next_id: u64,
    spawns: Vec<(EntityId, Prefab)>,
    destroys: Vec<EntityId>,
}

impl Commands {
    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Queue a new entity. Its id is reserved immediately.
    pub fn instantiate(&mut self, prefab: Prefab) -> EntityId {
        let id = self.allocate_id();
        self.spawns.push((id, prefab));
        id
    }

    /// Queue another entity for destruction.
    pub fn destroy(&mut self, id: EntityId) {
        self.destroys.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.destroys.is_empty()
    }

    pub(crate) fn take(&mut self) -> (Vec<(EntityId, Prefab)>, Vec<EntityId>) {
        (
            std::mem::take(&mut self.spawns),
            std::mem::take(&mut self.destroys),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::EntityKind;

    fn entity(id: u64, name: &str) -> Entity {
        Entity::new(EntityState::new(EntityId(id), name), EntityKind::SceneRoot)
    }

    #[test]
    fn others_skip_the_running_entity() {
        let mut all = vec![entity(0, "a"), entity(1, "b"), entity(2, "c")];
        let (before, rest) = all.split_at_mut(1);
        let (_, after) = rest.split_first_mut().unwrap();
        let others = Others {
            before: &*before,
            after: &*after,
        };
        assert_eq!(others.len(), 2);
        assert!(others.get(EntityId(1)).is_none());
        assert_eq!(others.find_by_name("c").map(|s| s.id()), Some(EntityId(2)));
    }

    #[test]
    fn commands_reserve_ids_in_order() {
        let mut commands = Commands::default();
        let a = commands.allocate_id();
        let b = commands.instantiate(Prefab::LightManager);
        commands.destroy(a);
        assert_eq!(b, EntityId(a.0 + 1));
        assert!(!commands.is_empty());
        let (spawns, destroys) = commands.take();
        assert_eq!(spawns.len(), 1);
        assert_eq!(destroys, vec![a]);
        assert!(commands.is_empty());
    }
}
