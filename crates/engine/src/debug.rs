use crate::behavior::Behavior;
use crate::entity::Entity;
use glam::Vec3;
use mazeworld_common::{EntityId, GridPos};
use std::collections::BTreeMap;
use std::fmt;

/// Point-in-time view of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
    pub kind: String,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: Vec3,
    pub grid: GridPos,
    pub scripts: Vec<String>,
    pub destroyed: bool,
}

impl EntitySnapshot {
    fn of(entity: &Entity) -> Self {
        let state = &entity.state;
        Self {
            id: state.id(),
            name: state.name.clone(),
            kind: entity.kind.label().to_string(),
            position: state.transform.position,
            yaw: state.transform.rotation.y,
            scale: state.transform.scale,
            grid: state.grid_position(),
            scripts: entity.scripts.iter().map(|s| s.label().to_string()).collect(),
            destroyed: state.is_destroyed(),
        }
    }
}

impl fmt::Display for EntitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] cell={} pos=({:.1}, {:.1}, {:.1}) yaw={:.2}",
            self.id,
            self.name,
            self.kind,
            self.grid,
            self.position.x,
            self.position.y,
            self.position.z,
            self.yaw
        )?;
        if !self.scripts.is_empty() {
            write!(f, " scripts={}", self.scripts.join(","))?;
        }
        if self.destroyed {
            write!(f, " (destroyed)")?;
        }
        Ok(())
    }
}

/// Debug view of the running engine: entities by name, refreshed after
/// every tick, plus free-form notes that behaviours leave.
#[derive(Debug, Default)]
pub struct Inspector {
    entities: BTreeMap<String, EntitySnapshot>,
    notes: BTreeMap<String, String>,
    frame: u64,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn refresh(&mut self, entities: &[Entity], frame: u64) {
        self.entities = entities
            .iter()
            .map(|e| (e.state.name.clone(), EntitySnapshot::of(e)))
            .collect();
        self.frame = frame;
    }

    pub fn note(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.notes.insert(key.into(), value.into());
    }

    /// The snapshot of the entity named `name`. Later entities win when
    /// names repeat.
    pub fn entity(&self, name: &str) -> Option<&EntitySnapshot> {
        self.entities.get(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities.values()
    }

    pub fn notes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.notes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn note_value(&self, key: &str) -> Option<&str> {
        self.notes.get(key).map(String::as_str)
    }

    /// Frame number of the last refresh.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityState;
    use crate::kinds::EntityKind;
    use crate::script::{CellLightSource, Script};

    #[test]
    fn refresh_indexes_by_name() {
        let mut player = Entity::new(EntityState::new(EntityId(2), "Player"), EntityKind::Player);
        player.scripts.push(Script::CellLightSource(CellLightSource));
        let root = Entity::new(EntityState::new(EntityId(1), "Scene"), EntityKind::SceneRoot);

        let mut inspector = Inspector::new();
        inspector.refresh(&[root, player], 4);

        let snap = inspector.entity("Player").unwrap();
        assert_eq!(snap.id, EntityId(2));
        assert_eq!(snap.kind, "Player");
        assert_eq!(snap.scripts, ["CellLightSource"]);
        assert_eq!(inspector.entities().count(), 2);
        assert_eq!(inspector.frame(), 4);
        assert!(snap.to_string().contains("scripts=CellLightSource"));
    }

    #[test]
    fn notes_overwrite() {
        let mut inspector = Inspector::new();
        inspector.note("marble", "Idle");
        inspector.note("marble", "Shrinking");
        assert_eq!(inspector.note_value("marble"), Some("Shrinking"));
        assert_eq!(inspector.notes().count(), 1);
    }
}
