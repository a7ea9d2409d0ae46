use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an entity, handed out in increasing order by the engine
/// that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, Euler rotation (radians), scale.
///
/// Gameplay only ever drives `rotation.y` (yaw); the other two axes are
/// carried through to the visual root untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Integer maze coordinate. `(0, 0)` is the bottom-left cell, y grows upward.
///
/// Signed so that neighbour probes past the grid edge (`x - 1` at column 0)
/// are representable and simply miss on lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True if `other` is exactly one step away along a single axis.
    pub fn is_adjacent(self, other: GridPos) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn grid_pos_adjacency() {
        let a = GridPos::new(2, 3);
        assert!(a.is_adjacent(GridPos::new(2, 4)));
        assert!(a.is_adjacent(GridPos::new(1, 3)));
        assert!(!a.is_adjacent(GridPos::new(3, 4)));
        assert!(!a.is_adjacent(a));
    }

    #[test]
    fn grid_pos_manhattan_handles_negative() {
        assert_eq!(GridPos::new(-1, 0).manhattan(GridPos::new(2, 2)), 5);
    }

    #[test]
    fn entity_id_orders_by_value() {
        assert!(EntityId(1) < EntityId(2));
        assert_eq!(format!("{}", EntityId(7)), "#7");
    }
}
