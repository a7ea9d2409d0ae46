use mazeworld_common::GridPos;
use serde::{Deserialize, Serialize};

/// One of the four cardinal grid directions. `Up` is +y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in traversal priority order: above, below, left, right.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Grid offset `(dx, dy)` of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// The position one step from `pos`. May be off-grid.
    pub fn step(self, pos: GridPos) -> GridPos {
        let (dx, dy) = self.offset();
        GridPos::new(pos.x + dx, pos.y + dy)
    }

    /// The direction leading from `from` to `to`, if they are direct neighbours.
    pub fn between(from: GridPos, to: GridPos) -> Option<Self> {
        let dx = to.x.checked_sub(from.x)?;
        let dy = to.y.checked_sub(from.y)?;
        match (dx, dy) {
            (0, 1) => Some(Self::Up),
            (0, -1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}
