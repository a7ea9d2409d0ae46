use crate::direction::Direction;
use mazeworld_common::GridPos;
use serde::{Deserialize, Serialize};

/// Wall flags of a cell. `true` means a wall blocks that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Walls {
    /// Every side walled.
    pub const CLOSED: Walls = Walls {
        up: true,
        down: true,
        left: true,
        right: true,
    };

    pub fn has(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub(crate) fn set(&mut self, dir: Direction, wall: bool) {
        match dir {
            Direction::Up => self.up = wall,
            Direction::Down => self.down = wall,
            Direction::Left => self.left = wall,
            Direction::Right => self.right = wall,
        }
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// Per-frame corner brightness used by four-corner shading. `None` until
/// the light manager has computed it this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CornerLighting {
    pub top_left: Option<f32>,
    pub top_right: Option<f32>,
    pub bottom_left: Option<f32>,
    pub bottom_right: Option<f32>,
}

/// A single maze node.
///
/// Links to neighbours are indices into the owning [`crate::MazeGrid`], so a
/// cell never owns another cell.
#[derive(Debug, Clone)]
pub struct Cell {
    pos: GridPos,
    walls: Walls,
    above: Option<usize>,
    below: Option<usize>,
    left_of: Option<usize>,
    right_of: Option<usize>,
    parent: Option<usize>,
    pub(crate) marker: u64,
    /// Brightness reached by light propagation this frame.
    pub light_map_value: f32,
    pub corners: CornerLighting,
}

impl Cell {
    pub(crate) fn new(pos: GridPos) -> Self {
        Self {
            pos,
            walls: Walls::CLOSED,
            above: None,
            below: None,
            left_of: None,
            right_of: None,
            parent: None,
            marker: 0,
            light_map_value: 0.0,
            corners: CornerLighting::default(),
        }
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn x(&self) -> i32 {
        self.pos.x
    }

    pub fn y(&self) -> i32 {
        self.pos.y
    }

    pub fn walls(&self) -> Walls {
        self.walls
    }

    pub fn has_wall(&self, dir: Direction) -> bool {
        self.walls.has(dir)
    }

    /// All four sides walled, so no neighbour is reachable.
    pub fn is_secluded(&self) -> bool {
        Direction::ALL.iter().all(|d| self.walls.has(*d))
    }

    /// Index of the neighbour reachable in `dir`, if no wall is in the way.
    pub fn link(&self, dir: Direction) -> Option<usize> {
        match dir {
            Direction::Up => self.above,
            Direction::Down => self.below,
            Direction::Left => self.left_of,
            Direction::Right => self.right_of,
        }
    }

    /// Index of the cell that carved this one during generation.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// The link towards `(target_x, target_y)` when the target is exactly one
    /// cardinal step away; `None` when it is not a direct neighbour or a wall
    /// is in the way.
    pub fn try_get_connected_cell(&self, target_x: i32, target_y: i32) -> Option<usize> {
        let dir = Direction::between(self.pos, GridPos::new(target_x, target_y))?;
        self.link(dir)
    }

    pub fn clear_lighting(&mut self) {
        self.light_map_value = 0.0;
        self.corners = CornerLighting::default();
    }

    pub(crate) fn set_link(&mut self, dir: Direction, target: Option<usize>) {
        self.walls.set(dir, target.is_none());
        match dir {
            Direction::Up => self.above = target,
            Direction::Down => self.below = target,
            Direction::Left => self.left_of = target,
            Direction::Right => self.right_of = target,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<usize>) {
        self.parent = parent;
    }
}
