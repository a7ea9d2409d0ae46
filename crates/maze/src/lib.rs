//! Maze kernel: the cell grid and the algorithms that walk it.
//!
//! # Invariants
//! - Adjacency is symmetric: if A links right to B, B links left to A.
//! - A cell links in a direction iff its wall flag in that direction is false.
//! - Out-of-range lookups are "no cell", never a panic; traversal probes the
//!   grid edge routinely.
//! - Cells are created with the grid and never destroyed. Gameplay only
//!   mutates the lighting scratch and the pathfinding marker.

pub mod cell;
pub mod collision;
pub mod coords;
pub mod direction;
pub mod generate;
pub mod grid;
pub mod light;
pub mod path;

pub use cell::{Cell, CornerLighting, Walls};
pub use collision::WALL_COLLISION_DIST;
pub use coords::{CELL_SIDE, HALF_SIDE, grid_to_world, world_to_cell_fraction, world_to_grid};
pub use direction::Direction;
pub use generate::carve;
pub use grid::{MazeError, MazeGrid};
pub use light::LIGHT_DECAY;

pub fn crate_info() -> &'static str {
    "mazeworld-maze v0.1.0"
}
