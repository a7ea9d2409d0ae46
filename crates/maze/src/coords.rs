//! Conversion between world space and grid space.
//!
//! World X grows with grid x; world Z grows *against* grid y, so the maze
//! extends into negative Z. Cell `(x, y)` covers world
//! `[x * CELL_SIDE, (x + 1) * CELL_SIDE)` on X and
//! `(-(y + 1) * CELL_SIDE, -y * CELL_SIDE]` on Z.

use glam::{Vec2, Vec3};
use mazeworld_common::GridPos;

/// Side length of one maze cell in world units.
pub const CELL_SIDE: f32 = 320.0;
pub const HALF_SIDE: f32 = CELL_SIDE * 0.5;
const INV_SIDE: f32 = 1.0 / CELL_SIDE;

/// World-space centre of a (possibly fractional) grid coordinate, on the floor.
pub fn grid_to_world(x: f32, y: f32) -> Vec3 {
    Vec3::new(HALF_SIDE + x * CELL_SIDE, 0.0, -HALF_SIDE - y * CELL_SIDE)
}

/// The grid cell containing a world position.
pub fn world_to_grid(position: Vec3) -> GridPos {
    world_to_cell_fraction(position).0
}

/// The containing cell plus the position inside it, each axis in `[0, 1)`.
/// The in-cell y fraction grows toward the cell's top (up) edge.
pub fn world_to_cell_fraction(position: Vec3) -> (GridPos, Vec2) {
    let x_div = position.x * INV_SIDE;
    let y_div = -position.z * INV_SIDE;
    let cell_x = x_div.floor();
    let cell_y = y_div.floor();
    (
        GridPos::new(cell_x as i32, cell_y as i32),
        Vec2::new(x_div - cell_x, y_div - cell_y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_to_world_hits_cell_centre() {
        let p = grid_to_world(2.0, 3.0);
        assert_eq!(p, Vec3::new(2.5 * CELL_SIDE, 0.0, -3.5 * CELL_SIDE));
        assert_eq!(world_to_grid(p), GridPos::new(2, 3));
    }

    #[test]
    fn fraction_is_relative_to_bottom_left() {
        let (cell, frac) = world_to_cell_fraction(Vec3::new(32.0, 0.0, -288.0));
        assert_eq!(cell, GridPos::new(0, 0));
        assert!((frac.x - 0.1).abs() < 1e-6);
        assert!((frac.y - 0.9).abs() < 1e-6);
    }

    #[test]
    fn negative_world_maps_off_grid() {
        assert_eq!(world_to_grid(Vec3::new(-1.0, 0.0, 1.0)), GridPos::new(-1, -1));
    }
}
