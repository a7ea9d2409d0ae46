use crate::coords::world_to_cell_fraction;
use crate::grid::MazeGrid;
use glam::Vec3;

/// How close (as a fraction of a cell) a point may get to a walled edge.
pub const WALL_COLLISION_DIST: f32 = 0.1;
const FAR_EDGE: f32 = 1.0 - WALL_COLLISION_DIST;

impl MazeGrid {
    /// True when `position` lies within [`WALL_COLLISION_DIST`] of a walled
    /// edge of the cell containing it. Positions off the grid never collide.
    pub fn is_near_wall(&self, position: Vec3) -> bool {
        let (pos, frac) = world_to_cell_fraction(position);
        let Some(cell) = self.get(pos) else {
            return false;
        };
        let walls = cell.walls();
        (walls.left && frac.x < WALL_COLLISION_DIST)
            || (walls.right && frac.x > FAR_EDGE)
            || (walls.up && frac.y > FAR_EDGE)
            || (walls.down && frac.y < WALL_COLLISION_DIST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CELL_SIDE, grid_to_world};
    use mazeworld_common::GridPos;

    fn at(x: f32, y: f32) -> Vec3 {
        // x, y are grid units; (0.5, 0.5) is the centre of cell (0, 0)
        Vec3::new(x * CELL_SIDE, 0.0, -y * CELL_SIDE)
    }

    #[test]
    fn centre_of_cell_is_clear() {
        let grid = MazeGrid::new(2, 2);
        assert!(!grid.is_near_wall(grid_to_world(0.0, 0.0)));
    }

    #[test]
    fn near_each_walled_edge_collides() {
        let grid = MazeGrid::new(1, 1);
        assert!(grid.is_near_wall(at(0.05, 0.5)));
        assert!(grid.is_near_wall(at(0.95, 0.5)));
        assert!(grid.is_near_wall(at(0.5, 0.95)));
        assert!(grid.is_near_wall(at(0.5, 0.05)));
    }

    #[test]
    fn open_edges_do_not_collide() {
        let grid = MazeGrid::open(3, 3);
        // centre cell has no walls at all
        assert!(!grid.is_near_wall(at(1.02, 1.5)));
        assert!(!grid.is_near_wall(at(1.98, 1.5)));
        assert!(!grid.is_near_wall(at(1.5, 1.98)));
        assert!(!grid.is_near_wall(at(1.5, 1.02)));
        // boundary cell keeps its outer wall
        assert!(grid.is_near_wall(at(0.02, 1.5)));
    }

    #[test]
    fn off_grid_is_never_a_collision() {
        let grid = MazeGrid::new(2, 2);
        assert!(!grid.is_near_wall(at(-0.5, 0.5)));
        assert!(!grid.is_near_wall(at(0.5, 7.5)));
        assert!(grid.get(GridPos::new(0, 7)).is_none());
    }
}
