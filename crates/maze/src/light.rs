//! Light propagation through corridors.
//!
//! Light spreads from a source cell along open sides. Every hop costs
//! [`LIGHT_DECAY`]; a hop that changes direction first halves the remaining
//! intensity. Cells keep the brightest value any arrival brought them, so
//! the result does not depend on traversal order and several sources
//! combine by maximum.

use crate::direction::Direction;
use crate::grid::MazeGrid;
use mazeworld_common::GridPos;

/// Intensity lost on every hop after the source.
pub const LIGHT_DECAY: f32 = 1.0 / 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Start,
    Travel(Direction),
}

impl MazeGrid {
    /// Flood light from `source` into `light_map_value` of every reachable
    /// cell. Existing values are kept when brighter; nothing is cleared.
    pub fn propagate_light(&mut self, source: GridPos) {
        self.light_step(source, 1.0, false, Heading::Start);
    }

    fn light_step(&mut self, pos: GridPos, mut value: f32, bend: bool, heading: Heading) {
        if heading != Heading::Start {
            if bend {
                value *= 0.5;
            }
            value -= LIGHT_DECAY;
            if value < 0.0 {
                return;
            }
        }

        let Some(index) = self.index_of(pos) else {
            return;
        };
        let cell = self.cell_mut(index);
        cell.light_map_value = cell.light_map_value.max(value);
        let walls = cell.walls();

        let first = heading == Heading::Start;
        for dir in Direction::ALL {
            if heading == Heading::Travel(dir.opposite()) || walls.has(dir) {
                continue;
            }
            let turns = !first && heading != Heading::Travel(dir);
            self.light_step(dir.step(pos), value, turns, Heading::Travel(dir));
        }
    }

    /// Fill each cell's corner lighting with the mean `light_map_value` of
    /// the in-grid cells that share that corner.
    pub fn compute_corner_lighting(&mut self) {
        let values: Vec<f32> = self.cells().map(|c| c.light_map_value).collect();
        let sample = |grid: &MazeGrid, pos: GridPos, dxs: [i32; 2], dys: [i32; 2]| {
            let mut sum = 0.0;
            let mut count = 0;
            for dx in dxs {
                for dy in dys {
                    if let Some(i) = grid.index_of(GridPos::new(pos.x + dx, pos.y + dy)) {
                        sum += values[i];
                        count += 1;
                    }
                }
            }
            sum / count as f32
        };

        for index in 0..self.len() {
            let pos = self.cell(index).pos();
            let top_left = sample(self, pos, [-1, 0], [0, 1]);
            let top_right = sample(self, pos, [0, 1], [0, 1]);
            let bottom_left = sample(self, pos, [-1, 0], [-1, 0]);
            let bottom_right = sample(self, pos, [0, 1], [-1, 0]);

            let corners = &mut self.cell_mut(index).corners;
            corners.top_left = Some(top_left);
            corners.top_right = Some(top_right);
            corners.bottom_left = Some(bottom_left);
            corners.bottom_right = Some(bottom_right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn light_at(grid: &MazeGrid, x: i32, y: i32) -> f32 {
        grid.get(GridPos::new(x, y)).unwrap().light_map_value
    }

    /// A one-row corridor of `len` cells, open end to end.
    fn corridor(len: usize) -> MazeGrid {
        MazeGrid::open(len, 1)
    }

    #[test]
    fn source_is_full_brightness() {
        let mut grid = MazeGrid::open(8, 8);
        grid.propagate_light(GridPos::new(3, 4));
        assert_eq!(light_at(&grid, 3, 4), 1.0);
    }

    #[test]
    fn straight_corridor_decays_linearly() {
        let mut grid = corridor(10);
        grid.propagate_light(GridPos::new(0, 0));
        for hop in 0..6 {
            let expected = 1.0 - hop as f32 * LIGHT_DECAY;
            assert!((light_at(&grid, hop, 0) - expected).abs() < EPS, "hop {hop}");
        }
        for hop in 7..10 {
            assert_eq!(light_at(&grid, hop, 0), 0.0, "hop {hop}");
        }
    }

    #[test]
    fn bend_halves_before_decay() {
        // L-shaped corridor: (0,0) -> (1,0) -> (1,1) -> (1,2)
        let mut grid = MazeGrid::new(2, 3);
        grid.open_wall(GridPos::new(0, 0), Direction::Right).unwrap();
        grid.open_wall(GridPos::new(1, 0), Direction::Up).unwrap();
        grid.open_wall(GridPos::new(1, 1), Direction::Up).unwrap();
        grid.propagate_light(GridPos::new(0, 0));

        let first = 1.0 - LIGHT_DECAY;
        let turned = first * 0.5 - LIGHT_DECAY;
        let straight = turned - LIGHT_DECAY;
        assert!((light_at(&grid, 1, 0) - first).abs() < EPS);
        assert!((light_at(&grid, 1, 1) - turned).abs() < EPS);
        assert!((light_at(&grid, 1, 2) - straight).abs() < EPS);
        assert_eq!(light_at(&grid, 0, 1), 0.0);
    }

    #[test]
    fn first_step_is_never_a_bend() {
        let mut grid = MazeGrid::open(3, 3);
        grid.propagate_light(GridPos::new(1, 1));
        for (x, y) in [(1, 2), (1, 0), (0, 1), (2, 1)] {
            assert!((light_at(&grid, x, y) - (1.0 - LIGHT_DECAY)).abs() < EPS);
        }
    }

    #[test]
    fn walls_block_light() {
        let mut grid = MazeGrid::new(3, 3);
        grid.propagate_light(GridPos::new(1, 1));
        assert_eq!(light_at(&grid, 1, 1), 1.0);
        let lit = grid.cells().filter(|c| c.light_map_value > 0.0).count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn off_grid_source_is_ignored() {
        let mut grid = MazeGrid::open(2, 2);
        grid.propagate_light(GridPos::new(9, 9));
        assert!(grid.cells().all(|c| c.light_map_value == 0.0));
    }

    #[test]
    fn two_sources_combine_by_max_in_any_order() {
        let a = GridPos::new(0, 0);
        let b = GridPos::new(5, 3);

        let single = |src: GridPos| {
            let mut g = MazeGrid::open(6, 6);
            g.propagate_light(src);
            g.cells().map(|c| c.light_map_value).collect::<Vec<_>>()
        };
        let only_a = single(a);
        let only_b = single(b);

        let mut ab = MazeGrid::open(6, 6);
        ab.propagate_light(a);
        ab.propagate_light(b);
        let mut ba = MazeGrid::open(6, 6);
        ba.propagate_light(b);
        ba.propagate_light(a);

        for (i, (ca, cb)) in ab.cells().zip(ba.cells()).enumerate() {
            let expected = only_a[i].max(only_b[i]);
            assert_eq!(ca.light_map_value, expected);
            assert_eq!(cb.light_map_value, expected);
        }
    }

    #[test]
    fn corner_lighting_averages_neighbours() {
        let mut grid = MazeGrid::new(3, 3);
        grid.get_mut(GridPos::new(1, 1)).unwrap().light_map_value = 1.0;
        grid.compute_corner_lighting();

        let centre = grid.get(GridPos::new(1, 1)).unwrap().corners;
        for corner in [
            centre.top_left,
            centre.top_right,
            centre.bottom_left,
            centre.bottom_right,
        ] {
            assert_eq!(corner, Some(0.25));
        }

        // (0,0) bottom-left corner touches only itself.
        let origin = grid.get(GridPos::new(0, 0)).unwrap().corners;
        assert_eq!(origin.bottom_left, Some(0.0));
        assert_eq!(origin.top_right, Some(0.25));
    }
}
