//! Seeded maze carving.
//!
//! A depth-first backtracker from `(0, 0)`: it produces a perfect maze (one
//! route between any two cells) and records each cell's carving parent.

use crate::direction::Direction;
use crate::grid::MazeGrid;

/// Carve a `width × height` maze. The same seed always yields the same maze.
pub fn carve(width: usize, height: usize, seed: u64) -> MazeGrid {
    let mut grid = MazeGrid::new(width, height);
    if grid.is_empty() {
        return grid;
    }

    let mut rng = SplitMix64::new(seed);
    let mut visited = vec![false; grid.len()];
    let mut stack = vec![0usize];
    visited[0] = true;

    while let Some(&current) = stack.last() {
        let pos = grid.cell(current).pos();

        let mut options = [(Direction::Up, 0usize); 4];
        let mut count = 0;
        for dir in Direction::ALL {
            if let Some(next) = grid.index_of(dir.step(pos)) {
                if !visited[next] {
                    options[count] = (dir, next);
                    count += 1;
                }
            }
        }

        if count == 0 {
            stack.pop();
            continue;
        }

        let (dir, next) = options[(rng.next_u64() % count as u64) as usize];
        grid.link(current, next, dir);
        grid.cell_mut(next).set_parent(Some(current));
        visited[next] = true;
        stack.push(next);
    }

    tracing::debug!(width, height, seed, "maze carved");
    grid
}

/// Splitmix64 step generator. Small, fast and identical on every platform.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_signature(grid: &MazeGrid) -> Vec<[bool; 4]> {
        grid.cells()
            .map(|c| Direction::ALL.map(|d| c.has_wall(d)))
            .collect()
    }

    #[test]
    fn same_seed_same_maze() {
        let a = carve(8, 8, 7);
        let b = carve(8, 8, 7);
        assert_eq!(wall_signature(&a), wall_signature(&b));
    }

    #[test]
    fn different_seeds_differ() {
        let a = carve(8, 8, 1);
        let b = carve(8, 8, 2);
        assert_ne!(wall_signature(&a), wall_signature(&b));
    }

    #[test]
    fn carved_maze_is_a_spanning_tree() {
        let grid = carve(6, 5, 99);
        let openings: usize = grid
            .cells()
            .map(|c| Direction::ALL.iter().filter(|d| !c.has_wall(**d)).count())
            .sum();
        // every passage is counted from both sides
        assert_eq!(openings / 2, grid.len() - 1);
        assert!(grid.cells().all(|c| !c.is_secluded()));
    }

    #[test]
    fn every_cell_but_the_root_has_a_parent() {
        let grid = carve(4, 4, 3);
        let orphans: Vec<_> = grid.cells().filter(|c| c.parent().is_none()).collect();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].pos(), mazeworld_common::GridPos::new(0, 0));
    }

    #[test]
    fn empty_dimensions_yield_empty_grid() {
        assert!(carve(0, 5, 1).is_empty());
    }
}
