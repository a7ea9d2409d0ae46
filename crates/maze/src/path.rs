//! Depth-first pathfinding over cell links.
//!
//! The search stamps a fresh marker on every cell it enters, so it relies on
//! exclusive access to the grid (`&mut self`) and is not reentrant. It finds
//! *a* path, not the shortest one.

use crate::direction::Direction;
use crate::grid::{MazeError, MazeGrid};
use mazeworld_common::GridPos;

impl MazeGrid {
    /// Find a path of grid positions from `start` to `end`, both inclusive.
    ///
    /// Neighbours are tried in the order above, below, left, right and the
    /// first branch that reaches `end` wins. Returns `Ok(None)` when `end` is
    /// unreachable and an error when either endpoint is off the grid.
    pub fn find_path(
        &mut self,
        start: GridPos,
        end: GridPos,
    ) -> Result<Option<Vec<GridPos>>, MazeError> {
        let start_index = self.index_of(start).ok_or(MazeError::OutOfBounds(start))?;
        let end_index = self.index_of(end).ok_or(MazeError::OutOfBounds(end))?;

        self.marker += 1;
        let marker = self.marker;

        if start_index == end_index {
            return Ok(Some(vec![start]));
        }

        // Each frame is (cell index, next direction to try).
        let mut stack: Vec<(usize, usize)> = vec![(start_index, 0)];
        self.cell_mut(start_index).marker = marker;

        while let Some(frame) = stack.last_mut() {
            let (index, slot) = *frame;
            let Some(dir) = Direction::ALL.get(slot).copied() else {
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let Some(next) = self.cell(index).link(dir) else {
                continue;
            };
            if self.cell(next).marker == marker {
                continue;
            }
            if next == end_index {
                let mut path: Vec<GridPos> =
                    stack.iter().map(|(i, _)| self.cell(*i).pos()).collect();
                path.push(end);
                tracing::trace!(?start, ?end, len = path.len(), "path found");
                return Ok(Some(path));
            }
            self.cell_mut(next).marker = marker;
            stack.push((next, 0));
        }

        tracing::debug!(?start, ?end, "no path");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::carve;

    fn assert_valid_path(grid: &MazeGrid, path: &[GridPos], start: GridPos, end: GridPos) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {}", pair[0], pair[1]);
            assert!(grid.connected(pair[0], pair[1]).is_some());
        }
    }

    #[test]
    fn open_grid_corner_to_corner() {
        let mut grid = MazeGrid::open(8, 8);
        let start = GridPos::new(0, 0);
        let end = GridPos::new(7, 7);
        let path = grid.find_path(start, end).unwrap().unwrap();
        assert!(path.len() >= 15);
        assert_valid_path(&grid, &path, start, end);
    }

    #[test]
    fn prefers_above_first() {
        // Column 0 is open upward, so DFS climbs it before turning right.
        let mut grid = MazeGrid::open(3, 3);
        let path = grid
            .find_path(GridPos::new(0, 0), GridPos::new(2, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path[1], GridPos::new(0, 1));
        assert_valid_path(&grid, &path, GridPos::new(0, 0), GridPos::new(2, 0));
    }

    #[test]
    fn secluded_cells_have_no_path() {
        let mut grid = MazeGrid::new(4, 4);
        for (a, b) in [((0, 0), (3, 3)), ((1, 2), (1, 3)), ((2, 2), (0, 0))] {
            let result = grid
                .find_path(GridPos::new(a.0, a.1), GridPos::new(b.0, b.1))
                .unwrap();
            assert!(result.is_none());
        }
    }

    #[test]
    fn disconnected_halves_have_no_path() {
        let mut grid = MazeGrid::open(4, 2);
        for y in 0..2 {
            grid.close_wall(GridPos::new(1, y), Direction::Right).unwrap();
        }
        assert!(grid
            .find_path(GridPos::new(0, 0), GridPos::new(3, 1))
            .unwrap()
            .is_none());
        assert!(grid
            .find_path(GridPos::new(0, 0), GridPos::new(1, 1))
            .unwrap()
            .is_some());
    }

    #[test]
    fn start_equals_end() {
        let mut grid = MazeGrid::new(2, 2);
        let path = grid
            .find_path(GridPos::new(1, 1), GridPos::new(1, 1))
            .unwrap();
        assert_eq!(path, Some(vec![GridPos::new(1, 1)]));
    }

    #[test]
    fn out_of_range_endpoints_are_errors() {
        let mut grid = MazeGrid::open(2, 2);
        assert_eq!(
            grid.find_path(GridPos::new(0, 0), GridPos::new(5, 0)),
            Err(MazeError::OutOfBounds(GridPos::new(5, 0)))
        );
        assert!(grid.find_path(GridPos::new(-1, 0), GridPos::new(0, 0)).is_err());
    }

    #[test]
    fn repeated_searches_do_not_see_stale_markers() {
        let mut grid = MazeGrid::open(5, 5);
        for _ in 0..3 {
            let path = grid
                .find_path(GridPos::new(0, 0), GridPos::new(4, 4))
                .unwrap();
            assert!(path.is_some());
        }
    }

    #[test]
    fn carved_maze_reaches_every_cell() {
        let mut grid = carve(9, 7, 42);
        let start = GridPos::new(0, 0);
        let targets: Vec<GridPos> = grid.cells().map(|c| c.pos()).collect();
        for end in targets {
            let path = grid.find_path(start, end).unwrap().unwrap();
            assert_valid_path(&grid, &path, start, end);
        }
    }
}
