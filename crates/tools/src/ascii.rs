//! Text views of a maze. Rows are printed with the highest `y` first so
//! `Direction::Up` points up on screen.

use mazeworld_common::GridPos;
use mazeworld_maze::{Direction, MazeGrid};
use std::fmt::Write;

/// Draw the maze walls.
pub fn render_maze(maze: &MazeGrid) -> String {
    render_maze_with(maze, |_| None)
}

/// Draw the maze walls, putting `mark(pos)` in the middle of each cell
/// that has one.
pub fn render_maze_with(maze: &MazeGrid, mark: impl Fn(GridPos) -> Option<char>) -> String {
    let mut out = String::new();
    if maze.is_empty() {
        return out;
    }

    for y in (0..maze.height() as i32).rev() {
        out.push('+');
        for x in 0..maze.width() as i32 {
            out.push_str(if walled(maze, x, y, Direction::Up) { "---+" } else { "   +" });
        }
        out.push('\n');

        for x in 0..maze.width() as i32 {
            out.push(if walled(maze, x, y, Direction::Left) { '|' } else { ' ' });
            out.push(' ');
            out.push(mark(GridPos::new(x, y)).unwrap_or(' '));
            out.push(' ');
        }
        let last = maze.width() as i32 - 1;
        out.push(if walled(maze, last, y, Direction::Right) { '|' } else { ' ' });
        out.push('\n');
    }

    out.push('+');
    for x in 0..maze.width() as i32 {
        out.push_str(if walled(maze, x, 0, Direction::Down) { "---+" } else { "   +" });
    }
    out.push('\n');
    out
}

fn walled(maze: &MazeGrid, x: i32, y: i32, dir: Direction) -> bool {
    maze.get(GridPos::new(x, y)).is_none_or(|cell| cell.has_wall(dir))
}

/// One line per row of `light_map_value`s, two decimals each.
pub fn render_light_map(maze: &MazeGrid) -> String {
    let mut out = String::new();
    for y in (0..maze.height() as i32).rev() {
        let row: Vec<String> = (0..maze.width() as i32)
            .filter_map(|x| maze.get(GridPos::new(x, y)))
            .map(|cell| format!("{:.2}", cell.light_map_value))
            .collect();
        let _ = writeln!(out, "{}", row.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_has_only_the_boundary() {
        let maze = MazeGrid::open(2, 1);
        assert_eq!(render_maze(&maze), "+---+---+\n|       |\n+---+---+\n");
    }

    #[test]
    fn closed_grid_draws_every_wall() {
        let maze = MazeGrid::new(2, 2);
        let text = render_maze(&maze);
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().all(|l| l.len() == 9));
        assert_eq!(text.lines().nth(1), Some("|   |   |"));
    }

    #[test]
    fn marks_land_in_their_cell() {
        let maze = MazeGrid::open(2, 2);
        let text = render_maze_with(&maze, |p| (p == GridPos::new(1, 0)).then_some('@'));
        // Row y = 0 is printed last.
        assert_eq!(text.lines().nth(3), Some("|     @ |"));
        assert_eq!(text.matches('@').count(), 1);
    }

    #[test]
    fn light_map_rows_top_first() {
        let mut maze = MazeGrid::open(2, 2);
        maze.propagate_light(GridPos::new(0, 0));
        let text = render_light_map(&maze);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("1.00"));
    }

    #[test]
    fn empty_maze_renders_nothing() {
        assert!(render_maze(&MazeGrid::new(0, 0)).is_empty());
    }
}
