//! Cell-to-cell movement along the maze.
//!
//! The runner moves one cell every half second, interpolating position and
//! yaw in between. What the next cell is depends on the [`RunMode`].

use crate::behavior::Behavior;
use crate::context::TickContext;
use crate::entity::EntityState;
use glam::Vec2;
use mazeworld_common::GridPos;
use mazeworld_maze::MazeGrid;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

const SECONDS_BETWEEN_CELLS: f32 = 0.5;

/// What the runner does once it reaches a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunMode {
    /// Stay put.
    Idle,
    /// Follow the left-hand wall forever.
    Wander,
    /// Walk a path to `target`, then turn to `final_rotation`.
    Destination { target: GridPos, final_rotation: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    WaitingForGameStart,
    Idle,
    Interpolating,
}

/// Drives its entity from cell to cell.
#[derive(Debug, Clone)]
pub struct AutoRunner {
    mode: RunMode,
    state: RunState,
    elapsed: f32,
    last_grid: Vec2,
    next_grid: Vec2,
    last_rotation: f32,
    next_rotation: f32,
    path: Vec<GridPos>,
    next_step: usize,
}

impl AutoRunner {
    /// A runner that waits for the intro to finish and then starts `mode`.
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            state: RunState::WaitingForGameStart,
            elapsed: f32::INFINITY,
            last_grid: Vec2::ZERO,
            next_grid: Vec2::ZERO,
            last_rotation: 0.0,
            next_rotation: 0.0,
            path: Vec::new(),
            next_step: 0,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.state == RunState::Idle
    }

    pub fn is_waiting(&self) -> bool {
        self.state == RunState::WaitingForGameStart
    }

    /// Switch mode now. Position and yaw are re-read from the entity and a
    /// destination path is planned immediately.
    pub fn set_mode(&mut self, mode: RunMode, entity: &EntityState, maze: &mut MazeGrid) {
        self.mode = mode;
        self.begin(entity, maze);
    }

    fn begin(&mut self, entity: &EntityState, maze: &mut MazeGrid) {
        if self.mode != RunMode::Idle {
            self.sync_from(entity);
        }
        if let RunMode::Destination { target, .. } = self.mode {
            let start = entity.grid_position();
            self.path = match maze.find_path(start, target) {
                Ok(Some(path)) => path,
                Ok(None) => {
                    tracing::warn!(%start, %target, "no path to destination");
                    Vec::new()
                }
                Err(e) => {
                    tracing::warn!(error = %e, "destination planning failed");
                    Vec::new()
                }
            };
            self.next_step = 0;
        }
        self.elapsed = f32::INFINITY;
        self.state = RunState::Interpolating;
    }

    fn sync_from(&mut self, entity: &EntityState) {
        let pos = entity.grid_position();
        self.last_grid = Vec2::new(pos.x as f32, pos.y as f32);
        self.next_grid = self.last_grid;
        self.last_rotation = entity.transform.rotation.y;
        self.next_rotation = self.last_rotation;
    }

    /// Pick the next cell. False means there is nowhere to go.
    fn advance(&mut self, maze: &MazeGrid) -> bool {
        match self.mode {
            RunMode::Idle => false,
            RunMode::Wander => {
                let at = GridPos::new(self.last_grid.x as i32, self.last_grid.y as i32);
                match wander_step(maze, at, self.last_rotation) {
                    Some((next, rotation)) => {
                        self.set_next(next, rotation);
                        true
                    }
                    None => {
                        tracing::error!(%at, "wandering runner has no connected cell");
                        false
                    }
                }
            }
            RunMode::Destination { final_rotation, .. } => {
                let Some(&next) = self.path.get(self.next_step) else {
                    return false;
                };
                self.next_step += 1;
                let rotation = if self.next_step == self.path.len() {
                    final_rotation
                } else {
                    let last = self.last_grid;
                    let (nx, ny) = (next.x as f32, next.y as f32);
                    if nx < last.x {
                        FRAC_PI_2
                    } else if nx > last.x {
                        PI * 1.5
                    } else if ny < last.y {
                        PI
                    } else if ny > last.y {
                        0.0
                    } else {
                        self.next_rotation
                    }
                };
                self.set_next(next, rotation);
                true
            }
        }
    }

    fn set_next(&mut self, pos: GridPos, rotation: f32) {
        self.next_grid = Vec2::new(pos.x as f32, pos.y as f32);
        self.next_rotation = rotation;
    }
}

impl Behavior for AutoRunner {
    fn update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        match self.state {
            RunState::WaitingForGameStart => {
                if ctx.intro_scale >= 1.0 {
                    self.begin(entity, ctx.maze);
                    if self.mode == RunMode::Idle {
                        self.state = RunState::Idle;
                    }
                }
            }
            RunState::Idle => {}
            RunState::Interpolating => {
                let mut proportion = self.elapsed / SECONDS_BETWEEN_CELLS;
                if proportion > 1.0 {
                    self.last_grid = self.next_grid;
                    self.last_rotation = self.next_rotation.rem_euclid(TAU);
                    self.next_rotation = self.next_rotation.rem_euclid(TAU);
                    self.elapsed = 0.0;
                    if !self.advance(ctx.maze) {
                        self.state = RunState::Idle;
                        entity.set_position_from_grid(self.last_grid.x, self.last_grid.y);
                        entity.transform.rotation.y = self.last_rotation;
                        return;
                    }
                    proportion = 0.0;
                }
                let t = proportion.clamp(0.0, 1.0);
                let pos = self.last_grid.lerp(self.next_grid, t);
                entity.set_position_from_grid(pos.x, pos.y);
                entity.transform.rotation.y =
                    self.last_rotation + (self.next_rotation - self.last_rotation) * t;
                self.elapsed += ctx.time.delta;
            }
        }
    }

    fn label(&self) -> &str {
        "AutoRunner"
    }
}

/// Quadrant of a yaw: 0 faces +y, 1 faces -x, 2 faces -y, 3 faces +x.
fn quadrant(rad: f32) -> u8 {
    let r = rad.rem_euclid(TAU);
    if r > PI * 1.75 || r < PI * 0.25 {
        0
    } else if r < PI * 0.75 {
        1
    } else if r < PI * 1.25 {
        2
    } else {
        3
    }
}

fn quadrant_offset(q: u8) -> (i32, i32) {
    match q % 4 {
        0 => (0, 1),
        1 => (-1, 0),
        2 => (0, -1),
        _ => (1, 0),
    }
}

/// One left-hand-rule step from `at` while facing `facing`: try left, then
/// forward, then right, then back. Returns the cell and the new yaw.
pub fn wander_step(maze: &MazeGrid, at: GridPos, facing: f32) -> Option<(GridPos, f32)> {
    let cell = maze.get(at)?;
    let forward = quadrant(facing);
    [forward + 1, forward, forward + 3, forward + 2]
        .into_iter()
        .map(|q| q % 4)
        .find_map(|q| {
            let (dx, dy) = quadrant_offset(q);
            let next = GridPos::new(at.x + dx, at.y + dy);
            cell.try_get_connected_cell(next.x, next.y)
                .map(|_| (next, q as f32 * FRAC_PI_2))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::testing::Harness;
    use mazeworld_common::EntityId;
    use mazeworld_maze::Direction;

    const EPS: f32 = 1e-5;

    fn corridor() -> MazeGrid {
        let mut maze = MazeGrid::new(3, 1);
        maze.open_wall(GridPos::new(0, 0), Direction::Right).unwrap();
        maze.open_wall(GridPos::new(1, 0), Direction::Right).unwrap();
        maze
    }

    fn runner_at(x: f32, y: f32) -> EntityState {
        let mut entity = EntityState::new(EntityId(0), "Player");
        entity.set_position_from_grid(x, y);
        entity
    }

    #[test]
    fn quadrants_round_to_nearest_cardinal() {
        assert_eq!(quadrant(0.1), 0);
        assert_eq!(quadrant(-0.1), 0);
        assert_eq!(quadrant(FRAC_PI_2 + 0.2), 1);
        assert_eq!(quadrant(PI), 2);
        assert_eq!(quadrant(PI * 1.5), 3);
        assert_eq!(quadrant(TAU + FRAC_PI_2), 1);
    }

    #[test]
    fn wander_prefers_left_then_forward_then_right_then_back() {
        let maze = corridor();
        // facing +y at the west end: only the right turn is open
        let (next, yaw) = wander_step(&maze, GridPos::new(0, 0), 0.0).unwrap();
        assert_eq!(next, GridPos::new(1, 0));
        assert!((yaw - PI * 1.5).abs() < EPS);

        // facing +x in the middle: forward
        let (next, yaw) = wander_step(&maze, GridPos::new(1, 0), PI * 1.5).unwrap();
        assert_eq!(next, GridPos::new(2, 0));
        assert!((yaw - PI * 1.5).abs() < EPS);

        // dead end: turn back
        let (next, yaw) = wander_step(&maze, GridPos::new(2, 0), PI * 1.5).unwrap();
        assert_eq!(next, GridPos::new(1, 0));
        assert!((yaw - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn wander_turns_left_when_it_can() {
        let maze = MazeGrid::open(2, 2);
        // facing -x from (1, 0): left is -y (wall), forward is (0, 0)
        let (next, _) = wander_step(&maze, GridPos::new(1, 0), FRAC_PI_2).unwrap();
        assert_eq!(next, GridPos::new(0, 0));
        // facing +x from (0, 0): left is +y
        let (next, yaw) = wander_step(&maze, GridPos::new(0, 0), PI * 1.5).unwrap();
        assert_eq!(next, GridPos::new(0, 1));
        assert!(yaw.abs() < EPS);
    }

    #[test]
    fn secluded_or_off_grid_cell_has_no_step() {
        let maze = MazeGrid::new(2, 2);
        assert!(wander_step(&maze, GridPos::new(0, 0), 0.0).is_none());
        assert!(wander_step(&maze, GridPos::new(5, 0), 0.0).is_none());
    }

    #[test]
    fn waits_for_intro_to_finish() {
        let mut harness = Harness::new(corridor());
        harness.intro_scale = 0.5;
        let mut entity = runner_at(0.0, 0.0);
        let mut runner = AutoRunner::new(RunMode::Wander);

        runner.update(&mut entity, &mut harness.ctx());
        assert!(runner.is_waiting());

        harness.intro_scale = 1.0;
        runner.update(&mut entity, &mut harness.ctx());
        assert!(!runner.is_waiting());
    }

    #[test]
    fn idle_mode_settles_immediately() {
        let mut harness = Harness::new(corridor());
        let mut entity = runner_at(1.0, 0.0);
        let mut runner = AutoRunner::new(RunMode::Idle);

        runner.update(&mut entity, &mut harness.ctx());
        assert!(runner.is_idle());
        assert_eq!(entity.grid_position(), GridPos::new(1, 0));
    }

    #[test]
    fn interpolates_halfway_between_cells() {
        let mut harness = Harness::new(corridor());
        harness.time.delta = 0.25;
        let mut entity = runner_at(0.0, 0.0);
        entity.transform.rotation.y = PI * 1.5;
        let mut runner = AutoRunner::new(RunMode::Wander);
        runner.set_mode(RunMode::Wander, &entity, &mut harness.maze);

        // picks (1, 0) and sits at the start of the hop
        runner.update(&mut entity, &mut harness.ctx());
        assert_eq!(entity.grid_position(), GridPos::new(0, 0));
        // a quarter second later it is half way
        runner.update(&mut entity, &mut harness.ctx());
        let expected_x = 0.5 * mazeworld_maze::CELL_SIDE + mazeworld_maze::HALF_SIDE;
        assert!((entity.transform.position.x - expected_x).abs() < 1e-3);
    }

    #[test]
    fn destination_walks_the_path_and_turns_at_the_end() {
        let mut harness = Harness::new(corridor());
        harness.time.delta = 0.25;
        let mut entity = runner_at(0.0, 0.0);
        let mut runner = AutoRunner::new(RunMode::Idle);
        let mode = RunMode::Destination {
            target: GridPos::new(2, 0),
            final_rotation: PI,
        };
        runner.set_mode(mode, &entity, &mut harness.maze);

        let mut visited = vec![entity.grid_position()];
        for _ in 0..40 {
            runner.update(&mut entity, &mut harness.ctx());
            let here = entity.grid_position();
            if visited.last() != Some(&here) {
                visited.push(here);
            }
            if runner.is_idle() {
                break;
            }
        }

        assert!(runner.is_idle());
        assert_eq!(
            visited,
            vec![GridPos::new(0, 0), GridPos::new(1, 0), GridPos::new(2, 0)]
        );
        assert!((entity.transform.rotation.y - PI).abs() < EPS);
        let centre = mazeworld_maze::grid_to_world(2.0, 0.0);
        assert!((entity.transform.position.x - centre.x).abs() < EPS);
        assert!((entity.transform.position.z - centre.z).abs() < EPS);
    }

    #[test]
    fn unreachable_destination_goes_idle() {
        let mut harness = Harness::new(MazeGrid::new(2, 1));
        let mut entity = runner_at(0.0, 0.0);
        let mut runner = AutoRunner::new(RunMode::Idle);
        let mode = RunMode::Destination {
            target: GridPos::new(1, 0),
            final_rotation: 0.0,
        };
        runner.set_mode(mode, &entity, &mut harness.maze);
        runner.update(&mut entity, &mut harness.ctx());
        assert!(runner.is_idle());
        assert_eq!(entity.grid_position(), GridPos::new(0, 0));
    }
}
