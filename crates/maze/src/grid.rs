use crate::cell::Cell;
use crate::direction::Direction;
use mazeworld_common::GridPos;

/// Errors from grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("grid position {0} is outside the maze")]
    OutOfBounds(GridPos),
}

/// Rectangular `height × width` maze stored as a flat array, row-major from
/// the bottom row up (`index = y * width + x`).
///
/// The grid is the only owner of its cells. Neighbour links are indices into
/// the same array.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    /// Last pathfinding marker handed out. Monotonic.
    pub(crate) marker: u64,
}

impl MazeGrid {
    /// Create a grid where every cell is secluded.
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(GridPos::new(x as i32, y as i32)));
            }
        }
        Self {
            width,
            height,
            cells,
            marker: 0,
        }
    }

    /// Create a grid with no internal walls. The outer boundary stays walled.
    pub fn open(width: usize, height: usize) -> Self {
        let mut grid = Self::new(width, height);
        for index in 0..grid.cells.len() {
            let pos = grid.cells[index].pos();
            for dir in [Direction::Up, Direction::Right] {
                if let Some(next) = grid.index_of(dir.step(pos)) {
                    grid.link(index, next, dir);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.index_of(pos).is_some()
    }

    /// Flat index of `pos`, or `None` when it lies outside the grid.
    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        self.index_of(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        self.index_of(pos).map(move |i| &mut self.cells[i])
    }

    /// Cell by flat index. Indices come from [`Cell::link`] or
    /// [`MazeGrid::index_of`], so they are always in range.
    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// The neighbour of `from` at `to`, when they are adjacent with no wall
    /// between them.
    pub fn connected(&self, from: GridPos, to: GridPos) -> Option<&Cell> {
        let cell = self.get(from)?;
        cell.try_get_connected_cell(to.x, to.y)
            .map(|i| &self.cells[i])
    }

    /// Remove the wall on side `dir` of `pos` and on the facing side of its
    /// neighbour, linking the two cells.
    pub fn open_wall(&mut self, pos: GridPos, dir: Direction) -> Result<(), MazeError> {
        let (a, b) = self.pair(pos, dir)?;
        self.link(a, b, dir);
        Ok(())
    }

    /// Put back the wall between `pos` and its neighbour in `dir`.
    pub fn close_wall(&mut self, pos: GridPos, dir: Direction) -> Result<(), MazeError> {
        let (a, b) = self.pair(pos, dir)?;
        self.cells[a].set_link(dir, None);
        self.cells[b].set_link(dir.opposite(), None);
        Ok(())
    }

    /// Record which cell carved `child` during generation.
    pub fn set_parent(&mut self, child: GridPos, parent: GridPos) -> Result<(), MazeError> {
        let c = self.index_of(child).ok_or(MazeError::OutOfBounds(child))?;
        let p = self.index_of(parent).ok_or(MazeError::OutOfBounds(parent))?;
        self.cells[c].set_parent(Some(p));
        Ok(())
    }

    /// Reset every cell's per-frame lighting scratch.
    pub fn clear_lighting(&mut self) {
        for cell in &mut self.cells {
            cell.clear_lighting();
        }
    }

    fn pair(&self, pos: GridPos, dir: Direction) -> Result<(usize, usize), MazeError> {
        let a = self.index_of(pos).ok_or(MazeError::OutOfBounds(pos))?;
        let neighbour = dir.step(pos);
        let b = self
            .index_of(neighbour)
            .ok_or(MazeError::OutOfBounds(neighbour))?;
        Ok((a, b))
    }

    pub(crate) fn link(&mut self, a: usize, b: usize, dir: Direction) {
        self.cells[a].set_link(dir, Some(b));
        self.cells[b].set_link(dir.opposite(), Some(a));
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }
}
