use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{MIN_GRID_SIDE, TILE_SIZE};
use crate::error::{GenerationError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub x: usize,
    pub y: usize,
}

impl TilePos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in tiles.
    pub fn distance(self, other: TilePos) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dy = self.y as f32 - other.y as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(self, dx: isize, dy: isize) -> Option<TilePos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(TilePos { x, y })
    }

    /// Top-left corner of the tile in world units.
    pub fn to_world(self) -> crate::components::Vec2 {
        crate::components::Vec2::new(self.x as f32 * TILE_SIZE, self.y as f32 * TILE_SIZE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// Occupancy map, row-major (`cells[y][x]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![cell; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn get(&self, pos: TilePos) -> Option<Cell> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    /// Out-of-bounds positions are never open.
    pub fn is_open(&self, pos: TilePos) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    pub fn set(&mut self, pos: TilePos, cell: Cell) {
        if self.in_bounds(pos) {
            self.cells[pos.y][pos.x] = cell;
        }
    }

    pub fn is_border(&self, pos: TilePos) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 == self.width || pos.y + 1 == self.height
    }

    pub fn cells(&self) -> impl Iterator<Item = (TilePos, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, cell)| (TilePos { x, y }, *cell))
        })
    }

    pub fn open_cells(&self) -> Vec<TilePos> {
        self.cells()
            .filter(|(_, cell)| *cell == Cell::Open)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.cells().filter(|(_, cell)| *cell == Cell::Open).count()
    }

    pub fn open_neighbors(&self, pos: TilePos) -> impl Iterator<Item = TilePos> + '_ {
        Dir::ALL.into_iter().filter_map(move |dir| {
            let (dx, dy) = dir.delta();
            pos.offset(dx, dy).filter(|next| self.is_open(*next))
        })
    }

    /// 4-connected components of open cells, in row-major discovery order.
    pub fn components(&self) -> Vec<Vec<TilePos>> {
        let mut seen = vec![vec![false; self.width]; self.height];
        let mut components = Vec::new();
        for (start, cell) in self.cells() {
            if cell != Cell::Open || seen[start.y][start.x] {
                continue;
            }
            seen[start.y][start.x] = true;
            let mut component = Vec::new();
            let mut q = VecDeque::new();
            q.push_back(start);
            while let Some(pos) = q.pop_front() {
                component.push(pos);
                for next in self.open_neighbors(pos) {
                    if !seen[next.y][next.x] {
                        seen[next.y][next.x] = true;
                        q.push_back(next);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    pub fn is_connected(&self) -> bool {
        self.components().len() <= 1
    }
}

/// Perfect maze by recursive backtracking over the 2-step lattice through the grid centre.
pub fn carve(width: usize, height: usize, rng: &mut impl Rng) -> Result<Grid> {
    if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
        return Err(GenerationError::InvalidDimensions {
            width,
            height,
            min: MIN_GRID_SIDE,
        });
    }

    let mut grid = Grid::filled(width, height, Cell::Wall);
    let start = TilePos::new(width / 2, height / 2);
    grid.set(start, Cell::Open);

    let mut stack = vec![start];
    let mut dirs = Dir::ALL;
    while let Some(&pos) = stack.last() {
        dirs.shuffle(rng);
        let next = dirs.iter().find_map(|dir| {
            let (dx, dy) = dir.delta();
            let target = pos.offset(dx * 2, dy * 2)?;
            (grid.get(target) == Some(Cell::Wall)).then(|| (pos.offset(dx, dy), target))
        });
        match next {
            Some((Some(between), target)) => {
                grid.set(between, Cell::Open);
                grid.set(target, Cell::Open);
                stack.push(target);
            }
            _ => {
                stack.pop();
            }
        }
    }

    tracing::debug!(width, height, open = grid.open_count(), "carved maze");
    Ok(grid)
}
