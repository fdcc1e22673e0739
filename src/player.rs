use crate::collision;
use crate::components::{Body, Vec2};
use crate::grid::{Dir, Grid};

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Body,
    pub velocity: Vec2,
    pub facing: Dir,
    keys: usize,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            body: Body::tile(position),
            velocity: Vec2::ZERO,
            facing: Dir::Right,
            keys: 0,
        }
    }

    /// Input is a direction; diagonals are normalized so every heading moves at `speed`.
    pub fn apply_input(&mut self, input: Vec2, speed: f32) {
        self.velocity = input.normalize_or_zero() * speed;
        if input.x.abs() > input.y.abs() {
            self.facing = if input.x > 0.0 { Dir::Right } else { Dir::Left };
        } else if input.y != 0.0 {
            self.facing = if input.y > 0.0 { Dir::Down } else { Dir::Up };
        }
    }

    pub fn step(&mut self, grid: &Grid) -> bool {
        collision::try_move(&mut self.body, self.velocity, grid)
    }

    /// Moves by `delta` once, with the same rollback rule as regular steps.
    pub fn push(&mut self, delta: Vec2, grid: &Grid) -> bool {
        collision::try_move(&mut self.body, delta, grid)
    }

    pub fn center(&self) -> Vec2 {
        self.body.aabb().center()
    }

    pub fn keys(&self) -> usize {
        self.keys
    }

    pub fn collect_key(&mut self) {
        self.keys += 1;
    }
}
