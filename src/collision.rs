//! Box-vs-grid and box-vs-box tests with all-or-nothing rollback.
//!
//! A move that would overlap a wall is discarded entirely: the body stays exactly where it
//! was before the step. There is no sliding along walls, so bodies can stick on corners.

use crate::components::{Aabb, Body, Vec2};
use crate::constants::TILE_SIZE;
use crate::grid::{Cell, Grid, TilePos};

/// True if `aabb` overlaps a wall cell or leaves the grid.
pub fn resolve_against_grid(aabb: &Aabb, grid: &Grid) -> bool {
    let max = aabb.max();
    let x0 = (aabb.min.x / TILE_SIZE).floor() as i64;
    let y0 = (aabb.min.y / TILE_SIZE).floor() as i64;
    let x1 = (max.x / TILE_SIZE).ceil() as i64 - 1;
    let y1 = (max.y / TILE_SIZE).ceil() as i64 - 1;

    for ty in y0..=y1 {
        for tx in x0..=x1 {
            if tx < 0 || ty < 0 {
                return true;
            }
            let pos = TilePos::new(tx as usize, ty as usize);
            match grid.get(pos) {
                None => return true,
                Some(Cell::Wall) if aabb.intersects(&Aabb::tile(pos.to_world())) => return true,
                _ => {}
            }
        }
    }
    false
}

pub fn resolve_entity_pair(a: &Aabb, b: &Aabb) -> bool {
    a.intersects(b)
}

/// Applies `delta` unless the destination is blocked. Returns whether the body moved.
pub fn try_move(body: &mut Body, delta: Vec2, grid: &Grid) -> bool {
    if delta == Vec2::ZERO {
        return true;
    }
    let target = body.position + delta;
    if resolve_against_grid(&body.aabb_at(target), grid) {
        return false;
    }
    body.position = target;
    true
}
