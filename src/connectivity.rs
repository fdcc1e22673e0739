use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Attempt, GenerationError, Result};
use crate::grid::{Cell, Grid, TilePos};

/// Carves a horizontal run along `from.y` then a vertical run along `to.x`.
pub fn carve_bridge(grid: &mut Grid, from: TilePos, to: TilePos) -> usize {
    let mut carved = 0;
    let mut open = |grid: &mut Grid, pos: TilePos| {
        if grid.get(pos) == Some(Cell::Wall) {
            grid.set(pos, Cell::Open);
            carved += 1;
        }
    };
    for x in from.x.min(to.x)..=from.x.max(to.x) {
        open(grid, TilePos::new(x, from.y));
    }
    for y in from.y.min(to.y)..=from.y.max(to.y) {
        open(grid, TilePos::new(to.x, y));
    }
    carved
}

/// Bridges every stray component to the first one found until a single component remains.
///
/// Each pass re-runs the flood fill. The pass count is capped by `max_passes`.
pub fn repair(grid: &mut Grid, max_passes: u32, rng: &mut impl Rng) -> Result<u32> {
    let mut passes = 0;
    loop {
        let components = grid.components();
        tracing::debug!(pass = passes, components = components.len(), "connectivity check");
        if components.len() <= 1 {
            break;
        }
        if passes >= max_passes {
            tracing::warn!(passes, components = components.len(), "repair budget exhausted");
            return Err(GenerationError::GenerationExhausted {
                what: Attempt::RepairPass,
                attempts: passes,
            });
        }

        let Some((primary, rest)) = components.split_first() else {
            break;
        };
        for other in rest {
            let (Some(&from), Some(&to)) = (primary.choose(rng), other.choose(rng)) else {
                continue;
            };
            let carved = carve_bridge(grid, from, to);
            tracing::trace!(?from, ?to, carved, "bridged component");
        }
        passes += 1;
    }

    verify(grid)?;
    Ok(passes)
}

/// Post-repair check. A failure here is a defect in generation, never a recoverable state.
pub fn verify(grid: &Grid) -> Result<()> {
    let components = grid.components().len();
    debug_assert!(components <= 1, "open cells split into {components} components");
    if components > 1 {
        return Err(GenerationError::ConnectivityInvariantViolation { components });
    }
    Ok(())
}
