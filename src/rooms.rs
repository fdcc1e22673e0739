use rand::Rng;

use crate::error::{GenerationError, Result};
use crate::grid::{Cell, Grid};

/// Knocks out interior walls with probability `chance` each, opening rooms and loops.
///
/// Gives no connectivity guarantee; run [`crate::connectivity::repair`] afterwards.
pub fn carve_rooms(grid: &mut Grid, chance: f64, rng: &mut impl Rng) -> Result<usize> {
    if !(0.0..=1.0).contains(&chance) {
        return Err(GenerationError::InvalidProbability(chance));
    }

    let walls: Vec<_> = grid
        .cells()
        .filter(|(pos, cell)| *cell == Cell::Wall && !grid.is_border(*pos))
        .map(|(pos, _)| pos)
        .collect();

    let mut opened = 0;
    for pos in walls {
        if rng.gen::<f64>() < chance {
            grid.set(pos, Cell::Open);
            opened += 1;
        }
    }
    tracing::debug!(opened, chance, "carved rooms");
    Ok(opened)
}
