use std::collections::HashSet;

use rand::Rng;

use crate::config::Config;
use crate::constants::{MIN_GRID_SIDE, PLAYER_START_MAX, PLAYER_START_MIN};
use crate::error::{Attempt, GenerationError, Result};
use crate::grid::{Grid, TilePos};
use crate::level::{Level, LevelParams};

struct Sampler<'a, R> {
    grid: &'a Grid,
    rng: &'a mut R,
    attempts: u32,
}

impl<R: Rng> Sampler<'_, R> {
    fn draw(
        &mut self,
        what: Attempt,
        xs: (usize, usize),
        ys: (usize, usize),
        accept: impl Fn(TilePos) -> bool,
    ) -> Result<TilePos> {
        for _ in 0..self.attempts {
            let pos = TilePos::new(
                self.rng.gen_range(xs.0..=xs.1),
                self.rng.gen_range(ys.0..=ys.1),
            );
            if self.grid.is_open(pos) && accept(pos) {
                return Ok(pos);
            }
        }
        tracing::warn!(%what, attempts = self.attempts, "placement budget exhausted");
        Err(GenerationError::GenerationExhausted {
            what,
            attempts: self.attempts,
        })
    }

    fn interior(&self) -> ((usize, usize), (usize, usize)) {
        (
            (1, self.grid.width() - 2),
            (1, self.grid.height() - 2),
        )
    }
}

/// Places the player start near the top-left corner, then keys and agent spawns far from it.
pub fn place(grid: Grid, params: LevelParams, config: &Config, rng: &mut impl Rng) -> Result<Level> {
    if grid.width() < MIN_GRID_SIDE || grid.height() < MIN_GRID_SIDE {
        return Err(GenerationError::InvalidDimensions {
            width: grid.width(),
            height: grid.height(),
            min: MIN_GRID_SIDE,
        });
    }
    let mut sampler = Sampler {
        grid: &grid,
        rng,
        attempts: config.placement_attempts,
    };

    let corner = (PLAYER_START_MIN, PLAYER_START_MAX.min(grid.width() - 2));
    let corner_y = (PLAYER_START_MIN, PLAYER_START_MAX.min(grid.height() - 2));
    let player_start = sampler.draw(Attempt::PlayerStart, corner, corner_y, |_| true)?;

    let min_distance = config.min_spawn_distance;
    let exclusive = !config.allow_overlapping_spawns;
    let (xs, ys) = sampler.interior();
    let mut taken = HashSet::new();

    let mut keys = Vec::with_capacity(params.key_count);
    for _ in 0..params.key_count {
        let pos = sampler.draw(Attempt::Key, xs, ys, |pos| {
            pos.distance(player_start) >= min_distance && !(exclusive && taken.contains(&pos))
        })?;
        taken.insert(pos);
        keys.push(pos);
    }

    let mut agents = Vec::with_capacity(params.agent_count);
    for _ in 0..params.agent_count {
        let pos = sampler.draw(Attempt::AgentSpawn, xs, ys, |pos| {
            pos.distance(player_start) >= min_distance && !(exclusive && taken.contains(&pos))
        })?;
        taken.insert(pos);
        agents.push(pos);
    }

    tracing::debug!(?player_start, keys = keys.len(), agents = agents.len(), "placed entities");
    Ok(Level::new(grid, params, player_start, keys, agents))
}
