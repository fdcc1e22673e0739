use rand::Rng;

use crate::components::{EntityKind, Vec2};
use crate::config::Config;
use crate::connectivity;
use crate::constants::*;
use crate::error::{GenerationError, Result};
use crate::grid::{self, Cell, Grid, TilePos};
use crate::placement;
use crate::rooms;

/// Difficulty derived from the level index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelParams {
    pub index: u32,
    pub width: usize,
    pub height: usize,
    pub key_count: usize,
    pub agent_count: usize,
}

impl LevelParams {
    pub fn for_level(index: u32) -> Result<Self> {
        if index == 0 || index > MAX_LEVEL_INDEX {
            return Err(GenerationError::InvalidLevelIndex(index));
        }
        let i = index as usize;
        Ok(Self {
            index,
            width: BASE_WIDTH + i,
            height: BASE_HEIGHT + i,
            key_count: BASE_KEYS + i / 2,
            agent_count: BASE_AGENTS + i,
        })
    }

    pub fn max_agent_health(&self) -> i32 {
        i32::try_from(self.index)
            .unwrap_or(i32::MAX)
            .saturating_mul(HEALTH_PER_LEVEL)
    }
}

/// A fully generated, connected layout with its placements. Read-only once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    params: LevelParams,
    grid: Grid,
    player_start: TilePos,
    keys: Vec<TilePos>,
    agent_spawns: Vec<TilePos>,
}

impl Level {
    pub(crate) fn new(
        grid: Grid,
        params: LevelParams,
        player_start: TilePos,
        keys: Vec<TilePos>,
        agent_spawns: Vec<TilePos>,
    ) -> Self {
        Self {
            params,
            grid,
            player_start,
            keys,
            agent_spawns,
        }
    }

    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    pub fn index(&self) -> u32 {
        self.params.index
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_start(&self) -> TilePos {
        self.player_start
    }

    pub fn player_start_position(&self) -> Vec2 {
        self.player_start.to_world()
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[TilePos] {
        &self.keys
    }

    pub fn agent_spawns(&self) -> &[TilePos] {
        &self.agent_spawns
    }

    /// One record per wall tile, key and agent, walls first, in world units.
    pub fn create_entities(&self) -> Vec<(EntityKind, Vec2)> {
        let walls = self
            .grid
            .cells()
            .filter(|(_, cell)| *cell == Cell::Wall)
            .map(|(pos, _)| (EntityKind::Wall, pos.to_world()));
        let keys = self.keys.iter().map(|pos| (EntityKind::Key, pos.to_world()));
        let agents = self
            .agent_spawns
            .iter()
            .map(|pos| (EntityKind::Agent, pos.to_world()));
        walls.chain(keys).chain(agents).collect()
    }
}

/// Runs carve, room carving, repair and placement for one level index.
pub fn generate_level(index: u32, config: &Config, rng: &mut impl Rng) -> Result<Level> {
    let params = LevelParams::for_level(index)?;
    let mut grid = grid::carve(params.width, params.height, rng)?;
    rooms::carve_rooms(&mut grid, config.room_chance, rng)?;
    let passes = connectivity::repair(&mut grid, config.repair_passes, rng)?;
    let level = placement::place(grid, params, config, rng)?;
    tracing::info!(
        index,
        width = params.width,
        height = params.height,
        keys = level.key_count(),
        agents = level.agent_spawns().len(),
        repair_passes = passes,
        "level generated"
    );
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeded_rng;

    #[test]
    fn first_level_params() {
        let params = LevelParams::for_level(1).unwrap();
        assert_eq!((params.width, params.height), (21, 16));
        assert_eq!(params.key_count, 3);
        assert_eq!(params.agent_count, 3);
        assert_eq!(params.max_agent_health(), 2);
    }

    #[test]
    fn params_scale_with_index() {
        let params = LevelParams::for_level(5).unwrap();
        assert_eq!((params.width, params.height), (25, 20));
        assert_eq!(params.key_count, 5);
        assert_eq!(params.agent_count, 7);
        assert_eq!(params.max_agent_health(), 10);
    }

    #[test]
    fn level_zero_is_rejected() {
        assert_eq!(
            LevelParams::for_level(0),
            Err(GenerationError::InvalidLevelIndex(0))
        );
    }

    #[test]
    fn huge_level_index_is_rejected_and_health_saturates() {
        assert_eq!(
            LevelParams::for_level(MAX_LEVEL_INDEX + 1),
            Err(GenerationError::InvalidLevelIndex(MAX_LEVEL_INDEX + 1))
        );
        let top = LevelParams::for_level(MAX_LEVEL_INDEX).unwrap();
        assert_eq!(top.max_agent_health(), 2_000);
        let params = LevelParams {
            index: u32::MAX,
            ..top
        };
        assert_eq!(params.max_agent_health(), i32::MAX);
        let params = LevelParams {
            index: (i32::MAX / 2 + 1) as u32,
            ..top
        };
        assert_eq!(params.max_agent_health(), i32::MAX);
    }

    #[test]
    fn entity_records_cover_walls_keys_and_agents() {
        let level = generate_level(2, &Config::default(), &mut seeded_rng(21)).unwrap();
        let records = level.create_entities();
        let walls = records.iter().filter(|(k, _)| *k == EntityKind::Wall).count();
        let keys: Vec<_> = records.iter().filter(|(k, _)| *k == EntityKind::Key).collect();
        let agents = records.iter().filter(|(k, _)| *k == EntityKind::Agent).count();
        assert_eq!(walls, level.grid().width() * level.grid().height() - level.grid().open_count());
        assert_eq!(keys.len(), level.key_count());
        assert_eq!(agents, level.agent_spawns().len());
        assert_eq!(keys[0].1, level.keys()[0].to_world());
        assert_eq!(level.player_start_position(), level.player_start().to_world());
    }

    #[test]
    fn failed_generation_returns_no_level() {
        let config = Config {
            room_chance: 2.0,
            ..Config::default()
        };
        assert!(matches!(
            generate_level(1, &config, &mut seeded_rng(0)),
            Err(GenerationError::InvalidProbability(_))
        ));
    }
}
