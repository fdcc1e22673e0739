use crate::constants::*;

const DEFAULT_TICK_MS: u64 = 16;

/// Tunables shared by generation and simulation. `Default` holds the reference values.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub seed: u64,
    pub start_level: u32,
    pub tick_ms: u64,

    pub room_chance: f64,
    pub min_spawn_distance: f32,
    pub placement_attempts: u32,
    pub repair_passes: u32,
    /// Lets keys and agent spawns share cells with each other.
    pub allow_overlapping_spawns: bool,

    pub player_speed: f32,
    pub agent_speed: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: u32,
    pub detection_radius: f32,
    pub patrol_interval: u32,
    pub respawn_ticks: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 0,
            start_level: 1,
            tick_ms: DEFAULT_TICK_MS,
            room_chance: ROOM_CHANCE,
            min_spawn_distance: MIN_SPAWN_DISTANCE_TILES,
            placement_attempts: PLACEMENT_ATTEMPTS,
            repair_passes: REPAIR_PASSES,
            allow_overlapping_spawns: false,
            player_speed: PLAYER_SPEED,
            agent_speed: AGENT_SPEED,
            projectile_speed: PROJECTILE_SPEED,
            projectile_lifetime: PROJECTILE_LIFETIME_TICKS,
            detection_radius: DETECTION_RADIUS,
            patrol_interval: PATROL_INTERVAL_TICKS,
            respawn_ticks: RESPAWN_TICKS,
        }
    }
}

impl Config {
    /// Defaults overridden by `ZOMBIE_MAZE_*` environment variables. Unparsable or out of
    /// range values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(seed) = lookup("ZOMBIE_MAZE_SEED").and_then(|v| v.parse::<u64>().ok()) {
            config.seed = seed;
        }
        if let Some(level) = lookup("ZOMBIE_MAZE_LEVEL")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
        {
            config.start_level = level;
        }
        if let Some(tick_ms) = lookup("ZOMBIE_MAZE_TICK_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
        {
            config.tick_ms = tick_ms;
        }
        if let Some(chance) = lookup("ZOMBIE_MAZE_ROOM_CHANCE")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| (0.0..=1.0).contains(v))
        {
            config.room_chance = chance;
        }
        config
    }
}
