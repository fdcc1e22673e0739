pub const TILE_SIZE: f32 = 32.0;
pub const MIN_GRID_SIDE: usize = 5;

pub const BASE_WIDTH: usize = 20;
pub const BASE_HEIGHT: usize = 15;
pub const BASE_KEYS: usize = 3;
pub const BASE_AGENTS: usize = 2;
pub const HEALTH_PER_LEVEL: i32 = 2;
pub const MAX_LEVEL_INDEX: u32 = 1_000;

pub const TICKS_PER_SECOND: u32 = 60;
pub const PLAYER_SPEED: f32 = 4.0;
pub const AGENT_SPEED: f32 = 2.0;
pub const PROJECTILE_SPEED: f32 = 10.0;
pub const PROJECTILE_SIZE: f32 = 8.0;
pub const PROJECTILE_LIFETIME_TICKS: u32 = 2 * TICKS_PER_SECOND;
pub const PROJECTILE_DAMAGE: i32 = 1;
pub const DETECTION_RADIUS: f32 = 150.0;
pub const PATROL_INTERVAL_TICKS: u32 = 2 * TICKS_PER_SECOND;
pub const RESPAWN_TICKS: u32 = 15 * TICKS_PER_SECOND;
pub const CONTACT_PUSH_FACTOR: f32 = 2.0;

pub const ROOM_CHANCE: f64 = 0.20;
pub const MIN_SPAWN_DISTANCE_TILES: f32 = 5.0;
pub const PLAYER_START_MIN: usize = 1;
pub const PLAYER_START_MAX: usize = 3;
pub const PLACEMENT_ATTEMPTS: u32 = 10_000;
pub const REPAIR_PASSES: u32 = 32;
