//! Procedural maze levels with guaranteed connectivity, constrained entity placement and a
//! tick-driven pursuit state machine for hostile agents.
//!
//! Generation runs `carve -> carve_rooms -> repair -> place` once per level; [`game::Game`]
//! then simulates the level one fixed tick at a time. All randomness flows through a single
//! caller-owned [`GameRng`].

pub mod agent;
pub mod collision;
pub mod components;
pub mod config;
pub mod connectivity;
pub mod constants;
pub mod error;
pub mod game;
pub mod grid;
pub mod level;
pub mod placement;
pub mod player;
pub mod rooms;

use rand::SeedableRng;

pub use agent::{Agent, AgentController, AgentState};
pub use components::{Aabb, Entity, EntityArena, EntityId, EntityKind, Vec2};
pub use config::Config;
pub use error::{GenerationError, Result};
pub use game::{Game, GameState};
pub use grid::{Cell, Dir, Grid, TilePos};
pub use level::{generate_level, Level, LevelParams};

pub type GameRng = rand_chacha::ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> GameRng {
    GameRng::seed_from_u64(seed)
}
