use std::collections::HashSet;

use rand::Rng;

use crate::agent::{Agent, AgentController};
use crate::collision;
use crate::components::{Body, Entity, EntityArena, EntityId, EntityKind, KeyItem, Projectile, Vec2};
use crate::config::Config;
use crate::constants::{CONTACT_PUSH_FACTOR, PROJECTILE_DAMAGE, PROJECTILE_SIZE};
use crate::error::Result;
use crate::grid::Grid;
use crate::level::{generate_level, Level};
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    LevelComplete,
}

/// Fixed-tick simulation over one generated level.
pub struct Game {
    config: Config,
    controller: AgentController,
    level: Level,
    arena: EntityArena,
    player: Player,
    state: GameState,
    ticks: u64,
}

impl Game {
    pub fn new(level: Level, config: Config) -> Self {
        let max_health = level.params().max_agent_health();
        let mut arena = EntityArena::new();
        for (kind, position) in level.create_entities() {
            let entity = match kind {
                EntityKind::Wall => Entity::Wall(Body::tile(position)),
                EntityKind::Key => Entity::Key(KeyItem {
                    body: Body::tile(position),
                    active: true,
                }),
                EntityKind::Agent => Entity::Agent(Agent::new(position, max_health)),
                EntityKind::Projectile => continue,
            };
            arena.insert(entity);
        }
        let player = Player::new(level.player_start_position());
        Self {
            controller: AgentController::from_config(&config),
            config,
            level,
            arena,
            player,
            state: GameState::Playing,
            ticks: 0,
        }
    }

    /// Generates the configured start level.
    pub fn start(config: Config, rng: &mut impl Rng) -> Result<Self> {
        let level = generate_level(config.start_level, &config, rng)?;
        Ok(Self::new(level, config))
    }

    /// Swaps in the next level. On failure the current level stays in place.
    pub fn next_level(&mut self, rng: &mut impl Rng) -> Result<()> {
        let level = generate_level(self.level.index() + 1, &self.config, rng)?;
        *self = Self::new(level, self.config.clone());
        Ok(())
    }

    pub fn tick(&mut self, input: Vec2, rng: &mut impl Rng) {
        if self.state != GameState::Playing {
            return;
        }
        self.ticks += 1;

        self.player.apply_input(input, self.config.player_speed);
        self.player.step(self.level.grid());
        self.collect_keys();
        let killed = self.update_projectiles();
        self.update_agents(&killed, rng);
        self.handle_contact();
        self.arena
            .retain(|entity| !matches!(entity, Entity::Projectile(p) if !p.active));

        if self.player.keys() >= self.keys_required() {
            self.state = GameState::LevelComplete;
            tracing::info!(level = self.level.index(), ticks = self.ticks, "level complete");
        }
    }

    /// Spawns a projectile from the player's centre along its facing direction.
    pub fn fire(&mut self) -> Option<EntityId> {
        if self.state != GameState::Playing {
            return None;
        }
        let (dx, dy) = self.player.facing.delta();
        let size = Vec2::new(PROJECTILE_SIZE, PROJECTILE_SIZE);
        let projectile = Projectile {
            body: Body::new(self.player.center() - size * 0.5, size),
            velocity: Vec2::new(dx as f32, dy as f32) * self.config.projectile_speed,
            lifetime: self.config.projectile_lifetime,
            active: true,
        };
        Some(self.arena.insert(Entity::Projectile(projectile)))
    }

    fn collect_keys(&mut self) {
        let player_box = self.player.body.aabb();
        for (_, entity) in self.arena.iter_mut() {
            if let Entity::Key(key) = entity {
                if key.active && collision::resolve_entity_pair(&player_box, &key.body.aabb()) {
                    key.active = false;
                    self.player.collect_key();
                    tracing::debug!(keys = self.player.keys(), "key collected");
                }
            }
        }
    }

    /// Returns the agents killed this tick.
    fn update_projectiles(&mut self) -> HashSet<EntityId> {
        let grid = self.level.grid();
        let mut live = Vec::new();
        for (id, entity) in self.arena.iter_mut() {
            let Entity::Projectile(projectile) = entity else {
                continue;
            };
            projectile.body.position = projectile.body.position + projectile.velocity;
            projectile.lifetime = projectile.lifetime.saturating_sub(1);
            if projectile.lifetime == 0
                || collision::resolve_against_grid(&projectile.body.aabb(), grid)
            {
                projectile.active = false;
            } else {
                live.push((id, projectile.body.aabb()));
            }
        }

        let mut spent = HashSet::new();
        let mut killed = HashSet::new();
        for (agent_id, entity) in self.arena.iter_mut() {
            let Entity::Agent(agent) = entity else {
                continue;
            };
            for (id, aabb) in &live {
                if !agent.is_active() || spent.contains(id) {
                    continue;
                }
                if collision::resolve_entity_pair(aabb, &agent.body.aabb()) {
                    agent.take_damage(PROJECTILE_DAMAGE);
                    spent.insert(*id);
                    if !agent.is_active() {
                        killed.insert(agent_id);
                    }
                }
            }
        }
        for id in spent {
            if let Some(Entity::Projectile(projectile)) = self.arena.get_mut(id) {
                projectile.active = false;
            }
        }
        killed
    }

    /// The respawn countdown starts on the tick after death.
    fn update_agents(&mut self, killed: &HashSet<EntityId>, rng: &mut impl Rng) {
        let grid = self.level.grid();
        let target = self.player.center();
        for (id, entity) in self.arena.iter_mut() {
            match entity {
                Entity::Agent(agent) if !killed.contains(&id) => {
                    self.controller.step(agent, target, grid, rng)
                }
                _ => {}
            }
        }
    }

    /// An agent touching the player shoves it away, subject to wall rollback.
    fn handle_contact(&mut self) {
        let player_box = self.player.body.aabb();
        let shove = self.arena.iter().find_map(|(_, entity)| match entity {
            Entity::Agent(agent)
                if agent.is_active()
                    && collision::resolve_entity_pair(&player_box, &agent.body.aabb()) =>
            {
                let away = self.player.center() - agent.body.aabb().center();
                Some(away.normalize_or_zero() * self.config.player_speed * CONTACT_PUSH_FACTOR)
            }
            _ => None,
        });
        if let Some(delta) = shove {
            self.player.push(delta, self.level.grid());
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn grid(&self) -> &Grid {
        self.level.grid()
    }

    pub fn arena(&self) -> &EntityArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut EntityArena {
        &mut self.arena
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn keys_required(&self) -> usize {
        self.level.key_count()
    }

    pub fn agents(&self) -> impl Iterator<Item = (EntityId, &Agent)> {
        self.arena.iter().filter_map(|(id, entity)| match entity {
            Entity::Agent(agent) => Some((id, agent)),
            _ => None,
        })
    }

    /// What the render layer draws this tick: active entities only.
    pub fn active_entities(&self) -> Vec<(EntityKind, Vec2)> {
        self.arena
            .iter()
            .filter(|(_, entity)| entity.is_active())
            .map(|(_, entity)| (entity.kind(), entity.body().position))
            .collect()
    }
}
