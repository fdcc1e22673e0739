use rand::seq::SliceRandom;
use rand::Rng;

use crate::collision;
use crate::components::{Body, Vec2};
use crate::config::Config;
use crate::grid::{Dir, Grid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    Patrol,
    Chase,
    /// Never entered by the controller.
    Idle,
    Respawning,
}

/// A hostile agent. Dying only parks it in `Respawning`; it is never deallocated.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub body: Body,
    pub velocity: Vec2,
    state: AgentState,
    health: i32,
    max_health: i32,
    spawn: Vec2,
    patrol_timer: u32,
    respawn_timer: u32,
}

impl Agent {
    pub fn new(spawn: Vec2, max_health: i32) -> Self {
        Self {
            body: Body::tile(spawn),
            velocity: Vec2::ZERO,
            state: AgentState::Patrol,
            health: max_health,
            max_health,
            spawn,
            patrol_timer: 0,
            respawn_timer: 0,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn
    }

    pub fn patrol_timer(&self) -> u32 {
        self.patrol_timer
    }

    pub fn respawn_timer(&self) -> u32 {
        self.respawn_timer
    }

    pub fn is_active(&self) -> bool {
        self.state != AgentState::Respawning
    }

    /// Inactive agents ignore damage.
    pub fn take_damage(&mut self, amount: i32) {
        if !self.is_active() {
            return;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.die();
        }
    }

    fn die(&mut self) {
        self.state = AgentState::Respawning;
        self.respawn_timer = 0;
        self.velocity = Vec2::ZERO;
    }

    fn respawn(&mut self) {
        self.body.position = self.spawn;
        self.health = self.max_health;
        self.state = AgentState::Patrol;
        self.velocity = Vec2::ZERO;
        self.patrol_timer = 0;
        self.respawn_timer = 0;
    }
}

/// Per-tick state machine: move first, then evaluate transitions against the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentController {
    pub detection_radius: f32,
    pub speed: f32,
    pub patrol_interval: u32,
    pub respawn_ticks: u32,
}

impl AgentController {
    pub fn from_config(config: &Config) -> Self {
        Self {
            detection_radius: config.detection_radius,
            speed: config.agent_speed,
            patrol_interval: config.patrol_interval,
            respawn_ticks: config.respawn_ticks,
        }
    }

    /// Advances one agent by one tick. `target` is the centre of the player's box.
    pub fn step(&self, agent: &mut Agent, target: Vec2, grid: &Grid, rng: &mut impl Rng) {
        let before = agent.state;
        match agent.state {
            AgentState::Respawning => {
                agent.respawn_timer += 1;
                if agent.respawn_timer >= self.respawn_ticks {
                    agent.respawn();
                }
            }
            _ if agent.health <= 0 => agent.die(),
            _ => {
                collision::try_move(&mut agent.body, agent.velocity, grid);

                if agent.state == AgentState::Patrol {
                    agent.patrol_timer += 1;
                    if agent.patrol_timer >= self.patrol_interval {
                        agent.patrol_timer = 0;
                        agent.velocity = self.patrol_velocity(&agent.body, grid, rng);
                    }
                }

                let to_target = target - agent.body.aabb().center();
                if to_target.length() <= self.detection_radius {
                    agent.state = AgentState::Chase;
                    agent.velocity = to_target.normalize_or_zero() * self.speed;
                } else if agent.state == AgentState::Chase {
                    agent.state = AgentState::Patrol;
                }
            }
        }
        if agent.state != before {
            tracing::trace!(from = ?before, to = ?agent.state, position = ?agent.body.position, "agent transition");
        }
    }

    /// Random axis-aligned heading whose first step is not blocked; zero if boxed in.
    fn patrol_velocity(&self, body: &Body, grid: &Grid, rng: &mut impl Rng) -> Vec2 {
        let mut dirs = Dir::ALL;
        dirs.shuffle(rng);
        dirs.iter()
            .map(|dir| {
                let (dx, dy) = dir.delta();
                Vec2::new(dx as f32, dy as f32) * self.speed
            })
            .find(|velocity| {
                let next = body.aabb_at(body.position + *velocity);
                !collision::resolve_against_grid(&next, grid)
            })
            .unwrap_or(Vec2::ZERO)
    }
}
