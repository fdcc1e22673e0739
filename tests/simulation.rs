use zombie_maze::collision::try_move;
use zombie_maze::components::Body;
use zombie_maze::{
    generate_level, seeded_rng, AgentState, Config, Entity, EntityKind, Game, GameState, Vec2,
};

#[test]
fn player_never_enters_walls() {
    let config = Config::default();
    let mut rng = seeded_rng(31);
    let mut game = Game::start(config, &mut rng).unwrap();
    let inputs = [
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, -1.0),
    ];
    for tick in 0..2_000 {
        let before = game.player().body.position;
        game.tick(inputs[(tick / 37) % inputs.len()], &mut rng);
        if game.state() != GameState::Playing {
            break;
        }
        let aabb = game.player().body.aabb();
        assert!(
            !zombie_maze::collision::resolve_against_grid(&aabb, game.grid()),
            "tick {tick}: player moved from {before:?} into a wall at {:?}",
            aabb.min
        );
    }
}

#[test]
fn agents_stay_inside_the_layout() {
    let config = Config::default();
    let mut rng = seeded_rng(8);
    let mut game = Game::start(config, &mut rng).unwrap();
    for _ in 0..3_000 {
        game.tick(Vec2::ZERO, &mut rng);
        for (_, agent) in game.agents() {
            if agent.is_active() {
                assert!(!zombie_maze::collision::resolve_against_grid(
                    &agent.body.aabb(),
                    game.grid()
                ));
            }
        }
    }
}

#[test]
fn blocked_step_ends_at_pre_move_position() {
    let level = generate_level(1, &Config::default(), &mut seeded_rng(12)).unwrap();
    let grid = level.grid();
    let wall = grid
        .cells()
        .find(|(pos, cell)| {
            *cell == zombie_maze::Cell::Wall
                && pos.x > 0
                && grid.is_open(zombie_maze::TilePos::new(pos.x - 1, pos.y))
        })
        .map(|(pos, _)| pos)
        .unwrap();
    let start = zombie_maze::TilePos::new(wall.x - 1, wall.y).to_world();
    let mut body = Body::tile(start);
    assert!(!try_move(&mut body, Vec2::new(3.0, 0.0), grid));
    assert_eq!(body.position, start);
}

#[test]
fn shot_agent_respawns_after_fixed_duration() {
    let config = Config::default();
    let respawn_ticks = config.respawn_ticks;
    let mut rng = seeded_rng(99);
    let mut game = Game::start(config, &mut rng).unwrap();
    let ids: Vec<_> = game.agents().map(|(id, _)| id).collect();
    let agent_id = ids[0];
    // Keep the others from shoving the player around while we wait.
    for id in &ids[1..] {
        game.arena_mut().remove(*id);
    }
    let (spawn, max_health) = match game.arena().get(agent_id) {
        Some(Entity::Agent(agent)) => (agent.spawn_position(), agent.max_health()),
        _ => panic!("agent missing"),
    };
    assert_eq!(max_health, 2);

    if let Some(Entity::Agent(agent)) = game.arena_mut().get_mut(agent_id) {
        agent.take_damage(max_health);
    }
    for _ in 0..respawn_ticks - 1 {
        game.tick(Vec2::ZERO, &mut rng);
        let Some(Entity::Agent(agent)) = game.arena().get(agent_id) else {
            panic!("agent slot must survive death");
        };
        assert_eq!(agent.state(), AgentState::Respawning);
        let visible = game
            .active_entities()
            .iter()
            .filter(|(kind, _)| *kind == EntityKind::Agent)
            .count();
        assert_eq!(visible, 0);
    }
    game.tick(Vec2::ZERO, &mut rng);
    let Some(Entity::Agent(agent)) = game.arena().get(agent_id) else {
        panic!("agent slot must survive death");
    };
    assert_eq!(agent.state(), AgentState::Patrol);
    assert_eq!(agent.body.position, spawn);
    assert_eq!(agent.health(), max_health);
    assert_eq!(game.state(), GameState::Playing);
}

#[test]
fn chasing_agent_heads_for_the_player() {
    let config = Config::default();
    let radius = config.detection_radius;
    let speed = config.agent_speed;
    let mut rng = seeded_rng(5);
    let mut game = Game::start(config, &mut rng).unwrap();
    let (agent_id, _) = game.agents().next().unwrap();
    let player_pos = game.player().body.position;

    // Drop the agent just right of the player, overlapping the player's tile.
    if let Some(Entity::Agent(agent)) = game.arena_mut().get_mut(agent_id) {
        agent.body.position = player_pos + Vec2::new(4.0, 0.0);
    }
    game.tick(Vec2::ZERO, &mut rng);
    let Some(Entity::Agent(agent)) = game.arena().get(agent_id) else {
        panic!("agent missing");
    };
    assert_eq!(agent.state(), AgentState::Chase);
    assert!(agent.body.aabb().center().distance(game.player().center()) <= radius + 8.0);
    // Heading is agent -> player as measured before the contact shove.
    assert!((agent.velocity.x + speed).abs() < 1e-5);
    assert!(agent.velocity.y.abs() < 1e-5);
}
