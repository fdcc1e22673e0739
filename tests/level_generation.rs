use std::collections::HashSet;

use proptest::prelude::*;
use zombie_maze::{generate_level, seeded_rng, Config, GenerationError, Level, TilePos};

fn reachable_from(level: &Level, start: TilePos) -> usize {
    let grid = level.grid();
    let mut seen = HashSet::from([start]);
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        for next in grid.open_neighbors(pos) {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen.len()
}

#[test]
fn first_level_scenario() {
    let config = Config::default();
    let level = generate_level(1, &config, &mut seeded_rng(2024)).unwrap();

    assert_eq!(level.grid().width(), 21);
    assert_eq!(level.grid().height(), 16);
    assert_eq!(level.grid().components().len(), 1);
    assert_eq!(level.key_count(), 3);
    assert_eq!(level.keys().len(), 3);
    assert_eq!(level.agent_spawns().len(), 3);

    let start = level.player_start();
    for pos in level.keys().iter().chain(level.agent_spawns()) {
        assert!(pos.distance(start) >= 5.0, "{pos:?} too close to {start:?}");
    }
}

#[test]
fn generation_is_reproducible_per_seed() {
    let config = Config::default();
    let a = generate_level(3, &config, &mut seeded_rng(77)).unwrap();
    let b = generate_level(3, &config, &mut seeded_rng(77)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn invalid_level_index_fails_before_carving() {
    assert_eq!(
        generate_level(0, &Config::default(), &mut seeded_rng(0)),
        Err(GenerationError::InvalidLevelIndex(0))
    );
}

#[test]
fn overlapping_spawns_still_satisfy_constraints() {
    let config = Config {
        allow_overlapping_spawns: true,
        ..Config::default()
    };
    for seed in 0..20 {
        let level = generate_level(4, &config, &mut seeded_rng(seed)).unwrap();
        let start = level.player_start();
        for pos in level.keys().iter().chain(level.agent_spawns()) {
            assert!(level.grid().is_open(*pos));
            assert!(pos.distance(start) >= config.min_spawn_distance);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_open_cell_is_reachable(seed in any::<u64>(), index in 1_u32..=8) {
        let level = generate_level(index, &Config::default(), &mut seeded_rng(seed)).unwrap();
        let open = level.grid().open_cells();
        prop_assert!(!open.is_empty());
        prop_assert_eq!(reachable_from(&level, open[open.len() / 2]), open.len());
        prop_assert_eq!(reachable_from(&level, level.player_start()), open.len());
    }

    #[test]
    fn placements_sit_on_open_cells_far_from_start(seed in any::<u64>(), index in 1_u32..=8) {
        let config = Config::default();
        let level = generate_level(index, &config, &mut seeded_rng(seed)).unwrap();
        let start = level.player_start();
        prop_assert!(level.grid().is_open(start));
        prop_assert_eq!(level.keys().len(), 3 + index as usize / 2);
        prop_assert_eq!(level.agent_spawns().len(), 2 + index as usize);
        for pos in level.keys().iter().chain(level.agent_spawns()) {
            prop_assert!(level.grid().is_open(*pos));
            prop_assert!(pos.distance(start) >= config.min_spawn_distance);
        }
    }

    #[test]
    fn spawns_are_mutually_exclusive_by_default(seed in any::<u64>(), index in 1_u32..=8) {
        let level = generate_level(index, &Config::default(), &mut seeded_rng(seed)).unwrap();
        let all: Vec<_> = level.keys().iter().chain(level.agent_spawns()).copied().collect();
        let unique: HashSet<_> = all.iter().copied().collect();
        prop_assert_eq!(unique.len(), all.len());
    }
}
