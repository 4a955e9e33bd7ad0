//! Тесты детерминизма
//!
//! Одинаковый seed → идентичные позиции, здоровье и состояние поведения.

use bevy::prelude::*;
use klyra_simulation::*;

fn spawn_arena(commands: &mut Commands) {
    spawn_player(commands, Vec3::ZERO);
    spawn_enemy(
        commands,
        Vec3::new(0.0, 0.0, -8.0),
        EnemyBehavior::chase(ChaseConfig::default()),
        None,
    );
    for i in 0..5 {
        spawn_enemy(
            commands,
            Vec3::new(i as f32 * 6.0 - 12.0, 0.0, 20.0),
            EnemyBehavior::wander(WanderConfig::default()),
            None,
        );
    }
    spawn_enemy(
        commands,
        Vec3::new(40.0, 0.0, 0.0),
        EnemyBehavior::patrol(PatrolConfig {
            waypoints: vec![Vec3::new(40.0, 0.0, 0.0), Vec3::new(40.0, 0.0, 10.0)],
            ..Default::default()
        }),
        None,
    );
}

/// Запускает симуляцию и возвращает snapshot мира
fn run_simulation(seed: u64, tick_count: usize) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_arena(&mut commands);
    }
    app.world_mut().flush();

    for _ in 0..tick_count {
        app.update();
    }

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<Transform>(world);
    snapshot.extend(world_snapshot::<PlayerHealth>(world));
    snapshot.extend(world_snapshot::<EnemyBehavior>(world));
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 600;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_different_seeds_diverge() {
    // Wander точки зависят от RNG
    let snapshot1 = run_simulation(1, 300);
    let snapshot2 = run_simulation(2, 300);

    assert_ne!(snapshot1, snapshot2);
}
