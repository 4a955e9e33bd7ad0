//! Headless симуляция Klyra
//!
//! Игрок стоит в центре арены, chase враг подходит и атакует,
//! patrol/wander враги ходят по своим маршрутам.

use bevy::prelude::*;
use klyra_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting Klyra headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let player = {
        let world = app.world_mut();
        let mut commands = world.commands();
        spawn_scene(&mut commands)
    };
    app.world_mut().flush();

    // 20 секунд симуляции
    for tick in 0..1200 {
        // Игрок достаёт меч на первой секунде
        if tick == 60 {
            if let Some(mut input) = app.world_mut().get_mut::<WeaponInput>(player) {
                input.toggle_weapon = true;
            }
        }

        app.update();

        if tick % 120 == 0 {
            let world = app.world();
            let entity_count = world.entities().len();
            let health = world
                .get::<PlayerHealth>(player)
                .map_or(0.0, |health| health.health());
            println!("Tick {}: {} entities, player health {:.1}", tick, entity_count, health);
        }
    }

    println!("Simulation complete!");
}

fn spawn_scene(commands: &mut Commands) -> Entity {
    let player = spawn_player(commands, Vec3::ZERO);
    spawn_enemy(
        commands,
        Vec3::new(0.0, 0.0, -10.0),
        EnemyBehavior::chase(ChaseConfig::default()),
        Some("knight"),
    );
    spawn_enemy(
        commands,
        Vec3::new(12.0, 0.0, 0.0),
        EnemyBehavior::patrol(PatrolConfig {
            waypoints: vec![Vec3::new(12.0, 0.0, 0.0), Vec3::new(12.0, 0.0, 8.0)],
            ..Default::default()
        }),
        None,
    );
    spawn_enemy(
        commands,
        Vec3::new(-20.0, 0.0, 5.0),
        EnemyBehavior::wander(WanderConfig::default()),
        None,
    );
    spawn_training_dummy(commands, Vec3::new(2.0, 0.0, 2.0));
    player
}
