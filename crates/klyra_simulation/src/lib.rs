//! Klyra Simulation Core
//!
//! Headless боевое ядро на Bevy 0.16 (strategic layer):
//! weapon/enemy state machines, enemy AI с LOD, registry целей, hit resolution,
//! health/damage с parry и block, replication adapter.
//!
//! Host engine (рендер, physics, animator, network transport) управляет ядром
//! через компоненты и читает события:
//! - `WeaponInput` → `WeaponController` (игрок)
//! - `AnimationRequested` → host animator
//! - `SpatialQuery` → host collision
//! - `ReplicationPeer` → host transport

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod progression;
pub mod replication;
pub mod spatial;
pub mod spawn;
pub mod targeting;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, ChaseConfig, ChasePhase, Enemy, EnemyBehavior, IdleConfig, PatrolConfig, WanderConfig};
pub use combat::{
    AnimationCommand, AnimationRequested, AttackType, CombatPlugin, Dead, EnemyCombat, EnemyDefeated,
    EntityDied, PlayerDamaged, PlayerHealth, TargetHit, TrainingDummy, WeaponController, WeaponInput,
    WeaponState,
};
pub use components::*;
pub use config::SimulationSettings;
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use progression::{CharacterUnlocks, CycleCharacterRequested, ProgressionPlugin};
pub use replication::{NetworkId, ReplicationLink, ReplicationPlugin, RemoteWeaponView};
pub use spatial::{FlatGround, SpatialQueries, SpatialQuery};
pub use spawn::{spawn_enemy, spawn_player, spawn_remote_player, spawn_training_dummy};
pub use targeting::{LockOn, TargetRegistry, Targetable, TargetingPlugin};

/// Фазы fixed tick (строго последовательно)
///
/// 1. Registry: lifecycle целей, unlock/cycle персонажа, character swap, socket binding
/// 2. Ai: LOD, behavior, гравитация, движение
/// 3. Combat: weapon/enemy state machines, lock-on
/// 4. Resolve: хиты, урон, смерть, регенерация
/// 5. Replication: входящие сообщения, remote views, publish
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Registry,
    Ai,
    Combat,
    Resolve,
    Replication,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Seed и частоту tick берёт из `SimulationSettings` (если resource уже есть).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<SimulationSettings>()
            .copied()
            .unwrap_or_default();

        app.insert_resource(settings)
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(settings.tick_hz))
            // Детерминистичный RNG
            .insert_resource(DeterministicRng::new(settings.seed))
            // Без host physics: плоская земля
            .init_resource::<SpatialQueries>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Registry,
                    SimulationSet::Ai,
                    SimulationSet::Combat,
                    SimulationSet::Resolve,
                    SimulationSet::Replication,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((TargetingPlugin, CombatPlugin, AIPlugin, ProgressionPlugin, ReplicationPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` = ровно один fixed tick (manual time), поэтому
/// прогон не зависит от wall-clock. Первый update: startup без tick'а.
pub fn create_headless_app(seed: u64) -> App {
    let settings = SimulationSettings::with_seed(seed);

    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(settings)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(settings.tick_hz))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            settings.tick_seconds(),
        )));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
