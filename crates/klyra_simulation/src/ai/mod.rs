//! AI module: поведение врагов
//!
//! Behaviors: Idle, Patrol, Wander, Chase (выбираются при спавне).
//! LOD throttling: дальние враги тикают реже, с увеличенным `dt`.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::{
    pick_wander_target, BehaviorBody, BehaviorContext, BehaviorTick, ChaseConfig, ChasePhase, Enemy,
    EnemyBehavior, EnemyLod, GravityConfig, IdleConfig, LodBands, PatrolConfig, WanderConfig,
};

use crate::SimulationSet;

/// AI Plugin
///
/// Порядок выполнения (SimulationSet::Ai):
/// 1. update_enemy_lod: LOD tick, сброс displacement
/// 2. advance_enemy_behaviors: behavior tick (due враги)
/// 3. apply_enemy_gravity: ground check + вертикальная скорость
/// 4. apply_kinematic_motion: displacement → Transform
/// 5. update_locomotion_animation: параметры animator'а
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                systems::update_enemy_lod,
                systems::advance_enemy_behaviors,
                systems::apply_enemy_gravity,
                systems::apply_kinematic_motion,
                systems::update_locomotion_animation,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Ai),
        );
    }
}
