//! Combat module: weapon/enemy state machines, hit resolution, damage
//!
//! ECS ответственность:
//! - State machines: WeaponController (игрок), EnemyCombat (враги)
//! - Combat rules: parry → block → hit, at-most-once-per-swing
//! - Events: TargetHit, PlayerDamaged, EntityDied, EnemyDefeated
//!
//! Host ответственность:
//! - Animator: читает AnimationRequested (параметры, triggers, клипы)
//! - Collision: SpatialQuery (overlap sphere, ground raycast)

use bevy::prelude::*;

pub mod animation;
pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use animation::{AnimationCommand, AnimationRequested, AnimationSink, SoundCue};
pub use components::*;
pub use events::*;

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. Registry: character swap, socket binding
/// 2. Combat: weapon tick игрока, enemy combat tick
/// 3. Resolve: hitbox → урон по целям → смерть/despawn, удары врагов по
///    игроку, регенерация, mesh swap
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AnimationRequested>()
            .add_event::<WeaponAttackStarted>()
            .add_event::<WeaponTransitionStarted>()
            .add_event::<WeaponTransitionCompleted>()
            .add_event::<TargetHit>()
            .add_event::<EnemyStrike>()
            .add_event::<EnemyTelegraphStarted>()
            .add_event::<EnemyStaggered>()
            .add_event::<PlayerDamaged>()
            .add_event::<EntityDied>()
            .add_event::<EnemyDefeated>()
            .add_event::<CharacterSwapRequested>();

        app.add_systems(
            FixedUpdate,
            (systems::handle_character_swaps, systems::bind_weapon_sockets)
                .chain()
                .in_set(SimulationSet::Registry),
        );

        app.add_systems(
            FixedUpdate,
            (systems::advance_player_weapons, systems::advance_enemy_combat)
                .chain()
                .in_set(SimulationSet::Combat),
        );

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: урон игрока по целям
                systems::resolve_sword_hits,
                systems::apply_target_hits,
                systems::despawn_dead_enemies,
                // Фаза 2: удары врагов по игроку
                systems::resolve_enemy_strikes,
                // Фаза 3: регенерация
                systems::regenerate_stamina,
                systems::regenerate_dummies,
                // Фаза 4: визуал оружия
                systems::apply_weapon_swaps,
            )
                .chain()
                .in_set(SimulationSet::Resolve),
        );
    }
}
