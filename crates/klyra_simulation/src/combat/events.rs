//! Combat события (для host: UI, звук, VFX, replication)

use bevy::prelude::*;

use super::components::{AttackType, DamageResult, SlashKind, WeaponState};

/// Событие: игрок начал атаку
///
/// Уходит в replication как discrete `AttackEvent`, `slash`: подсказка для VFX.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponAttackStarted {
    pub entity: Entity,
    pub attack_type: AttackType,
    pub combo_step: i32,
    pub slash: SlashKind,
}

/// Событие: начался draw (Drawing) или sheathe (Sheathing)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponTransitionStarted {
    pub entity: Entity,
    pub state: WeaponState,
}

/// Событие: переход завершён (Equipped / Sheathed)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponTransitionCompleted {
    pub entity: Entity,
    pub state: WeaponState,
}

/// Событие: меч игрока попал по цели (ровно один раз за swing)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TargetHit {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
}

/// Событие: telegraph врага истёк, удар по игроку
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyStrike {
    pub attacker: Entity,
    pub damage: f32,
}

/// Событие: враг начал telegraph (wind-up перед ударом)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyTelegraphStarted {
    pub entity: Entity,
    pub duration: f32,
}

/// Событие: враг оглушён (после parry)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EnemyStaggered {
    pub entity: Entity,
    pub until: f64,
}

/// Событие: удар по игроку разрешён (Hit / Blocked / Parried)
///
/// Host показывает flash (parry/hit), camera shake и т.п.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerDamaged {
    pub player: Entity,
    pub attacker: Entity,
    pub result: DamageResult,
    pub damage: f32,
    pub died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Событие: враг побеждён (hook для разблокировки персонажа)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct EnemyDefeated {
    pub entity: Entity,
    pub character_model_id: Option<String>,
}

/// Запрос смены персонажа игрока (новая модель уже заспавнена host'ом)
///
/// Меч мгновенно убирается, sockets перепривязываются к новой модели,
/// `redraw`: достать меч заново после смены.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSwapRequested {
    pub entity: Entity,
    pub redraw: bool,
}

/// Компонент-маркер: entity мертв
///
/// Combat/AI системы пропускают такие entity; враги деспавнятся.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;
