//! Spawn helpers: полные наборы компонентов для акторов
//!
//! Host может собирать entity сам; эти helper'ы задают минимально
//! рабочий набор (headless demo, тесты).

use bevy::prelude::*;

use crate::ai::{Enemy, EnemyBehavior};
use crate::combat::components::sockets::{SOCKET_SWORD_HAND, SOCKET_SWORD_SHEATHED};
use crate::combat::{AttachmentPoint, EnemyCombat, TrainingDummy, WeaponSocketNames};
use crate::components::{KinematicMotor, Player};
use crate::replication::{NetworkId, RemoteWeaponView};
use crate::targeting::{LockOn, Targetable};

/// Точки крепления меча (рука + ножны) для владельца
///
/// Host обычно находит их на модели; здесь: пустые дочерние entity с именами.
/// Despawn владельца удаляет и sockets (`ChildOf`).
pub fn spawn_weapon_sockets(commands: &mut Commands, owner: Entity) {
    commands.spawn((AttachmentPoint::new(owner, SOCKET_SWORD_HAND), ChildOf(owner)));
    commands.spawn((AttachmentPoint::new(owner, SOCKET_SWORD_SHEATHED), ChildOf(owner)));
}

/// Spawn helper: локальный игрок
///
/// Required components: WeaponController, WeaponInput, PlayerHealth, SwordHitbox.
/// Sockets биндятся на первом tick (`WeaponSocketNames`).
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    let player = commands
        .spawn((
            Player,
            Transform::from_translation(position),
            LockOn::default(),
            WeaponSocketNames::default(),
        ))
        .id();

    spawn_weapon_sockets(commands, player);
    player
}

/// Spawn helper: враг с поведением
///
/// Chase враги получают `EnemyCombat` (draw/telegraph/stagger); остальные
/// поведения без оружия. Движение: встроенный kinematic motor.
pub fn spawn_enemy(
    commands: &mut Commands,
    position: Vec3,
    behavior: EnemyBehavior,
    character_model_id: Option<&str>,
) -> Entity {
    let armed = matches!(behavior, EnemyBehavior::Chase(_));

    let mut entity = commands.spawn((
        Enemy {
            character_model_id: character_model_id.map(str::to_owned),
        },
        Transform::from_translation(position),
        behavior,
        Targetable::enemy(),
        KinematicMotor,
    ));

    if armed {
        entity.insert((EnemyCombat::default(), WeaponSocketNames::default()));
    }

    let enemy = entity.id();
    if armed {
        spawn_weapon_sockets(commands, enemy);
    }
    enemy
}

/// Spawn helper: тренировочный манекен
pub fn spawn_training_dummy(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            TrainingDummy::default(),
            Targetable::training_dummy(),
            Transform::from_translation(position),
        ))
        .id()
}

/// Spawn helper: remote игрок (рендер чужого состояния оружия)
pub fn spawn_remote_player(commands: &mut Commands, id: NetworkId, position: Vec3) -> Entity {
    let remote = commands
        .spawn((
            id,
            RemoteWeaponView::default(),
            Transform::from_translation(position),
            WeaponSocketNames::default(),
        ))
        .id();

    spawn_weapon_sockets(commands, remote);
    remote
}
