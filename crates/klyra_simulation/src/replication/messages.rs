//! Wire типы replication (serde)
//!
//! Минимальное состояние оружия + discrete события. Enum'ы идут как int
//! (стабильные discriminants `WeaponState` / `AttackType`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::components::{AttackDispatched, AttackType, WeaponController, WeaponState};

/// Сетевой идентификатор актора (выдаёт host transport)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct NetworkId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplicationError {
    #[error("unknown weapon state discriminant {0}")]
    UnknownWeaponState(i32),
    #[error("unknown attack type discriminant {0}")]
    UnknownAttackType(i32),
}

/// Snapshot оружия (шлётся каждый tick владельцем)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeaponSnapshot {
    pub weapon_state: i32,
    pub is_blocking: bool,
    pub is_armed: bool,
}

impl WeaponSnapshot {
    pub fn capture(controller: &WeaponController) -> Self {
        let state = controller.weapon_state();
        Self {
            weapon_state: state.as_i32(),
            is_blocking: controller.is_blocking(),
            is_armed: state.is_armed(),
        }
    }

    pub fn state(&self) -> Result<WeaponState, ReplicationError> {
        WeaponState::try_from(self.weapon_state)
    }
}

/// Discrete событие атаки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub attack_type: i32,
    pub combo_step: i32,
}

impl AttackEvent {
    pub fn attack_type(&self) -> Result<AttackType, ReplicationError> {
        AttackType::try_from(self.attack_type)
    }
}

impl From<AttackDispatched> for AttackEvent {
    fn from(attack: AttackDispatched) -> Self {
        Self {
            attack_type: attack.attack_type.as_i32(),
            combo_step: attack.combo_step,
        }
    }
}

/// Сообщение для peers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReplicationMessage {
    Snapshot { id: NetworkId, snapshot: WeaponSnapshot },
    Attack { id: NetworkId, attack: AttackEvent },
    Draw { id: NetworkId },
    Sheathe { id: NetworkId },
}

impl ReplicationMessage {
    pub fn id(&self) -> NetworkId {
        match *self {
            Self::Snapshot { id, .. }
            | Self::Attack { id, .. }
            | Self::Draw { id }
            | Self::Sheathe { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_of_fresh_controller() {
        let snapshot = WeaponSnapshot::capture(&WeaponController::default());
        assert_eq!(snapshot, WeaponSnapshot::default());
        assert_eq!(snapshot.state(), Ok(WeaponState::Sheathed));
    }

    #[test]
    fn test_unknown_discriminants_are_rejected() {
        let snapshot = WeaponSnapshot {
            weapon_state: 9,
            ..Default::default()
        };
        assert_eq!(snapshot.state(), Err(ReplicationError::UnknownWeaponState(9)));

        let attack = AttackEvent {
            attack_type: -1,
            combo_step: 1,
        };
        assert_eq!(attack.attack_type(), Err(ReplicationError::UnknownAttackType(-1)));
    }

    #[test]
    fn test_message_wire_format() {
        let message = ReplicationMessage::Attack {
            id: NetworkId(7),
            attack: AttackEvent {
                attack_type: AttackType::LightCombo.as_i32(),
                combo_step: 2,
            },
        };

        let json = serde_json::to_value(message).unwrap();
        assert_eq!(json["kind"], "Attack");
        assert_eq!(json["id"], 7);
        assert_eq!(json["attack"]["attack_type"], 1);
        assert_eq!(json["attack"]["combo_step"], 2);

        let back: ReplicationMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back.id(), NetworkId(7));
    }
}
