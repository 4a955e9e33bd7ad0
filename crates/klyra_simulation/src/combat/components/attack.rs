//! Типы атак (контракт с animator и replication)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::replication::ReplicationError;

/// Тип атаки
///
/// Int значения = параметр `AttackType` animator'а и поле replication события.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum AttackType {
    #[default]
    None = 0,
    LightCombo = 1,
    HeavyFlourish = 2,
    HeavyStab = 3,
    HeavyCombo = 4,
    Fencing = 5,
    Leaping = 6,
    Parry = 7,
}

/// Визуальный вариант slash эффекта (host выбирает prefab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SlashKind {
    Light,
    Heavy,
    Stab,
    Finisher,
}

impl AttackType {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Атаки с combo step 1..=3 (остальные всегда step 1)
    pub fn is_combo(self) -> bool {
        matches!(self, AttackType::LightCombo | AttackType::HeavyCombo)
    }

    pub fn is_heavy(self) -> bool {
        matches!(
            self,
            AttackType::HeavyFlourish | AttackType::HeavyStab | AttackType::HeavyCombo | AttackType::Leaping
        )
    }

    pub fn slash_kind(self) -> SlashKind {
        match self {
            AttackType::HeavyFlourish | AttackType::HeavyCombo => SlashKind::Heavy,
            AttackType::HeavyStab | AttackType::Fencing => SlashKind::Stab,
            AttackType::Leaping => SlashKind::Finisher,
            AttackType::None | AttackType::LightCombo | AttackType::Parry => SlashKind::Light,
        }
    }
}

impl TryFrom<i32> for AttackType {
    type Error = ReplicationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => AttackType::None,
            1 => AttackType::LightCombo,
            2 => AttackType::HeavyFlourish,
            3 => AttackType::HeavyStab,
            4 => AttackType::HeavyCombo,
            5 => AttackType::Fencing,
            6 => AttackType::Leaping,
            7 => AttackType::Parry,
            other => return Err(ReplicationError::UnknownAttackType(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_type_ints_are_stable() {
        assert_eq!(AttackType::None.as_i32(), 0);
        assert_eq!(AttackType::LightCombo.as_i32(), 1);
        assert_eq!(AttackType::Parry.as_i32(), 7);
        assert_eq!(AttackType::try_from(6).unwrap(), AttackType::Leaping);
        assert!(matches!(
            AttackType::try_from(8),
            Err(ReplicationError::UnknownAttackType(8))
        ));
    }

    #[test]
    fn test_slash_kinds() {
        assert_eq!(AttackType::LightCombo.slash_kind(), SlashKind::Light);
        assert_eq!(AttackType::Fencing.slash_kind(), SlashKind::Stab);
        assert_eq!(AttackType::Leaping.slash_kind(), SlashKind::Finisher);
        assert_eq!(AttackType::HeavyCombo.slash_kind(), SlashKind::Heavy);
    }
}
