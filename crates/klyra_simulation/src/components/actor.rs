//! Базовые компоненты акторов: Player, Health

use bevy::prelude::*;

use crate::combat::{PlayerHealth, SwordHitbox, WeaponController, WeaponInput};

/// Игрок (локальный, управляемый input'ом)
///
/// Автоматически добавляет weapon state machine, input, health/stamina и
/// хитбокс меча через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(WeaponController, WeaponInput, PlayerHealth, SwordHitbox, Transform)]
pub struct Player;

/// Здоровье врага
///
/// Инвариант: 0 ≤ current ≤ max. Монотонно убывает, смерть при 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    pub fn percent(&self) -> f32 {
        self.current / self.max
    }
}
