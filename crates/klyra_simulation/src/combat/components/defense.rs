//! Damage intake игрока: parry → block → hit
//!
//! Порядок проверок фиксирован:
//! 1. Parried: блок начат не позже `parry_window` назад и атака спереди
//!    (угол < 90°): урон 0, награда stamina.
//! 2. Blocked: блок, атака спереди, stamina > 0: урон × (1 - reduction),
//!    stamina -= cost. Underflow stamina → clamp 0, урон × 0.5, результат Hit.
//! 3. Hit: полный урон.
//!
//! Stamina регенерирует после `stamina_regen_delay` без урона.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Порог "нулевого" направления атаки (направление неизвестно → считаем спереди)
const ZERO_DIRECTION_EPSILON: f32 = 1e-6;

/// Tuning защиты игрока
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    pub max_health: f32,
    /// Доля урона, поглощаемая блоком (0.9 = 90%)
    pub block_damage_reduction: f32,
    pub block_stamina_cost: f32,
    /// Окно parry от начала блока (секунды)
    pub parry_window: f32,
    pub parry_stamina_reward: f32,
    pub max_stamina: f32,
    /// Регенерация stamina (units/sec)
    pub stamina_regen: f32,
    /// Задержка регенерации после последнего урона
    pub stamina_regen_delay: f32,
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            block_damage_reduction: 0.9,
            block_stamina_cost: 10.0,
            parry_window: 0.4,
            parry_stamina_reward: 20.0,
            max_stamina: 100.0,
            stamina_regen: 20.0,
            stamina_regen_delay: 1.0,
        }
    }
}

/// Состояние блока защитника на момент удара
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct GuardState {
    pub is_blocking: bool,
    pub block_started_at: f64,
}

impl GuardState {
    pub fn in_parry_window(&self, now: f64, window: f32) -> bool {
        self.is_blocking && ((now - self.block_started_at) as f32) <= window
    }
}

/// Результат удара по игроку
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DamageResult {
    Hit,
    Blocked,
    Parried,
}

/// Итог `take_damage`: результат + фактический урон
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub result: DamageResult,
    pub damage_taken: f32,
    /// Игрок умер именно этим ударом
    pub died: bool,
}

/// Атака пришла спереди (угол между forward и направлением на атакующего < 90°)
///
/// `attack_direction`: направление удара (от атакующего к защитнику).
/// Нулевое направление считается атакой спереди.
pub fn is_facing_attack(forward: Vec3, attack_direction: Vec3) -> bool {
    if attack_direction.length_squared() < ZERO_DIRECTION_EPSILON {
        return true;
    }
    forward.dot(-attack_direction) > 0.0
}

/// Health + stamina игрока
///
/// Инвариант: 0 ≤ health ≤ max_health, 0 ≤ stamina ≤ max_stamina
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerHealth {
    pub config: DefenseConfig,
    current_health: f32,
    current_stamina: f32,
    last_damage_at: f64,
    is_dead: bool,
}

impl Default for PlayerHealth {
    fn default() -> Self {
        Self::new(DefenseConfig::default())
    }
}

impl PlayerHealth {
    pub fn new(config: DefenseConfig) -> Self {
        Self {
            config,
            current_health: config.max_health,
            current_stamina: config.max_stamina,
            last_damage_at: -10.0,
            is_dead: false,
        }
    }

    pub fn health(&self) -> f32 {
        self.current_health
    }

    pub fn stamina(&self) -> f32 {
        self.current_stamina
    }

    pub fn health_percent(&self) -> f32 {
        self.current_health / self.config.max_health
    }

    pub fn stamina_percent(&self) -> f32 {
        self.current_stamina / self.config.max_stamina
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Применить удар с учётом блока/parry
    pub fn take_damage(
        &mut self,
        amount: f32,
        attack_direction: Vec3,
        forward: Vec3,
        guard: GuardState,
        now: f64,
    ) -> DamageOutcome {
        if self.is_dead {
            return DamageOutcome {
                result: DamageResult::Hit,
                damage_taken: 0.0,
                died: false,
            };
        }

        let facing = is_facing_attack(forward, attack_direction);

        // 1. Parry
        if guard.in_parry_window(now, self.config.parry_window) && facing {
            self.current_stamina =
                (self.current_stamina + self.config.parry_stamina_reward).min(self.config.max_stamina);
            return DamageOutcome {
                result: DamageResult::Parried,
                damage_taken: 0.0,
                died: false,
            };
        }

        let mut result = DamageResult::Hit;
        let mut actual = amount;

        // 2. Block
        if guard.is_blocking && self.current_stamina > 0.0 && facing {
            result = DamageResult::Blocked;
            actual = amount * (1.0 - self.config.block_damage_reduction);
            self.current_stamina -= self.config.block_stamina_cost;

            if self.current_stamina < 0.0 {
                // Частичный блок: не хватило stamina
                self.current_stamina = 0.0;
                actual = amount * 0.5;
                result = DamageResult::Hit;
            }
        }

        // 3. Урон применяется всегда
        self.current_health = (self.current_health - actual).max(0.0);
        self.last_damage_at = now;

        let died = self.current_health <= 0.0;
        if died {
            self.is_dead = true;
        }

        DamageOutcome {
            result,
            damage_taken: actual,
            died,
        }
    }

    /// Регенерация stamina (после задержки без урона)
    pub fn regenerate(&mut self, now: f64, delta_time: f32) {
        if ((now - self.last_damage_at) as f32) > self.config.stamina_regen_delay {
            self.current_stamina =
                (self.current_stamina + self.config.stamina_regen * delta_time).min(self.config.max_stamina);
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.current_health = (self.current_health + amount).min(self.config.max_health);
    }

    pub fn restore_stamina(&mut self, amount: f32) {
        self.current_stamina = (self.current_stamina + amount).min(self.config.max_stamina);
    }

    pub fn set_health_percent(&mut self, percent: f32) {
        self.current_health = self.config.max_health * percent.clamp(0.0, 1.0);
    }

    pub fn set_stamina_percent(&mut self, percent: f32) {
        self.current_stamina = self.config.max_stamina * percent.clamp(0.0, 1.0);
    }
}
