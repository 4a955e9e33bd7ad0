//! Sword hitbox игрока: at-most-once-per-swing hit resolution
//!
//! Активное окно хитбокса = окно атаки владельца (`is_attacking`).
//! На переходе inactive → active hit set очищается (и на новом swing внутри
//! непрерывного окна: combo step через cancel window). Пока окно активно,
//! каждый tick сфера перед игроком опрашивается на цели, и каждая цель
//! получает урон не больше одного раза за swing.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tuning хитбокса меча
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SwordHitboxConfig {
    pub damage: f32,
    pub radius: f32,
    /// Смещение центра сферы вверх от позиции владельца
    pub up_offset: f32,
    /// Смещение центра сферы вперёд по facing владельца
    pub forward_offset: f32,
}

impl Default for SwordHitboxConfig {
    fn default() -> Self {
        Self {
            damage: 25.0,
            radius: 2.5,
            up_offset: 1.0,
            forward_offset: 1.5,
        }
    }
}

/// Цели, уже получившие урон в текущем окне атаки
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct HitResolutionSet {
    hit_entities: Vec<Entity>,
}

impl HitResolutionSet {
    pub fn clear(&mut self) {
        self.hit_entities.clear();
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.hit_entities.contains(&entity)
    }

    /// `true` если цель ещё не была поражена в этом окне
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.hit_entities.push(entity);
        true
    }

    pub fn len(&self) -> usize {
        self.hit_entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hit_entities.is_empty()
    }
}

/// Переход окна хитбокса на этом tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitWindowEdge {
    Opened,
    Closed,
    Unchanged,
}

/// Хитбокс меча (на entity владельца WeaponController)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SwordHitbox {
    pub config: SwordHitboxConfig,
    hits: HitResolutionSet,
    is_active: bool,
    /// Timestamp начала текущего swing (`last_attack_at` владельца)
    swing_started_at: f64,
}

impl SwordHitbox {
    pub fn new(config: SwordHitboxConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn hits(&self) -> &HitResolutionSet {
        &self.hits
    }

    /// Синхронизировать окно с атакой владельца
    pub fn update_window(&mut self, owner_attacking: bool, swing_started_at: f64) -> HitWindowEdge {
        if owner_attacking && (!self.is_active || swing_started_at != self.swing_started_at) {
            self.is_active = true;
            self.swing_started_at = swing_started_at;
            self.hits.clear();
            return HitWindowEdge::Opened;
        }
        if self.is_active && !owner_attacking {
            self.is_active = false;
            return HitWindowEdge::Closed;
        }
        HitWindowEdge::Unchanged
    }

    /// Центр сферы поражения
    pub fn hit_center(&self, owner_position: Vec3, owner_forward: Vec3) -> Vec3 {
        owner_position + Vec3::Y * self.config.up_offset + owner_forward * self.config.forward_offset
    }

    /// Зарегистрировать попадание. `false`: цель уже поражена в этом окне
    /// (или окно закрыто).
    pub fn register_hit(&mut self, target: Entity) -> bool {
        self.is_active && self.hits.insert(target)
    }
}
