//! Enemy компоненты: маркер врага, LOD throttling, гравитация

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{CharacterMotion, Health};

/// Враг (AI-управляемый актор)
///
/// `character_model_id` уходит в `EnemyDefeated` (квесты, статистика).
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Health, EnemyLod, CharacterMotion, GravityConfig, Transform)]
pub struct Enemy {
    pub character_model_id: Option<String>,
}

impl Enemy {
    pub fn with_model(id: impl Into<String>) -> Self {
        Self {
            character_model_id: Some(id.into()),
        }
    }
}

/// Пороги дистанции до игрока для LOD (метры)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct LodBands {
    pub near: f32,
    pub mid: f32,
    pub far: f32,
}

impl Default for LodBands {
    fn default() -> Self {
        Self {
            near: 15.0,
            mid: 30.0,
            far: 50.0,
        }
    }
}

impl LodBands {
    /// Интервал обновления (в fixed tick'ах) по квадрату дистанции
    pub fn update_interval(&self, distance_sq: f32) -> u32 {
        if distance_sq < self.near * self.near {
            1
        } else if distance_sq < self.mid * self.mid {
            2
        } else if distance_sq < self.far * self.far {
            4
        } else {
            8
        }
    }
}

/// LOD throttling: behavior/gravity тикают раз в `interval` кадров
///
/// `delta` = wall-clock время с прошлого due tick (не tick_dt), поэтому
/// скорости не зависят от интервала.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyLod {
    pub bands: LodBands,
    interval: u32,
    frame_counter: u32,
    last_update_at: Option<f64>,
    due: bool,
    delta: f32,
}

impl Default for EnemyLod {
    fn default() -> Self {
        Self::new(LodBands::default())
    }
}

impl EnemyLod {
    pub fn new(bands: LodBands) -> Self {
        Self {
            bands,
            interval: 1,
            frame_counter: 0,
            last_update_at: None,
            due: false,
            delta: 0.0,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Должен ли враг обновиться в этом tick
    pub fn is_due(&self) -> bool {
        self.due
    }

    /// Время с прошлого due tick
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Один fixed tick. `distance_sq = None` (нет игрока) → каждый кадр.
    ///
    /// Первый tick всегда due, `delta = tick_dt`.
    pub fn tick(&mut self, distance_sq: Option<f32>, now: f64, tick_dt: f32) -> bool {
        self.interval = distance_sq.map_or(1, |d| self.bands.update_interval(d));
        self.frame_counter = self.frame_counter.wrapping_add(1);

        self.due = match self.last_update_at {
            None => true,
            Some(_) => self.frame_counter >= self.interval,
        };

        if self.due {
            self.delta = self.last_update_at.map_or(tick_dt, |last| (now - last) as f32);
            self.last_update_at = Some(now);
            self.frame_counter = 0;
        } else {
            self.delta = 0.0;
        }

        self.due
    }
}

/// Гравитация врага (ground check через SpatialQuery raycast)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct GravityConfig {
    pub gravity: f32,
    /// Вертикальная скорость на земле (прижим)
    pub grounded_velocity: f32,
    /// Старт луча над pivot'ом
    pub ray_origin_offset: f32,
    pub ray_length: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            grounded_velocity: -2.0,
            ray_origin_offset: 0.1,
            ray_length: 0.4,
        }
    }
}

impl GravityConfig {
    /// Обновить вертикальную скорость и вернуть смещение по Y за `dt`
    pub fn integrate(&self, motion: &mut CharacterMotion, grounded: bool, dt: f32) -> f32 {
        motion.grounded = grounded;
        if grounded && motion.vertical_velocity < 0.0 {
            motion.vertical_velocity = self.grounded_velocity;
        } else {
            motion.vertical_velocity += self.gravity * dt;
        }
        motion.vertical_velocity * dt
    }
}
