//! Training dummy: цель для отработки ударов
//!
//! Не умирает (health clamp в 0), регенерирует после паузы без ударов.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DummyConfig {
    pub max_health: f32,
    pub regenerate: bool,
    /// Пауза без ударов перед регенерацией (секунды)
    pub regen_delay: f32,
    /// HP/sec
    pub regen_rate: f32,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            regenerate: true,
            regen_delay: 2.0,
            regen_rate: 50.0,
        }
    }
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct TrainingDummy {
    pub config: DummyConfig,
    current_health: f32,
    last_hit_at: f64,
}

impl Default for TrainingDummy {
    fn default() -> Self {
        Self::new(DummyConfig::default())
    }
}

impl TrainingDummy {
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            current_health: config.max_health,
            last_hit_at: -10.0,
        }
    }

    pub fn health(&self) -> f32 {
        self.current_health
    }

    pub fn take_damage(&mut self, amount: f32, now: f64) {
        self.current_health = (self.current_health - amount).max(0.0);
        self.last_hit_at = now;
    }

    pub fn regenerate(&mut self, now: f64, delta_time: f32) {
        if !self.config.regenerate || self.current_health >= self.config.max_health {
            return;
        }
        if ((now - self.last_hit_at) as f32) > self.config.regen_delay {
            self.current_health =
                (self.current_health + self.config.regen_rate * delta_time).min(self.config.max_health);
        }
    }

    pub fn reset(&mut self) {
        self.current_health = self.config.max_health;
    }
}
