//! Настройки симуляции верхнего уровня
//!
//! Tuning отдельных подсистем живёт рядом с ними (`WeaponTimings`,
//! `EnemyCombatConfig`, `ChaseConfig`, ...): все они serde-структуры с
//! `Default`, поэтому host может грузить их из любого формата.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Seed + частота fixed tick
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Seed для `DeterministicRng`
    pub seed: u64,
    /// Частота FixedUpdate (Hz)
    pub tick_hz: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
        }
    }
}

impl SimulationSettings {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Длительность одного tick в секундах
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_hz
    }
}
