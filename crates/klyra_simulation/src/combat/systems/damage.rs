//! Regeneration: stamina игрока, здоровье манекенов

use bevy::prelude::*;

use crate::combat::components::{PlayerHealth, TrainingDummy};

/// Система: регенерация stamina (после задержки без урона)
pub fn regenerate_stamina(time: Res<Time<Fixed>>, mut players: Query<&mut PlayerHealth>) {
    let now = time.elapsed_secs_f64();
    let delta = time.delta_secs();

    for mut health in players.iter_mut() {
        if !health.is_dead() {
            health.regenerate(now, delta);
        }
    }
}

/// Система: регенерация манекенов
pub fn regenerate_dummies(time: Res<Time<Fixed>>, mut dummies: Query<&mut TrainingDummy>) {
    let now = time.elapsed_secs_f64();
    let delta = time.delta_secs();

    for mut dummy in dummies.iter_mut() {
        dummy.regenerate(now, delta);
    }
}
