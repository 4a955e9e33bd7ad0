//! Enemy movement: гравитация, kinematic motor, locomotion анимация

use bevy::prelude::*;

use crate::ai::components::{Enemy, EnemyLod, GravityConfig};
use crate::combat::animation::{
    flush_commands, AnimationCommand, AnimationRequested, AnimationSink, PARAM_CURRENT_GAIT,
    PARAM_IS_GROUNDED, PARAM_IS_JUMPING, PARAM_IS_STOPPED, PARAM_IS_STRAFING,
    PARAM_MOVEMENT_INPUT_HELD, PARAM_MOVE_SPEED,
};
use crate::combat::Dead;
use crate::components::{CharacterMotion, KinematicMotor};
use crate::spatial::SpatialQueries;

/// Быстрее этого: бег (CurrentGait = 1)
const RUN_SPEED_THRESHOLD: f32 = 3.0;
const MOVING_SPEED_THRESHOLD: f32 = 0.1;

/// Система: гравитация (ground check raycast'ом вниз от pivot + offset)
pub fn apply_enemy_gravity(
    spatial: Res<SpatialQueries>,
    mut enemies: Query<
        (&Transform, &GravityConfig, &EnemyLod, &mut CharacterMotion),
        (With<Enemy>, Without<Dead>),
    >,
) {
    for (transform, gravity, lod, mut motion) in enemies.iter_mut() {
        if !lod.is_due() {
            continue;
        }

        let origin = transform.translation + Vec3::Y * gravity.ray_origin_offset;
        let grounded = spatial.raycast(origin, Vec3::NEG_Y, gravity.ray_length);
        let dy = gravity.integrate(&mut motion, grounded, lod.delta());
        motion.displacement.y += dy;
    }
}

/// Система: встроенный motor применяет displacement к Transform
///
/// Без коллизий: только clamp к `ground_height`. Актёры без `KinematicMotor`
/// двигает host character controller.
pub fn apply_kinematic_motion(
    spatial: Res<SpatialQueries>,
    mut movers: Query<(&mut Transform, &mut CharacterMotion), With<KinematicMotor>>,
) {
    for (mut transform, mut motion) in movers.iter_mut() {
        if motion.displacement == Vec3::ZERO {
            continue;
        }

        transform.translation += motion.displacement;

        if let Some(ground) = spatial.ground_height(transform.translation) {
            if transform.translation.y < ground {
                transform.translation.y = ground;
                motion.grounded = true;
            }
        }
    }
}

/// Система: locomotion параметры animator'а (на due кадрах)
pub fn update_locomotion_animation(
    enemies: Query<(Entity, &CharacterMotion, &EnemyLod), (With<Enemy>, Without<Dead>)>,
    mut animation: EventWriter<AnimationRequested>,
    mut buffer: Local<Vec<AnimationCommand>>,
) {
    for (entity, motion, lod) in enemies.iter() {
        if !lod.is_due() {
            continue;
        }

        write_locomotion(&mut *buffer, motion.current_speed);
        flush_commands(entity, &mut buffer, &mut animation);
    }
}

/// Параметры locomotion blend tree по текущей скорости
pub fn write_locomotion(sink: &mut impl AnimationSink, speed: f32) {
    sink.set_float(PARAM_MOVE_SPEED, speed);
    sink.set_bool(PARAM_IS_GROUNDED, true);
    sink.set_bool(PARAM_IS_JUMPING, false);
    sink.set_float(PARAM_IS_STRAFING, 0.0);
    sink.set_bool(PARAM_MOVEMENT_INPUT_HELD, speed > MOVING_SPEED_THRESHOLD);
    sink.set_bool(PARAM_IS_STOPPED, speed < MOVING_SPEED_THRESHOLD);
    sink.set_int(PARAM_CURRENT_GAIT, i32::from(speed > RUN_SPEED_THRESHOLD));
}
