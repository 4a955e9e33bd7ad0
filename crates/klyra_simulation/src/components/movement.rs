//! Movement компоненты: kinematic перемещение врагов
//!
//! Behavior пишет desired displacement в `CharacterMotion`, host character
//! controller (или встроенный `KinematicMotor`) применяет его к Transform.

use bevy::prelude::*;

/// Горизонтальное направление короче этого игнорируется (уже на месте)
pub const MIN_MOVE_DIRECTION: f32 = 0.1;
/// Постоянный прижим к земле при движении (units/sec)
pub const GROUND_STICK_SPEED: f32 = 5.0;
/// Скорость поворота при движении
pub const MOVE_TURN_RATE: f32 = 10.0;
/// Скорость поворота "лицом к цели" на месте
pub const FACE_TURN_RATE: f32 = 5.0;

/// Желаемое перемещение за текущий tick
///
/// `displacement` обнуляется в начале каждого fixed tick и накапливается
/// behavior + gravity системами.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterMotion {
    pub displacement: Vec3,
    /// Горизонтальная скорость последнего движения (для locomotion анимации)
    pub current_speed: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,
}

impl CharacterMotion {
    pub fn begin_tick(&mut self) {
        self.displacement = Vec3::ZERO;
    }
}

/// Маркер: перемещение применяет встроенный kinematic motor (без host controller)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct KinematicMotor;

/// Нормализованное горизонтальное направление from → to
///
/// `None` если цель ближе `MIN_MOVE_DIRECTION` по горизонтали.
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let mut delta = to - from;
    delta.y = 0.0;
    if delta.length() < MIN_MOVE_DIRECTION {
        return None;
    }
    Some(delta.normalize())
}

/// Горизонтальная дистанция (высота не влияет на arrival)
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Плавный поворот к горизонтальному направлению
pub fn turn_toward(transform: &mut Transform, direction: Vec3, rate: f32, dt: f32) {
    let target = Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation;
    let t = (rate * dt).clamp(0.0, 1.0);
    transform.rotation = transform.rotation.slerp(target, t);
}

/// Движение к цели: horizontal direction × speed + прижим к земле, поворот по ходу
///
/// Возвращает `false` если уже на месте.
pub fn move_toward(
    transform: &mut Transform,
    motion: &mut CharacterMotion,
    target: Vec3,
    speed: f32,
    dt: f32,
) -> bool {
    let Some(direction) = horizontal_direction(transform.translation, target) else {
        motion.current_speed = 0.0;
        return false;
    };

    motion.displacement += direction * speed * dt + Vec3::NEG_Y * GROUND_STICK_SPEED * dt;
    motion.current_speed = speed;
    turn_toward(transform, direction, MOVE_TURN_RATE, dt);
    true
}

/// Повернуться к цели, не двигаясь
pub fn face_toward(transform: &mut Transform, target: Vec3, dt: f32) {
    if let Some(direction) = horizontal_direction(transform.translation, target) {
        turn_toward(transform, direction, FACE_TURN_RATE, dt);
    }
}

/// Остановка (для locomotion анимации)
pub fn stand_still(motion: &mut CharacterMotion) {
    motion.current_speed = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_direction_ignores_height() {
        let dir = horizontal_direction(Vec3::ZERO, Vec3::new(0.0, 10.0, -4.0)).unwrap();
        assert!((dir - Vec3::NEG_Z).length() < 1e-5);

        assert!(horizontal_direction(Vec3::ZERO, Vec3::new(0.05, 3.0, 0.0)).is_none());
    }

    #[test]
    fn test_move_toward_accumulates_displacement() {
        let mut transform = Transform::default();
        let mut motion = CharacterMotion::default();

        assert!(move_toward(&mut transform, &mut motion, Vec3::new(10.0, 0.0, 0.0), 2.0, 0.5));
        assert!((motion.displacement - Vec3::new(1.0, -2.5, 0.0)).length() < 1e-5);
        assert_eq!(motion.current_speed, 2.0);

        // Поворот к +X (forward = -Z по умолчанию)
        assert!(transform.forward().as_vec3().x > 0.0);
    }

    #[test]
    fn test_move_toward_at_target_stops() {
        let mut transform = Transform::from_xyz(1.0, 0.0, 1.0);
        let mut motion = CharacterMotion {
            current_speed: 4.0,
            ..Default::default()
        };

        assert!(!move_toward(&mut transform, &mut motion, Vec3::new(1.05, 0.0, 1.0), 4.0, 0.1));
        assert_eq!(motion.displacement, Vec3::ZERO);
        assert_eq!(motion.current_speed, 0.0);
    }

    #[test]
    fn test_face_toward_full_step() {
        let mut transform = Transform::default();
        // rate 5 × dt 1 → t clamp 1 → поворот сразу
        face_toward(&mut transform, Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert!((transform.forward().as_vec3() - Vec3::Z).length() < 1e-4);
    }
}
