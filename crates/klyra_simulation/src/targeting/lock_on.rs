//! Lock-on: выбор цели для камеры и боя
//!
//! Кандидаты: snapshot TargetRegistry (враги + манекены). Score =
//! distance + angle × 0.5, меньше: лучше; цели дальше `range` или вне
//! конуса `max_angle` не рассматриваются. Захват снимается, когда цель
//! исчезла или ушла дальше `range × release_multiplier`.
//!
//! Камера (host) подписывается на `LockOnChanged`: typed capability вместо
//! поиска компонента камеры по имени типа.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::registry::{TargetRegistry, Targetable};
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct LockOnConfig {
    pub range: f32,
    /// Половина угла конуса захвата (градусы)
    pub max_angle_deg: f32,
    /// Захват снимается дальше range × multiplier
    pub release_multiplier: f32,
    pub angle_weight: f32,
    /// Высота индикатора над целью
    pub indicator_height: f32,
}

impl Default for LockOnConfig {
    fn default() -> Self {
        Self {
            range: 20.0,
            max_angle_deg: 60.0,
            release_multiplier: 1.5,
            angle_weight: 0.5,
            indicator_height: 2.2,
        }
    }
}

/// Текущий захват (на entity игрока)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct LockOn {
    pub config: LockOnConfig,
    target: Option<Entity>,
}

impl LockOn {
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_locked(&self) -> bool {
        self.target.is_some()
    }

    /// Score кандидата (`None`: вне дистанции или конуса)
    pub fn score(&self, origin: Vec3, forward: Vec3, target: Vec3) -> Option<f32> {
        let to_target = target - origin;
        let distance = to_target.length();
        if distance > self.config.range {
            return None;
        }

        // Цель в той же точке: угол 0
        let angle = if distance > f32::EPSILON {
            forward.angle_between(to_target).to_degrees()
        } else {
            0.0
        };
        if angle > self.config.max_angle_deg {
            return None;
        }

        Some(distance + angle * self.config.angle_weight)
    }

    /// Лучший кандидат (при равном score побеждает первый)
    pub fn pick_best(
        &self,
        origin: Vec3,
        forward: Vec3,
        candidates: impl IntoIterator<Item = (Entity, Vec3)>,
    ) -> Option<Entity> {
        let mut best: Option<(Entity, f32)> = None;
        for (entity, position) in candidates {
            let Some(score) = self.score(origin, forward, position) else {
                continue;
            };
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((entity, score));
            }
        }
        best.map(|(entity, _)| entity)
    }

    /// Захват ещё валиден (цель жива и не слишком далеко)
    pub fn should_release(&self, origin: Vec3, target_position: Option<Vec3>) -> bool {
        match target_position {
            None => true,
            Some(position) => {
                origin.distance(position) > self.config.range * self.config.release_multiplier
            }
        }
    }

    /// Позиция индикатора над целью
    pub fn indicator_position(&self, target_position: Vec3) -> Vec3 {
        target_position + Vec3::Y * self.config.indicator_height
    }
}

/// Input: переключить lock-on (захват, если свободен; иначе снять)
#[derive(Event, Debug, Clone, Copy)]
pub struct LockOnToggled {
    pub entity: Entity,
}

/// Lock-on цель изменилась (`None`: захват снят)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOnChanged {
    pub entity: Entity,
    pub target: Option<Entity>,
}

/// Система: toggle input + автоматическое снятие захвата
pub fn update_lock_on(
    mut toggles: EventReader<LockOnToggled>,
    mut lockers: Query<(Entity, &Transform, &mut LockOn)>,
    targets: Query<&Transform, With<Targetable>>,
    registry: Res<TargetRegistry>,
    mut changed: EventWriter<LockOnChanged>,
) {
    let requested: Vec<Entity> = toggles.read().map(|event| event.entity).collect();

    for (entity, transform, mut lock_on) in lockers.iter_mut() {
        let origin = transform.translation;

        if requested.contains(&entity) {
            if lock_on.target.take().is_some() {
                logger::log(&format!("🎯 {:?}: lock-on released", entity));
                changed.write(LockOnChanged {
                    entity,
                    target: None,
                });
            } else {
                let candidates = registry
                    .enemies()
                    .iter()
                    .chain(registry.dummies())
                    .filter(|candidate| registry.contains(**candidate))
                    .filter_map(|&candidate| {
                        targets.get(candidate).ok().map(|t| (candidate, t.translation))
                    });
                let forward = transform.forward().as_vec3();
                if let Some(target) = lock_on.pick_best(origin, forward, candidates) {
                    lock_on.target = Some(target);
                    logger::log(&format!("🎯 {:?}: locked on {:?}", entity, target));
                    changed.write(LockOnChanged {
                        entity,
                        target: Some(target),
                    });
                }
            }
            continue;
        }

        let Some(target) = lock_on.target else {
            continue;
        };
        let target_position = registry
            .contains(target)
            .then(|| targets.get(target).ok().map(|t| t.translation))
            .flatten();
        if lock_on.should_release(origin, target_position) {
            lock_on.target = None;
            logger::log(&format!("🎯 {:?}: lock-on lost {:?}", entity, target));
            changed.write(LockOnChanged {
                entity,
                target: None,
            });
        }
    }
}
