//! Sword hit resolution: at-most-once-per-swing урон по целям registry

use bevy::prelude::*;

use crate::ai::Enemy;
use crate::combat::components::{SwordHitbox, TrainingDummy, WeaponController};
use crate::combat::events::{Dead, EnemyDefeated, EntityDied, TargetHit};
use crate::components::Health;
use crate::logger;
use crate::spatial::SpatialQueries;
use crate::targeting::{TargetRegistry, Targetable};

/// Система: hitbox меча опрашивает цели, пока идёт атака
///
/// Кандидаты = цели registry в радиусе + host overlap (только
/// зарегистрированные цели). Каждая цель получает `TargetHit` не больше
/// одного раза за swing.
pub fn resolve_sword_hits(
    registry: Res<TargetRegistry>,
    spatial: Res<SpatialQueries>,
    mut attackers: Query<(Entity, &Transform, &WeaponController, &mut SwordHitbox), Without<Dead>>,
    targets: Query<&Transform, (With<Targetable>, Without<Dead>)>,
    mut hits: EventWriter<TargetHit>,
    mut candidates: Local<Vec<Entity>>,
    mut overlaps: Local<Vec<Entity>>,
) {
    for (attacker, transform, controller, mut hitbox) in attackers.iter_mut() {
        hitbox.update_window(controller.is_attacking(), controller.last_attack_at());
        if !hitbox.is_active() {
            continue;
        }

        let center = hitbox.hit_center(transform.translation, transform.forward().as_vec3());
        let radius = hitbox.config.radius;

        candidates.clear();
        registry.targets_in_range(
            center,
            radius,
            |entity| targets.get(entity).ok().map(|t| t.translation),
            &mut candidates,
        );

        overlaps.clear();
        spatial.overlap_sphere(center, radius, &mut overlaps);
        for &entity in overlaps.iter() {
            if registry.contains(entity) && targets.contains(entity) && !candidates.contains(&entity) {
                candidates.push(entity);
            }
        }

        for &target in candidates.iter() {
            if target == attacker {
                continue;
            }
            if hitbox.register_hit(target) {
                hits.write(TargetHit {
                    attacker,
                    target,
                    damage: hitbox.config.damage,
                });
            }
        }
    }
}

/// Система: применить `TargetHit` к врагам и манекенам
///
/// Смерть врага: маркер Dead, снятие с registry (сразу, до конца tick),
/// `EntityDied` + `EnemyDefeated`.
pub fn apply_target_hits(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut hits: EventReader<TargetHit>,
    mut registry: ResMut<TargetRegistry>,
    mut enemies: Query<(&mut Health, &Enemy), Without<Dead>>,
    mut dummies: Query<&mut TrainingDummy>,
    mut died: EventWriter<EntityDied>,
    mut defeated: EventWriter<EnemyDefeated>,
) {
    let now = time.elapsed_secs_f64();

    for hit in hits.read() {
        if let Ok((mut health, enemy)) = enemies.get_mut(hit.target) {
            if !health.is_alive() {
                continue;
            }
            health.take_damage(hit.damage);
            logger::log(&format!(
                "💥 Enemy {:?} took {} dmg (health {:.0}/{:.0})",
                hit.target, hit.damage, health.current, health.max
            ));

            if !health.is_alive() {
                registry.unregister(hit.target);
                commands.entity(hit.target).insert(Dead).remove::<Targetable>();

                logger::log_info(&format!("☠️ Enemy {:?} killed by {:?}", hit.target, hit.attacker));
                died.write(EntityDied {
                    entity: hit.target,
                    killer: Some(hit.attacker),
                });
                defeated.write(EnemyDefeated {
                    entity: hit.target,
                    character_model_id: enemy.character_model_id.clone(),
                });
            }
            continue;
        }

        if let Ok(mut dummy) = dummies.get_mut(hit.target) {
            dummy.take_damage(hit.damage, now);
            logger::log(&format!(
                "🎯 Dummy {:?} took {} dmg (health {:.0})",
                hit.target,
                hit.damage,
                dummy.health()
            ));
        }
    }
}

/// Система: despawn побеждённых врагов
pub fn despawn_dead_enemies(
    mut commands: Commands,
    mut died: EventReader<EntityDied>,
    enemies: Query<(), With<Enemy>>,
) {
    for event in died.read() {
        if enemies.contains(event.entity) {
            commands.entity(event.entity).despawn();
        }
    }
}
