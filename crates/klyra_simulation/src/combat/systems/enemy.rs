//! Enemy combat systems: telegraph/stagger tick + разрешение ударов по игроку

use bevy::prelude::*;

use crate::combat::animation::{flush_commands, AnimationCommand, AnimationRequested};
use crate::combat::components::{DamageResult, EnemyCombat, PlayerHealth, WeaponController};
use crate::combat::events::{Dead, EnemyStaggered, EnemyStrike, PlayerDamaged};
use crate::components::Player;
use crate::logger;
use crate::DeterministicRng;

/// Система: один tick enemy combat state machine
///
/// Истёкший telegraph → `EnemyStrike` (ровно один раз на telegraph).
pub fn advance_enemy_combat(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut enemies: Query<(Entity, &mut EnemyCombat), Without<Dead>>,
    mut animation: EventWriter<AnimationRequested>,
    mut strikes: EventWriter<EnemyStrike>,
    mut staggered: EventWriter<EnemyStaggered>,
    mut buffer: Local<Vec<AnimationCommand>>,
) {
    let now = time.elapsed_secs_f64();

    for (entity, mut combat) in enemies.iter_mut() {
        let tick = combat.advance(now, &mut rng.rng, &mut *buffer);

        if let Some(state) = tick.transition_completed {
            logger::log(&format!("🗡️ Enemy {:?}: weapon {:?}", entity, state));
        }

        if let Some(damage) = tick.strike {
            logger::log(&format!(
                "⚔️ Enemy {:?}: telegraph resolved → strike ({} dmg, step {})",
                entity,
                damage,
                combat.last_combo_step()
            ));
            strikes.write(EnemyStrike {
                attacker: entity,
                damage,
            });
        }

        if tick.stagger_started {
            if let Some(window) = combat.stagger_window() {
                logger::log(&format!("💫 Enemy {:?}: staggered until {:.2}", entity, window.ends_at));
                staggered.write(EnemyStaggered {
                    entity,
                    until: window.ends_at,
                });
            }
        }

        if tick.stagger_ended {
            logger::log(&format!("💫 Enemy {:?}: stagger ended", entity));
        }

        flush_commands(entity, &mut buffer, &mut animation);
    }
}

/// Система: удар врага по игроку (damage delegate)
///
/// Направление удара: от врага к игроку по горизонтали; facing/guard берутся
/// у игрока. `Parried` → враг оглушается после окончания своей атаки.
pub fn resolve_enemy_strikes(
    time: Res<Time<Fixed>>,
    mut strikes: EventReader<EnemyStrike>,
    mut enemies: Query<(&Transform, &mut EnemyCombat)>,
    mut players: Query<(Entity, &Transform, &WeaponController, &mut PlayerHealth), With<Player>>,
    mut damaged: EventWriter<PlayerDamaged>,
) {
    let now = time.elapsed_secs_f64();

    for strike in strikes.read() {
        let Ok((enemy_transform, mut enemy_combat)) = enemies.get_mut(strike.attacker) else {
            continue;
        };
        // Один локальный игрок; без игрока удар уходит в пустоту
        let Some((player, player_transform, controller, mut health)) = players.iter_mut().next() else {
            continue;
        };

        let mut direction = player_transform.translation - enemy_transform.translation;
        direction.y = 0.0;
        let direction = direction.normalize_or_zero();
        let forward = player_transform.forward().as_vec3();

        let outcome = health.take_damage(strike.damage, direction, forward, controller.guard(), now);

        match outcome.result {
            DamageResult::Parried => {
                enemy_combat.schedule_stagger_after_attack();
                logger::log(&format!("🛡️ Player {:?} parried {:?}", player, strike.attacker));
            }
            DamageResult::Blocked => {
                logger::log(&format!(
                    "🛡️ Player {:?} blocked {:?} ({:.1} dmg, stamina {:.0})",
                    player,
                    strike.attacker,
                    outcome.damage_taken,
                    health.stamina()
                ));
            }
            DamageResult::Hit => {
                logger::log(&format!(
                    "💥 Player {:?} hit by {:?} ({:.1} dmg, health {:.0})",
                    player,
                    strike.attacker,
                    outcome.damage_taken,
                    health.health()
                ));
            }
        }

        if outcome.died {
            logger::log_info(&format!("☠️ Player {:?} killed by {:?}", player, strike.attacker));
        }

        damaged.write(PlayerDamaged {
            player,
            attacker: strike.attacker,
            result: outcome.result,
            damage: outcome.damage_taken,
            died: outcome.died,
        });
    }
}
