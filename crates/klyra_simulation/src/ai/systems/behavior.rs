//! Behavior tick врагов (Idle / Patrol / Wander / Chase)

use bevy::prelude::*;

use crate::ai::components::{BehaviorBody, BehaviorContext, Enemy, EnemyBehavior, EnemyLod};
use crate::combat::animation::{flush_commands, AnimationCommand, AnimationRequested};
use crate::combat::{Dead, EnemyCombat, EnemyTelegraphStarted};
use crate::components::{CharacterMotion, Player};
use crate::logger;
use crate::DeterministicRng;

/// Система: один behavior tick для врагов, у которых LOD due
///
/// `dt` поведения = wall-clock время с прошлого due tick (`EnemyLod::delta`).
pub fn advance_enemy_behaviors(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    players: Query<&Transform, With<Player>>,
    mut enemies: Query<
        (
            Entity,
            &mut EnemyBehavior,
            &mut Transform,
            &mut CharacterMotion,
            &EnemyLod,
            Option<&mut EnemyCombat>,
        ),
        (With<Enemy>, Without<Player>, Without<Dead>),
    >,
    mut animation: EventWriter<AnimationRequested>,
    mut telegraphs: EventWriter<EnemyTelegraphStarted>,
    mut buffer: Local<Vec<AnimationCommand>>,
) {
    let now = time.elapsed_secs_f64();
    let player_position = players.iter().next().map(|transform| transform.translation);

    for (entity, mut behavior, mut transform, mut motion, lod, mut combat) in enemies.iter_mut() {
        if !lod.is_due() {
            continue;
        }

        let mut ctx = BehaviorContext {
            now,
            dt: lod.delta(),
            player_position,
            rng: &mut rng.rng,
        };
        let body = BehaviorBody {
            transform: &mut transform,
            motion: &mut motion,
            combat: combat.as_deref_mut(),
        };
        let tick = behavior.advance(&mut ctx, body, &mut *buffer);

        if let Some(phase) = tick.phase_changed {
            logger::log(&format!("👁️ Enemy {:?}: chase phase → {:?}", entity, phase));
        }

        if tick.telegraph_started {
            if let Some(combat) = combat.as_deref() {
                logger::log(&format!(
                    "⚠️ Enemy {:?}: telegraph {:.2}s",
                    entity, combat.config.telegraph_duration
                ));
                telegraphs.write(EnemyTelegraphStarted {
                    entity,
                    duration: combat.config.telegraph_duration,
                });
            }
        }

        flush_commands(entity, &mut buffer, &mut animation);
    }
}
