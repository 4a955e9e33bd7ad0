//! Player weapon systems: tick state machine, события, animation flush

use bevy::prelude::*;

use crate::combat::animation::{flush_commands, AnimationCommand, AnimationRequested};
use crate::combat::components::{WeaponController, WeaponInput};
use crate::combat::events::{
    Dead, WeaponAttackStarted, WeaponTransitionCompleted, WeaponTransitionStarted,
};
use crate::logger;

/// Система: один tick weapon state machine для каждого игрока
///
/// Edge input (toggle, light attack) потребляется после tick, чтобы одно
/// нажатие не сработало дважды.
pub fn advance_player_weapons(
    time: Res<Time<Fixed>>,
    mut weapons: Query<(Entity, &mut WeaponController, &mut WeaponInput), Without<Dead>>,
    mut animation: EventWriter<AnimationRequested>,
    mut attacks: EventWriter<WeaponAttackStarted>,
    mut started: EventWriter<WeaponTransitionStarted>,
    mut completed: EventWriter<WeaponTransitionCompleted>,
    mut buffer: Local<Vec<AnimationCommand>>,
) {
    let now = time.elapsed_secs_f64();

    for (entity, mut controller, mut input) in weapons.iter_mut() {
        let output = controller.advance(now, &input, &mut *buffer);
        input.consume_edges();

        if let Some(state) = output.transition_started {
            logger::log(&format!("🗡️ {:?}: weapon → {:?}", entity, state));
            started.write(WeaponTransitionStarted { entity, state });
        }

        if let Some(state) = output.transition_completed {
            logger::log(&format!("🗡️ {:?}: weapon {:?}", entity, state));
            completed.write(WeaponTransitionCompleted { entity, state });
        }

        if let Some(attack) = output.attack {
            logger::log(&format!(
                "⚔️ {:?}: {:?} (step {})",
                entity, attack.attack_type, attack.combo_step
            ));
            attacks.write(WeaponAttackStarted {
                entity,
                attack_type: attack.attack_type,
                combo_step: attack.combo_step,
                slash: attack.attack_type.slash_kind(),
            });
        }

        flush_commands(entity, &mut buffer, &mut animation);
    }
}
