//! Character swap: мгновенно убрать меч, перепривязать sockets, достать заново

use bevy::prelude::*;

use crate::combat::animation::{flush_commands, AnimationCommand, AnimationRequested};
use crate::combat::components::{WeaponController, WeaponSocketNames};
use crate::combat::events::CharacterSwapRequested;
use crate::logger;

/// Система: обработка `CharacterSwapRequested`
///
/// Переход draw/sheathe отменяется на любой стадии (force sheathe), затем
/// новый binding sockets; `redraw` → draw на следующем tick.
pub fn handle_character_swaps(
    mut commands: Commands,
    mut requests: EventReader<CharacterSwapRequested>,
    mut weapons: Query<&mut WeaponController>,
    mut animation: EventWriter<AnimationRequested>,
    mut buffer: Local<Vec<AnimationCommand>>,
) {
    for request in requests.read() {
        let Ok(mut controller) = weapons.get_mut(request.entity) else {
            continue;
        };

        controller.force_sheathe_for_swap(&mut *buffer);
        if request.redraw {
            controller.request_draw_after_swap();
        }
        flush_commands(request.entity, &mut buffer, &mut animation);

        commands.entity(request.entity).insert(WeaponSocketNames::default());
        logger::log(&format!(
            "🔄 {:?}: character swap (redraw: {})",
            request.entity, request.redraw
        ));
    }
}
