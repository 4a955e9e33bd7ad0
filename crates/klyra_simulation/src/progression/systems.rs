//! Progression systems: unlock за победу, переключение персонажа

use bevy::prelude::*;

use super::unlocks::{CharacterUnlocks, CycleDirection};
use crate::combat::components::{WeaponController, WeaponState};
use crate::combat::events::{CharacterSwapRequested, EnemyDefeated};
use crate::logger;

/// Событие: открыт новый персонаж (host показывает popup)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct CharacterUnlocked {
    pub character_id: String,
}

/// Input: переключить персонажа игрока
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleCharacterRequested {
    pub entity: Entity,
    pub direction: CycleDirection,
}

/// Событие: выбран персонаж, host меняет модель
///
/// Идёт вместе с `CharacterSwapRequested` (меч убран, sockets перепривязываются).
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct CharacterSelected {
    pub entity: Entity,
    pub character_id: String,
}

/// Система: `EnemyDefeated` с моделью → unlock (повтор игнорируется)
pub fn unlock_defeated_characters(
    mut defeated: EventReader<EnemyDefeated>,
    mut unlocks: ResMut<CharacterUnlocks>,
    mut unlocked: EventWriter<CharacterUnlocked>,
) {
    for event in defeated.read() {
        let Some(character_id) = event.character_model_id.as_deref() else {
            continue;
        };
        if unlocks.unlock(character_id) {
            logger::log_info(&format!("🔓 Character unlocked: {}", character_id));
            unlocked.write(CharacterUnlocked {
                character_id: character_id.to_owned(),
            });
        }
    }
}

/// Система: переключение персонажа по кругу
///
/// Меч убирается мгновенно (force sheathe в `handle_character_swaps`),
/// после смены достаётся заново только если был в руке.
pub fn cycle_player_character(
    mut requests: EventReader<CycleCharacterRequested>,
    mut unlocks: ResMut<CharacterUnlocks>,
    weapons: Query<&WeaponController>,
    mut selected: EventWriter<CharacterSelected>,
    mut swaps: EventWriter<CharacterSwapRequested>,
) {
    for request in requests.read() {
        let Some(character_id) = unlocks.cycle(request.direction).map(str::to_owned) else {
            logger::log(&format!(
                "🔄 {:?}: cycle skipped ({} unlocked)",
                request.entity,
                unlocks.count()
            ));
            continue;
        };

        let was_equipped = weapons
            .get(request.entity)
            .is_ok_and(|controller| controller.weapon_state() == WeaponState::Equipped);

        logger::log(&format!(
            "🔄 {:?}: switching to {} (redraw: {})",
            request.entity, character_id, was_equipped
        ));
        selected.write(CharacterSelected {
            entity: request.entity,
            character_id,
        });
        swaps.write(CharacterSwapRequested {
            entity: request.entity,
            redraw: was_equipped,
        });
    }
}
