//! Progression: открытие персонажей за победы и переключение между ними
//!
//! Сохранение прогресса делает host (resource можно вставить заранее,
//! plugin его не перезаписывает).

use bevy::prelude::*;

pub mod systems;
pub mod unlocks;


pub use systems::{CharacterSelected, CharacterUnlocked, CycleCharacterRequested};
pub use unlocks::{CharacterUnlocks, CycleDirection};

use crate::SimulationSet;

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CharacterUnlocks>()
            .add_event::<CharacterUnlocked>()
            .add_event::<CycleCharacterRequested>()
            .add_event::<CharacterSelected>()
            .add_systems(
                FixedUpdate,
                (systems::unlock_defeated_characters, systems::cycle_player_character)
                    .chain()
                    .in_set(SimulationSet::Registry)
                    .before(crate::combat::systems::handle_character_swaps),
            );
    }
}
