//! Targeting: registry боевых целей и lock-on

use bevy::prelude::*;

pub mod lock_on;
pub mod registry;

pub use lock_on::{update_lock_on, LockOn, LockOnChanged, LockOnConfig, LockOnToggled};
pub use registry::{sync_target_registry, TargetKind, TargetRegistry, Targetable};

use crate::SimulationSet;

/// Targeting Plugin
///
/// - sync_target_registry (SimulationSet::Registry): lifecycle registry
/// - update_lock_on (SimulationSet::Combat): захват цели игроком
pub struct TargetingPlugin;

impl Plugin for TargetingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetRegistry>()
            .add_event::<LockOnToggled>()
            .add_event::<LockOnChanged>()
            .add_systems(FixedUpdate, sync_target_registry.in_set(SimulationSet::Registry))
            .add_systems(FixedUpdate, update_lock_on.in_set(SimulationSet::Combat));
    }
}
