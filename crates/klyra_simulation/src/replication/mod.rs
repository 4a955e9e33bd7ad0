//! Replication adapter: минимальное состояние оружия для remote peers
//!
//! Роль актора определяется компонентами: локальный = `WeaponController`
//! (+ `NetworkId` для publish), remote = `RemoteWeaponView` + `NetworkId`.
//! Transport: opaque `ReplicationPeer` в `ReplicationLink`; без него core
//! работает идентично.

use bevy::prelude::*;

pub mod messages;
pub mod peer;
pub mod remote;
pub mod systems;

pub use messages::{AttackEvent, NetworkId, ReplicationError, ReplicationMessage, WeaponSnapshot};
pub use peer::{QueuePeer, ReplicationLink, ReplicationPeer};
pub use remote::RemoteWeaponView;
pub use systems::ReplicationReceived;

use crate::SimulationSet;

pub struct ReplicationPlugin;

impl Plugin for ReplicationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReplicationLink>()
            .add_event::<ReplicationReceived>()
            .add_systems(
                FixedUpdate,
                (
                    systems::poll_replication_peer,
                    systems::apply_replicated_messages,
                    systems::advance_remote_views,
                    systems::publish_weapon_snapshots,
                    systems::publish_weapon_events,
                )
                    .chain()
                    .in_set(SimulationSet::Replication),
            );
    }
}
