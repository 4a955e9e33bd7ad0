//! Replication systems: publish локального состояния, apply входящих сообщений

use std::collections::HashMap;

use bevy::prelude::*;

use super::messages::{AttackEvent, NetworkId, ReplicationMessage, WeaponSnapshot};
use super::peer::ReplicationLink;
use super::remote::RemoteWeaponView;
use crate::combat::animation::{flush_commands, AnimationCommand, AnimationRequested};
use crate::combat::components::{WeaponController, WeaponState};
use crate::combat::events::{WeaponAttackStarted, WeaponTransitionStarted};
use crate::logger;

/// Событие: сообщение от другого peer'а
///
/// Пишет transport (напрямую или через `ReplicationPeer::receive`).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationReceived {
    pub message: ReplicationMessage,
}

/// Система: забрать входящие сообщения у peer'а
pub fn poll_replication_peer(
    link: Res<ReplicationLink>,
    mut received: EventWriter<ReplicationReceived>,
    mut buffer: Local<Vec<ReplicationMessage>>,
) {
    let Some(peer) = link.peer() else {
        return;
    };

    peer.receive(&mut buffer);
    received.write_batch(buffer.drain(..).map(|message| ReplicationReceived { message }));
}

/// Система: применить входящие сообщения к remote actor'ам
///
/// Неизвестный `NetworkId` или битый discriminant → warning, сообщение
/// отбрасывается.
pub fn apply_replicated_messages(
    time: Res<Time<Fixed>>,
    mut received: EventReader<ReplicationReceived>,
    mut remotes: Query<(Entity, &NetworkId, &mut RemoteWeaponView)>,
    mut animation: EventWriter<AnimationRequested>,
    mut buffer: Local<Vec<AnimationCommand>>,
) {
    if received.is_empty() {
        return;
    }

    let now = time.elapsed_secs_f64();
    let by_id: HashMap<NetworkId, Entity> = remotes.iter().map(|(entity, id, _)| (*id, entity)).collect();

    for ReplicationReceived { message } in received.read() {
        let Some(&entity) = by_id.get(&message.id()) else {
            logger::log_warning(&format!("⚠️ Replication: no remote actor for {:?}", message.id()));
            continue;
        };
        let Ok((_, _, mut view)) = remotes.get_mut(entity) else {
            continue;
        };

        let result = match message {
            ReplicationMessage::Snapshot { snapshot, .. } => view.apply_snapshot(snapshot),
            ReplicationMessage::Attack { attack, .. } => {
                view.apply_attack(attack, &mut *buffer).map(|attack_type| {
                    logger::log(&format!(
                        "🌐 Remote {:?}: attack {:?} step {}",
                        entity, attack_type, attack.combo_step
                    ));
                })
            }
            ReplicationMessage::Draw { .. } => {
                view.play_draw(now, &mut *buffer);
                Ok(())
            }
            ReplicationMessage::Sheathe { .. } => {
                view.play_sheathe(now, &mut *buffer);
                Ok(())
            }
        };

        if let Err(err) = result {
            logger::log_warning(&format!("⚠️ Replication {:?}: {} (message dropped)", message.id(), err));
        }

        flush_commands(entity, &mut buffer, &mut animation);
    }
}

/// Система: tick remote views (параметры, вес слоя, видимость мечей)
pub fn advance_remote_views(
    time: Res<Time<Fixed>>,
    mut remotes: Query<(Entity, &mut RemoteWeaponView)>,
    mut animation: EventWriter<AnimationRequested>,
    mut buffer: Local<Vec<AnimationCommand>>,
) {
    let now = time.elapsed_secs_f64();
    let dt = time.delta_secs();

    for (entity, mut view) in remotes.iter_mut() {
        view.advance(now, dt, &mut *buffer);
        flush_commands(entity, &mut buffer, &mut animation);
    }
}

/// Система: snapshot каждого локального актора (каждый tick)
pub fn publish_weapon_snapshots(
    link: Res<ReplicationLink>,
    locals: Query<(&NetworkId, &WeaponController), Without<RemoteWeaponView>>,
) {
    let Some(peer) = link.peer() else {
        return;
    };

    for (id, controller) in locals.iter() {
        peer.broadcast(ReplicationMessage::Snapshot {
            id: *id,
            snapshot: WeaponSnapshot::capture(controller),
        });
    }
}

/// Система: discrete события (атаки, начало draw/sheathe)
pub fn publish_weapon_events(
    link: Res<ReplicationLink>,
    mut attacks: EventReader<WeaponAttackStarted>,
    mut transitions: EventReader<WeaponTransitionStarted>,
    ids: Query<&NetworkId, Without<RemoteWeaponView>>,
) {
    let Some(peer) = link.peer() else {
        // Без peer'а события просто потребляются
        attacks.clear();
        transitions.clear();
        return;
    };

    for attack in attacks.read() {
        let Ok(id) = ids.get(attack.entity) else {
            continue;
        };
        peer.broadcast(ReplicationMessage::Attack {
            id: *id,
            attack: AttackEvent {
                attack_type: attack.attack_type.as_i32(),
                combo_step: attack.combo_step,
            },
        });
    }

    for transition in transitions.read() {
        let Ok(id) = ids.get(transition.entity) else {
            continue;
        };
        let message = match transition.state {
            WeaponState::Drawing => ReplicationMessage::Draw { id: *id },
            WeaponState::Sheathing => ReplicationMessage::Sheathe { id: *id },
            WeaponState::Sheathed | WeaponState::Equipped => continue,
        };
        peer.broadcast(message);
    }
}
