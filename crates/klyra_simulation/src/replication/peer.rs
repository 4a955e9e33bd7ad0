//! Transport boundary: opaque "разослать peers" сервис
//!
//! Core ведёт себя одинаково с peer'ом и без него: без peer'а publish
//! системы ничего не делают.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;

use super::messages::ReplicationMessage;

/// Реализуется host transport'ом
pub trait ReplicationPeer: Send + Sync {
    /// Отправить всем остальным peers
    fn broadcast(&self, message: ReplicationMessage);

    /// Забрать полученные сообщения (если transport не пишет события сам)
    fn receive(&self, _out: &mut Vec<ReplicationMessage>) {}
}

/// Resource: текущий peer (None = single player)
#[derive(Resource, Default)]
pub struct ReplicationLink {
    peer: Option<Box<dyn ReplicationPeer>>,
}

impl ReplicationLink {
    pub fn connect(&mut self, peer: impl ReplicationPeer + 'static) {
        self.peer = Some(Box::new(peer));
    }

    pub fn disconnect(&mut self) {
        self.peer = None;
    }

    pub fn is_connected(&self) -> bool {
        self.peer.is_some()
    }

    pub fn peer(&self) -> Option<&dyn ReplicationPeer> {
        self.peer.as_deref()
    }
}

/// In-memory peer: очереди outbound/inbound (loopback, тесты)
///
/// Clone разделяет очереди, поэтому одна копия уходит в `ReplicationLink`,
/// другая остаётся у вызывающего.
#[derive(Clone, Default)]
pub struct QueuePeer {
    outbound: Arc<Mutex<Vec<ReplicationMessage>>>,
    inbound: Arc<Mutex<Vec<ReplicationMessage>>>,
}

fn lock<T>(queue: &Mutex<T>) -> MutexGuard<'_, T> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

impl QueuePeer {
    /// Забрать всё, что было разослано
    pub fn take_sent(&self) -> Vec<ReplicationMessage> {
        std::mem::take(&mut *lock(&self.outbound))
    }

    /// Положить сообщение "от другого peer'а"
    pub fn deliver(&self, message: ReplicationMessage) {
        lock(&self.inbound).push(message);
    }
}

impl ReplicationPeer for QueuePeer {
    fn broadcast(&self, message: ReplicationMessage) {
        lock(&self.outbound).push(message);
    }

    fn receive(&self, out: &mut Vec<ReplicationMessage>) {
        out.append(&mut lock(&self.inbound));
    }
}
