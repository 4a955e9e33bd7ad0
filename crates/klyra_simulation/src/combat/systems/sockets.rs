//! Weapon socket systems: binding при создании актора, mesh swap

use bevy::prelude::*;

use crate::combat::animation::{AnimationCommand, AnimationRequested};
use crate::combat::components::{AttachmentPoint, WeaponSocketNames, WeaponSockets};
use crate::logger;

/// Система: разрешить именованные точки крепления в typed handles
///
/// Выполняется один раз на запрос (`WeaponSocketNames`). Не нашли точку →
/// warning и degraded режим: state machine работает, mesh swap: no-op.
pub fn bind_weapon_sockets(
    mut commands: Commands,
    requests: Query<(Entity, &WeaponSocketNames)>,
    points: Query<(Entity, &AttachmentPoint)>,
) {
    for (owner, names) in requests.iter() {
        match WeaponSockets::resolve(owner, names, points.iter()) {
            Ok(sockets) => {
                logger::log(&format!(
                    "🔗 {:?}: weapon sockets bound (hand {:?}, sheath {:?})",
                    owner, sockets.hand, sockets.sheath
                ));
                commands.entity(owner).insert(sockets);
            }
            Err(err) => {
                logger::log_warning(&format!("⚠️ {:?}: {} (weapon visuals disabled)", owner, err));
                commands.entity(owner).remove::<WeaponSockets>();
            }
        }
        commands.entity(owner).remove::<WeaponSocketNames>();
    }
}

/// Система: применить mesh swap команды к sockets
pub fn apply_weapon_swaps(
    mut requests: EventReader<AnimationRequested>,
    mut sockets: Query<&mut WeaponSockets>,
) {
    for request in requests.read() {
        let AnimationCommand::SwapWeapon { in_hand } = request.command else {
            continue;
        };
        // Нет sockets: degraded режим
        if let Ok(mut sockets) = sockets.get_mut(request.entity) {
            sockets.show_in_hand(in_hand);
        }
    }
}
