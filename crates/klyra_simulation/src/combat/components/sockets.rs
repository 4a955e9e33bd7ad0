//! Weapon sockets: точки крепления меча (рука / ножны)
//!
//! Binding выполняется один раз при создании актора (и после смены модели):
//! именованные `AttachmentPoint` разрешаются в типизированные handles.
//! Не нашли точку → warning, актор работает в degraded режиме (state machine
//! продолжает тикать, mesh swap становится no-op).

use bevy::prelude::*;
use thiserror::Error;

pub const SOCKET_SWORD_HAND: &str = "SwordHand";
pub const SOCKET_SWORD_SHEATHED: &str = "SwordSheathed";

/// Именованная точка крепления на модели актора (спавнит host)
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AttachmentPoint {
    pub owner: Entity,
    pub name: String,
}

impl AttachmentPoint {
    pub fn new(owner: Entity, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

/// Запрос на binding (какие имена искать). Удаляется после попытки.
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct WeaponSocketNames {
    pub hand: String,
    pub sheath: String,
}

impl Default for WeaponSocketNames {
    fn default() -> Self {
        Self {
            hand: SOCKET_SWORD_HAND.into(),
            sheath: SOCKET_SWORD_SHEATHED.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocketBindingError {
    #[error("attachment point '{name}' not found on {owner:?}")]
    MissingSocket { owner: Entity, name: String },
}

/// Разрешённые sockets + текущая видимость меча
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct WeaponSockets {
    pub hand: Entity,
    pub sheath: Entity,
    pub hand_visible: bool,
    pub sheath_visible: bool,
}

impl WeaponSockets {
    /// Разрешить имена среди точек крепления владельца
    pub fn resolve<'a>(
        owner: Entity,
        names: &WeaponSocketNames,
        points: impl IntoIterator<Item = (Entity, &'a AttachmentPoint)>,
    ) -> Result<Self, SocketBindingError> {
        let mut hand = None;
        let mut sheath = None;

        for (entity, point) in points {
            if point.owner != owner {
                continue;
            }
            if point.name == names.hand {
                hand = Some(entity);
            } else if point.name == names.sheath {
                sheath = Some(entity);
            }
        }

        let hand = hand.ok_or_else(|| SocketBindingError::MissingSocket {
            owner,
            name: names.hand.clone(),
        })?;
        let sheath = sheath.ok_or_else(|| SocketBindingError::MissingSocket {
            owner,
            name: names.sheath.clone(),
        })?;

        // Новый binding всегда в ножнах
        Ok(Self {
            hand,
            sheath,
            hand_visible: false,
            sheath_visible: true,
        })
    }

    /// Mesh swap: ровно один из двух мечей видим
    pub fn show_in_hand(&mut self, in_hand: bool) {
        self.hand_visible = in_hand;
        self.sheath_visible = !in_hand;
    }
}
