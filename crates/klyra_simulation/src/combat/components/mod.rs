//! Combat компоненты: state machines, защита, хитбоксы, sockets

pub mod attack;
pub mod defense;
pub mod dummy;
pub mod enemy_combat;
pub mod hitbox;
pub mod sockets;
pub mod weapon_controller;
pub mod weapon_state;

#[cfg(test)]
mod defense_tests;
#[cfg(test)]
mod enemy_combat_tests;
#[cfg(test)]
mod weapon_controller_tests;

pub use attack::{AttackType, SlashKind};
pub use defense::{is_facing_attack, DamageOutcome, DamageResult, DefenseConfig, GuardState, PlayerHealth};
pub use dummy::{DummyConfig, TrainingDummy};
pub use enemy_combat::{EnemyCombat, EnemyCombatConfig, EnemyCombatTick, StaggerWindow, TelegraphWindow};
pub use hitbox::{HitResolutionSet, HitWindowEdge, SwordHitbox, SwordHitboxConfig};
pub use sockets::{AttachmentPoint, SocketBindingError, WeaponSocketNames, WeaponSockets};
pub use weapon_controller::{
    AttackDispatched, WeaponController, WeaponInput, WeaponTickOutput, WeaponTimings, MAX_COMBO_STEP,
};
pub use weapon_state::{DrawSheatheCycle, DrawTimings, WeaponState};
