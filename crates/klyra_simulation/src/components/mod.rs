//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Health, Player marker)
//! - movement: kinematic перемещение (CharacterMotion, move/face primitives)

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;
