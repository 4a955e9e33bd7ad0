//! Combat systems (ECS обвязка state machines)

pub mod damage;
pub mod enemy;
pub mod hits;
pub mod sockets;
pub mod swap;
pub mod weapon;


pub use damage::*;
pub use enemy::*;
pub use hits::*;
pub use sockets::*;
pub use swap::*;
pub use weapon::*;
