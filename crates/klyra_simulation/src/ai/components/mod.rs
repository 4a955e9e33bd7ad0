//! AI components

pub mod behavior;
pub mod enemy;


// Re-export all components
pub use behavior::*;
pub use enemy::*;
