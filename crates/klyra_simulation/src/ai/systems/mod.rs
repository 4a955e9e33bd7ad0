//! AI systems

pub mod behavior;
pub mod lod;
pub mod movement;

// Re-export all systems
pub use behavior::*;
pub use lod::*;
pub use movement::*;
