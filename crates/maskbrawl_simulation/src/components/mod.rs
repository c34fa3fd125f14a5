//! ECS Components бойцов
//!
//! Организация по доменам:
//! - actor: идентичность бойца, связь с оппонентом, territory флаг
//! - movement: намерение движения (Move vector + walk blend)
//! - player: player control marker

pub mod actor;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use player::*;
