//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: игрок, здоровье, hurtbox
//! - stats: боевые характеристики (attack/defense/speed/level)
//! - movement: команды перемещения (MovementCommand, MovementSpeed)
//!
//! AI и лифт держат свои компоненты в собственных модулях.

pub mod actor;
pub mod movement;
pub mod stats;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use stats::*;
