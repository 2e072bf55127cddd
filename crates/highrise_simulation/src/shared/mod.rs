//! Shared domain: cross-cutting утилиты
//!
//! - geometry: distance checks, интерполяция, сэмплинг точек
//! - services: line-of-sight и навигация (подставляются хостом)

pub mod geometry;
pub mod services;

// Re-export
pub use geometry::*;
pub use services::*;
