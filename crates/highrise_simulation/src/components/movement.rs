//! Movement компоненты: команды перемещения и скорость

use bevy::prelude::*;

/// Команда движения для актора
///
/// Архитектура:
/// - AI пишет MovementCommand (high-level intent)
/// - drive_movement (или navmesh хоста) исполняет её каждый тик
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Следовать за entity, остановиться на дистанции stop_within
    FollowEntity { target: Entity, stop_within: f32 },
    /// Остановиться немедленно
    Stop,
}

impl MovementCommand {
    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            MovementCommand::MoveToPosition { .. } | MovementCommand::FollowEntity { .. }
        )
    }
}

/// Скорость движения актора (метры/сек)
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 3.5 }
    }
}
