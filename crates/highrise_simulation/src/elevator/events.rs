//! Elevator Events
//!
//! Inbound: ElevatorRequest (один поток: порядок вызовов = порядок в очереди)
//! Outbound: ElevatorNotice (табло, звонок, анимация дверей)

use bevy::prelude::*;

use super::dispatcher::ElevatorEvent;

/// Входящий запрос к лифту
///
/// Все виды запросов идут одним событием, поэтому запросы одного тика
/// попадают в очередь кабины ровно в том порядке, в котором их отправили.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum ElevatorRequest {
    /// RequestFloor по индексу этажа
    Floor { cabin: Entity, floor: usize },
    /// Вызов по имени кнопки ("Button floor N")
    Button { cabin: Entity, name: String },
    /// Игрок нажал на entity кнопки (проходит через lockout кнопки)
    Press { button: Entity },
    /// Снять ожидающие вызовы этажа
    Cancel { cabin: Entity, floor: usize },
}

/// Presentation hook от кабины
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorNotice {
    pub cabin: Entity,
    pub event: ElevatorEvent,
}
