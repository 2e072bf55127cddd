//! Elevator ECS systems: кнопки, очередь, mover, sync transform.

use bevy::prelude::*;

use super::config::button_name;
use super::dispatcher::{ElevatorCabin, ElevatorEvent};
use super::events::{ElevatorNotice, ElevatorRequest};

/// Повторное нажатие той же кнопки игнорируется это время
pub const BUTTON_LOCKOUT_SECONDS: f32 = 1.0;

/// Кнопка вызова на сцене
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ElevatorButton {
    pub cabin: Entity,
    /// Номер этажа на кнопке (с единицы)
    pub floor_number: usize,
    /// Сколько ещё ждать до следующего нажатия
    pub lockout: f32,
}

impl ElevatorButton {
    /// Кнопка для этажа с индексом `floor_index`
    pub fn for_floor(cabin: Entity, floor_index: usize) -> Self {
        Self {
            cabin,
            floor_number: floor_index + 1,
            lockout: 0.0,
        }
    }

    pub fn name(&self) -> String {
        button_name(self.floor_number.saturating_sub(1))
    }

    pub fn is_ready(&self) -> bool {
        self.lockout <= 0.0
    }
}

/// Какая створка лифта (для sync transform)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafSlot {
    InsideLeft,
    InsideRight,
    OutsideLeft { floor: usize },
    OutsideRight { floor: usize },
}

/// Визуальная створка: её local X повторяет состояние кабины
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorLeaf {
    pub cabin: Entity,
    pub slot: LeafSlot,
}

/// Система: таймеры lockout кнопок
pub fn tick_button_lockouts(mut buttons: Query<&mut ElevatorButton>, time: Res<Time>) {
    let delta = time.delta_secs();

    for mut button in buttons.iter_mut() {
        if button.lockout > 0.0 {
            button.lockout = (button.lockout - delta).max(0.0);
        }
    }
}

/// Система: входящие запросы → очередь кабины
///
/// Запросы обрабатываются строго по порядку отправки. Отклонённые вызовы
/// (битый индекс, нет конфигурации дверей, неизвестная кнопка, lockout)
/// логируются и не меняют очередь.
pub fn handle_elevator_requests(
    mut requests: EventReader<ElevatorRequest>,
    mut buttons: Query<&mut ElevatorButton>,
    mut cabins: Query<&mut ElevatorCabin>,
    mut notices: EventWriter<ElevatorNotice>,
) {
    for request in requests.read() {
        let (cabin_entity, source) = match request {
            ElevatorRequest::Floor { cabin, floor } => (*cabin, RequestSource::Floor(*floor)),
            ElevatorRequest::Button { cabin, name } => (*cabin, RequestSource::Button(name.clone())),
            ElevatorRequest::Cancel { cabin, floor } => (*cabin, RequestSource::Cancel(*floor)),
            ElevatorRequest::Press { button } => {
                let Ok(mut button) = buttons.get_mut(*button) else {
                    crate::log_warning(&format!("⚠️ Interaction with unknown button {:?}", button));
                    continue;
                };

                if !button.is_ready() {
                    crate::log(&format!("⏳ '{}' pressed again too soon, ignored", button.name()));
                    continue;
                }

                button.lockout = BUTTON_LOCKOUT_SECONDS;
                crate::log(&format!("🔘 '{}' pressed", button.name()));
                (button.cabin, RequestSource::Button(button.name()))
            }
        };

        let Ok(mut cabin) = cabins.get_mut(cabin_entity) else {
            crate::log_error(&format!("📛 Elevator request for missing cabin {:?}", cabin_entity));
            continue;
        };

        let result = match &source {
            RequestSource::Floor(floor) => cabin.request_floor(*floor),
            RequestSource::Button(name) => cabin.press_button(name),
            RequestSource::Cancel(floor) => {
                let removed = cabin.cancel_pending(*floor);
                crate::log(&format!(
                    "🚫 Cabin {:?}: {} pending request(s) for floor {} withdrawn",
                    cabin_entity,
                    removed,
                    floor + 1
                ));
                continue;
            }
        };

        match result {
            Ok(event) => {
                if let ElevatorEvent::Queued { floor, pending } = event {
                    crate::log(&format!(
                        "🛗 Cabin {:?}: floor {} queued ({} pending)",
                        cabin_entity,
                        floor + 1,
                        pending
                    ));
                }
                notices.write(ElevatorNotice {
                    cabin: cabin_entity,
                    event,
                });
            }
            Err(error) => {
                crate::log_error(&format!("📛 Cabin {:?}: request rejected: {}", cabin_entity, error));
            }
        }
    }
}

enum RequestSource {
    Floor(usize),
    Button(String),
    Cancel(usize),
}

/// Система: тик mover loop каждой кабины
pub fn advance_elevators(
    mut cabins: Query<(Entity, &mut ElevatorCabin)>,
    mut notices: EventWriter<ElevatorNotice>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (entity, mut cabin) in cabins.iter_mut() {
        if !cabin.is_running() {
            continue;
        }

        for event in cabin.tick(delta) {
            log_elevator_event(entity, &event);
            notices.write(ElevatorNotice { cabin: entity, event });
        }
    }
}

fn log_elevator_event(cabin: Entity, event: &ElevatorEvent) {
    let message = match event {
        ElevatorEvent::Queued { .. } => return,
        ElevatorEvent::Arrived { floor } => format!("🛎️ Cabin {:?} arrived at floor {}", cabin, floor + 1),
        ElevatorEvent::DoorsOpened { floor } => format!("🚪 Cabin {:?}: doors open on floor {}", cabin, floor + 1),
        ElevatorEvent::DoorsClosed { floor } => format!("🚪 Cabin {:?}: doors closed on floor {}", cabin, floor + 1),
        ElevatorEvent::FloorIndicator { floor } => format!("🔢 Cabin {:?}: indicator → {}", cabin, floor + 1),
        ElevatorEvent::Stopped => format!("✅ Cabin {:?}: queue empty, mover stopped", cabin),
    };

    crate::log(&message);
}

/// Система: Transform кабины и створок ← состояние ElevatorCabin
pub fn sync_elevator_transforms(
    mut cabins: Query<(&ElevatorCabin, &mut Transform)>,
    mut leaves: Query<(&DoorLeaf, &mut Transform), Without<ElevatorCabin>>,
) {
    for (cabin, mut transform) in cabins.iter_mut() {
        if transform.translation.y != cabin.position_y() {
            transform.translation.y = cabin.position_y();
        }
    }

    for (leaf, mut transform) in leaves.iter_mut() {
        let Ok((cabin, _)) = cabins.get(leaf.cabin) else {
            continue;
        };

        let x = match leaf.slot {
            LeafSlot::InsideLeft => Some(cabin.inside_leaves().left),
            LeafSlot::InsideRight => Some(cabin.inside_leaves().right),
            LeafSlot::OutsideLeft { floor } => cabin.outside_leaves(floor).map(|pair| pair.left),
            LeafSlot::OutsideRight { floor } => cabin.outside_leaves(floor).map(|pair| pair.right),
        };

        if let Some(x) = x {
            transform.translation.x = x;
        }
    }
}
