//! Elevator module
//!
//! Одна кабина = одна entity с `ElevatorCabin`. Вызовы приходят одним потоком
//! `ElevatorRequest` (по индексу этажа, по имени кнопки, нажатием на кнопку), кабина обслуживает их одним
//! mover loop, на каждой остановке прогоняет цикл дверей.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

pub mod config;
pub mod dispatcher;
pub mod doors;
pub mod events;
pub mod systems;

#[cfg(test)]
mod dispatcher_tests;
#[cfg(test)]
mod doors_tests;

// Re-export основных типов
pub use config::{button_name, ButtonBinding, DoorPair, DoorTravel, ElevatorConfig, ElevatorError, FloorPlan};
pub use dispatcher::{CabinPhase, ElevatorCabin, ElevatorEvent, LeafPair, ARRIVAL_EPSILON, INDICATOR_TOLERANCE};
pub use doors::{DoorLeaves, DoorPhase, DoorSequence, DoorTargets, DoorTransition, DOOR_TOLERANCE};
pub use events::{ElevatorNotice, ElevatorRequest};
pub use systems::{DoorLeaf, ElevatorButton, LeafSlot, BUTTON_LOCKOUT_SECONDS};

use crate::SimulationSet;

/// Спавн кабины и кнопок вызова для каждой кнопки из конфига
///
/// Конфиг проверяется до спавна: с битым конфигом ничего не создаётся.
pub fn spawn_elevator(commands: &mut Commands, config: ElevatorConfig) -> Result<Entity, ElevatorError> {
    let floors: Vec<usize> = config.buttons.iter().map(|binding| binding.floor).collect();
    let cabin = ElevatorCabin::new(config)?;
    let start = Vec3::new(0.0, cabin.position_y(), 0.0);

    let cabin_entity = commands.spawn((cabin, Transform::from_translation(start))).id();

    for floor in floors {
        commands.spawn(ElevatorButton::for_floor(cabin_entity, floor));
    }

    crate::log_info(&format!("🛗 Elevator {:?} ready", cabin_entity));
    Ok(cabin_entity)
}

/// Elevator Plugin
///
/// Порядок выполнения:
/// 1. Input: tick_button_lockouts → handle_elevator_requests
/// 2. Movement: advance_elevators → sync_elevator_transforms
pub struct ElevatorPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for ElevatorPlugin {
    fn default() -> Self {
        Self::in_schedule(FixedUpdate)
    }
}

impl ElevatorPlugin {
    pub fn in_schedule(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Plugin for ElevatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ElevatorRequest>()
            .add_event::<ElevatorNotice>();

        crate::configure_simulation_sets(app, self.schedule);

        app.add_systems(
            self.schedule,
            (systems::tick_button_lockouts, systems::handle_elevator_requests)
                .chain()
                .in_set(SimulationSet::Input),
        )
        .add_systems(
            self.schedule,
            (systems::advance_elevators, systems::sync_elevator_transforms)
                .chain()
                .in_set(SimulationSet::Movement),
        );
    }
}
