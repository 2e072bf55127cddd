//! Enemy AI module
//!
//! Per-enemy FSM: Idle → Wander → Chase → Attack → Hit → Dead.
//! Мозг (`EnemyBrain`): чистая логика, ECS системы только собирают
//! senses и исполняют решения.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;
pub mod trigger_zone;

// Re-export основных типов
pub use components::{
    BrainContext, DetectionOrigin, EnemyAction, EnemyBrain, EnemyConfig, EnemyCueKind, EnemySenses, EnemyState,
    TargetSense,
};
pub use events::{EnemyActivation, EnemyCue};
pub use trigger_zone::{EnemyTriggerZone, TriggerPayload, TriggerZoneCommand, TriggerZoneCommandKind};

use crate::components::{CombatStats, Health, Hurtbox, MovementCommand, MovementSpeed};
use crate::SimulationSet;

/// Здоровье врага по умолчанию
pub const ENEMY_BASE_HEALTH: u32 = 100;

/// Спавн активного врага со всеми компонентами
pub fn spawn_enemy(commands: &mut Commands, position: Vec3, config: EnemyConfig) -> Entity {
    let speed = config.move_speed;

    commands
        .spawn((
            EnemyBrain::new(position).activated(),
            config,
            Health::new(ENEMY_BASE_HEALTH),
            Hurtbox::default(),
            CombatStats::enemy(),
            MovementCommand::default(),
            MovementSpeed { speed },
            DetectionOrigin::default(),
            Transform::from_translation(position),
        ))
        .id()
}

/// AI Plugin
///
/// Порядок выполнения:
/// 1. Input: resolve_enemy_targets, handle_enemy_activation, process_trigger_zones
/// 2. Decide: tick_enemy_brains (→ DamageRequest)
/// 3. React: react_to_damage (DamageDealt → Hit на следующем тике)
/// 4. Movement: drive_movement
pub struct AIPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for AIPlugin {
    fn default() -> Self {
        Self::in_schedule(FixedUpdate)
    }
}

impl AIPlugin {
    pub fn in_schedule(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyActivation>()
            .add_event::<EnemyCue>()
            .add_event::<TriggerZoneCommand>();

        crate::configure_simulation_sets(app, self.schedule);

        app.add_systems(
            self.schedule,
            (
                trigger_zone::process_trigger_zones,
                systems::resolve_enemy_targets,
                systems::handle_enemy_activation,
            )
                .chain()
                .in_set(SimulationSet::Input),
        )
        .add_systems(
            self.schedule,
            systems::tick_enemy_brains.in_set(SimulationSet::Decide),
        )
        .add_systems(
            self.schedule,
            systems::react_to_damage.in_set(SimulationSet::React),
        )
        .add_systems(
            self.schedule,
            systems::drive_movement.in_set(SimulationSet::Movement),
        );
    }
}
