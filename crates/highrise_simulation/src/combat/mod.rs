//! Combat module
//!
//! ECS ответственность:
//! - Damage pipeline: DamageRequest → формула защиты → DamageDealt
//! - Смерть: EntityDied, уборка трупов по DespawnAfter
//!
//! Кто и когда бьёт, решает AI (Strike) или хост (оружие игрока, ловушки).

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

use crate::SimulationSet;

pub mod damage;
pub mod systems;

// Re-export основных типов
pub use damage::{
    damage_reduction, effective_damage, DamageDealt, DamageRequest, Dead, DespawnAfter, EntityDied,
    DEFENSE_REDUCTION_PER_POINT,
};

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. apply_damage (Resolve): все DamageRequest текущего тика
/// 2. despawn_after_timeout (Cleanup): уборка трупов
pub struct CombatPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for CombatPlugin {
    fn default() -> Self {
        Self::in_schedule(FixedUpdate)
    }
}

impl CombatPlugin {
    pub fn in_schedule(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        crate::configure_simulation_sets(app, self.schedule);

        app.add_systems(
            self.schedule,
            systems::apply_damage.in_set(SimulationSet::Resolve),
        )
        .add_systems(
            self.schedule,
            systems::despawn_after_timeout.in_set(SimulationSet::Cleanup),
        );
    }
}
