//! AI reaction systems (damage intake).

use bevy::prelude::*;

use crate::ai::components::EnemyBrain;
use crate::combat::DamageDealt;

/// System: нелетальный удар → враг уходит в Hit на следующем тике
///
/// Летальный удар сюда не доходит: мозг сам увидит health == 0 и уйдёт в Dead.
pub fn react_to_damage(mut damage_events: EventReader<DamageDealt>, mut brains: Query<&mut EnemyBrain>) {
    for event in damage_events.read() {
        if event.is_lethal() {
            continue;
        }

        let Ok(mut brain) = brains.get_mut(event.target) else {
            continue;
        };

        if brain.register_hit() {
            crate::log(&format!(
                "🤕 Enemy {:?} staggered by {:?} ({} dmg, {} HP left)",
                event.target, event.attacker, event.damage, event.remaining_health
            ));
        }
    }
}
