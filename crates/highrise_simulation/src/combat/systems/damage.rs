//! Damage application and corpse cleanup systems.

use bevy::prelude::*;

use crate::combat::damage::{effective_damage, DamageDealt, DamageRequest, DespawnAfter, EntityDied};
use crate::components::{CombatStats, Health, Hurtbox};

/// Система: применить DamageRequest через формулу защиты
///
/// Пропускаем:
/// - нулевой урон
/// - цели без Health или с выключенным Hurtbox (мертвые)
/// - уже мертвые цели (health == 0)
pub fn apply_damage(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<(&mut Health, Option<&CombatStats>, Option<&Hurtbox>)>,
    mut dealt_events: EventWriter<DamageDealt>,
    mut died_events: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        if request.amount == 0 {
            continue;
        }

        let Ok((mut health, stats, hurtbox)) = targets.get_mut(request.target) else {
            continue;
        };

        if hurtbox.is_some_and(|hurtbox| !hurtbox.enabled) || !health.is_alive() {
            continue;
        }

        let reduction = stats.map(CombatStats::damage_reduction).unwrap_or(0.0);
        let damage = effective_damage(request.amount, reduction);
        health.take_damage(damage);

        crate::log(&format!(
            "💥 {:?} took {} damage (raw {}, reduction {:.0}%) → {}/{} HP",
            request.target,
            damage,
            request.amount,
            reduction * 100.0,
            health.current,
            health.max
        ));

        dealt_events.write(DamageDealt {
            attacker: request.source,
            target: request.target,
            requested: request.amount,
            damage,
            remaining_health: health.current,
        });

        if !health.is_alive() {
            crate::log_info(&format!("☠️ {:?} died (killer: {:?})", request.target, request.source));
            died_events.write(EntityDied {
                entity: request.target,
                killer: request.source,
            });
        }
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
