//! Enemy FSM systems: цель, активация, тик мозга.

use bevy::prelude::*;

use crate::ai::components::{
    BrainContext, DetectionOrigin, EnemyAction, EnemyBrain, EnemyConfig, EnemyCueKind, EnemySenses, TargetSense,
};
use crate::ai::events::{EnemyActivation, EnemyCue};
use crate::combat::{DamageRequest, Dead, DespawnAfter};
use crate::components::{CombatStats, Health, Hurtbox, MovementCommand, Player};
use crate::shared::{planar_direction, LineOfSight, NavigationService, SightService};
use crate::DeterministicRng;

/// Видит ли глаз цель: сначала дистанция, потом line-of-sight cast
pub fn detect_target(sight: &dyn LineOfSight, eye: Vec3, target: Vec3, detection_radius: f32) -> bool {
    eye.distance(target) <= detection_radius && sight.can_see(eye, target, detection_radius)
}

/// Система: новому врагу назначаем игрока как цель (один раз при спавне)
///
/// Игрока нет: цель остаётся None, detection никогда не срабатывает.
pub fn resolve_enemy_targets(
    mut brains: Query<(Entity, &mut EnemyBrain), Added<EnemyBrain>>,
    players: Query<Entity, With<Player>>,
) {
    for (entity, mut brain) in brains.iter_mut() {
        if brain.target().is_some() {
            continue;
        }

        match players.iter().next() {
            Some(player) => {
                brain.set_target(Some(player));
                crate::log(&format!("🎯 Enemy {:?} tracks player {:?}", entity, player));
            }
            None => {
                crate::log_warning(&format!("⚠️ Enemy {:?} spawned without a player to track", entity));
            }
        }
    }
}

/// Система: Activate/Deactivate
pub fn handle_enemy_activation(
    mut events: EventReader<EnemyActivation>,
    mut enemies: Query<(&mut EnemyBrain, &mut MovementCommand)>,
) {
    for event in events.read() {
        let Ok((mut brain, mut command)) = enemies.get_mut(event.enemy) else {
            continue;
        };

        brain.set_active(event.active);
        if !event.active {
            *command = MovementCommand::Stop;
        }

        crate::log(&format!(
            "{} Enemy {:?} {}",
            if event.active { "▶️" } else { "⏸️" },
            event.enemy,
            if event.active { "activated" } else { "deactivated" }
        ));
    }
}

/// Система: один тик мозга каждого живого врага
///
/// Порядок:
/// 1. Собираем EnemySenses (позиция, здоровье, цель, line-of-sight)
/// 2. EnemyBrain::tick → список EnemyAction
/// 3. Исполняем действия: MovementCommand, DamageRequest, EnemyCue, уборка трупа
pub fn tick_enemy_brains(
    mut enemies: Query<
        (
            Entity,
            &mut EnemyBrain,
            &EnemyConfig,
            &Health,
            &mut Transform,
            &mut MovementCommand,
            Option<&CombatStats>,
            Option<&DetectionOrigin>,
        ),
        Without<Dead>,
    >,
    targets: Query<(&Transform, Option<&Health>), Without<EnemyBrain>>,
    sight: Res<SightService>,
    navigation: Res<NavigationService>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time>,
    mut commands: Commands,
    mut damage_requests: EventWriter<DamageRequest>,
    mut cues: EventWriter<EnemyCue>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for (entity, mut brain, config, health, mut transform, mut command, stats, origin) in enemies.iter_mut() {
        if brain.is_dead() {
            continue;
        }

        let position = transform.translation;
        let eye_offset = origin.map_or(Vec3::ZERO, |origin| origin.offset);

        // Ленивая ревалидация: despawned цель забываем навсегда
        let tracked = brain.target().and_then(|target| {
            targets
                .get(target)
                .ok()
                .map(|(target_transform, target_health)| {
                    (target, target_transform.translation, target_health.map_or(true, Health::is_alive))
                })
        });
        if brain.target().is_some() && tracked.is_none() {
            crate::log(&format!("👻 Enemy {:?} lost its target (despawned)", entity));
            brain.set_target(None);
        }

        let target = tracked
            .filter(|(_, _, alive)| *alive)
            .map(|(target, target_position, _)| TargetSense {
                entity: target,
                position: target_position,
                detected: detect_target(
                    sight.0.as_ref(),
                    position + eye_offset,
                    target_position + eye_offset,
                    config.detection_radius,
                ),
            });

        let senses = EnemySenses {
            now,
            delta,
            position,
            health: health.current,
            target,
        };

        let previous = brain.state();
        let actions = {
            let mut ctx = BrainContext::new(&mut rng.rng, navigation.0.as_ref());
            brain.tick(config, &senses, &mut ctx);
            ctx.into_actions()
        };

        for action in actions {
            match action {
                EnemyAction::Stop => {
                    *command = MovementCommand::Stop;
                }
                EnemyAction::MoveTo(destination) => {
                    *command = MovementCommand::MoveToPosition { target: destination };
                }
                EnemyAction::Follow { target, stop_within } => {
                    *command = MovementCommand::FollowEntity { target, stop_within };
                }
                EnemyAction::Face(point) => {
                    if let Some(direction) = planar_direction(position, point) {
                        transform.look_to(direction, Vec3::Y);
                    }
                }
                EnemyAction::Strike { target } => {
                    let amount = stats
                        .map(|stats| stats.roll_damage(&mut rng.rng))
                        .unwrap_or(config.attack_damage);

                    crate::log(&format!("🗡️ Enemy {:?} strikes {:?} for {}", entity, target, amount));
                    damage_requests.write(DamageRequest {
                        target,
                        amount,
                        source: Some(entity),
                    });
                }
                EnemyAction::Cue(kind) => {
                    cues.write(EnemyCue { entity, kind });
                }
                EnemyAction::ScheduleRemoval { after } => {
                    commands.entity(entity).insert((
                        Dead,
                        DespawnAfter {
                            despawn_time: now + after,
                        },
                        Hurtbox { enabled: false },
                    ));
                }
            }
        }

        let current = brain.state();
        if current != previous {
            crate::log(&format!("🧠 Enemy {:?}: {:?} → {:?}", entity, previous, current));
            cues.write(EnemyCue {
                entity,
                kind: EnemyCueKind::StateChanged {
                    from: previous,
                    to: current,
                },
            });
        }
    }
}
