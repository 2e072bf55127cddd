//! Kinematic исполнитель MovementCommand (headless замена navmesh agent).
//!
//! Хост с настоящей навигацией может не регистрировать эту систему и
//! читать MovementCommand сам.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::{MovementCommand, MovementSpeed};
use crate::shared::{move_towards, planar_direction};

/// System: двигаем акторов по MovementCommand
///
/// - MoveToPosition: прямо к точке, по прибытии → Idle
/// - FollowEntity: к цели, но не ближе stop_within; цель пропала → Idle
pub fn drive_movement(
    mut movers: ParamSet<(
        Query<(&mut Transform, &mut MovementCommand, &MovementSpeed), Without<Dead>>,
        Query<&Transform>,
    )>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    // Снимаем позиции целей до мутаций (цель может сама двигаться в этом же проходе)
    let follow_targets: Vec<Entity> = movers
        .p0()
        .iter()
        .filter_map(|(_, command, _)| match command {
            MovementCommand::FollowEntity { target, .. } => Some(*target),
            _ => None,
        })
        .collect();

    let anchors: HashMap<Entity, Vec3> = {
        let transforms = movers.p1();
        follow_targets
            .into_iter()
            .filter_map(|target| {
                transforms
                    .get(target)
                    .ok()
                    .map(|transform| (target, transform.translation))
            })
            .collect()
    };

    for (mut transform, mut command, speed) in movers.p0().iter_mut() {
        let position = transform.translation;
        let max_step = speed.speed * delta;

        let next = match *command {
            MovementCommand::Idle | MovementCommand::Stop => continue,
            MovementCommand::MoveToPosition { target } => {
                let next = move_towards(position, target, max_step);
                if next == target {
                    *command = MovementCommand::Idle;
                }
                next
            }
            MovementCommand::FollowEntity { target, stop_within } => {
                let Some(&goal) = anchors.get(&target) else {
                    *command = MovementCommand::Idle;
                    continue;
                };

                let gap = position.distance(goal) - stop_within;
                if gap <= 0.0 {
                    continue;
                }
                move_towards(position, goal, gap.min(max_step))
            }
        };

        if let Some(direction) = planar_direction(position, next) {
            transform.look_to(direction, Vec3::Y);
        }
        transform.translation = next;
    }
}
