//! Enemy trigger zones: игрок входит в зону → враг появляется или просыпается.
//!
//! Зона срабатывает один раз. Повторно взвести: `TriggerZoneCommand::Reset`,
//! сработать без игрока: `TriggerZoneCommand::Fire`.

use bevy::prelude::*;

use super::components::EnemyConfig;
use super::events::EnemyActivation;
use crate::components::Player;

/// Что делает зона при срабатывании
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerPayload {
    /// Разбудить уже стоящего на сцене врага
    ActivateExisting(Entity),
    /// Заспавнить нового врага
    Spawn { position: Vec3, config: EnemyConfig },
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct EnemyTriggerZone {
    /// Радиус сферы вокруг Transform зоны
    pub radius: f32,
    pub payload: TriggerPayload,
    pub triggered: bool,
}

impl EnemyTriggerZone {
    pub fn new(radius: f32, payload: TriggerPayload) -> Self {
        Self {
            radius,
            payload,
            triggered: false,
        }
    }

    /// Взвести заново
    pub fn reset(&mut self) {
        self.triggered = false;
    }

    pub fn contains(&self, zone_position: Vec3, point: Vec3) -> bool {
        zone_position.distance(point) <= self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerZoneCommandKind {
    /// Взвести зону заново
    Reset,
    /// Сработать вручную (скрипт, кат-сцена)
    Fire,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerZoneCommand {
    pub zone: Entity,
    pub kind: TriggerZoneCommandKind,
}

/// Система: ручные команды + проверка вхождения игрока
pub fn process_trigger_zones(
    mut zones: Query<(Entity, &Transform, &mut EnemyTriggerZone)>,
    players: Query<&Transform, With<Player>>,
    mut zone_commands: EventReader<TriggerZoneCommand>,
    mut activations: EventWriter<EnemyActivation>,
    mut commands: Commands,
) {
    for command in zone_commands.read() {
        let Ok((entity, _, mut zone)) = zones.get_mut(command.zone) else {
            crate::log_warning(&format!("⚠️ TriggerZoneCommand for unknown zone {:?}", command.zone));
            continue;
        };

        match command.kind {
            TriggerZoneCommandKind::Reset => {
                zone.reset();
                crate::log(&format!("🔁 Trigger zone {:?} re-armed", entity));
            }
            TriggerZoneCommandKind::Fire => {
                fire_zone(entity, &mut zone, &mut activations, &mut commands);
            }
        }
    }

    let player_positions: Vec<Vec3> = players.iter().map(|transform| transform.translation).collect();
    if player_positions.is_empty() {
        return;
    }

    for (entity, transform, mut zone) in zones.iter_mut() {
        if zone.triggered {
            continue;
        }

        let entered = player_positions
            .iter()
            .any(|player| zone.contains(transform.translation, *player));

        if entered {
            fire_zone(entity, &mut zone, &mut activations, &mut commands);
        }
    }
}

fn fire_zone(
    zone_entity: Entity,
    zone: &mut EnemyTriggerZone,
    activations: &mut EventWriter<EnemyActivation>,
    commands: &mut Commands,
) {
    if zone.triggered {
        return;
    }
    zone.triggered = true;

    match &zone.payload {
        TriggerPayload::ActivateExisting(enemy) => {
            crate::log_info(&format!("🚨 Trigger zone {:?} → activating {:?}", zone_entity, enemy));
            activations.write(EnemyActivation::activate(*enemy));
        }
        TriggerPayload::Spawn { position, config } => {
            let enemy = super::spawn_enemy(commands, *position, config.clone());
            crate::log_info(&format!(
                "🚨 Trigger zone {:?} → spawned enemy {:?} at {:?}",
                zone_entity, enemy, position
            ));
        }
    }
}
