//! AI Events
//!
//! Inbound: EnemyActivation (Activate/Deactivate от trigger zone или хоста)
//! Outbound: EnemyCue (presentation hooks: анимации, звук, UI)

use bevy::prelude::*;

use super::components::EnemyCueKind;

/// Включить/выключить мозг врага
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyActivation {
    pub enemy: Entity,
    pub active: bool,
}

impl EnemyActivation {
    pub fn activate(enemy: Entity) -> Self {
        Self { enemy, active: true }
    }

    pub fn deactivate(enemy: Entity) -> Self {
        Self { enemy, active: false }
    }
}

/// Presentation hook от врага (fire-and-forget, ответа не ждём)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyCue {
    pub entity: Entity,
    pub kind: EnemyCueKind,
}
