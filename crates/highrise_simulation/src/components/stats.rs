//! Боевые характеристики: attack / defense / speed / level
//!
//! Роль (игрок или враг) определяет потолок damage reduction и то,
//! как работает level up.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::actor::Health;
use crate::combat::damage::damage_reduction;
use crate::shared::random_between;

/// Очки распределения за уровень (player)
pub const POINTS_PER_LEVEL: u32 = 5;

/// Разброс урона вокруг attack (±20%)
pub const DAMAGE_VARIATION: f32 = 0.2;

/// Роль актора в бою
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum CombatRole {
    #[default]
    Player,
    Enemy,
}

impl CombatRole {
    /// Потолок damage reduction: игрок 80%, враг 70%
    pub fn reduction_cap(&self) -> f32 {
        match self {
            CombatRole::Player => 0.8,
            CombatRole::Enemy => 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("not enough stat points: requested {requested}, available {available}")]
    NotEnoughPoints { requested: u32, available: u32 },
}

/// Распределение очков после level up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatAllocation {
    pub health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatAllocation {
    pub fn total(&self) -> u32 {
        self.health + self.attack + self.defense + self.speed
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub level: u32,
    pub role: CombatRole,
    /// Нераспределённые очки (только player)
    pub available_points: u32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self::player()
    }
}

impl CombatStats {
    pub fn player() -> Self {
        Self {
            attack: 10,
            defense: 5,
            speed: 5,
            level: 1,
            role: CombatRole::Player,
            available_points: 0,
        }
    }

    pub fn enemy() -> Self {
        Self {
            attack: 8,
            defense: 3,
            speed: 4,
            level: 1,
            role: CombatRole::Enemy,
            available_points: 0,
        }
    }

    pub fn damage_reduction(&self) -> f32 {
        damage_reduction(self.defense, self.role.reduction_cap())
    }

    /// Урон одной атаки: attack ± 20%, округление half-to-even
    pub fn roll_damage<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let base = self.attack as f32;
        let spread = base * DAMAGE_VARIATION;
        let rolled = base + random_between(rng, -spread, spread);
        rolled.max(0.0).round_ties_even() as u32
    }

    /// Level up
    ///
    /// - Enemy: фиксированный прирост (+2 atk, +1 def, +1 spd, +15 max HP)
    /// - Player: +POINTS_PER_LEVEL очков для ручного распределения
    pub fn level_up(&mut self, health: &mut Health) {
        self.level += 1;

        match self.role {
            CombatRole::Enemy => {
                self.attack += 2;
                self.defense += 1;
                self.speed += 1;
                health.set_max(health.max + 15);
            }
            CombatRole::Player => {
                self.available_points = POINTS_PER_LEVEL;
            }
        }
    }

    /// Применить распределение очков (player stat panel)
    pub fn distribute(&mut self, health: &mut Health, allocation: StatAllocation) -> Result<(), StatsError> {
        let requested = allocation.total();
        if requested > self.available_points {
            return Err(StatsError::NotEnoughPoints {
                requested,
                available: self.available_points,
            });
        }

        self.attack += allocation.attack;
        self.defense += allocation.defense;
        self.speed += allocation.speed;
        self.available_points -= requested;

        if allocation.health > 0 {
            health.set_max(health.max + allocation.health);
        }

        Ok(())
    }
}
