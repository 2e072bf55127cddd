//! Базовые компоненты акторов: Player, Health, Hurtbox

use bevy::prelude::*;

use super::stats::CombatStats;

/// Игрок: единственная цель, которую отслеживают враги
///
/// Статы по умолчанию: player role (cap защиты 80%).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Hurtbox, CombatStats, Transform)]
pub struct Player;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP (игрок)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Новый максимум (level up, бонусы): здоровье восстанавливается до полного
    pub fn set_max(&mut self, max: u32) {
        self.max = max;
        self.current = max;
    }

    /// Доля здоровья 0.0..=1.0 (для health bar)
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

/// Hurtbox: принимает ли актор урон от оружия/атак
///
/// При смерти выключается (аналог отключения коллайдеров).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub enabled: bool,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self { enabled: true }
    }
}
