//! Damage pipeline: формула защиты, события урона и смерти
//!
//! Любой урон (атака врага, оружие игрока, ловушки) приходит как
//! `DamageRequest` и проходит через одну формулу:
//!
//! - reduction = min(defense × 0.02, cap)   (cap: игрок 0.8, враг 0.7)
//! - damage    = max(1, round(amount × (1 − reduction)))
//!
//! Округление: half-to-even. Нулевой запрос игнорируется.

use bevy::prelude::*;

/// Каждое очко защиты режет 2% урона
pub const DEFENSE_REDUCTION_PER_POINT: f32 = 0.02;

/// Damage reduction для данного defense с потолком cap
pub fn damage_reduction(defense: u32, cap: f32) -> f32 {
    (defense as f32 * DEFENSE_REDUCTION_PER_POINT).min(cap)
}

/// Итоговый урон после reduction
///
/// Инвариант: для amount > 0 результат в [1, amount].
pub fn effective_damage(amount: u32, reduction: f32) -> u32 {
    if amount == 0 {
        return 0;
    }

    let scaled = amount as f32 * (1.0 - reduction.clamp(0.0, 1.0));
    let rounded = scaled.round_ties_even() as u32;

    rounded.clamp(1, amount)
}

/// Запрос на урон (ApplyDamage): от AI атаки или от внешнего hit detection
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    /// Сырой урон до защиты
    pub amount: u32,
    /// Кто бьёт (None: окружение)
    pub source: Option<Entity>,
}

/// Урон применён
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Сырой урон из запроса
    pub requested: u32,
    /// Урон после защиты
    pub damage: u32,
    /// Здоровье цели после удара
    pub remaining_health: u32,
}

impl DamageDealt {
    pub fn is_lethal(&self) -> bool {
        self.remaining_health == 0
    }
}

/// Здоровье упало до нуля
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health == 0)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
///
/// Используется для уборки трупов после death animation.
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (секунды elapsed симуляции)
    pub despawn_time: f32,
}
