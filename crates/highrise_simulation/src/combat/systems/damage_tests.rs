//! Tests for damage formula.

#[cfg(test)]
mod tests {
    use crate::combat::damage::{damage_reduction, effective_damage, DamageDealt};
    use bevy::prelude::*;

    #[test]
    fn test_reduction_two_percent_per_point() {
        let reduction = damage_reduction(5, 0.8);
        assert!((reduction - 0.1).abs() < 1e-6);

        // Потолок
        assert_eq!(damage_reduction(50, 0.8), 0.8);
        assert_eq!(damage_reduction(50, 0.7), 0.7);
    }

    #[test]
    fn test_effective_damage_basic() {
        // 100 × (1 − 0.1) = 90
        assert_eq!(effective_damage(100, damage_reduction(5, 0.8)), 90);

        // Максимальная защита врага: 10 × 0.3 = 3
        assert_eq!(effective_damage(10, damage_reduction(100, 0.7)), 3);

        // Без защиты: полный урон
        assert_eq!(effective_damage(25, 0.0), 25);
    }

    #[test]
    fn test_effective_damage_minimum_one() {
        // 1 × 0.2 = 0.2 → 0 → clamp до 1
        assert_eq!(effective_damage(1, 0.8), 1);
        assert_eq!(effective_damage(2, 0.8), 1);
    }

    #[test]
    fn test_effective_damage_bounds_hold_for_all_inputs() {
        for amount in 1..=200u32 {
            for defense in 0..=60u32 {
                for cap in [0.7, 0.8] {
                    let damage = effective_damage(amount, damage_reduction(defense, cap));
                    assert!(damage >= 1, "amount {} defense {} → {}", amount, defense, damage);
                    assert!(damage <= amount, "amount {} defense {} → {}", amount, defense, damage);
                }
            }
        }
    }

    #[test]
    fn test_zero_amount_is_ignored() {
        assert_eq!(effective_damage(0, 0.5), 0);
    }

    #[test]
    fn test_damage_dealt_lethal_flag() {
        let event = DamageDealt {
            attacker: None,
            target: Entity::PLACEHOLDER,
            requested: 15,
            damage: 12,
            remaining_health: 0,
        };

        assert!(event.is_lethal());
    }
}
