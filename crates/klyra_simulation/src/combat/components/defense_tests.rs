//! Tests for player damage intake (parry / block / hit).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::components::{is_facing_attack, DamageResult, GuardState, PlayerHealth};

    /// Игрок смотрит в -Z, враг стоит перед ним (удар летит в +Z)
    const FORWARD: Vec3 = Vec3::NEG_Z;
    const FROM_FRONT: Vec3 = Vec3::Z;
    const FROM_BEHIND: Vec3 = Vec3::NEG_Z;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn blocking_since(started_at: f64) -> GuardState {
        GuardState {
            is_blocking: true,
            block_started_at: started_at,
        }
    }

    #[test]
    fn test_unguarded_hit_takes_full_damage() {
        let mut health = PlayerHealth::default();
        let outcome = health.take_damage(20.0, FROM_FRONT, FORWARD, GuardState::default(), 1.0);

        assert_eq!(outcome.result, DamageResult::Hit);
        assert_eq!(outcome.damage_taken, 20.0);
        assert_eq!(health.health(), 80.0);
        assert_eq!(health.stamina(), 100.0);
    }

    #[test]
    fn test_block_reduces_damage_and_costs_stamina() {
        let mut health = PlayerHealth::default();
        // Блок держится 1 сек: parry окно (0.4) давно прошло
        let outcome = health.take_damage(20.0, FROM_FRONT, FORWARD, blocking_since(0.0), 1.0);

        assert_eq!(outcome.result, DamageResult::Blocked);
        assert!(approx(outcome.damage_taken, 2.0));
        assert!(approx(health.health(), 98.0));
        assert_eq!(health.stamina(), 90.0);
    }

    #[test]
    fn test_block_without_enough_stamina_is_partial_hit() {
        let mut health = PlayerHealth::default();
        health.set_stamina_percent(0.05);
        assert!(approx(health.stamina(), 5.0));

        let outcome = health.take_damage(20.0, FROM_FRONT, FORWARD, blocking_since(0.0), 1.0);

        assert_eq!(outcome.result, DamageResult::Hit);
        assert!(approx(outcome.damage_taken, 10.0));
        assert!(approx(health.health(), 90.0));
        assert_eq!(health.stamina(), 0.0);
    }

    #[test]
    fn test_block_with_zero_stamina_takes_full_damage() {
        let mut health = PlayerHealth::default();
        health.set_stamina_percent(0.0);

        let outcome = health.take_damage(20.0, FROM_FRONT, FORWARD, blocking_since(0.0), 1.0);
        assert_eq!(outcome.result, DamageResult::Hit);
        assert_eq!(outcome.damage_taken, 20.0);
    }

    #[test]
    fn test_parry_negates_damage_and_rewards_stamina() {
        let mut health = PlayerHealth::default();
        health.set_stamina_percent(0.5);

        let outcome = health.take_damage(20.0, FROM_FRONT, FORWARD, blocking_since(0.9), 1.0);

        assert_eq!(outcome.result, DamageResult::Parried);
        assert_eq!(outcome.damage_taken, 0.0);
        assert_eq!(health.health(), 100.0);
        assert!(approx(health.stamina(), 70.0));
    }

    #[test]
    fn test_parry_reward_clamps_to_max() {
        let mut health = PlayerHealth::default();
        health.take_damage(20.0, FROM_FRONT, FORWARD, blocking_since(0.9), 1.0);
        assert_eq!(health.stamina(), 100.0);
    }

    #[test]
    fn test_attack_from_behind_ignores_guard() {
        let mut health = PlayerHealth::default();

        // Даже в parry окне
        let outcome = health.take_damage(20.0, FROM_BEHIND, FORWARD, blocking_since(0.9), 1.0);
        assert_eq!(outcome.result, DamageResult::Hit);
        assert_eq!(outcome.damage_taken, 20.0);
        assert_eq!(health.stamina(), 100.0);
    }

    #[test]
    fn test_zero_direction_counts_as_front() {
        assert!(is_facing_attack(FORWARD, Vec3::ZERO));
        assert!(is_facing_attack(FORWARD, FROM_FRONT));
        assert!(!is_facing_attack(FORWARD, FROM_BEHIND));
        // Ровно сбоку (90°): не спереди
        assert!(!is_facing_attack(FORWARD, Vec3::X));

        let mut health = PlayerHealth::default();
        let outcome = health.take_damage(20.0, Vec3::ZERO, FORWARD, blocking_since(0.0), 1.0);
        assert_eq!(outcome.result, DamageResult::Blocked);
    }

    #[test]
    fn test_lethal_hit_marks_dead_once() {
        let mut health = PlayerHealth::default();

        let outcome = health.take_damage(150.0, FROM_FRONT, FORWARD, GuardState::default(), 1.0);
        assert!(outcome.died);
        assert!(health.is_dead());
        assert_eq!(health.health(), 0.0);

        // Мёртвый игрок урон больше не получает
        let outcome = health.take_damage(10.0, FROM_FRONT, FORWARD, GuardState::default(), 2.0);
        assert!(!outcome.died);
        assert_eq!(outcome.damage_taken, 0.0);
        assert_eq!(health.health(), 0.0);
    }

    #[test]
    fn test_stamina_regenerates_after_delay() {
        let mut health = PlayerHealth::default();
        health.take_damage(20.0, FROM_FRONT, FORWARD, blocking_since(0.0), 1.0);
        assert_eq!(health.stamina(), 90.0);

        health.regenerate(1.5, 0.5); // ещё в задержке
        assert_eq!(health.stamina(), 90.0);

        health.regenerate(2.5, 0.25); // +20 × 0.25
        assert!(approx(health.stamina(), 95.0));

        health.regenerate(10.0, 10.0);
        assert_eq!(health.stamina(), 100.0);
    }

    #[test]
    fn test_heal_and_percent_setters_clamp() {
        let mut health = PlayerHealth::default();
        health.set_health_percent(1.5);
        assert_eq!(health.health(), 100.0);

        health.set_health_percent(0.25);
        assert!(approx(health.health_percent(), 0.25));

        health.heal(500.0);
        assert_eq!(health.health(), 100.0);

        health.set_stamina_percent(-1.0);
        assert_eq!(health.stamina(), 0.0);
        health.restore_stamina(30.0);
        assert!(approx(health.stamina_percent(), 0.3));
    }
}
