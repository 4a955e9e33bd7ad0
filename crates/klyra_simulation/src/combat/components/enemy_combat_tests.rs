//! Tests for the enemy combat state machine (telegraph / stagger).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::combat::animation::{AnimationCommand, CLIP_STAGGER, PARAM_ATTACK_TYPE};
    use crate::combat::components::{AttackType, EnemyCombat, WeaponState};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    /// Враг с вынутым мечом к t=1.0
    fn armed_enemy() -> (EnemyCombat, ChaCha8Rng, Vec<AnimationCommand>) {
        let mut combat = EnemyCombat::default();
        let mut rng = rng();
        let mut sink = Vec::new();

        assert!(combat.draw_sword(0.0, &mut sink));
        assert!(combat.is_drawing());
        let tick = combat.advance(0.8, &mut rng, &mut sink);
        assert_eq!(tick.transition_completed, Some(WeaponState::Equipped));
        assert!(combat.is_armed());

        sink.clear();
        (combat, rng, sink)
    }

    fn stagger_clips(sink: &[AnimationCommand]) -> usize {
        sink.iter()
            .filter(|c| **c == AnimationCommand::PlayClip { clip: CLIP_STAGGER })
            .count()
    }

    #[test]
    fn test_attack_requires_equipped_sword() {
        let mut combat = EnemyCombat::default();
        let mut sink = Vec::new();

        assert!(!combat.attack(0.0, &mut sink));
        combat.draw_sword(0.0, &mut sink);
        assert!(!combat.attack(0.1, &mut sink)); // ещё Drawing
        assert!(!combat.is_telegraphing());
    }

    #[test]
    fn test_telegraph_precedes_strike() {
        let (mut combat, mut rng, mut sink) = armed_enemy();

        assert!(combat.attack(1.0, &mut sink));
        assert!(combat.is_telegraphing());
        assert!(!combat.can_act());
        assert!(sink.contains(&AnimationCommand::TelegraphIndicator { visible: true }));

        // Повторный attack во время wind-up игнорируется
        assert!(!combat.attack(1.2, &mut sink));

        let tick = combat.advance(1.5, &mut rng, &mut sink);
        assert!(tick.strike.is_none());
        assert!(combat.is_telegraphing());

        let tick = combat.advance(1.75, &mut rng, &mut sink);
        assert_eq!(tick.strike, Some(10.0));
        assert!(!combat.is_telegraphing());
        assert!(combat.is_attacking());
        assert!(sink.contains(&AnimationCommand::TelegraphIndicator { visible: false }));
        assert!((1..=3).contains(&combat.last_combo_step()));

        // Урон ровно один раз
        let tick = combat.advance(1.9, &mut rng, &mut sink);
        assert!(tick.strike.is_none());

        combat.advance(2.25, &mut rng, &mut sink);
        assert!(!combat.is_attacking());
        assert!(combat.can_act());
    }

    #[test]
    fn test_stagger_cancels_telegraph_without_damage() {
        let (mut combat, mut rng, mut sink) = armed_enemy();

        combat.attack(1.0, &mut sink);
        combat.stagger(1.3, &mut sink);

        assert!(combat.is_staggered());
        assert!(!combat.is_telegraphing());
        assert!(!combat.can_act());

        // Ни на истечении telegraph, ни позже удара нет
        for step in 0..300 {
            let now = 1.3 + step as f64 / 60.0;
            let tick = combat.advance(now, &mut rng, &mut sink);
            assert!(tick.strike.is_none());
        }
    }

    #[test]
    fn test_parry_schedules_stagger_after_attack() {
        let (mut combat, mut rng, mut sink) = armed_enemy();

        combat.attack(1.0, &mut sink);
        let tick = combat.advance(1.75, &mut rng, &mut sink);
        assert!(tick.strike.is_some());

        combat.schedule_stagger_after_attack();
        assert!(combat.stagger_pending());

        // Атака ещё идёт: stagger ждёт
        let tick = combat.advance(2.0, &mut rng, &mut sink);
        assert!(!tick.stagger_started);
        assert!(!combat.is_staggered());

        let tick = combat.advance(2.25, &mut rng, &mut sink);
        assert!(tick.stagger_started);
        assert!(combat.is_staggered());
        assert!(!combat.stagger_pending());
        assert_eq!(combat.stagger_window().unwrap().ends_at, 6.25);
    }

    #[test]
    fn test_stagger_flinches_and_recovers() {
        let (mut combat, mut rng, mut sink) = armed_enemy();

        combat.stagger(1.0, &mut sink);
        assert_eq!(stagger_clips(&sink), 1);

        combat.advance(1.5, &mut rng, &mut sink);
        assert_eq!(stagger_clips(&sink), 1);

        combat.advance(1.8, &mut rng, &mut sink); // flinch через 0.8
        assert_eq!(stagger_clips(&sink), 2);
        assert!((combat.stagger_window().unwrap().next_flinch_at - 2.6).abs() < 1e-4);

        let tick = combat.advance(4.9, &mut rng, &mut sink);
        assert!(!tick.stagger_ended);
        assert!(!combat.can_act());

        let tick = combat.advance(5.0, &mut rng, &mut sink);
        assert!(tick.stagger_ended);
        assert!(combat.can_act());
        assert!(combat.attack(5.1, &mut sink));
    }

    #[test]
    fn test_stagger_clears_pending_attack_and_state() {
        let (mut combat, mut rng, mut sink) = armed_enemy();

        combat.attack(1.0, &mut sink);
        combat.advance(1.75, &mut rng, &mut sink);
        assert!(combat.is_attacking());

        combat.schedule_stagger_after_attack();
        combat.stagger(1.8, &mut sink);

        assert!(!combat.is_attacking());
        assert!(!combat.stagger_pending());

        // Отложенный stagger не перезапускает окно
        let tick = combat.advance(1.9, &mut rng, &mut sink);
        assert!(!tick.stagger_started);
        assert!((combat.stagger_window().unwrap().ends_at - 5.8).abs() < 1e-4);
    }

    #[test]
    fn test_heavy_attack_is_untelegraphed_and_longer() {
        let (mut combat, mut rng, mut sink) = armed_enemy();

        assert!(combat.heavy_attack(1.0, &mut sink));
        assert!(!combat.is_telegraphing());
        assert!(combat.is_attacking());
        assert!(sink.contains(&AnimationCommand::SetInt {
            param: PARAM_ATTACK_TYPE,
            value: AttackType::HeavyFlourish.as_i32(),
        }));

        // 0.5 × 1.5 = 0.75
        let tick = combat.advance(1.7, &mut rng, &mut sink);
        assert!(tick.strike.is_none());
        assert!(combat.is_attacking());

        combat.advance(1.75, &mut rng, &mut sink);
        assert!(!combat.is_attacking());
    }

    #[test]
    fn test_sheathe_and_redraw() {
        let (mut combat, mut rng, mut sink) = armed_enemy();

        assert!(combat.sheathe_sword(1.0, &mut sink));
        assert!(!combat.draw_sword(1.1, &mut sink)); // Sheathing не прерывается
        let tick = combat.advance(1.85, &mut rng, &mut sink);
        assert_eq!(tick.transition_completed, Some(WeaponState::Sheathed));
        assert!(combat.draw_sword(2.0, &mut sink));
    }

    #[test]
    fn test_indicator_follows_head() {
        let combat = EnemyCombat::default();
        let position = combat.indicator_position(Vec3::new(3.0, 0.0, -2.0));
        assert_eq!(position, Vec3::new(3.0, 2.0, -2.0));
    }

    #[test]
    fn test_pulse_scale_stays_in_range() {
        let (mut combat, _, mut sink) = armed_enemy();
        combat.attack(1.0, &mut sink);
        let window = combat.telegraph().unwrap();

        for step in 0..45 {
            let scale = window.pulse_scale(1.0 + step as f64 / 60.0);
            assert!((1.0..=1.4 + 1e-5).contains(&scale));
        }
        assert_eq!(window.pulse_scale(1.0), 1.0);
    }
}
