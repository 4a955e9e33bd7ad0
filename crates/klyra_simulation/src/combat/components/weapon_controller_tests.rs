//! Tests for the player weapon state machine.

#[cfg(test)]
mod tests {
    use crate::combat::animation::{AnimationCommand, LAYER_COMBAT, PARAM_COMBO_STEP};
    use crate::combat::components::{AttackType, WeaponController, WeaponInput, WeaponState};

    const IDLE: WeaponInput = WeaponInput {
        toggle_weapon: false,
        light_attack: false,
        block_held: false,
        airborne: false,
        sprinting: false,
    };

    fn toggle() -> WeaponInput {
        WeaponInput { toggle_weapon: true, ..IDLE }
    }

    fn light() -> WeaponInput {
        WeaponInput { light_attack: true, ..IDLE }
    }

    fn block() -> WeaponInput {
        WeaponInput { block_held: true, ..IDLE }
    }

    /// Controller с вынутым мечом; возвращает время, когда он Equipped
    fn equipped_controller() -> (WeaponController, f64, Vec<AnimationCommand>) {
        let mut controller = WeaponController::default();
        let mut sink = Vec::new();

        controller.advance(0.0, &toggle(), &mut sink);
        assert_eq!(controller.weapon_state(), WeaponState::Drawing);

        controller.advance(0.5, &IDLE, &mut sink);
        let output = controller.advance(0.8, &IDLE, &mut sink);
        assert_eq!(output.transition_completed, Some(WeaponState::Equipped));

        sink.clear();
        (controller, 1.0, sink)
    }

    #[test]
    fn test_attack_while_not_equipped_is_noop() {
        let mut controller = WeaponController::default();
        let mut sink = Vec::new();

        let output = controller.advance(0.0, &light(), &mut sink);
        assert!(output.attack.is_none());
        assert!(!controller.is_attacking());
        assert_eq!(controller.current_attack(), AttackType::None);

        // Во время Drawing тоже нельзя
        controller.advance(0.1, &toggle(), &mut sink);
        let output = controller.advance(0.2, &light(), &mut sink);
        assert!(output.attack.is_none());
        assert_eq!(controller.light_combo_step(), 0);
    }

    #[test]
    fn test_light_combo_steps_1_2_3_then_restart() {
        let (mut controller, t0, mut sink) = equipped_controller();

        let steps: Vec<i32> = [0.0, 0.3, 0.6, 0.9]
            .iter()
            .map(|offset| {
                let output = controller.advance(t0 + offset, &light(), &mut sink);
                let attack = output.attack.expect("attack must dispatch");
                assert_eq!(attack.attack_type, AttackType::LightCombo);
                attack.combo_step
            })
            .collect();

        assert_eq!(steps, vec![1, 2, 3, 1]);
        assert!(sink.contains(&AnimationCommand::SetInt { param: PARAM_COMBO_STEP, value: 3 }));
    }

    #[test]
    fn test_finisher_flag_on_step_three() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &light(), &mut sink);
        controller.advance(t0 + 0.3, &light(), &mut sink);
        assert!(!controller.combo_finisher_ready());

        controller.advance(t0 + 0.6, &light(), &mut sink);
        assert_eq!(controller.light_combo_step(), 3);
        assert!(controller.combo_finisher_ready());
    }

    #[test]
    fn test_attack_during_lockout_is_ignored() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &light(), &mut sink);
        let end = controller.attack_end_at();

        // 0.1 сек: ещё далеко до cancel window (последние 0.15 сек)
        let output = controller.advance(t0 + 0.1, &light(), &mut sink);
        assert!(output.attack.is_none());
        assert_eq!(controller.light_combo_step(), 1);
        assert_eq!(controller.attack_end_at(), end);
    }

    #[test]
    fn test_attack_clears_and_combo_resets_after_window() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &light(), &mut sink);
        assert!(controller.is_attacking());

        controller.advance(t0 + 0.45, &IDLE, &mut sink);
        assert!(!controller.is_attacking());
        assert_eq!(controller.current_attack(), AttackType::None);
        assert_eq!(controller.light_combo_step(), 1); // ещё в combo window

        // Атака уже закончилась → новый combo
        let output = controller.advance(t0 + 0.5, &light(), &mut sink);
        assert_eq!(output.attack.unwrap().combo_step, 1);

        // Без новых атак дольше combo window → step 0
        controller.advance(t0 + 1.5, &IDLE, &mut sink);
        assert_eq!(controller.light_combo_step(), 0);
    }

    #[test]
    fn test_airborne_beats_sprint() {
        let (mut controller, t0, mut sink) = equipped_controller();

        let input = WeaponInput { airborne: true, sprinting: true, ..light() };
        let output = controller.advance(t0, &input, &mut sink);

        assert_eq!(output.attack.unwrap().attack_type, AttackType::Leaping);
        assert!((controller.attack_end_at() - (t0 + 0.6)).abs() < 1e-5);
        assert_eq!(controller.light_combo_step(), 0);
    }

    #[test]
    fn test_sprint_attack_is_fencing() {
        let (mut controller, t0, mut sink) = equipped_controller();

        let input = WeaponInput { sprinting: true, ..light() };
        let output = controller.advance(t0, &input, &mut sink);

        let attack = output.attack.unwrap();
        assert_eq!(attack.attack_type, AttackType::Fencing);
        assert_eq!(attack.combo_step, 1);
        assert!((controller.attack_end_at() - (t0 + 0.4)).abs() < 1e-5);
    }

    #[test]
    fn test_quick_block_release_parries() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &block(), &mut sink);
        assert!(controller.is_blocking());
        assert_eq!(controller.guard().block_started_at, t0);

        let output = controller.advance(t0 + 0.2, &IDLE, &mut sink);
        let attack = output.attack.expect("release inside window must parry");
        assert_eq!(attack.attack_type, AttackType::Parry);
        assert_eq!(attack.combo_step, 1);
        assert!(!controller.is_blocking());
        assert!(controller.is_attacking());
        assert!((controller.attack_end_at() - (t0 + 0.2 + 0.6)).abs() < 1e-5);
    }

    #[test]
    fn test_slow_block_release_does_not_parry() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &block(), &mut sink);
        controller.advance(t0 + 0.25, &block(), &mut sink);
        let output = controller.advance(t0 + 0.5, &IDLE, &mut sink);

        assert!(output.attack.is_none());
        assert!(!controller.is_blocking());
        assert!(!controller.is_attacking());
    }

    #[test]
    fn test_block_prevents_attack_and_resets_combo() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &light(), &mut sink);
        assert_eq!(controller.light_combo_step(), 1);

        // Блок во время атаки не начинается
        controller.advance(t0 + 0.1, &block(), &mut sink);
        assert!(!controller.is_blocking());

        // Атака закончилась
        controller.advance(t0 + 0.45, &IDLE, &mut sink);
        assert!(!controller.is_attacking());

        // После атаки: начинается и сбрасывает combo
        controller.advance(t0 + 0.5, &block(), &mut sink);
        assert!(controller.is_blocking());
        assert_eq!(controller.light_combo_step(), 0);

        let input = WeaponInput { light_attack: true, block_held: true, ..IDLE };
        let output = controller.advance(t0 + 0.6, &input, &mut sink);
        assert!(output.attack.is_none());
    }

    #[test]
    fn test_toggle_ignored_during_attack_lockout() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &light(), &mut sink);
        let output = controller.advance(t0 + 0.1, &toggle(), &mut sink);

        assert!(output.transition_started.is_none());
        assert_eq!(controller.weapon_state(), WeaponState::Equipped);
        assert!(controller.is_attacking());
    }

    #[test]
    fn test_toggle_ignored_inside_cancel_window() {
        let (mut controller, t0, mut sink) = equipped_controller();

        // Light атака 0.4 сек, cancel window = последние 0.15 сек
        controller.advance(t0, &light(), &mut sink);
        let output = controller.advance(t0 + 0.3, &toggle(), &mut sink);

        assert!(output.transition_started.is_none());
        assert_eq!(controller.weapon_state(), WeaponState::Equipped);
        assert!(controller.is_attacking());

        // В cancel window новая атака разрешена, sheathe нет
        let output = controller.advance(t0 + 0.3, &light(), &mut sink);
        assert_eq!(output.attack.unwrap().combo_step, 2);

        // Атака закончилась: toggle снова работает
        let output = controller.advance(t0 + 0.75, &toggle(), &mut sink);
        assert_eq!(output.transition_started, Some(WeaponState::Sheathing));
    }

    #[test]
    fn test_timers_keep_precision_after_long_uptime() {
        let mut controller = WeaponController::default();
        let mut sink = Vec::new();
        // ~28 часов uptime
        let t0 = 100_000.0;

        controller.advance(t0, &toggle(), &mut sink);
        controller.advance(t0 + 0.9, &IDLE, &mut sink);
        assert_eq!(controller.weapon_state(), WeaponState::Equipped);

        controller.advance(t0 + 1.0, &block(), &mut sink);
        let output = controller.advance(t0 + 1.0 + 0.29, &IDLE, &mut sink);
        assert_eq!(output.attack.unwrap().attack_type, AttackType::Parry);
        assert!((controller.attack_end_at() - (t0 + 1.29 + 0.6)).abs() < 1e-6);
    }

    #[test]
    fn test_sheathe_resets_combat_state() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &light(), &mut sink);
        controller.advance(t0 + 0.5, &IDLE, &mut sink);
        assert_eq!(controller.light_combo_step(), 1);

        let output = controller.advance(t0 + 0.6, &toggle(), &mut sink);
        assert_eq!(output.transition_started, Some(WeaponState::Sheathing));
        assert_eq!(controller.light_combo_step(), 0);

        let output = controller.advance(t0 + 1.5, &IDLE, &mut sink);
        assert_eq!(output.transition_completed, Some(WeaponState::Sheathed));
        assert!(sink.contains(&AnimationCommand::SetLayerWeight { layer: LAYER_COMBAT, weight: 0.0 }));
    }

    #[test]
    fn test_rapid_toggle_keeps_state_consistent() {
        let mut controller = WeaponController::default();
        let mut sink = Vec::new();

        for tick in 0..240 {
            let now = tick as f64 / 60.0;
            // Toggle каждые 3 тика
            let input = if tick % 3 == 0 { toggle() } else { IDLE };
            controller.advance(now, &input, &mut sink);

            assert!(!controller.is_attacking());
            // Mesh swap ровно один раз за переход
            let swaps = sink
                .iter()
                .filter(|c| matches!(c, AnimationCommand::SwapWeapon { .. }))
                .count();
            assert!(swaps <= 1 + tick / 48, "tick {}: {} swaps", tick, swaps);
        }
    }

    #[test]
    fn test_combo_step_never_exceeds_three() {
        let (mut controller, t0, mut sink) = equipped_controller();

        for tick in 0..600 {
            let now = t0 + tick as f64 / 60.0;
            controller.advance(now, &light(), &mut sink);
            let step = controller.light_combo_step();
            assert!((0..=3).contains(&step), "step {} out of range", step);
        }
    }

    #[test]
    fn test_force_sheathe_for_swap_mid_attack() {
        let (mut controller, t0, mut sink) = equipped_controller();

        controller.advance(t0, &light(), &mut sink);
        controller.force_sheathe_for_swap(&mut sink);

        assert_eq!(controller.weapon_state(), WeaponState::Sheathed);
        assert!(!controller.is_attacking());
        assert!(!controller.is_blocking());
        assert_eq!(controller.current_attack(), AttackType::None);

        controller.request_draw_after_swap();
        let output = controller.advance(t0 + 0.1, &IDLE, &mut sink);
        assert_eq!(output.transition_started, Some(WeaponState::Drawing));
    }
}
