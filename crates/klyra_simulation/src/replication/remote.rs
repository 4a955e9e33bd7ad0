//! Remote weapon view: рендер чужого состояния без локальной логики
//!
//! Snapshot задаёт IsBlocking/IsArmed, вес слоя Combat и видимость мечей;
//! Draw/Sheathe сообщения проигрывают таймерный переход как есть (без
//! guard'ов: владелец уже проверил легальность).

use bevy::prelude::*;

use super::messages::{AttackEvent, ReplicationError, WeaponSnapshot};
use crate::combat::animation::{
    ease_weight, AnimationCommand, AnimationSink, LAYER_COMBAT, PARAM_ATTACK_TYPE, PARAM_COMBO_STEP,
    PARAM_IS_ARMED, PARAM_IS_BLOCKING, TRIGGER_ATTACK,
};
use crate::combat::components::{AttackType, DrawSheatheCycle, WeaponState};

/// Скорость сглаживания веса слоя Combat
const LAYER_EASE_RATE: f32 = 10.0;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct RemoteWeaponView {
    cycle: DrawSheatheCycle,
    network_state: WeaponState,
    is_blocking: bool,
    is_armed: bool,
    layer_weight: f32,
    hand_visible: bool,
    #[reflect(ignore)]
    scratch: Vec<AnimationCommand>,
}

impl Default for RemoteWeaponView {
    fn default() -> Self {
        Self {
            cycle: DrawSheatheCycle::default(),
            network_state: WeaponState::Sheathed,
            is_blocking: false,
            is_armed: false,
            layer_weight: 0.0,
            hand_visible: false,
            scratch: Vec::new(),
        }
    }
}

impl RemoteWeaponView {
    /// Последнее полученное состояние
    pub fn network_state(&self) -> WeaponState {
        self.network_state
    }

    /// Локально проигрываемый переход
    pub fn transition_state(&self) -> WeaponState {
        self.cycle.state()
    }

    pub fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    pub fn is_armed(&self) -> bool {
        self.is_armed
    }

    pub fn layer_weight(&self) -> f32 {
        self.layer_weight
    }

    pub fn hand_visible(&self) -> bool {
        self.hand_visible
    }

    /// Битый discriminant → сообщение отбрасывается целиком
    pub fn apply_snapshot(&mut self, snapshot: &WeaponSnapshot) -> Result<(), ReplicationError> {
        self.network_state = snapshot.state()?;
        self.is_blocking = snapshot.is_blocking;
        self.is_armed = snapshot.is_armed;
        Ok(())
    }

    pub fn apply_attack(
        &mut self,
        attack: &AttackEvent,
        sink: &mut impl AnimationSink,
    ) -> Result<AttackType, ReplicationError> {
        let attack_type = attack.attack_type()?;
        sink.set_int(PARAM_ATTACK_TYPE, attack_type.as_i32());
        sink.set_int(PARAM_COMBO_STEP, attack.combo_step);
        sink.trigger(TRIGGER_ATTACK);
        Ok(attack_type)
    }

    pub fn play_draw(&mut self, now: f64, sink: &mut impl AnimationSink) {
        self.network_state = WeaponState::Drawing;
        self.cycle.start_transition(WeaponState::Drawing, now, sink);
    }

    pub fn play_sheathe(&mut self, now: f64, sink: &mut impl AnimationSink) {
        self.network_state = WeaponState::Sheathing;
        self.cycle.start_transition(WeaponState::Sheathing, now, sink);
    }

    /// Один tick рендера
    pub fn advance(&mut self, now: f64, dt: f32, sink: &mut impl AnimationSink) {
        // Mesh swap из таймерного перехода проходит через show_in_hand (без дублей)
        let mut scratch = std::mem::take(&mut self.scratch);
        if let Some(state) = self.cycle.advance(now, &mut scratch) {
            self.network_state = state;
        }
        for command in scratch.drain(..) {
            match command {
                AnimationCommand::SwapWeapon { in_hand } => self.show_in_hand(in_hand, sink),
                other => forward(other, sink),
            }
        }
        self.scratch = scratch;

        sink.set_bool(PARAM_IS_BLOCKING, self.is_blocking);
        sink.set_bool(PARAM_IS_ARMED, self.is_armed);

        let target = if self.is_armed { 1.0 } else { 0.0 };
        self.layer_weight = ease_weight(self.layer_weight, target, LAYER_EASE_RATE, dt);
        sink.set_layer_weight(LAYER_COMBAT, self.layer_weight);

        self.show_in_hand(self.network_state.hand_visible(), sink);
    }

    fn show_in_hand(&mut self, in_hand: bool, sink: &mut impl AnimationSink) {
        if self.hand_visible != in_hand {
            self.hand_visible = in_hand;
            sink.swap_weapon(in_hand);
        }
    }
}

fn forward(command: AnimationCommand, sink: &mut impl AnimationSink) {
    match command {
        AnimationCommand::SetBool { param, value } => sink.set_bool(param, value),
        AnimationCommand::SetInt { param, value } => sink.set_int(param, value),
        AnimationCommand::SetFloat { param, value } => sink.set_float(param, value),
        AnimationCommand::Trigger { param } => sink.trigger(param),
        AnimationCommand::SetLayerWeight { layer, weight } => sink.set_layer_weight(layer, weight),
        AnimationCommand::PlayClip { clip } => sink.play_clip(clip),
        AnimationCommand::SwapWeapon { in_hand } => sink.swap_weapon(in_hand),
        AnimationCommand::TelegraphIndicator { visible } => sink.telegraph_indicator(visible),
        AnimationCommand::PlayCue { cue } => sink.play_cue(cue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::animation::TRIGGER_DRAW;

    fn swaps(sink: &[AnimationCommand]) -> Vec<bool> {
        sink.iter()
            .filter_map(|c| match c {
                AnimationCommand::SwapWeapon { in_hand } => Some(*in_hand),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_snapshot_drives_params_and_layer() {
        let mut view = RemoteWeaponView::default();
        let mut sink = Vec::new();

        view.apply_snapshot(&WeaponSnapshot {
            weapon_state: WeaponState::Equipped.as_i32(),
            is_blocking: true,
            is_armed: true,
        })
        .unwrap();

        view.advance(0.0, 0.05, &mut sink);
        assert!(sink.contains(&AnimationCommand::SetBool { param: PARAM_IS_BLOCKING, value: true }));
        assert!(sink.contains(&AnimationCommand::SetBool { param: PARAM_IS_ARMED, value: true }));
        assert!((view.layer_weight() - 0.5).abs() < 1e-5);
        assert!(view.hand_visible());
        assert_eq!(swaps(&sink), vec![true]);

        // Вес сходится к 1, swap не повторяется
        for i in 1..30 {
            view.advance(i as f64 * 0.05, 0.05, &mut sink);
        }
        assert!(view.layer_weight() > 0.99);
        assert_eq!(swaps(&sink), vec![true]);
    }

    #[test]
    fn test_bad_snapshot_keeps_previous_state() {
        let mut view = RemoteWeaponView::default();
        view.apply_snapshot(&WeaponSnapshot {
            weapon_state: 2,
            is_blocking: false,
            is_armed: true,
        })
        .unwrap();

        let err = view
            .apply_snapshot(&WeaponSnapshot {
                weapon_state: 42,
                is_blocking: true,
                is_armed: false,
            })
            .unwrap_err();
        assert_eq!(err, ReplicationError::UnknownWeaponState(42));
        assert_eq!(view.network_state(), WeaponState::Equipped);
        assert!(view.is_armed() && !view.is_blocking());
    }

    #[test]
    fn test_draw_message_plays_timed_transition() {
        let mut view = RemoteWeaponView::default();
        let mut sink = Vec::new();

        view.play_draw(0.0, &mut sink);
        assert!(sink.contains(&AnimationCommand::Trigger { param: TRIGGER_DRAW }));
        assert_eq!(view.transition_state(), WeaponState::Drawing);

        view.advance(0.5, 0.1, &mut sink);
        view.advance(0.9, 0.1, &mut sink);
        assert_eq!(view.transition_state(), WeaponState::Equipped);
        // Drawing уже показывает меч в руке: swap ровно один
        assert_eq!(swaps(&sink), vec![true]);
    }

    #[test]
    fn test_attack_message_sets_params() {
        let mut view = RemoteWeaponView::default();
        let mut sink = Vec::new();

        let attack_type = view
            .apply_attack(&AttackEvent { attack_type: 5, combo_step: 1 }, &mut sink)
            .unwrap();
        assert_eq!(attack_type, AttackType::Fencing);
        assert_eq!(
            sink,
            vec![
                AnimationCommand::SetInt { param: PARAM_ATTACK_TYPE, value: 5 },
                AnimationCommand::SetInt { param: PARAM_COMBO_STEP, value: 1 },
                AnimationCommand::Trigger { param: TRIGGER_ATTACK },
            ]
        );

        assert!(view
            .apply_attack(&AttackEvent { attack_type: 99, combo_step: 1 }, &mut sink)
            .is_err());
        assert_eq!(sink.len(), 3);
    }
}
