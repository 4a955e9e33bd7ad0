//! Animation parameter sink
//!
//! Combat core не владеет animator'ом: он только пишет именованные параметры,
//! trigger pulses, вес слоя "Combat" и one-shot клипы. Host animator
//! (blend tree, IK, blending) читает `AnimationRequested` события.
//!
//! Для тестов и ECS систем sink = `Vec<AnimationCommand>` (буфер команд),
//! который потом сбрасывается в события через `flush_commands`.

use bevy::prelude::*;

// Имена параметров animator'а (контракт с host)
pub const PARAM_IS_ARMED: &str = "IsArmed";
pub const PARAM_ATTACK_TYPE: &str = "AttackType";
pub const PARAM_COMBO_STEP: &str = "ComboStep";
pub const PARAM_IS_BLOCKING: &str = "IsBlocking";
pub const TRIGGER_ATTACK: &str = "Attack";
pub const TRIGGER_DRAW: &str = "Draw";
pub const TRIGGER_SHEATHE: &str = "Sheathe";
pub const LAYER_COMBAT: &str = "Combat";
pub const CLIP_STAGGER: &str = "Stagger";

// Locomotion (враги)
pub const PARAM_MOVE_SPEED: &str = "MoveSpeed";
pub const PARAM_IS_GROUNDED: &str = "IsGrounded";
pub const PARAM_IS_JUMPING: &str = "IsJumping";
pub const PARAM_IS_STRAFING: &str = "IsStrafing";
pub const PARAM_MOVEMENT_INPUT_HELD: &str = "MovementInputHeld";
pub const PARAM_IS_STOPPED: &str = "IsStopped";
pub const PARAM_CURRENT_GAIT: &str = "CurrentGait";

/// Звуковые cues (выбор конкретного клипа: на стороне host)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SoundCue {
    Draw,
    Sheathe,
    LightSwing,
    HeavySwing,
}

/// Одна команда для host animator
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationCommand {
    SetBool { param: &'static str, value: bool },
    SetInt { param: &'static str, value: i32 },
    SetFloat { param: &'static str, value: f32 },
    Trigger { param: &'static str },
    SetLayerWeight { layer: &'static str, weight: f32 },
    /// One-shot клип с начала (crossfade на стороне host)
    PlayClip { clip: &'static str },
    /// Mesh swap: меч в руке (true) или в ножнах (false)
    SwapWeapon { in_hand: bool },
    /// Telegraph индикатор над головой врага
    TelegraphIndicator { visible: bool },
    PlayCue { cue: SoundCue },
}

/// Sink для параметров анимации
///
/// Реализации: `Vec<AnimationCommand>` (буфер), host adapter'ы.
pub trait AnimationSink {
    fn set_bool(&mut self, param: &'static str, value: bool);
    fn set_int(&mut self, param: &'static str, value: i32);
    fn set_float(&mut self, param: &'static str, value: f32);
    fn trigger(&mut self, param: &'static str);
    fn set_layer_weight(&mut self, layer: &'static str, weight: f32);
    fn play_clip(&mut self, clip: &'static str);
    fn swap_weapon(&mut self, in_hand: bool);
    fn telegraph_indicator(&mut self, visible: bool);
    fn play_cue(&mut self, cue: SoundCue);
}

impl AnimationSink for Vec<AnimationCommand> {
    fn set_bool(&mut self, param: &'static str, value: bool) {
        self.push(AnimationCommand::SetBool { param, value });
    }

    fn set_int(&mut self, param: &'static str, value: i32) {
        self.push(AnimationCommand::SetInt { param, value });
    }

    fn set_float(&mut self, param: &'static str, value: f32) {
        self.push(AnimationCommand::SetFloat { param, value });
    }

    fn trigger(&mut self, param: &'static str) {
        self.push(AnimationCommand::Trigger { param });
    }

    fn set_layer_weight(&mut self, layer: &'static str, weight: f32) {
        self.push(AnimationCommand::SetLayerWeight { layer, weight });
    }

    fn play_clip(&mut self, clip: &'static str) {
        self.push(AnimationCommand::PlayClip { clip });
    }

    fn swap_weapon(&mut self, in_hand: bool) {
        self.push(AnimationCommand::SwapWeapon { in_hand });
    }

    fn telegraph_indicator(&mut self, visible: bool) {
        self.push(AnimationCommand::TelegraphIndicator { visible });
    }

    fn play_cue(&mut self, cue: SoundCue) {
        self.push(AnimationCommand::PlayCue { cue });
    }
}

/// Событие: команда для host animator конкретного актора
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AnimationRequested {
    pub entity: Entity,
    pub command: AnimationCommand,
}

/// Сбросить буфер команд в события (буфер очищается)
pub fn flush_commands(
    entity: Entity,
    buffer: &mut Vec<AnimationCommand>,
    writer: &mut EventWriter<AnimationRequested>,
) {
    writer.write_batch(
        buffer
            .drain(..)
            .map(|command| AnimationRequested { entity, command }),
    );
}

/// Lerp веса слоя к target со скоростью `rate` (t = rate * dt, clamp в [0, 1])
pub fn ease_weight(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = (rate * dt).clamp(0.0, 1.0);
    current + (target - current) * t
}
