//! Weapon state machine игрока
//!
//! Draw/sheathe цикл + атаки (light combo, fencing, leaping, parry) + блок.
//!
//! Порядок внутри одного tick (`advance`):
//! 1. input (toggle, block/parry, light attack)
//! 2. draw/sheathe таймер
//! 3. истечение атаки, сброс combo counters
//! 4. animator параметры (IsBlocking, вес слоя Combat)
//!
//! Все таймеры: timestamps (`now`), поэтому переменный dt не ломает окна.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::attack::AttackType;
use super::defense::GuardState;
use super::weapon_state::{DrawSheatheCycle, DrawTimings, WeaponState};
use crate::combat::animation::{
    ease_weight, AnimationSink, SoundCue, LAYER_COMBAT, PARAM_ATTACK_TYPE, PARAM_COMBO_STEP,
    PARAM_IS_BLOCKING, TRIGGER_ATTACK,
};

/// Максимальный шаг light combo
pub const MAX_COMBO_STEP: i32 = 3;

/// Тайминги боя игрока (секунды)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTimings {
    /// Окно, в которое следующая light атака продолжает combo
    pub combo_window: f32,
    pub light_attack_duration: f32,
    pub heavy_attack_duration: f32,
    /// Отпускание блока быстрее этого окна = parry
    pub parry_release_window: f32,
    /// Последние N секунд атаки можно прервать новой атакой
    pub attack_cancel_window: f32,
    /// Скорость lerp веса слоя Combat к 1 пока меч в руке
    pub combat_layer_blend_rate: f32,
    pub draw: DrawTimings,
}

impl Default for WeaponTimings {
    fn default() -> Self {
        Self {
            combo_window: 0.8,
            light_attack_duration: 0.4,
            heavy_attack_duration: 0.6,
            parry_release_window: 0.3,
            attack_cancel_window: 0.15,
            combat_layer_blend_rate: 10.0,
            draw: DrawTimings::default(),
        }
    }
}

/// Input игрока на текущий tick
///
/// `toggle_weapon` и `light_attack`: edge (нажато в этом кадре),
/// `block_held`: level (кнопка зажата). Edge флаги сбрасываются после tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponInput {
    pub toggle_weapon: bool,
    pub light_attack: bool,
    pub block_held: bool,
    pub airborne: bool,
    pub sprinting: bool,
}

impl WeaponInput {
    pub fn consume_edges(&mut self) {
        self.toggle_weapon = false;
        self.light_attack = false;
    }
}

/// Атака, запущенная на этом tick (уходит в replication как discrete event)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackDispatched {
    pub attack_type: AttackType,
    pub combo_step: i32,
}

/// Что произошло за tick (для систем: replication, логирование)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeaponTickOutput {
    pub attack: Option<AttackDispatched>,
    /// Запущенный переход (Drawing / Sheathing)
    pub transition_started: Option<WeaponState>,
    /// Завершённый переход (Equipped / Sheathed)
    pub transition_completed: Option<WeaponState>,
}

/// Weapon state machine игрока
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WeaponController {
    pub timings: WeaponTimings,
    cycle: DrawSheatheCycle,
    current_attack: AttackType,
    light_combo_step: i32,
    last_attack_at: f64,
    attack_end_at: f64,
    is_attacking: bool,
    is_blocking: bool,
    was_blocking: bool,
    block_started_at: f64,
    combo_finisher_ready: bool,
    block_input_prev: bool,
    combat_layer_weight: f32,
    blocking_written: Option<bool>,
    last_tick_at: Option<f64>,
    draw_after_swap: bool,
}

impl Default for WeaponController {
    fn default() -> Self {
        Self::new(WeaponTimings::default())
    }
}

impl WeaponController {
    pub fn new(timings: WeaponTimings) -> Self {
        Self {
            timings,
            cycle: DrawSheatheCycle::new(timings.draw),
            current_attack: AttackType::None,
            light_combo_step: 0,
            last_attack_at: -10.0,
            attack_end_at: 0.0,
            is_attacking: false,
            is_blocking: false,
            was_blocking: false,
            block_started_at: 0.0,
            combo_finisher_ready: false,
            block_input_prev: false,
            combat_layer_weight: 0.0,
            blocking_written: None,
            last_tick_at: None,
            draw_after_swap: false,
        }
    }

    pub fn weapon_state(&self) -> WeaponState {
        self.cycle.state()
    }

    pub fn current_attack(&self) -> AttackType {
        self.current_attack
    }

    pub fn light_combo_step(&self) -> i32 {
        self.light_combo_step
    }

    /// Step 3 light combo достигнут. Hook для внешней finisher логики,
    /// сам controller его не потребляет.
    pub fn combo_finisher_ready(&self) -> bool {
        self.combo_finisher_ready
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    pub fn attack_end_at(&self) -> f64 {
        self.attack_end_at
    }

    pub fn last_attack_at(&self) -> f64 {
        self.last_attack_at
    }

    pub fn combat_layer_weight(&self) -> f32 {
        self.combat_layer_weight
    }

    /// Состояние блока для damage intake (parry window считается от `block_started_at`)
    pub fn guard(&self) -> GuardState {
        GuardState {
            is_blocking: self.is_blocking,
            block_started_at: self.block_started_at,
        }
    }

    /// Атака ещё в "lockout" части (нельзя прервать новой атакой)
    fn attack_locked(&self, now: f64) -> bool {
        self.is_attacking && now < self.attack_end_at - f64::from(self.timings.attack_cancel_window)
    }

    /// Атака идёт (включая cancel window)
    fn attack_in_progress(&self, now: f64) -> bool {
        self.is_attacking && now < self.attack_end_at
    }

    /// Можно ли начать атаку прямо сейчас
    pub fn can_attack(&self, now: f64) -> bool {
        self.cycle.state() == WeaponState::Equipped && !self.is_blocking && !self.attack_locked(now)
    }

    /// Один tick state machine
    pub fn advance(
        &mut self,
        now: f64,
        input: &WeaponInput,
        sink: &mut impl AnimationSink,
    ) -> WeaponTickOutput {
        let dt = self
            .last_tick_at
            .map(|previous| (now - previous).max(0.0) as f32)
            .unwrap_or(0.0);
        self.last_tick_at = Some(now);

        let mut output = WeaponTickOutput::default();

        self.handle_input(now, input, sink, &mut output);

        if let Some(completed) = self.cycle.advance(now, sink) {
            if completed == WeaponState::Sheathed {
                self.combat_layer_weight = 0.0;
            }
            output.transition_completed = Some(completed);
        }

        self.update_combat_state(now);
        self.update_animator(dt, sink);

        output
    }

    fn handle_input(
        &mut self,
        now: f64,
        input: &WeaponInput,
        sink: &mut impl AnimationSink,
        output: &mut WeaponTickOutput,
    ) {
        // Повторный draw после смены персонажа (ждём, пока модель в Sheathed)
        if self.draw_after_swap && self.cycle.state() == WeaponState::Sheathed {
            self.draw_after_swap = false;
            output.transition_started = self.toggle_weapon(now, sink);
        }

        if input.toggle_weapon {
            if let Some(started) = self.toggle_weapon(now, sink) {
                output.transition_started = Some(started);
            }
        }

        let block_released = self.block_input_prev && !input.block_held;
        self.block_input_prev = input.block_held;

        // Бой только с полностью вынутым мечом
        if self.cycle.state() != WeaponState::Equipped {
            return;
        }

        // === BLOCK (hold) ===
        if input.block_held && !self.is_attacking {
            if !self.is_blocking {
                self.start_block(now);
            }
        } else if self.is_blocking && !input.block_held {
            self.is_blocking = false;
        }

        // === PARRY (быстрое отпускание блока) ===
        if self.was_blocking && !self.is_blocking && block_released {
            self.was_blocking = false;
            let held_for = (now - self.block_started_at) as f32;
            if held_for < self.timings.parry_release_window && self.can_attack(now) {
                self.execute_parry(now, sink, output);
                return;
            }
        }

        if self.is_blocking {
            return;
        }

        // === LIGHT ATTACK ===
        if input.light_attack && !input.block_held && self.can_attack(now) {
            self.execute_light_attack(now, input, sink, output);
        }
    }

    /// Toggle: Sheathed → Drawing, Equipped → Sheathing.
    ///
    /// Пока атака идёт (cancel window тоже), toggle игнорируется,
    /// переходные состояния тоже.
    fn toggle_weapon(&mut self, now: f64, sink: &mut impl AnimationSink) -> Option<WeaponState> {
        match self.cycle.state() {
            WeaponState::Sheathed => {
                if self.cycle.begin_draw(now, sink) {
                    self.combat_layer_weight = 1.0;
                    sink.play_cue(SoundCue::Draw);
                    return Some(WeaponState::Drawing);
                }
                None
            }
            WeaponState::Equipped => {
                if self.attack_in_progress(now) {
                    return None;
                }
                if self.cycle.begin_sheathe(now, sink) {
                    self.reset_combat_state();
                    sink.play_cue(SoundCue::Sheathe);
                    return Some(WeaponState::Sheathing);
                }
                None
            }
            WeaponState::Drawing | WeaponState::Sheathing => None,
        }
    }

    /// Внешний запрос "достать меч" (no-op если не Sheathed)
    pub fn equip(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        self.cycle.state() == WeaponState::Sheathed && self.toggle_weapon(now, sink).is_some()
    }

    /// Внешний запрос "убрать меч" (no-op если не Equipped)
    pub fn unequip(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        self.cycle.state() == WeaponState::Equipped && self.toggle_weapon(now, sink).is_some()
    }

    fn start_block(&mut self, now: f64) {
        self.is_blocking = true;
        self.was_blocking = true;
        self.block_started_at = now;
        self.light_combo_step = 0;
        self.combo_finisher_ready = false;
    }

    fn execute_parry(&mut self, now: f64, sink: &mut impl AnimationSink, output: &mut WeaponTickOutput) {
        self.light_combo_step = 0;
        self.combo_finisher_ready = false;
        let duration = self.timings.heavy_attack_duration;
        self.dispatch_attack(AttackType::Parry, 1, duration, now, sink, output);
    }

    fn execute_light_attack(
        &mut self,
        now: f64,
        input: &WeaponInput,
        sink: &mut impl AnimationSink,
        output: &mut WeaponTickOutput,
    ) {
        // Приоритет: в воздухе → Leaping, спринт → Fencing, иначе combo
        if input.airborne {
            self.light_combo_step = 0;
            self.combo_finisher_ready = false;
            let duration = self.timings.heavy_attack_duration;
            self.dispatch_attack(AttackType::Leaping, 1, duration, now, sink, output);
            sink.play_cue(SoundCue::HeavySwing);
            return;
        }

        if input.sprinting {
            self.light_combo_step = 0;
            self.combo_finisher_ready = false;
            let duration = self.timings.light_attack_duration;
            self.dispatch_attack(AttackType::Fencing, 1, duration, now, sink, output);
            sink.play_cue(SoundCue::LightSwing);
            return;
        }

        let since_last = (now - self.last_attack_at) as f32;
        if since_last < self.timings.combo_window
            && self.current_attack == AttackType::LightCombo
            && self.light_combo_step < MAX_COMBO_STEP
        {
            self.light_combo_step += 1;
        } else {
            self.light_combo_step = 1;
        }
        self.combo_finisher_ready = self.light_combo_step == MAX_COMBO_STEP;

        let step = self.light_combo_step;
        let duration = self.timings.light_attack_duration;
        self.dispatch_attack(AttackType::LightCombo, step, duration, now, sink, output);
        sink.play_cue(SoundCue::LightSwing);
    }

    fn dispatch_attack(
        &mut self,
        attack_type: AttackType,
        combo_step: i32,
        duration: f32,
        now: f64,
        sink: &mut impl AnimationSink,
        output: &mut WeaponTickOutput,
    ) {
        self.current_attack = attack_type;
        self.is_attacking = true;
        self.last_attack_at = now;
        self.attack_end_at = now + f64::from(duration);

        sink.set_int(PARAM_ATTACK_TYPE, attack_type.as_i32());
        sink.set_int(PARAM_COMBO_STEP, combo_step);
        sink.trigger(TRIGGER_ATTACK);

        output.attack = Some(AttackDispatched {
            attack_type,
            combo_step,
        });
    }

    fn reset_combat_state(&mut self) {
        self.is_attacking = false;
        self.is_blocking = false;
        self.was_blocking = false;
        self.light_combo_step = 0;
        self.combo_finisher_ready = false;
        self.current_attack = AttackType::None;
    }

    fn update_combat_state(&mut self, now: f64) {
        if self.is_attacking && now >= self.attack_end_at {
            self.is_attacking = false;
            self.current_attack = AttackType::None;
        }

        if !self.is_attacking
            && ((now - self.last_attack_at) as f32) > self.timings.combo_window
            && self.light_combo_step > 0
        {
            self.light_combo_step = 0;
            self.combo_finisher_ready = false;
        }
    }

    fn update_animator(&mut self, dt: f32, sink: &mut impl AnimationSink) {
        if self.blocking_written != Some(self.is_blocking) {
            self.blocking_written = Some(self.is_blocking);
            sink.set_bool(PARAM_IS_BLOCKING, self.is_blocking);
        }

        if self.cycle.state() == WeaponState::Equipped && self.combat_layer_weight < 1.0 {
            self.combat_layer_weight = ease_weight(
                self.combat_layer_weight,
                1.0,
                self.timings.combat_layer_blend_rate,
                dt,
            );
            sink.set_layer_weight(LAYER_COMBAT, self.combat_layer_weight);
        }
    }

    /// Смена персонажа: мгновенно убрать меч из любого состояния
    pub fn force_sheathe_for_swap(&mut self, sink: &mut impl AnimationSink) {
        self.cycle.force_sheathe(sink);
        self.reset_combat_state();
        self.draw_after_swap = false;
        self.combat_layer_weight = 0.0;
        self.blocking_written = Some(false);
        sink.set_bool(PARAM_IS_BLOCKING, false);
    }

    /// После смены персонажа: достать меч на ближайшем tick
    pub fn request_draw_after_swap(&mut self) {
        self.draw_after_swap = true;
    }
}
