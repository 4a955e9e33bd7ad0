//! Enemy combat state machine
//!
//! Тот же draw/sheathe цикл, что у игрока, плюс:
//! - telegraph → execute: `attack()` открывает telegraph окно (индикатор над
//!   головой, урона нет), по истечении окна атака исполняется и возвращает
//!   `strike` ровно один раз;
//! - stagger: отменяет telegraph и атаку, держит врага беззащитным
//!   `stagger_duration`, flinch клип переигрывается каждые `flinch_interval`.
//!
//! `can_act()`: единственный gate для AI перед attack/draw/sheathe.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weapon_state::{DrawSheatheCycle, DrawTimings, WeaponState};
use crate::combat::animation::{
    AnimationSink, CLIP_STAGGER, PARAM_ATTACK_TYPE, PARAM_COMBO_STEP, TRIGGER_ATTACK,
};
use crate::combat::components::attack::AttackType;

/// Tuning боя врага
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyCombatConfig {
    pub draw: DrawTimings,
    pub attack_duration: f32,
    /// Урон по игроку в конце telegraph (единственный источник урона врага)
    pub attack_damage: f32,
    pub attack_range: f32,
    pub telegraph_duration: f32,
    pub stagger_duration: f32,
    /// Период повтора flinch клипа во время stagger (визуал)
    pub flinch_interval: f32,
    /// Heavy атака длиннее обычной в N раз
    pub heavy_duration_multiplier: f32,
    /// Высота telegraph индикатора над позицией врага
    pub indicator_head_offset: f32,
}

impl Default for EnemyCombatConfig {
    fn default() -> Self {
        Self {
            draw: DrawTimings::default(),
            attack_duration: 0.5,
            attack_damage: 10.0,
            attack_range: 2.0,
            telegraph_duration: 0.75,
            stagger_duration: 4.0,
            flinch_interval: 0.8,
            heavy_duration_multiplier: 1.5,
            indicator_head_offset: 2.0,
        }
    }
}

/// Wind-up перед атакой
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct TelegraphWindow {
    pub started_at: f64,
    pub duration: f32,
}

impl TelegraphWindow {
    pub fn is_expired(&self, now: f64) -> bool {
        ((now - self.started_at) as f32) >= self.duration
    }

    /// Масштаб пульсации индикатора (1.0 ..= 1.4, период 1/3 сек)
    pub fn pulse_scale(&self, now: f64) -> f32 {
        let phase = ((now - self.started_at) as f32 * 6.0).rem_euclid(2.0);
        let ping_pong = if phase > 1.0 { 2.0 - phase } else { phase };
        1.0 + ping_pong * 0.4
    }
}

/// Окно stagger
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct StaggerWindow {
    pub ends_at: f64,
    pub next_flinch_at: f64,
}

/// Что произошло за tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyCombatTick {
    /// Telegraph истёк и атака исполнена: урон по цели
    pub strike: Option<f32>,
    pub stagger_started: bool,
    pub stagger_ended: bool,
    pub transition_completed: Option<WeaponState>,
}

/// Combat state machine врага
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyCombat {
    pub config: EnemyCombatConfig,
    cycle: DrawSheatheCycle,
    attack_end_at: Option<f64>,
    telegraph: Option<TelegraphWindow>,
    stagger: Option<StaggerWindow>,
    stagger_after_attack: bool,
    last_combo_step: i32,
}

impl Default for EnemyCombat {
    fn default() -> Self {
        Self::new(EnemyCombatConfig::default())
    }
}

impl EnemyCombat {
    pub fn new(config: EnemyCombatConfig) -> Self {
        Self {
            config,
            cycle: DrawSheatheCycle::new(config.draw),
            attack_end_at: None,
            telegraph: None,
            stagger: None,
            stagger_after_attack: false,
            last_combo_step: 0,
        }
    }

    pub fn weapon_state(&self) -> WeaponState {
        self.cycle.state()
    }

    pub fn is_armed(&self) -> bool {
        self.cycle.state().is_armed()
    }

    pub fn is_drawing(&self) -> bool {
        self.cycle.state() == WeaponState::Drawing
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_end_at.is_some()
    }

    pub fn is_telegraphing(&self) -> bool {
        self.telegraph.is_some()
    }

    pub fn is_staggered(&self) -> bool {
        self.stagger.is_some()
    }

    pub fn telegraph(&self) -> Option<TelegraphWindow> {
        self.telegraph
    }

    pub fn stagger_window(&self) -> Option<StaggerWindow> {
        self.stagger
    }

    pub fn stagger_pending(&self) -> bool {
        self.stagger_after_attack
    }

    /// Косметический combo step последней атаки (1..=3)
    pub fn last_combo_step(&self) -> i32 {
        self.last_combo_step
    }

    /// Единственный gate для AI
    pub fn can_act(&self) -> bool {
        !self.is_staggered() && !self.is_telegraphing() && !self.is_attacking()
    }

    /// Позиция telegraph индикатора (над головой)
    pub fn indicator_position(&self, enemy_position: Vec3) -> Vec3 {
        enemy_position + Vec3::Y * self.config.indicator_head_offset
    }

    pub fn draw_sword(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        self.cycle.begin_draw(now, sink)
    }

    pub fn sheathe_sword(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        self.cycle.begin_sheathe(now, sink)
    }

    /// Начать telegraph. Урон будет только после его истечения.
    pub fn attack(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        if self.cycle.state() != WeaponState::Equipped || !self.can_act() {
            return false;
        }

        self.telegraph = Some(TelegraphWindow {
            started_at: now,
            duration: self.config.telegraph_duration,
        });
        sink.telegraph_indicator(true);
        true
    }

    /// Heavy атака без telegraph (длиннее обычной, AttackType=HeavyFlourish)
    pub fn heavy_attack(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        if self.cycle.state() != WeaponState::Equipped || !self.can_act() {
            return false;
        }

        self.attack_end_at =
            Some(now + f64::from(self.config.attack_duration * self.config.heavy_duration_multiplier));
        self.last_combo_step = 1;
        sink.set_int(PARAM_ATTACK_TYPE, AttackType::HeavyFlourish.as_i32());
        sink.set_int(PARAM_COMBO_STEP, 1);
        sink.trigger(TRIGGER_ATTACK);
        true
    }

    /// Stagger: отменяет telegraph и атаку немедленно
    pub fn stagger(&mut self, now: f64, sink: &mut impl AnimationSink) {
        if self.telegraph.take().is_some() {
            sink.telegraph_indicator(false);
        }
        self.attack_end_at = None;
        self.stagger_after_attack = false;
        self.stagger = Some(StaggerWindow {
            ends_at: now + f64::from(self.config.stagger_duration),
            next_flinch_at: now + f64::from(self.config.flinch_interval),
        });
        sink.play_clip(CLIP_STAGGER);
    }

    /// Stagger начнётся на первом tick после окончания текущей атаки (ответ на parry)
    pub fn schedule_stagger_after_attack(&mut self) {
        self.stagger_after_attack = true;
    }

    pub fn cancel_telegraph(&mut self, sink: &mut impl AnimationSink) {
        if self.telegraph.take().is_some() {
            sink.telegraph_indicator(false);
        }
    }

    /// Один tick: draw/sheathe → telegraph → stagger → истечение атаки
    pub fn advance(
        &mut self,
        now: f64,
        rng: &mut impl Rng,
        sink: &mut impl AnimationSink,
    ) -> EnemyCombatTick {
        let mut tick = EnemyCombatTick {
            transition_completed: self.cycle.advance(now, sink),
            ..Default::default()
        };

        // Telegraph
        if let Some(window) = self.telegraph {
            if self.stagger.is_some() {
                // Stagger во время wind-up: атака молча отменяется
                self.telegraph = None;
                sink.telegraph_indicator(false);
            } else if window.is_expired(now) {
                self.telegraph = None;
                sink.telegraph_indicator(false);
                tick.strike = self.execute_attack(now, rng, sink);
            }
        }

        // Stagger
        if let Some(window) = self.stagger.as_mut() {
            if now >= window.next_flinch_at {
                window.next_flinch_at = now + f64::from(self.config.flinch_interval);
                sink.play_clip(CLIP_STAGGER);
            }
            if now >= window.ends_at {
                self.stagger = None;
                tick.stagger_ended = true;
            }
        }

        // Истечение атаки
        if self.attack_end_at.is_some_and(|end| now >= end) {
            self.attack_end_at = None;
        }

        // Отложенный stagger (после parry)
        if self.stagger_after_attack && !self.is_attacking() {
            self.stagger(now, sink);
            tick.stagger_started = true;
        }

        tick
    }

    fn execute_attack(
        &mut self,
        now: f64,
        rng: &mut impl Rng,
        sink: &mut impl AnimationSink,
    ) -> Option<f32> {
        if self.is_staggered() {
            return None;
        }

        self.attack_end_at = Some(now + f64::from(self.config.attack_duration));
        // Step только для разнообразия анимации, на урон не влияет
        self.last_combo_step = rng.gen_range(1..=3);

        sink.set_int(PARAM_ATTACK_TYPE, AttackType::LightCombo.as_i32());
        sink.set_int(PARAM_COMBO_STEP, self.last_combo_step);
        sink.trigger(TRIGGER_ATTACK);

        Some(self.config.attack_damage)
    }

    /// Смена модели врага / принудительный сброс
    pub fn force_sheathe(&mut self, sink: &mut impl AnimationSink) {
        self.cancel_telegraph(sink);
        self.attack_end_at = None;
        self.cycle.force_sheathe(sink);
    }
}
