//! Draw/Sheathe цикл меча (общий для игрока, врагов и remote view)
//!
//! Sheathed → Drawing → Equipped → Sheathing → Sheathed
//!
//! Переходы Drawing/Sheathing завершаются по таймеру (deadline pattern), mesh swap
//! (ножны ↔ рука) происходит ровно один раз на `swap_time`. Прервать цикл можно
//! только через `force_sheathe` (смена персонажа).
//!
//! Timestamps (`now`, `started_at`) в f64, длительности в f32.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::animation::{
    AnimationSink, LAYER_COMBAT, PARAM_IS_ARMED, TRIGGER_DRAW, TRIGGER_SHEATHE,
};
use crate::replication::ReplicationError;

/// Состояние оружия
///
/// Discriminant стабилен: уходит в replication snapshot как int.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    Sheathed = 0,
    Drawing = 1,
    Equipped = 2,
    Sheathing = 3,
}

impl WeaponState {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Меч в руке и готов к бою
    pub fn is_armed(self) -> bool {
        self == WeaponState::Equipped
    }

    /// Видимость меча в руке для remote view (Drawing уже показывает руку)
    pub fn hand_visible(self) -> bool {
        matches!(self, WeaponState::Equipped | WeaponState::Drawing)
    }
}

impl TryFrom<i32> for WeaponState {
    type Error = ReplicationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WeaponState::Sheathed),
            1 => Ok(WeaponState::Drawing),
            2 => Ok(WeaponState::Equipped),
            3 => Ok(WeaponState::Sheathing),
            other => Err(ReplicationError::UnknownWeaponState(other)),
        }
    }
}

/// Тайминги draw/sheathe (секунды)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawTimings {
    pub draw_duration: f32,
    pub sheathe_duration: f32,
    /// Момент mesh swap внутри перехода (< draw/sheathe duration)
    pub swap_time: f32,
}

impl Default for DrawTimings {
    fn default() -> Self {
        Self {
            draw_duration: 0.8,
            sheathe_duration: 0.8,
            swap_time: 0.4,
        }
    }
}

/// Таймерный draw/sheathe цикл
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct DrawSheatheCycle {
    state: WeaponState,
    started_at: f64,
    swapped: bool,
    pub timings: DrawTimings,
}

impl Default for DrawSheatheCycle {
    fn default() -> Self {
        Self::new(DrawTimings::default())
    }
}

impl DrawSheatheCycle {
    pub fn new(timings: DrawTimings) -> Self {
        Self {
            state: WeaponState::Sheathed,
            started_at: 0.0,
            swapped: false,
            timings,
        }
    }

    pub fn state(&self) -> WeaponState {
        self.state
    }

    /// Sheathed → Drawing. В любом другом состоянии no-op (`false`).
    pub fn begin_draw(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        if self.state != WeaponState::Sheathed {
            return false;
        }
        self.start_transition(WeaponState::Drawing, now, sink);
        true
    }

    /// Equipped → Sheathing. В любом другом состоянии no-op (`false`).
    pub fn begin_sheathe(&mut self, now: f64, sink: &mut impl AnimationSink) -> bool {
        if self.state != WeaponState::Equipped {
            return false;
        }
        self.start_transition(WeaponState::Sheathing, now, sink);
        true
    }

    /// Запуск перехода без guard'а (remote view повторяет чужой переход как есть)
    pub(crate) fn start_transition(
        &mut self,
        transition: WeaponState,
        now: f64,
        sink: &mut impl AnimationSink,
    ) {
        self.started_at = now;
        self.swapped = false;

        match transition {
            WeaponState::Drawing => {
                self.state = WeaponState::Drawing;
                sink.set_layer_weight(LAYER_COMBAT, 1.0);
                sink.trigger(TRIGGER_DRAW);
            }
            WeaponState::Sheathing => {
                self.state = WeaponState::Sheathing;
                sink.trigger(TRIGGER_SHEATHE);
            }
            // Стабильные состояния не "запускаются"
            WeaponState::Sheathed | WeaponState::Equipped => {}
        }
    }

    /// Продвинуть таймер перехода. Возвращает новое стабильное состояние,
    /// если переход завершился на этом tick.
    pub fn advance(&mut self, now: f64, sink: &mut impl AnimationSink) -> Option<WeaponState> {
        let elapsed = (now - self.started_at) as f32;

        match self.state {
            WeaponState::Drawing => {
                if !self.swapped && elapsed >= self.timings.swap_time {
                    self.swapped = true;
                    sink.swap_weapon(true);
                }

                if elapsed >= self.timings.draw_duration {
                    // Swap обязан случиться до завершения (tick мог перепрыгнуть оба порога)
                    if !self.swapped {
                        self.swapped = true;
                        sink.swap_weapon(true);
                    }
                    self.state = WeaponState::Equipped;
                    sink.set_bool(PARAM_IS_ARMED, true);
                    return Some(WeaponState::Equipped);
                }
            }
            WeaponState::Sheathing => {
                if !self.swapped && elapsed >= self.timings.swap_time {
                    self.swapped = true;
                    sink.swap_weapon(false);
                }

                if elapsed >= self.timings.sheathe_duration {
                    if !self.swapped {
                        self.swapped = true;
                        sink.swap_weapon(false);
                    }
                    self.state = WeaponState::Sheathed;
                    sink.set_bool(PARAM_IS_ARMED, false);
                    sink.set_layer_weight(LAYER_COMBAT, 0.0);
                    return Some(WeaponState::Sheathed);
                }
            }
            WeaponState::Sheathed | WeaponState::Equipped => {}
        }

        None
    }

    /// Мгновенно в Sheathed из любого состояния (отмена перехода на полпути)
    ///
    /// Mesh и параметры приводятся к согласованному виду: меч в ножнах,
    /// IsArmed=false, слой Combat выключен.
    pub fn force_sheathe(&mut self, sink: &mut impl AnimationSink) {
        self.state = WeaponState::Sheathed;
        self.swapped = false;
        sink.swap_weapon(false);
        sink.set_bool(PARAM_IS_ARMED, false);
        sink.set_layer_weight(LAYER_COMBAT, 0.0);
    }
}
