//! Enemy behavior: Idle / Patrol / Wander / Chase
//!
//! Вариант выбирается при спавне и не меняется. Все ожидания: deadlines
//! (`now`), поэтому LOD throttling (tick раз в N кадров с большим `dt`)
//! ухудшает плавность, но не ломает таймеры.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::combat::animation::AnimationSink;
use crate::combat::components::{EnemyCombat, WeaponState};
use crate::components::{face_toward, horizontal_distance, move_toward, stand_still, CharacterMotion};

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Поворачиваться к игроку, когда он ближе `face_distance`
    pub face_player: bool,
    pub face_distance: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            face_player: false,
            face_distance: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    pub waypoints: Vec<Vec3>,
    pub speed: f32,
    /// Пауза на каждой точке (секунды)
    pub wait_time: f32,
    pub arrival_distance: f32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            speed: 2.0,
            wait_time: 2.0,
            arrival_distance: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Радиус вокруг точки спавна
    pub radius: f32,
    pub speed: f32,
    pub wait_time: f32,
    /// Минимальное удаление новой точки от спавна
    pub min_distance: f32,
    pub arrival_distance: f32,
    /// Новая точка должна быть дальше этого от текущей позиции
    pub min_travel: f32,
    pub max_attempts: u32,
    /// Fallback точка на `radius × fallback_fraction`
    pub fallback_fraction: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            speed: 1.5,
            wait_time: 3.0,
            min_distance: 2.0,
            arrival_distance: 0.5,
            min_travel: 1.0,
            max_attempts: 10,
            fallback_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    pub speed: f32,
    pub detection_range: f32,
    /// Погоня обрывается дальше detection_range × leash_multiplier
    pub leash_multiplier: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    /// Сколько игрок может быть вне detection range до конца погони
    pub chase_timeout: f32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            detection_range: 15.0,
            leash_multiplier: 1.5,
            attack_range: 2.0,
            attack_cooldown: 2.0,
            chase_timeout: 5.0,
        }
    }
}

/// Фаза Chase поведения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ChasePhase {
    #[default]
    Dormant,
    Chasing,
    /// В attack range: стоим, смотрим на игрока, атакуем по cooldown
    Attacking,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct IdleState {
    pub config: IdleConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct PatrolState {
    pub config: PatrolConfig,
    current: usize,
    wait_until: Option<f64>,
}

impl PatrolState {
    pub fn current_waypoint(&self) -> usize {
        self.current
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_until.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct WanderState {
    pub config: WanderConfig,
    home: Option<Vec3>,
    target: Option<Vec3>,
    wait_until: Option<f64>,
}

impl WanderState {
    pub fn home(&self) -> Option<Vec3> {
        self.home
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_until.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct ChaseState {
    pub config: ChaseConfig,
    phase: ChasePhase,
    chase_deadline: f64,
    next_attack_at: f64,
}

impl ChaseState {
    pub fn phase(&self) -> ChasePhase {
        self.phase
    }
}

/// Поведение врага (tagged union, выбирается при спавне)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum EnemyBehavior {
    Idle(IdleState),
    Patrol(PatrolState),
    Wander(WanderState),
    Chase(ChaseState),
}

impl Default for EnemyBehavior {
    fn default() -> Self {
        Self::Idle(IdleState::default())
    }
}

/// Внешние входы одного tick поведения
pub struct BehaviorContext<'a, R: Rng> {
    pub now: f64,
    /// Wall-clock время с прошлого tick поведения этого врага
    pub dt: f32,
    pub player_position: Option<Vec3>,
    pub rng: &'a mut R,
}

/// Тело врага, которым управляет поведение
pub struct BehaviorBody<'a> {
    pub transform: &'a mut Transform,
    pub motion: &'a mut CharacterMotion,
    pub combat: Option<&'a mut EnemyCombat>,
}

/// Что произошло за tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BehaviorTick {
    /// Вызван `attack()`: начался telegraph
    pub telegraph_started: bool,
    /// Chase фаза сменилась
    pub phase_changed: Option<ChasePhase>,
}

impl EnemyBehavior {
    pub fn idle(config: IdleConfig) -> Self {
        Self::Idle(IdleState { config })
    }

    pub fn patrol(config: PatrolConfig) -> Self {
        Self::Patrol(PatrolState {
            config,
            ..Default::default()
        })
    }

    pub fn wander(config: WanderConfig) -> Self {
        Self::Wander(WanderState {
            config,
            ..Default::default()
        })
    }

    pub fn chase(config: ChaseConfig) -> Self {
        Self::Chase(ChaseState {
            config,
            ..Default::default()
        })
    }

    /// Chase фаза (`None` для не-Chase поведений)
    pub fn chase_phase(&self) -> Option<ChasePhase> {
        match self {
            Self::Chase(state) => Some(state.phase),
            _ => None,
        }
    }

    /// Один tick поведения
    pub fn advance<R: Rng>(
        &mut self,
        ctx: &mut BehaviorContext<'_, R>,
        body: BehaviorBody<'_>,
        sink: &mut impl AnimationSink,
    ) -> BehaviorTick {
        match self {
            Self::Idle(state) => {
                advance_idle(state, ctx, body);
                BehaviorTick::default()
            }
            Self::Patrol(state) => {
                advance_patrol(state, ctx, body);
                BehaviorTick::default()
            }
            Self::Wander(state) => {
                advance_wander(state, ctx, body);
                BehaviorTick::default()
            }
            Self::Chase(state) => advance_chase(state, ctx, body, sink),
        }
    }
}

fn distance_to_player<R: Rng>(ctx: &BehaviorContext<'_, R>, position: Vec3) -> f32 {
    ctx.player_position
        .map_or(f32::MAX, |player| position.distance(player))
}

fn face_player<R: Rng>(ctx: &BehaviorContext<'_, R>, transform: &mut Transform) {
    if let Some(player) = ctx.player_position {
        face_toward(transform, player, ctx.dt);
    }
}

fn advance_idle<R: Rng>(state: &IdleState, ctx: &BehaviorContext<'_, R>, body: BehaviorBody<'_>) {
    stand_still(body.motion);
    if state.config.face_player
        && distance_to_player(ctx, body.transform.translation) < state.config.face_distance
    {
        face_player(ctx, body.transform);
    }
}

fn advance_patrol<R: Rng>(state: &mut PatrolState, ctx: &BehaviorContext<'_, R>, body: BehaviorBody<'_>) {
    let count = state.config.waypoints.len();
    if count == 0 {
        stand_still(body.motion);
        return;
    }

    if let Some(until) = state.wait_until {
        stand_still(body.motion);
        if ctx.now >= until {
            state.wait_until = None;
            state.current = (state.current + 1) % count;
        }
        return;
    }

    let target = state.config.waypoints[state.current % count];
    if horizontal_distance(body.transform.translation, target) < state.config.arrival_distance {
        state.wait_until = Some(ctx.now + f64::from(state.config.wait_time));
        stand_still(body.motion);
    } else {
        move_toward(body.transform, body.motion, target, state.config.speed, ctx.dt);
    }
}

/// Случайная точка вокруг `home` на расстоянии [min_distance, radius],
/// не ближе `min_travel` к текущей позиции. После `max_attempts` неудач:
/// гарантированная точка на `radius × fallback_fraction`.
pub fn pick_wander_target(
    config: &WanderConfig,
    home: Vec3,
    current: Vec3,
    rng: &mut impl Rng,
) -> Vec3 {
    let max_distance = config.radius.max(config.min_distance);

    for _ in 0..config.max_attempts {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(config.min_distance..=max_distance);
        let candidate = home + Vec3::new(angle.cos(), 0.0, angle.sin()) * distance;
        if current.distance(candidate) > config.min_travel {
            return candidate;
        }
    }

    let angle = rng.gen_range(0.0..TAU);
    home + Vec3::new(angle.cos(), 0.0, angle.sin()) * config.radius * config.fallback_fraction
}

fn advance_wander<R: Rng>(state: &mut WanderState, ctx: &mut BehaviorContext<'_, R>, body: BehaviorBody<'_>) {
    let position = body.transform.translation;
    // Точка спавна = позиция на первом tick
    let home = *state.home.get_or_insert(position);

    if let Some(until) = state.wait_until {
        stand_still(body.motion);
        if ctx.now >= until {
            state.wait_until = None;
            state.target = Some(pick_wander_target(&state.config, home, position, &mut *ctx.rng));
        }
        return;
    }

    let target = match state.target {
        Some(target) => target,
        None => {
            let target = pick_wander_target(&state.config, home, position, &mut *ctx.rng);
            state.target = Some(target);
            target
        }
    };

    if horizontal_distance(position, target) < state.config.arrival_distance {
        state.wait_until = Some(ctx.now + f64::from(state.config.wait_time));
        stand_still(body.motion);
    } else {
        move_toward(body.transform, body.motion, target, state.config.speed, ctx.dt);
    }
}

fn set_phase(state: &mut ChaseState, phase: ChasePhase, tick: &mut BehaviorTick) {
    if state.phase != phase {
        state.phase = phase;
        tick.phase_changed = Some(phase);
    }
}

fn advance_chase<R: Rng>(
    state: &mut ChaseState,
    ctx: &BehaviorContext<'_, R>,
    body: BehaviorBody<'_>,
    sink: &mut impl AnimationSink,
) -> BehaviorTick {
    let mut tick = BehaviorTick::default();
    let BehaviorBody {
        transform,
        motion,
        mut combat,
    } = body;
    let config = state.config;
    let distance = distance_to_player(ctx, transform.translation);

    // Обнаружение: вход в погоню + продление timeout
    if distance < config.detection_range {
        if state.phase == ChasePhase::Dormant {
            set_phase(state, ChasePhase::Chasing, &mut tick);
            if let Some(combat) = combat.as_deref_mut() {
                if !combat.is_armed() && !combat.is_drawing() {
                    combat.draw_sword(ctx.now, sink);
                }
            }
        }
        state.chase_deadline = ctx.now + f64::from(config.chase_timeout);
    }

    if state.phase == ChasePhase::Dormant {
        stand_still(motion);
        return tick;
    }

    // Конец погони: timeout или игрок за leash
    if ctx.now >= state.chase_deadline || distance > config.detection_range * config.leash_multiplier {
        set_phase(state, ChasePhase::Dormant, &mut tick);
        stand_still(motion);
        if let Some(combat) = combat.as_deref_mut() {
            if combat.is_armed() {
                combat.sheathe_sword(ctx.now, sink);
            }
        }
        return tick;
    }

    if let Some(combat) = combat.as_deref_mut() {
        // Меч ещё не в руке: стоим лицом к игроку
        if !combat.is_armed() {
            stand_still(motion);
            face_player(ctx, transform);
            // Погоня возобновилась во время sheathe: достаём заново
            if combat.weapon_state() == WeaponState::Sheathed && combat.can_act() {
                combat.draw_sword(ctx.now, sink);
            }
            return tick;
        }

        if !combat.can_act() {
            stand_still(motion);
            return tick;
        }
    }

    if distance < config.attack_range {
        set_phase(state, ChasePhase::Attacking, &mut tick);
        stand_still(motion);
        face_player(ctx, transform);

        if ctx.now >= state.next_attack_at {
            if let Some(combat) = combat {
                if combat.attack(ctx.now, sink) {
                    state.next_attack_at = ctx.now + f64::from(config.attack_cooldown);
                    tick.telegraph_started = true;
                }
            }
        }
    } else if let Some(player) = ctx.player_position {
        set_phase(state, ChasePhase::Chasing, &mut tick);
        move_toward(transform, motion, player, config.speed, ctx.dt);
    }

    tick
}
