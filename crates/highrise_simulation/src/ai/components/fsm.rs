//! Enemy FSM: состояния, конфиг, мозг.
//!
//! `EnemyBrain`: чистая state machine без доступа к миру. Каждый тик
//! получает `EnemySenses` (что видит враг) и складывает решения в
//! `BrainContext` как `EnemyAction`. ECS система потом исполняет их
//! (MovementCommand, DamageRequest, EnemyCue).

use bevy::prelude::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::shared::{random_between, Navigation};

/// Длительность блуждания (секунды, случайно в диапазоне)
pub const WANDER_DURATION_RANGE: (f32, f32) = (3.0, 6.0);

/// Разброс idle dwell относительно idle_time
pub const IDLE_DWELL_SPREAD: (f32, f32) = (0.5, 1.5);

/// Wander цель считается достигнутой ближе этой дистанции
pub const ARRIVAL_TOLERANCE: f32 = 0.5;

/// Chase обрывается дальше detection_radius × 1.5
pub const CHASE_LEASH_FACTOR: f32 = 1.5;

/// Удар проходит, если цель ближе attack_range × 1.2 в момент замаха
pub const STRIKE_REACH_FACTOR: f32 = 1.2;

/// Преследование останавливается на attack_range × 0.8
pub const STOPPING_DISTANCE_FACTOR: f32 = 0.8;

/// Состояния врага (ровно одно активно)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum EnemyState {
    /// Начальное: стоим, ждём dwell
    #[default]
    Idle,
    /// Идём к случайной точке вокруг spawn
    Wander,
    /// Преследуем цель
    Chase,
    /// Замах (длится attack_animation_duration)
    Attack,
    /// Hit-stun после нелетального удара
    Hit,
    /// Терминальное
    Dead,
}

/// Параметры врага (неизменны после спавна)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyConfig {
    pub detection_radius: f32,
    pub attack_range: f32,
    pub move_speed: f32,
    /// Базовое время idle (dwell = idle_time × [0.5, 1.5])
    pub idle_time: f32,
    pub wander_radius: f32,
    pub attack_cooldown: f32,
    /// Урон удара, если у врага нет CombatStats
    pub attack_damage: u32,
    pub attack_animation_duration: f32,
    pub hit_stun_duration: f32,
    /// Сколько труп лежит до деспавна
    pub corpse_lifetime: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            detection_radius: 10.0,
            attack_range: 2.0,
            move_speed: 3.5,
            idle_time: 2.0,
            wander_radius: 5.0,
            attack_cooldown: 2.0,
            attack_damage: 10,
            attack_animation_duration: 1.2,
            hit_stun_duration: 0.5,
            corpse_lifetime: 5.0,
        }
    }
}

impl EnemyConfig {
    /// Дистанция, на которой останавливается преследование (navmesh stopping distance)
    pub fn stopping_distance(&self) -> f32 {
        self.attack_range * STOPPING_DISTANCE_FACTOR
    }
}

/// Смещение точки обзора от pivot врага (глаза, а не ноги)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DetectionOrigin {
    pub offset: Vec3,
}

impl Default for DetectionOrigin {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 1.6, 0.0),
        }
    }
}

/// Presentation hooks, которые дёргает мозг (fire-and-forget)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyCueKind {
    AttackStarted,
    HitReaction,
    Died,
    StateChanged { from: EnemyState, to: EnemyState },
}

/// Решение мозга за тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAction {
    Stop,
    MoveTo(Vec3),
    Follow { target: Entity, stop_within: f32 },
    Face(Vec3),
    Strike { target: Entity },
    Cue(EnemyCueKind),
    /// Убрать из симуляции через `after` секунд
    ScheduleRemoval { after: f32 },
}

/// Что враг знает о цели в этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSense {
    pub entity: Entity,
    pub position: Vec3,
    /// В радиусе и в прямой видимости
    pub detected: bool,
}

/// Срез мира для одного тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySenses {
    /// Elapsed время симуляции (секунды)
    pub now: f32,
    pub delta: f32,
    pub position: Vec3,
    pub health: u32,
    /// None: цели нет (не назначена, despawned или мертва)
    pub target: Option<TargetSense>,
}

impl EnemySenses {
    pub fn target_detected(&self) -> bool {
        self.target.is_some_and(|target| target.detected)
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.target.map(|target| self.position.distance(target.position))
    }
}

/// Зависимости мозга на время тика + накопитель действий
pub struct BrainContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub navigation: &'a dyn Navigation,
    actions: Vec<EnemyAction>,
}

impl<'a> BrainContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, navigation: &'a dyn Navigation) -> Self {
        Self {
            rng,
            navigation,
            actions: Vec::new(),
        }
    }

    fn emit(&mut self, action: EnemyAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[EnemyAction] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<EnemyAction> {
        self.actions
    }
}

/// Мозг врага
///
/// Инварианты:
/// - Dead терминален: ни tick, ни change_state, ни set_active не выводят из него
/// - Dead достижим только через тик, где health == 0
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyBrain {
    state: EnemyState,
    state_timer: f32,
    last_attack_time: Option<f32>,
    wander_target: Option<Vec3>,
    spawn_position: Vec3,
    target: Option<Entity>,
    active: bool,
    /// Entry hook текущего состояния уже отработал
    entered: bool,
    /// Нелетальный удар, который ещё не обработан тиком
    pending_hit: bool,
}

impl EnemyBrain {
    /// Неактивный мозг (ждёт активации от trigger zone или хоста)
    pub fn new(spawn_position: Vec3) -> Self {
        Self {
            state: EnemyState::Idle,
            state_timer: 0.0,
            last_attack_time: None,
            wander_target: None,
            spawn_position,
            target: None,
            active: false,
            entered: false,
            pending_hit: false,
        }
    }

    pub fn activated(mut self) -> Self {
        self.set_active(true);
        self
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn state_timer(&self) -> f32 {
        self.state_timer
    }

    pub fn last_attack_time(&self) -> Option<f32> {
        self.last_attack_time
    }

    pub fn wander_target(&self) -> Option<Vec3> {
        self.wander_target
    }

    pub fn spawn_position(&self) -> Vec3 {
        self.spawn_position
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    pub fn has_pending_hit(&self) -> bool {
        self.pending_hit
    }

    /// Activate / Deactivate
    ///
    /// Активация перезапускает машину с Idle (dwell заново).
    /// Деактивация замораживает тик, но смерть всё равно обрабатывается.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;

        if active && !self.is_dead() {
            self.state = EnemyState::Idle;
            self.state_timer = 0.0;
            self.entered = false;
            self.pending_hit = false;
        }
    }

    /// Нелетальный удар → Hit на следующем тике
    ///
    /// Возвращает false, если удар не прерывает текущее состояние
    /// (уже Hit или Dead).
    pub fn register_hit(&mut self) -> bool {
        if matches!(self.state, EnemyState::Hit | EnemyState::Dead) {
            return false;
        }

        self.pending_hit = true;
        true
    }

    /// Cooldown атаки прошёл (первая атака не ограничена)
    pub fn cooldown_ready(&self, config: &EnemyConfig, now: f32) -> bool {
        self.last_attack_time
            .map_or(true, |last| now - last >= config.attack_cooldown)
    }

    /// Один шаг state machine
    pub fn tick(&mut self, config: &EnemyConfig, senses: &EnemySenses, ctx: &mut BrainContext) {
        if self.is_dead() {
            return;
        }

        if senses.health == 0 {
            self.change_state(EnemyState::Dead, config, senses, ctx);
            return;
        }

        if std::mem::take(&mut self.pending_hit) {
            self.change_state(EnemyState::Hit, config, senses, ctx);
            return;
        }

        if !self.active {
            return;
        }

        // Тик входа не тратит таймер: так же, как после change_state
        let elapsed = if self.entered {
            senses.delta
        } else {
            self.enter_state(config, senses, ctx);
            0.0
        };

        match self.state {
            EnemyState::Idle => self.update_idle(config, senses, elapsed, ctx),
            EnemyState::Wander => self.update_wander(config, senses, elapsed, ctx),
            EnemyState::Chase => self.update_chase(config, senses, ctx),
            EnemyState::Attack => self.update_attack(config, senses, elapsed, ctx),
            EnemyState::Hit => self.update_hit(config, senses, elapsed, ctx),
            EnemyState::Dead => {}
        }
    }

    /// Переход с entry hook нового состояния
    ///
    /// Из Dead переходов нет, в Dead только при health == 0.
    pub(super) fn change_state(
        &mut self,
        next: EnemyState,
        config: &EnemyConfig,
        senses: &EnemySenses,
        ctx: &mut BrainContext,
    ) {
        if self.is_dead() || (next == EnemyState::Dead && senses.health > 0) {
            return;
        }

        self.state = next;
        self.enter_state(config, senses, ctx);
    }

    fn enter_state(&mut self, config: &EnemyConfig, senses: &EnemySenses, ctx: &mut BrainContext) {
        self.entered = true;

        match self.state {
            EnemyState::Idle => {
                ctx.emit(EnemyAction::Stop);
                self.state_timer = random_between(
                    &mut *ctx.rng,
                    config.idle_time * IDLE_DWELL_SPREAD.0,
                    config.idle_time * IDLE_DWELL_SPREAD.1,
                );
            }
            EnemyState::Wander => {
                let destination = ctx
                    .navigation
                    .find_reachable_point(self.spawn_position, config.wander_radius, &mut *ctx.rng)
                    .unwrap_or(senses.position);

                self.wander_target = Some(destination);
                ctx.emit(EnemyAction::MoveTo(destination));
                self.state_timer = random_between(
                    &mut *ctx.rng,
                    WANDER_DURATION_RANGE.0,
                    WANDER_DURATION_RANGE.1,
                );
            }
            EnemyState::Chase => {
                if let Some(target) = senses.target {
                    ctx.emit(EnemyAction::Follow {
                        target: target.entity,
                        stop_within: config.stopping_distance(),
                    });
                }
            }
            EnemyState::Attack => {
                ctx.emit(EnemyAction::Stop);
                if let Some(target) = senses.target {
                    ctx.emit(EnemyAction::Face(target.position));
                }
                ctx.emit(EnemyAction::Cue(EnemyCueKind::AttackStarted));

                // Цель могла отойти за время перехода
                if let (Some(target), Some(distance)) = (senses.target, senses.distance_to_target()) {
                    if distance <= config.attack_range * STRIKE_REACH_FACTOR {
                        ctx.emit(EnemyAction::Strike {
                            target: target.entity,
                        });
                    }
                }

                self.last_attack_time = Some(senses.now);
                self.state_timer = config.attack_animation_duration;
            }
            EnemyState::Hit => {
                ctx.emit(EnemyAction::Stop);
                ctx.emit(EnemyAction::Cue(EnemyCueKind::HitReaction));
                self.state_timer = config.hit_stun_duration;
            }
            EnemyState::Dead => {
                ctx.emit(EnemyAction::Stop);
                ctx.emit(EnemyAction::Cue(EnemyCueKind::Died));
                ctx.emit(EnemyAction::ScheduleRemoval {
                    after: config.corpse_lifetime,
                });
                self.wander_target = None;
                self.pending_hit = false;
            }
        }
    }

    fn update_idle(
        &mut self,
        config: &EnemyConfig,
        senses: &EnemySenses,
        elapsed: f32,
        ctx: &mut BrainContext,
    ) {
        if senses.target_detected() {
            self.change_state(EnemyState::Chase, config, senses, ctx);
            return;
        }

        self.state_timer -= elapsed;
        if self.state_timer <= 0.0 {
            self.change_state(EnemyState::Wander, config, senses, ctx);
        }
    }

    fn update_wander(
        &mut self,
        config: &EnemyConfig,
        senses: &EnemySenses,
        elapsed: f32,
        ctx: &mut BrainContext,
    ) {
        if senses.target_detected() {
            self.change_state(EnemyState::Chase, config, senses, ctx);
            return;
        }

        self.state_timer -= elapsed;

        let arrived = self
            .wander_target
            .map_or(true, |destination| senses.position.distance(destination) < ARRIVAL_TOLERANCE);

        if self.state_timer <= 0.0 || arrived {
            self.change_state(EnemyState::Idle, config, senses, ctx);
        }
    }

    fn update_chase(&mut self, config: &EnemyConfig, senses: &EnemySenses, ctx: &mut BrainContext) {
        let (Some(target), Some(distance)) = (senses.target, senses.distance_to_target()) else {
            self.change_state(EnemyState::Idle, config, senses, ctx);
            return;
        };

        if distance > config.detection_radius * CHASE_LEASH_FACTOR {
            self.change_state(EnemyState::Idle, config, senses, ctx);
            return;
        }

        ctx.emit(EnemyAction::Follow {
            target: target.entity,
            stop_within: config.stopping_distance(),
        });

        if distance <= config.attack_range && self.cooldown_ready(config, senses.now) {
            self.change_state(EnemyState::Attack, config, senses, ctx);
        }
    }

    fn update_attack(
        &mut self,
        config: &EnemyConfig,
        senses: &EnemySenses,
        elapsed: f32,
        ctx: &mut BrainContext,
    ) {
        self.state_timer -= elapsed;
        if self.state_timer <= 0.0 {
            self.change_state(EnemyState::Chase, config, senses, ctx);
        }
    }

    fn update_hit(
        &mut self,
        config: &EnemyConfig,
        senses: &EnemySenses,
        elapsed: f32,
        ctx: &mut BrainContext,
    ) {
        self.state_timer -= elapsed;
        if self.state_timer > 0.0 {
            return;
        }

        let next = if senses.target_detected() {
            EnemyState::Chase
        } else {
            EnemyState::Idle
        };
        self.change_state(next, config, senses, ctx);
    }
}
