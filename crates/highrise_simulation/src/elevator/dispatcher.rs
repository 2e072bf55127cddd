//! Elevator dispatcher: очередь вызовов + один mover loop на кабину.
//!
//! Политика обслуживания LIFO: mover всегда едет к последнему
//! добавленному вызову. Ранние вызовы ждут, пока сверху приходят новые.
//!
//! Фазы: Idle → Moving → Doors (open / hold / close) → Moving | Idle.
//! Новый вызов никогда не запускает второй mover: он только кладётся
//! в очередь и, если кабина стоит, переводит её в Moving.

use bevy::prelude::*;

use super::config::{ElevatorConfig, ElevatorError};
use super::doors::{DoorLeaves, DoorSequence, DoorTransition};
use crate::shared::{approx_eq, step_towards};

/// Кабина считается прибывшей ближе этой дистанции
pub const ARRIVAL_EPSILON: f32 = 0.01;

/// Допуск для табло этажа
pub const INDICATOR_TOLERANCE: f32 = 0.1;

/// Пара створок по локальной X (текущее положение)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LeafPair {
    pub left: f32,
    pub right: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CabinPhase {
    /// Очередь пуста, mover не запущен
    Idle,
    /// Едем к последнему вызову
    Moving,
    /// Стоим на этаже, идёт цикл дверей
    Doors { floor: usize, sequence: DoorSequence },
}

/// Что произошло с кабиной (presentation hooks)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevatorEvent {
    Queued { floor: usize, pending: usize },
    Arrived { floor: usize },
    DoorsOpened { floor: usize },
    DoorsClosed { floor: usize },
    FloorIndicator { floor: usize },
    /// Очередь опустела, mover остановлен
    Stopped,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct ElevatorCabin {
    config: ElevatorConfig,
    position_y: f32,
    queue: Vec<usize>,
    phase: CabinPhase,
    inside: LeafPair,
    outside: Vec<LeafPair>,
    /// Индекс этажа на табло
    indicator: Option<usize>,
}

impl ElevatorCabin {
    /// Кабина стоит на первом этаже, все двери закрыты
    pub fn new(config: ElevatorConfig) -> Result<Self, ElevatorError> {
        config.validate()?;

        let position_y = config.floor_heights[0];
        let inside = LeafPair {
            left: config.inside_doors.left.closed,
            right: config.inside_doors.right.closed,
        };
        let outside = config
            .outside_doors
            .iter()
            .map(|pair| LeafPair {
                left: pair.left.closed,
                right: pair.right.closed,
            })
            .collect();
        let indicator = config.floor_at_height(position_y, INDICATOR_TOLERANCE);

        Ok(Self {
            config,
            position_y,
            queue: Vec::new(),
            phase: CabinPhase::Idle,
            inside,
            outside,
            indicator,
        })
    }

    /// Стартовая высота кабины (сцена может начинаться не с первого этажа)
    ///
    /// NaN / бесконечность отклоняются: mover с такой высоты никогда не доедет.
    pub fn with_position(mut self, position_y: f32) -> Result<Self, ElevatorError> {
        if !position_y.is_finite() {
            return Err(ElevatorError::InvalidStartPosition { position_y });
        }

        self.position_y = position_y;
        self.indicator = self.config.floor_at_height(position_y, INDICATOR_TOLERANCE);
        Ok(self)
    }

    pub fn config(&self) -> &ElevatorConfig {
        &self.config
    }

    pub fn position_y(&self) -> f32 {
        self.position_y
    }

    /// Ожидающие вызовы в порядке поступления
    pub fn queue(&self) -> &[usize] {
        &self.queue
    }

    pub fn phase(&self) -> CabinPhase {
        self.phase
    }

    /// mover loop активен
    pub fn is_running(&self) -> bool {
        self.phase != CabinPhase::Idle
    }

    /// Цикл дверей не идёт (mover может ехать)
    pub fn doors_finished(&self) -> bool {
        !matches!(self.phase, CabinPhase::Doors { .. })
    }

    pub fn current_floor(&self) -> Option<usize> {
        self.indicator
    }

    pub fn inside_leaves(&self) -> LeafPair {
        self.inside
    }

    pub fn outside_leaves(&self, floor: usize) -> Option<LeafPair> {
        self.outside.get(floor).copied()
    }

    /// RequestFloor
    ///
    /// Конфиг этажа проверяется сразу: битый запрос отклоняется и очередь
    /// не трогается. Повторный вызов того же этажа: отдельная запись.
    pub fn request_floor(&mut self, floor: usize) -> Result<ElevatorEvent, ElevatorError> {
        self.config.floor_plan(floor)?;

        self.queue.push(floor);
        if self.phase == CabinPhase::Idle {
            self.phase = CabinPhase::Moving;
        }

        Ok(ElevatorEvent::Queued {
            floor,
            pending: self.queue.len(),
        })
    }

    /// Вызов по имени кнопки ("Button floor N")
    pub fn press_button(&mut self, name: &str) -> Result<ElevatorEvent, ElevatorError> {
        let floor = self.config.floor_for_button(name)?;
        self.request_floor(floor)
    }

    /// Снять ещё не обслуженные вызовы этажа; возвращает сколько снято
    pub fn cancel_pending(&mut self, floor: usize) -> usize {
        let before = self.queue.len();
        self.queue.retain(|pending| *pending != floor);
        before - self.queue.len()
    }

    /// Один тик mover loop
    pub fn tick(&mut self, dt: f32) -> Vec<ElevatorEvent> {
        let mut events = Vec::new();

        match self.phase {
            CabinPhase::Idle => {}
            CabinPhase::Moving => self.tick_moving(dt, &mut events),
            CabinPhase::Doors { floor, mut sequence } => {
                let mut leaves = self.leaves_at(floor);
                let transition = sequence.tick(&mut leaves, dt);
                self.store_leaves(floor, leaves);
                self.phase = CabinPhase::Doors { floor, sequence };

                match transition {
                    Some(DoorTransition::Opened) => events.push(ElevatorEvent::DoorsOpened { floor }),
                    Some(DoorTransition::Closed) => {
                        events.push(ElevatorEvent::DoorsClosed { floor });
                        self.resume_or_stop(&mut events);
                    }
                    None => {}
                }
            }
        }

        events
    }

    fn tick_moving(&mut self, dt: f32, events: &mut Vec<ElevatorEvent>) {
        // Snapshot цели на этот тик
        let Some(&floor) = self.queue.last() else {
            self.stop(events);
            return;
        };

        let plan = match self.config.floor_plan(floor) {
            Ok(plan) => plan,
            Err(error) => {
                // Запрос прошёл проверку на входе; сюда попадаем только если конфиг подменили
                crate::log_error(&format!("🛗 Dropping elevator request: {}", error));
                self.queue.pop();
                return;
            }
        };

        if approx_eq(self.position_y, plan.height, ARRIVAL_EPSILON) {
            self.position_y = plan.height;
            self.queue.pop();
            self.phase = CabinPhase::Doors {
                floor,
                sequence: DoorSequence::new(plan.doors, self.config.door_speed, self.config.door_hold_seconds),
            };
            events.push(ElevatorEvent::Arrived { floor });
        } else {
            self.position_y = step_towards(self.position_y, plan.height, self.config.cabin_speed * dt);
        }

        self.refresh_indicator(events);
    }

    fn resume_or_stop(&mut self, events: &mut Vec<ElevatorEvent>) {
        if self.queue.is_empty() {
            self.stop(events);
        } else {
            self.phase = CabinPhase::Moving;
        }
        self.refresh_indicator(events);
    }

    fn stop(&mut self, events: &mut Vec<ElevatorEvent>) {
        self.phase = CabinPhase::Idle;
        events.push(ElevatorEvent::Stopped);
    }

    fn refresh_indicator(&mut self, events: &mut Vec<ElevatorEvent>) {
        let Some(floor) = self.config.floor_at_height(self.position_y, INDICATOR_TOLERANCE) else {
            return;
        };

        if self.indicator != Some(floor) {
            self.indicator = Some(floor);
            events.push(ElevatorEvent::FloorIndicator { floor });
        }
    }

    fn leaves_at(&self, floor: usize) -> DoorLeaves {
        let outside = self.outside.get(floor).copied().unwrap_or_default();

        DoorLeaves {
            inside_left: self.inside.left,
            inside_right: self.inside.right,
            outside_left: outside.left,
            outside_right: outside.right,
        }
    }

    fn store_leaves(&mut self, floor: usize, leaves: DoorLeaves) {
        self.inside = LeafPair {
            left: leaves.inside_left,
            right: leaves.inside_right,
        };

        if let Some(outside) = self.outside.get_mut(floor) {
            *outside = LeafPair {
                left: leaves.outside_left,
                right: leaves.outside_right,
            };
        }
    }
}
