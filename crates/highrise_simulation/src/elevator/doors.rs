//! Door sequencer: Opening → Holding → Closing → Finished.
//!
//! Четыре створки (внутренние кабины + наружные этажа) сдвигаются lerp'ом
//! с коэффициентом `door_speed × dt`. Фаза завершается, когда внутренняя
//! левая створка подошла к цели ближе DOOR_TOLERANCE; тогда все створки
//! ставятся ровно в цель.

use crate::shared::lerp_clamped;

/// Допуск завершения фазы (по inside_left)
pub const DOOR_TOLERANCE: f32 = 0.001;

/// Положение четырёх створок (локальная X)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DoorLeaves {
    pub inside_left: f32,
    pub inside_right: f32,
    pub outside_left: f32,
    pub outside_right: f32,
}

impl DoorLeaves {
    fn lerp_towards(&mut self, target: &DoorLeaves, t: f32) {
        self.inside_left = lerp_clamped(self.inside_left, target.inside_left, t);
        self.inside_right = lerp_clamped(self.inside_right, target.inside_right, t);
        self.outside_left = lerp_clamped(self.outside_left, target.outside_left, t);
        self.outside_right = lerp_clamped(self.outside_right, target.outside_right, t);
    }

    /// Все створки в пределах tolerance от target
    pub fn approx_eq(&self, other: &DoorLeaves, tolerance: f32) -> bool {
        (self.inside_left - other.inside_left).abs() < tolerance
            && (self.inside_right - other.inside_right).abs() < tolerance
            && (self.outside_left - other.outside_left).abs() < tolerance
            && (self.outside_right - other.outside_right).abs() < tolerance
    }
}

/// Открытое и закрытое положение створок одного этажа
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorTargets {
    pub open: DoorLeaves,
    pub closed: DoorLeaves,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorPhase {
    Opening,
    Holding { remaining: f32 },
    Closing,
    Finished,
}

/// Что произошло за тик
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorTransition {
    Opened,
    Closed,
}

/// Один цикл открыть → подержать → закрыть
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorSequence {
    phase: DoorPhase,
    targets: DoorTargets,
    speed: f32,
    hold_seconds: f32,
}

impl DoorSequence {
    pub fn new(targets: DoorTargets, speed: f32, hold_seconds: f32) -> Self {
        Self {
            phase: DoorPhase::Opening,
            targets,
            speed,
            hold_seconds,
        }
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == DoorPhase::Finished
    }

    pub fn targets(&self) -> &DoorTargets {
        &self.targets
    }

    /// Шаг последовательности; двигает `leaves` на месте
    pub fn tick(&mut self, leaves: &mut DoorLeaves, dt: f32) -> Option<DoorTransition> {
        match self.phase {
            DoorPhase::Opening => {
                if self.approach(leaves, self.targets.open, dt) {
                    self.phase = DoorPhase::Holding {
                        remaining: self.hold_seconds,
                    };
                    return Some(DoorTransition::Opened);
                }
                None
            }
            DoorPhase::Holding { remaining } => {
                let remaining = remaining - dt;
                self.phase = if remaining <= 0.0 {
                    DoorPhase::Closing
                } else {
                    DoorPhase::Holding { remaining }
                };
                None
            }
            DoorPhase::Closing => {
                if self.approach(leaves, self.targets.closed, dt) {
                    self.phase = DoorPhase::Finished;
                    return Some(DoorTransition::Closed);
                }
                None
            }
            DoorPhase::Finished => None,
        }
    }

    fn approach(&self, leaves: &mut DoorLeaves, target: DoorLeaves, dt: f32) -> bool {
        leaves.lerp_towards(&target, self.speed * dt);

        if (leaves.inside_left - target.inside_left).abs() < DOOR_TOLERANCE {
            *leaves = target;
            true
        } else {
            false
        }
    }
}
