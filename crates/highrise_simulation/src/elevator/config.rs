//! Elevator configuration: высоты этажей, смещения створок, кнопки.
//!
//! Конфиг заполняется до старта лифта (json или код). Ошибки конфигурации
//! для конкретного этажа всплывают на запросе (`floor_plan`), а не на старте.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::doors::{DoorLeaves, DoorTargets};

#[derive(Debug, Error)]
pub enum ElevatorError {
    #[error("unknown floor index {index} (configured floors: {floor_count})")]
    UnknownFloor { index: usize, floor_count: usize },

    #[error("no outside door offsets configured for floor index {index}")]
    MissingDoorOffsets { index: usize },

    #[error("unknown elevator button '{name}'")]
    UnknownButton { name: String },

    #[error("invalid cabin start height {position_y}")]
    InvalidStartPosition { position_y: f32 },

    #[error("invalid elevator config: {reason}")]
    InvalidConfig { reason: String },

    #[error("failed to parse elevator config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ход одной створки по локальной X: закрыто ↔ открыто
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorTravel {
    pub closed: f32,
    pub open: f32,
}

/// Пара створок (левая + правая)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorPair {
    pub left: DoorTravel,
    pub right: DoorTravel,
}

impl Default for DoorPair {
    fn default() -> Self {
        Self {
            left: DoorTravel { closed: -0.5, open: -1.4 },
            right: DoorTravel { closed: 0.5, open: 1.4 },
        }
    }
}

/// Кнопка вызова: имя → индекс этажа
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonBinding {
    pub name: String,
    pub floor: usize,
}

/// Каноническое имя кнопки: "Button floor N" (N с единицы)
pub fn button_name(floor_index: usize) -> String {
    format!("Button floor {}", floor_index + 1)
}

/// Всё, что нужно лифту для обслуживания одного этажа
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorPlan {
    pub index: usize,
    pub height: f32,
    pub doors: DoorTargets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// Высота кабины (local Y) на каждом этаже, по возрастанию
    pub floor_heights: Vec<f32>,
    /// Скорость кабины (единиц/сек)
    pub cabin_speed: f32,
    /// Коэффициент lerp створок (× dt)
    pub door_speed: f32,
    /// Сколько двери стоят открытыми
    pub door_hold_seconds: f32,
    pub inside_doors: DoorPair,
    /// Наружные двери, по одной паре на этаж
    pub outside_doors: Vec<DoorPair>,
    pub buttons: Vec<ButtonBinding>,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self::with_floor_heights(vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0])
    }
}

impl ElevatorConfig {
    /// Конфиг с дефолтными дверями и кнопками "Button floor N" для каждой высоты
    pub fn with_floor_heights(floor_heights: Vec<f32>) -> Self {
        let floor_count = floor_heights.len();

        Self {
            floor_heights,
            cabin_speed: 1.0,
            door_speed: 4.0,
            door_hold_seconds: 5.0,
            inside_doors: DoorPair::default(),
            outside_doors: vec![DoorPair::default(); floor_count],
            buttons: (0..floor_count)
                .map(|floor| ButtonBinding {
                    name: button_name(floor),
                    floor,
                })
                .collect(),
        }
    }

    /// Загрузка из json + validate
    pub fn from_json_str(json: &str) -> Result<Self, ElevatorError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn floor_count(&self) -> usize {
        self.floor_heights.len()
    }

    /// Проверка всего конфига целиком
    ///
    /// Нехватка наружных дверей для отдельных этажей здесь не ошибка:
    /// такой этаж отклоняется на запросе через `floor_plan`.
    pub fn validate(&self) -> Result<(), ElevatorError> {
        let invalid = |reason: String| Err(ElevatorError::InvalidConfig { reason });

        if self.floor_heights.is_empty() {
            return invalid("no floors configured".to_string());
        }

        if self.floor_heights.iter().any(|height| !height.is_finite()) {
            return invalid("floor heights must be finite".to_string());
        }

        if let Some(pair) = self.floor_heights.windows(2).find(|pair| pair[1] <= pair[0]) {
            return invalid(format!(
                "floor heights must be strictly ascending ({} then {})",
                pair[0], pair[1]
            ));
        }

        if !(self.cabin_speed > 0.0) {
            return invalid(format!("cabin_speed must be positive, got {}", self.cabin_speed));
        }

        if !(self.door_speed > 0.0) {
            return invalid(format!("door_speed must be positive, got {}", self.door_speed));
        }

        if !(self.door_hold_seconds >= 0.0) {
            return invalid(format!(
                "door_hold_seconds must not be negative, got {}",
                self.door_hold_seconds
            ));
        }

        if let Some(button) = self.buttons.iter().find(|button| button.floor >= self.floor_count()) {
            return invalid(format!(
                "button '{}' points to floor index {} (configured floors: {})",
                button.name,
                button.floor,
                self.floor_count()
            ));
        }

        Ok(())
    }

    /// Высота + цели створок для этажа
    pub fn floor_plan(&self, index: usize) -> Result<FloorPlan, ElevatorError> {
        let height = *self.floor_heights.get(index).ok_or(ElevatorError::UnknownFloor {
            index,
            floor_count: self.floor_count(),
        })?;

        let outside = self
            .outside_doors
            .get(index)
            .ok_or(ElevatorError::MissingDoorOffsets { index })?;

        Ok(FloorPlan {
            index,
            height,
            doors: DoorTargets {
                open: DoorLeaves {
                    inside_left: self.inside_doors.left.open,
                    inside_right: self.inside_doors.right.open,
                    outside_left: outside.left.open,
                    outside_right: outside.right.open,
                },
                closed: DoorLeaves {
                    inside_left: self.inside_doors.left.closed,
                    inside_right: self.inside_doors.right.closed,
                    outside_left: outside.left.closed,
                    outside_right: outside.right.closed,
                },
            },
        })
    }

    /// Индекс этажа по имени кнопки
    pub fn floor_for_button(&self, name: &str) -> Result<usize, ElevatorError> {
        self.buttons
            .iter()
            .find(|button| button.name == name)
            .map(|button| button.floor)
            .ok_or_else(|| ElevatorError::UnknownButton { name: name.to_string() })
    }

    /// Этаж, на высоте которого стоит кабина (допуск `tolerance`)
    pub fn floor_at_height(&self, height: f32, tolerance: f32) -> Option<usize> {
        self.floor_heights
            .iter()
            .position(|floor_height| (height - floor_height).abs() < tolerance)
    }
}
