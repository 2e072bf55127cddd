//! Inventory: подбор предметов игроком
//!
//! # Архитектура
//!
//! **InventoryProvider**: контракт инвентаря (items / add / remove / has).
//! Системы и хост работают через трейт, конкретная реализация -
//! `Inventory` resource (один предмет на каждый `ItemType`).
//!
//! **ItemPickup**: предмет, лежащий в мире. Игрок в радиусе подбора →
//! `PickupRequested` → предмет в инвентарь, entity удаляется,
//! `PickupNotification` для UI.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Player;
use crate::SimulationSet;

/// Категория предмета
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum ItemType {
    Bolt,
    Nut,
    Transistor,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub item_type: ItemType,
}

impl Item {
    pub fn new(name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            item_type,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Контракт инвентаря
pub trait InventoryProvider {
    fn items(&self) -> &[Item];

    /// false: предмет не добавлен (например, такой тип уже есть)
    fn add(&mut self, item: Item) -> bool;

    fn remove(&mut self, item: &Item) -> bool;

    fn has(&self, item: &Item) -> bool {
        self.items().contains(item)
    }

    fn items_of_type(&self, item_type: ItemType) -> Vec<&Item> {
        self.items().iter().filter(|item| item.item_type == item_type).collect()
    }
}

/// Инвентарь игрока: не больше одного предмета каждого типа
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl InventoryProvider for Inventory {
    fn items(&self) -> &[Item] {
        &self.items
    }

    fn add(&mut self, item: Item) -> bool {
        if self.items.iter().any(|existing| existing.item_type == item.item_type) {
            return false;
        }

        self.items.push(item);
        true
    }

    fn remove(&mut self, item: &Item) -> bool {
        let Some(index) = self.items.iter().position(|existing| existing == item) else {
            return false;
        };

        self.items.remove(index);
        true
    }
}

/// Предмет в мире
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ItemPickup {
    pub item: Item,
    /// Радиус подбора вокруг Transform
    pub radius: f32,
}

impl ItemPickup {
    pub const DEFAULT_RADIUS: f32 = 1.0;

    pub fn new(item: Item) -> Self {
        Self {
            item,
            radius: Self::DEFAULT_RADIUS,
        }
    }
}

/// Запрос на подбор (от overlap detection или от хоста)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupRequested {
    pub pickup: Entity,
    pub collector: Entity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryChange {
    Added(Item),
    Removed(Item),
}

/// Инвентарь изменился
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct InventoryChanged {
    pub change: InventoryChange,
    pub total_items: usize,
}

/// UI: "подобрано: X"
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct PickupNotification {
    pub item_name: String,
}

/// Система: игрок в радиусе предмета → PickupRequested
pub fn detect_pickup_overlaps(
    pickups: Query<(Entity, &Transform, &ItemPickup)>,
    players: Query<(Entity, &Transform), With<Player>>,
    mut requests: EventWriter<PickupRequested>,
) {
    for (pickup_entity, pickup_transform, pickup) in pickups.iter() {
        let collector = players.iter().find(|(_, player_transform)| {
            player_transform.translation.distance(pickup_transform.translation) <= pickup.radius
        });

        if let Some((collector, _)) = collector {
            requests.write(PickupRequested {
                pickup: pickup_entity,
                collector,
            });
        }
    }
}

/// Система: PickupRequested → инвентарь
///
/// Подбирает только игрок. Дубликат по типу в инвентарь не попадает,
/// но предмет всё равно исчезает из мира и уведомление показывается.
pub fn collect_pickups(
    mut requests: EventReader<PickupRequested>,
    pickups: Query<&ItemPickup>,
    players: Query<(), With<Player>>,
    mut inventory: ResMut<Inventory>,
    mut commands: Commands,
    mut changes: EventWriter<InventoryChanged>,
    mut notifications: EventWriter<PickupNotification>,
) {
    let mut consumed: Vec<Entity> = Vec::new();

    for request in requests.read() {
        if consumed.contains(&request.pickup) || !players.contains(request.collector) {
            continue;
        }

        let Ok(pickup) = pickups.get(request.pickup) else {
            crate::log_warning(&format!("⚠️ Pickup {:?} no longer exists", request.pickup));
            continue;
        };
        consumed.push(request.pickup);

        let item = pickup.item.clone();
        if inventory.add(item.clone()) {
            crate::log(&format!(
                "🎒 '{}' added to inventory ({} items)",
                item.name,
                inventory.items().len()
            ));
            changes.write(InventoryChanged {
                change: InventoryChange::Added(item.clone()),
                total_items: inventory.items().len(),
            });
        } else {
            crate::log(&format!("🎒 '{}' already collected ({:?})", item.name, item.item_type));
        }

        notifications.write(PickupNotification { item_name: item.name });
        commands.entity(request.pickup).despawn();
    }
}

/// Inventory Plugin
pub struct InventoryPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for InventoryPlugin {
    fn default() -> Self {
        Self::in_schedule(FixedUpdate)
    }
}

impl InventoryPlugin {
    pub fn in_schedule(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Inventory>()
            .add_event::<PickupRequested>()
            .add_event::<InventoryChanged>()
            .add_event::<PickupNotification>();

        crate::configure_simulation_sets(app, self.schedule);

        app.add_systems(self.schedule, detect_pickup_overlaps.in_set(SimulationSet::Input))
            .add_systems(self.schedule, collect_pickups.in_set(SimulationSet::Resolve));
    }
}
