//! HIGHRISE Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16 для офисного уровня:
//! - враги (FSM Idle → Wander → Chase → Attack → Hit → Dead)
//! - лифт (очередь вызовов, mover loop, цикл дверей)
//! - damage pipeline и подбор предметов
//!
//! Рендер, физика, анимации, UI: у хоста. Симуляция только потребляет
//! сервисы (line-of-sight, навигация) и отдаёт presentation события.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod elevator;
pub mod inventory;
pub mod logger;
pub mod shared;

// Re-export базовых типов для удобства
pub use ai::{spawn_enemy, AIPlugin, EnemyActivation, EnemyBrain, EnemyConfig, EnemyCue, EnemyState};
pub use combat::{CombatPlugin, DamageDealt, DamageRequest, Dead, EntityDied};
pub use components::*;
pub use elevator::{spawn_elevator, ElevatorCabin, ElevatorConfig, ElevatorError, ElevatorPlugin, ElevatorRequest};
pub use inventory::{Inventory, InventoryPlugin, InventoryProvider};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use shared::{NavigationService, SightService};

/// Порядок фаз внутри одного тика
///
/// Input → Decide → Resolve → React → Movement → Cleanup
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Внешние события: кнопки, вызовы лифта, активация врагов, trigger zones
    Input,
    /// Решения: тик мозгов врагов
    Decide,
    /// Применение: урон, подбор предметов
    Resolve,
    /// Реакции на результат (hit-stun)
    React,
    /// Перемещение: акторы, кабины, двери
    Movement,
    /// Уборка трупов
    Cleanup,
}

/// Выстроить SimulationSet цепочкой в schedule (вызывается каждым plugin)
pub fn configure_simulation_sets(app: &mut App, schedule: InternedScheduleLabel) {
    app.configure_sets(
        schedule,
        (
            SimulationSet::Input,
            SimulationSet::Decide,
            SimulationSet::Resolve,
            SimulationSet::React,
            SimulationSet::Movement,
            SimulationSet::Cleanup,
        )
            .chain(),
    );
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Владеет сервисами и RNG вместо глобальных синглтонов. Хост может
/// заранее вставить свои SightService / NavigationService: plugin их
/// не перезаписывает.
pub struct SimulationPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::in_schedule(FixedUpdate)
    }
}

impl SimulationPlugin {
    pub fn in_schedule(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let schedule = self.schedule;

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .init_resource::<SightService>()
            .init_resource::<NavigationService>()
            .add_plugins((
                CombatPlugin { schedule },
                AIPlugin { schedule },
                ElevatorPlugin { schedule },
                InventoryPlugin { schedule },
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт Bevy App для headless симуляции (реальное время, FixedUpdate 60Hz)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin::default()))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// App с ручным временем: один `step` = один тик симуляции
///
/// Симуляция крутится в Update, Time двигаем сами: тесты и демо
/// не зависят от wall clock.
pub fn create_stepped_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.init_resource::<Time>()
        .add_plugins(SimulationPlugin::in_schedule(Update))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Продвинуть время на dt и прогнать один тик
pub fn step(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(dt));
    app.update();
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
