//! Headless демо HIGHRISE
//!
//! Игрок стоит на месте, враг его находит и атакует; параллельно лифт
//! обслуживает три вызова. Время двигается вручную (60 тиков/сек).

use bevy::prelude::*;
use highrise_simulation::{
    create_stepped_app, spawn_elevator, spawn_enemy, step, ElevatorCabin, ElevatorConfig, EnemyBrain, EnemyConfig,
    ElevatorRequest, Health, Player,
};

const DT: f32 = 1.0 / 60.0;

fn main() {
    let seed = 42;
    println!("Starting HIGHRISE headless simulation (seed: {})", seed);

    let mut app = create_stepped_app(seed);

    let world = app.world_mut();
    let player = world.spawn((Player, Transform::from_xyz(0.0, 0.0, 0.0))).id();

    let (enemy, cabin) = {
        let mut commands = world.commands();
        let enemy = spawn_enemy(&mut commands, Vec3::new(6.0, 0.0, 0.0), EnemyConfig::default());
        (enemy, spawn_elevator(&mut commands, ElevatorConfig::default()))
    };
    world.flush();

    let cabin = match cabin {
        Ok(cabin) => cabin,
        Err(error) => {
            eprintln!("Elevator config rejected: {}", error);
            return;
        }
    };

    for floor in [3, 1, 5] {
        app.world_mut().send_event(ElevatorRequest::Floor { cabin, floor });
    }

    // 30 секунд симуляции
    for tick in 0..(60 * 30) {
        step(&mut app, DT);

        if tick % 300 == 0 {
            let world = app.world();
            let player_hp = world.get::<Health>(player).map_or(0, |health| health.current);
            let enemy_state = world.get::<EnemyBrain>(enemy).map(|brain| brain.state());
            let cabin_y = world.get::<ElevatorCabin>(cabin).map(|cabin| cabin.position_y());

            println!(
                "Tick {}: player HP {}, enemy {:?}, cabin y {:?}",
                tick, player_hp, enemy_state, cabin_y
            );
        }
    }

    println!("Simulation complete!");
}
