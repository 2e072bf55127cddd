//! Integration tests: лифт через ECS (кнопки, события, mover, transform)

use bevy::prelude::*;
use highrise_simulation::elevator::{ElevatorButton, ElevatorEvent, ElevatorNotice};
use highrise_simulation::{
    create_stepped_app, spawn_elevator, step, ElevatorCabin, ElevatorConfig, ElevatorRequest,
};

const DT: f32 = 1.0 / 60.0;

/// Собираем все ElevatorNotice по порядку
#[derive(Resource, Default)]
struct NoticeLog(Vec<ElevatorNotice>);

fn record_notices(mut notices: EventReader<ElevatorNotice>, mut log: ResMut<NoticeLog>) {
    log.0.extend(notices.read().copied());
}

fn setup(heights: Vec<f32>) -> (App, Entity) {
    let mut app = create_stepped_app(1);
    app.init_resource::<NoticeLog>()
        .add_systems(Last, record_notices);

    let world = app.world_mut();
    let cabin = {
        let mut commands = world.commands();
        spawn_elevator(&mut commands, ElevatorConfig::with_floor_heights(heights))
    };
    world.flush();

    (app, cabin.unwrap())
}

fn cabin(app: &App, entity: Entity) -> &ElevatorCabin {
    app.world().get::<ElevatorCabin>(entity).unwrap()
}

fn button_for(app: &mut App, floor_number: usize) -> Entity {
    let world = app.world_mut();
    world
        .query::<(Entity, &ElevatorButton)>()
        .iter(world)
        .find(|(_, button)| button.floor_number == floor_number)
        .map(|(entity, _)| entity)
        .unwrap()
}

fn arrivals(app: &App) -> Vec<usize> {
    app.world()
        .resource::<NoticeLog>()
        .0
        .iter()
        .filter_map(|notice| match notice.event {
            ElevatorEvent::Arrived { floor } => Some(floor),
            _ => None,
        })
        .collect()
}

fn run_until_idle(app: &mut App, entity: Entity) {
    step(app, DT);
    for _ in 0..(60 * 120) {
        if !cabin(app, entity).is_running() {
            return;
        }
        step(app, DT);
    }
    panic!("elevator still running");
}

#[test]
fn test_lifo_service_order_through_events() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0]);

    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 2 });
    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 0 });
    run_until_idle(&mut app, entity);

    assert_eq!(arrivals(&app), vec![0, 2]);
    assert_eq!(cabin(&app, entity).position_y(), 6.0);
    assert_eq!(app.world().get::<Transform>(entity).unwrap().translation.y, 6.0);

    let log = &app.world().resource::<NoticeLog>().0;
    assert!(matches!(
        log.first().map(|notice| notice.event),
        Some(ElevatorEvent::Queued { floor: 2, pending: 1 })
    ));
    assert_eq!(log.last().map(|notice| notice.event), Some(ElevatorEvent::Stopped));
}

#[test]
fn test_button_lockout() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0]);
    let button = button_for(&mut app, 3);

    app.world_mut().send_event(ElevatorRequest::Press { button });
    app.world_mut().send_event(ElevatorRequest::Press { button });
    step(&mut app, DT);
    assert_eq!(cabin(&app, entity).queue(), &[2]);

    // Через полсекунды кнопка ещё заблокирована
    for _ in 0..30 {
        step(&mut app, DT);
    }
    app.world_mut().send_event(ElevatorRequest::Press { button });
    step(&mut app, DT);
    assert_eq!(cabin(&app, entity).queue(), &[2]);

    for _ in 0..40 {
        step(&mut app, DT);
    }
    app.world_mut().send_event(ElevatorRequest::Press { button });
    step(&mut app, DT);
    assert_eq!(cabin(&app, entity).queue(), &[2, 2]);
}

#[test]
fn test_rejected_requests_leave_queue_untouched() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0]);

    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 7 });
    app.world_mut().send_event(ElevatorRequest::Button {
        cabin: entity,
        name: "Button floor 12".to_string(),
    });
    step(&mut app, DT);

    assert!(cabin(&app, entity).queue().is_empty());
    assert!(!cabin(&app, entity).is_running());
    assert!(app.world().resource::<NoticeLog>().0.is_empty());
}

#[test]
fn test_named_button_press() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0]);

    app.world_mut().send_event(ElevatorRequest::Button {
        cabin: entity,
        name: "Button floor 2".to_string(),
    });
    run_until_idle(&mut app, entity);

    assert_eq!(arrivals(&app), vec![1]);
    assert_eq!(cabin(&app, entity).current_floor(), Some(1));
}

#[test]
fn test_cancel_pending_request() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0]);

    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 1 });
    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 2 });
    step(&mut app, DT);

    app.world_mut().send_event(ElevatorRequest::Cancel { cabin: entity, floor: 1 });
    run_until_idle(&mut app, entity);

    assert_eq!(arrivals(&app), vec![2]);
}

#[test]
fn test_buttons_spawned_for_every_floor() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0, 9.0]);

    let world = app.world_mut();
    let mut names: Vec<String> = world
        .query::<&ElevatorButton>()
        .iter(world)
        .filter(|button| button.cabin == entity)
        .map(ElevatorButton::name)
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec!["Button floor 1", "Button floor 2", "Button floor 3", "Button floor 4"]
    );
}

#[test]
fn test_mixed_requests_keep_call_order() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0]);

    // Кнопка, потом прямой вызов: последний вызов обслуживается первым
    app.world_mut().send_event(ElevatorRequest::Button {
        cabin: entity,
        name: "Button floor 2".to_string(),
    });
    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 2 });
    step(&mut app, DT);
    assert_eq!(cabin(&app, entity).queue(), &[1, 2]);

    run_until_idle(&mut app, entity);
    assert_eq!(arrivals(&app), vec![2, 1]);
}

#[test]
fn test_press_and_cancel_in_one_tick_apply_in_order() {
    let (mut app, entity) = setup(vec![0.0, 3.0, 6.0]);
    let top = button_for(&mut app, 3);

    // Прямой вызов 1, снять его, нажать кнопку третьего этажа, снова вызов 1
    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 1 });
    app.world_mut().send_event(ElevatorRequest::Cancel { cabin: entity, floor: 1 });
    app.world_mut().send_event(ElevatorRequest::Press { button: top });
    app.world_mut().send_event(ElevatorRequest::Floor { cabin: entity, floor: 1 });
    step(&mut app, DT);

    assert_eq!(cabin(&app, entity).queue(), &[2, 1]);

    run_until_idle(&mut app, entity);
    assert_eq!(arrivals(&app), vec![1, 2]);
}
