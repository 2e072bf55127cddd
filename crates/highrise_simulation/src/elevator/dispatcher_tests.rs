//! Tests for elevator dispatcher (очередь, mover loop, табло).

#[cfg(test)]
mod tests {
    use super::super::config::{ElevatorConfig, ElevatorError};
    use super::super::dispatcher::*;

    const DT: f32 = 1.0 / 60.0;

    fn three_floor_cabin() -> ElevatorCabin {
        ElevatorCabin::new(ElevatorConfig::with_floor_heights(vec![0.0, 3.0, 6.0])).unwrap()
    }

    /// Крутим mover до остановки, собираем все события
    fn run_until_stopped(cabin: &mut ElevatorCabin) -> Vec<ElevatorEvent> {
        let mut events = Vec::new();
        for _ in 0..60 * 120 {
            let tick_events = cabin.tick(DT);
            let stopped = tick_events.contains(&ElevatorEvent::Stopped);
            events.extend(tick_events);
            if stopped {
                return events;
            }
        }
        panic!("elevator never stopped, queue = {:?}", cabin.queue());
    }

    fn arrivals(events: &[ElevatorEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|event| match event {
                ElevatorEvent::Arrived { floor } => Some(*floor),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_cabin_is_idle_on_first_floor() {
        let cabin = three_floor_cabin();

        assert!(!cabin.is_running());
        assert!(cabin.doors_finished());
        assert_eq!(cabin.position_y(), 0.0);
        assert_eq!(cabin.current_floor(), Some(0));
        assert!(cabin.queue().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = ElevatorCabin::new(ElevatorConfig::with_floor_heights(Vec::new()));
        assert!(matches!(result, Err(ElevatorError::InvalidConfig { .. })));
    }

    #[test]
    fn test_last_request_is_served_first() {
        let mut cabin = three_floor_cabin();

        cabin.request_floor(2).unwrap();
        cabin.request_floor(0).unwrap();
        assert_eq!(cabin.queue(), &[2, 0]);

        let events = run_until_stopped(&mut cabin);

        assert_eq!(arrivals(&events), vec![0, 2]);
        assert_eq!(cabin.position_y(), 6.0);
        assert_eq!(cabin.current_floor(), Some(2));
        assert!(!cabin.is_running());
    }

    #[test]
    fn test_full_stop_sequence_order() {
        let mut cabin = three_floor_cabin();
        cabin.request_floor(1).unwrap();

        let events = run_until_stopped(&mut cabin);
        let milestones: Vec<ElevatorEvent> = events
            .into_iter()
            .filter(|event| !matches!(event, ElevatorEvent::FloorIndicator { .. }))
            .collect();

        assert_eq!(
            milestones,
            vec![
                ElevatorEvent::Arrived { floor: 1 },
                ElevatorEvent::DoorsOpened { floor: 1 },
                ElevatorEvent::DoorsClosed { floor: 1 },
                ElevatorEvent::Stopped,
            ]
        );

        // Двери вернулись в закрытое положение
        let closed = cabin.config().floor_plan(1).unwrap().doors.closed;
        assert_eq!(cabin.inside_leaves().left, closed.inside_left);
        assert_eq!(cabin.outside_leaves(1).unwrap().right, closed.outside_right);
    }

    #[test]
    fn test_duplicate_requests_queue_independent_cycles() {
        let mut cabin = three_floor_cabin();

        assert_eq!(cabin.request_floor(1).unwrap(), ElevatorEvent::Queued { floor: 1, pending: 1 });
        assert_eq!(cabin.request_floor(1).unwrap(), ElevatorEvent::Queued { floor: 1, pending: 2 });
        assert_eq!(cabin.request_floor(1).unwrap(), ElevatorEvent::Queued { floor: 1, pending: 3 });

        let events = run_until_stopped(&mut cabin);
        assert_eq!(arrivals(&events), vec![1, 1, 1]);
    }

    #[test]
    fn test_second_request_does_not_restart_mover() {
        let mut cabin = three_floor_cabin();
        cabin.request_floor(2).unwrap();

        for _ in 0..60 {
            cabin.tick(DT);
        }
        let position = cabin.position_y();
        assert!(position > 0.9 && position < 1.1, "position = {}", position);

        cabin.request_floor(1).unwrap();
        assert_eq!(cabin.phase(), CabinPhase::Moving);
        assert_eq!(cabin.position_y(), position); // Запрос сам по себе ничего не двигает

        let events = run_until_stopped(&mut cabin);
        assert_eq!(arrivals(&events), vec![1, 2]);
    }

    #[test]
    fn test_request_during_doors_waits_for_close() {
        let mut cabin = three_floor_cabin();
        cabin.request_floor(0).unwrap();

        let events = cabin.tick(DT);
        assert!(events.contains(&ElevatorEvent::Arrived { floor: 0 }));
        assert!(!cabin.doors_finished());

        // Пока двери заняты, новый вызов только ждёт
        cabin.request_floor(2).unwrap();
        for _ in 0..60 {
            cabin.tick(DT);
            assert_eq!(cabin.position_y(), 0.0);
        }
        assert!(matches!(cabin.phase(), CabinPhase::Doors { floor: 0, .. }));

        let events = run_until_stopped(&mut cabin);
        assert_eq!(arrivals(&events), vec![2]);
        assert!(events.contains(&ElevatorEvent::DoorsClosed { floor: 0 }));
    }

    #[test]
    fn test_invalid_floor_is_rejected_without_side_effects() {
        let mut cabin = three_floor_cabin();

        let result = cabin.request_floor(5);

        assert!(matches!(result, Err(ElevatorError::UnknownFloor { index: 5, floor_count: 3 })));
        assert!(cabin.queue().is_empty());
        assert!(!cabin.is_running());
    }

    #[test]
    fn test_missing_door_offsets_rejected() {
        let mut config = ElevatorConfig::with_floor_heights(vec![0.0, 3.0, 6.0]);
        config.outside_doors.truncate(1);
        let mut cabin = ElevatorCabin::new(config).unwrap();

        assert!(matches!(
            cabin.request_floor(2),
            Err(ElevatorError::MissingDoorOffsets { index: 2 })
        ));
        assert!(cabin.queue().is_empty());
        assert!(cabin.request_floor(0).is_ok());
    }

    #[test]
    fn test_buttons_map_to_floors() {
        let mut cabin = three_floor_cabin();

        cabin.press_button("Button floor 3").unwrap();
        assert_eq!(cabin.queue(), &[2]);

        let result = cabin.press_button("Button floor 9");
        assert!(matches!(result, Err(ElevatorError::UnknownButton { .. })));
        assert_eq!(cabin.queue(), &[2]);
    }

    #[test]
    fn test_cancel_pending() {
        let mut cabin = three_floor_cabin();
        cabin.request_floor(1).unwrap();
        cabin.request_floor(2).unwrap();
        cabin.request_floor(1).unwrap();

        assert_eq!(cabin.cancel_pending(1), 2);
        assert_eq!(cabin.queue(), &[2]);
        assert_eq!(cabin.cancel_pending(0), 0);

        // Сняли всё: mover останавливается на следующем тике
        cabin.cancel_pending(2);
        assert_eq!(cabin.tick(DT), vec![ElevatorEvent::Stopped]);
        assert!(!cabin.is_running());
    }

    #[test]
    fn test_floor_indicator_follows_cabin() {
        let mut cabin = three_floor_cabin();
        cabin.request_floor(2).unwrap();

        let events = run_until_stopped(&mut cabin);
        let indicator: Vec<usize> = events
            .iter()
            .filter_map(|event| match event {
                ElevatorEvent::FloorIndicator { floor } => Some(*floor),
                _ => None,
            })
            .collect();

        assert_eq!(indicator, vec![1, 2]);
    }

    #[test]
    fn test_mover_is_restartable() {
        let mut cabin = three_floor_cabin();
        cabin.request_floor(1).unwrap();
        run_until_stopped(&mut cabin);

        cabin.request_floor(0).unwrap();
        assert!(cabin.is_running());

        let events = run_until_stopped(&mut cabin);
        assert_eq!(arrivals(&events), vec![0]);
        assert_eq!(cabin.position_y(), 0.0);
    }

    #[test]
    fn test_custom_start_position() {
        let cabin = three_floor_cabin().with_position(3.0).unwrap();
        assert_eq!(cabin.current_floor(), Some(1));

        let between = three_floor_cabin().with_position(4.5).unwrap();
        assert_eq!(between.current_floor(), None);
    }

    #[test]
    fn test_non_finite_start_position_rejected() {
        for position_y in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = three_floor_cabin().with_position(position_y);
            assert!(matches!(result, Err(ElevatorError::InvalidStartPosition { .. })));
        }

        // Кабина с нормальной высотой доезжает как обычно
        let mut cabin = three_floor_cabin().with_position(4.5).unwrap();
        cabin.request_floor(0).unwrap();
        let events = run_until_stopped(&mut cabin);
        assert_eq!(arrivals(&events), vec![0]);
        assert_eq!(cabin.position_y(), 0.0);
    }
}
