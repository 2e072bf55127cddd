//! Tests for door sequencer.

#[cfg(test)]
mod tests {
    use super::super::config::ElevatorConfig;
    use super::super::doors::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor_targets() -> DoorTargets {
        ElevatorConfig::default().floor_plan(0).unwrap().doors
    }

    #[test]
    fn test_round_trip_returns_leaves_to_closed() {
        let targets = floor_targets();
        let mut leaves = targets.closed;
        let mut sequence = DoorSequence::new(targets, 4.0, 5.0);

        let mut transitions = Vec::new();
        let mut saw_open = false;
        for _ in 0..10_000 {
            if let Some(transition) = sequence.tick(&mut leaves, DT) {
                transitions.push(transition);
            }
            saw_open |= leaves == targets.open;
            if sequence.is_finished() {
                break;
            }
        }

        assert!(sequence.is_finished());
        assert!(saw_open);
        assert_eq!(transitions, vec![DoorTransition::Opened, DoorTransition::Closed]);
        assert!(leaves.approx_eq(&targets.closed, DOOR_TOLERANCE));
    }

    #[test]
    fn test_hold_lasts_configured_time() {
        let targets = floor_targets();
        let mut leaves = targets.closed;
        let mut sequence = DoorSequence::new(targets, 4.0, 5.0);

        while sequence.tick(&mut leaves, DT) != Some(DoorTransition::Opened) {}

        let mut hold_ticks = 0;
        while matches!(sequence.phase(), DoorPhase::Holding { .. }) {
            sequence.tick(&mut leaves, DT);
            hold_ticks += 1;
        }

        // 5 сек × 60 Hz (± тик на накопление float)
        assert!((299..=301).contains(&hold_ticks), "hold_ticks = {}", hold_ticks);
        assert_eq!(sequence.phase(), DoorPhase::Closing);
        assert_eq!(leaves, targets.open);
    }

    #[test]
    fn test_opening_is_gradual() {
        let targets = floor_targets();
        let mut leaves = targets.closed;
        let mut sequence = DoorSequence::new(targets, 4.0, 5.0);

        sequence.tick(&mut leaves, DT);

        // Lerp 4/60 от -0.5 к -1.4
        assert!(leaves.inside_left < targets.closed.inside_left);
        assert!(leaves.inside_left > targets.open.inside_left);
        assert!(leaves.outside_right > targets.closed.outside_right);
        assert_eq!(sequence.phase(), DoorPhase::Opening);
    }

    #[test]
    fn test_large_step_snaps_immediately() {
        let targets = floor_targets();
        let mut leaves = targets.closed;
        let mut sequence = DoorSequence::new(targets, 4.0, 0.0);

        assert_eq!(sequence.tick(&mut leaves, 0.5), Some(DoorTransition::Opened));
        assert_eq!(leaves, targets.open);

        // Hold 0 → сразу Closing
        assert_eq!(sequence.tick(&mut leaves, 0.5), None);
        assert_eq!(sequence.tick(&mut leaves, 0.5), Some(DoorTransition::Closed));
        assert_eq!(leaves, targets.closed);
        assert_eq!(sequence.tick(&mut leaves, 0.5), None);
    }
}
