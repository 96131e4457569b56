//! Property tests for speed validation, timing and run completion.

use proptest::prelude::*;

use stepper_runner::config::{MechanicalConstraints, RpmLimits};
use stepper_runner::motion::{level_to_rpm, SpeedLevel, SPEED_LEVELS};
use stepper_runner::motor::{MotorEvent, Phase, SimulatedActuator};
use stepper_runner::{Clock, Direction, DriveConfig, ManualClock, Micros, Millis, MotorController, Rpm, Speed};

proptest! {
    #[test]
    fn validated_rpm_stays_in_bounds(rpm in any::<i32>()) {
        let limits = RpmLimits::default();
        let validated = limits.validate(rpm);

        prop_assert!(validated >= limits.min && validated <= limits.max);
        if (1..=1000).contains(&rpm) {
            prop_assert_eq!(validated.value() as i32, rpm);
        }
    }

    #[test]
    fn pulse_interval_is_positive_and_monotonic(rpm in 1u16..1000) {
        let constraints = MechanicalConstraints::default();
        let slow = constraints.pulse_interval(Rpm::new(rpm).unwrap());
        let fast = constraints.pulse_interval(Rpm::new(rpm + 1).unwrap());

        prop_assert!(slow > Micros(0));
        prop_assert!(fast <= slow);
    }

    #[test]
    fn speed_table_round_trips(level in 1i32..=SPEED_LEVELS as i32) {
        let constraints = MechanicalConstraints::default();
        let delay = SpeedLevel::new(level).unwrap().delay();
        let rpm = level_to_rpm(level, &constraints) as u16;

        // Floor division on both sides: the table delay falls in
        // (interval(rpm + 1), interval(rpm)]
        prop_assert!(delay <= constraints.pulse_interval(Rpm::new(rpm).unwrap()));
        prop_assert!(delay > constraints.pulse_interval(Rpm::new(rpm + 1).unwrap()));
    }

    #[test]
    fn levels_outside_table_are_rejected(level in prop_oneof![i32::MIN..1, 21..i32::MAX]) {
        prop_assert!(SpeedLevel::new(level).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn count_run_completes_at_exact_pulse_count(rotations in 0u32..3, rpm in 30i32..300) {
        let clock = ManualClock::new();
        let mut controller = MotorController::new(
            SimulatedActuator::pulse_counting(),
            &clock,
            &DriveConfig::default(),
        ).unwrap();
        controller.begin().unwrap();
        controller.start_by_count(Speed::Rpm(rpm), rotations, Direction::Clockwise).unwrap();

        let interval = controller.state().pulse_interval().unwrap();
        let mut guard = 0u32;
        while controller.phase() == Phase::RunningByCount {
            controller.tick().unwrap();
            clock.advance(interval);
            guard += 1;
            prop_assert!(guard < 20_000);
        }

        prop_assert_eq!(controller.phase(), Phase::Done);
        prop_assert_eq!(controller.actuator().pulses(), rotations as u64 * 3200);
        prop_assert_eq!(controller.state().completed_rotations(), rotations);
    }

    #[test]
    fn timed_run_is_shifted_by_pause(
        target_s in 1u64..10,
        pause_at_cs in 0u64..100,
        pause_len_cs in 0u64..500,
    ) {
        let target = Millis::from_secs(target_s);
        let pause_at = Millis((pause_at_cs * 10) % target.value());
        let pause_len = Millis(pause_len_cs * 10);

        let clock = ManualClock::new();
        let mut controller = MotorController::new(
            SimulatedActuator::new(),
            &clock,
            &DriveConfig::default(),
        ).unwrap();
        controller.begin().unwrap();
        controller.start_by_duration(Speed::Rpm(60), target, Direction::Clockwise).unwrap();

        let mut done_at = None;
        while done_at.is_none() {
            clock.advance_millis(10);
            let now = clock.now_millis();
            if now == pause_at + Millis(10) {
                controller.pause();
            }
            if now == pause_at + Millis(10) + pause_len {
                controller.resume();
            }
            if controller.tick().unwrap().contains(&MotorEvent::Completed) {
                done_at = Some(now);
            }
            prop_assert!(now < Millis(30_000));
        }

        prop_assert_eq!(done_at, Some(target + pause_len));
    }
}
