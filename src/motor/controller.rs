//! Tick-driven motor controller.
//!
//! Owns the motor state, the actuator and the clock. The caller invokes
//! [`MotorController::tick`] as often as it can; every operation returns
//! without blocking (apart from the few microseconds of a STEP pulse).

use log::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{DriveConfig, MechanicalConstraints, Micros, Millis, RpmLimits};
use crate::error::{MotorError, Result};
use crate::motion::{Direction, MotionRequest, RunProfile, RunTarget, Speed};

use super::actuator::{Actuator, DriveMode};
use super::builder::MotorControllerBuilder;
use super::load::LoadSampler;
use super::state::{MotorState, Phase};
use super::status::{MotorEvent, Progress, Status, TickEvents};

/// Single-axis stepper controller.
///
/// Generic over:
/// - `A`: the actuator that receives arm/disarm/pulse requests
/// - `C`: the monotonic clock
pub struct MotorController<A, C>
where
    A: Actuator,
    C: Clock,
{
    /// Driver interface, touched only by start/stop/tick.
    actuator: A,

    /// Time source.
    clock: C,

    /// Pulses per revolution and pulse width.
    constraints: MechanicalConstraints,

    /// RPM clamp range.
    limits: RpmLimits,

    /// Synthetic load telemetry.
    load: LoadSampler,

    /// Phase, run profile and counters.
    state: MotorState,

    /// Events of a tick that failed, delivered by the next tick.
    pending: TickEvents,
}

impl<A, C> MotorController<A, C>
where
    A: Actuator,
    C: Clock,
{
    /// Create a controller in the Idle phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(actuator: A, clock: C, config: &DriveConfig) -> Result<Self> {
        Self::builder().actuator(actuator).clock(clock).config(config).build()
    }

    /// Start building a controller.
    pub fn builder() -> MotorControllerBuilder<A, C> {
        MotorControllerBuilder::new()
    }

    pub(crate) fn from_parts(
        actuator: A,
        clock: C,
        constraints: MechanicalConstraints,
        limits: RpmLimits,
        load: LoadSampler,
    ) -> Self {
        Self {
            actuator,
            clock,
            constraints,
            limits,
            load,
            state: MotorState::default(),
            pending: TickEvents::new(),
        }
    }

    /// Initialize the driver (disabled) and move from Idle to Ready.
    ///
    /// Does nothing outside the Idle phase.
    pub fn begin(&mut self) -> Result<()> {
        if self.state.phase != Phase::Idle {
            return Ok(());
        }
        self.actuator.disarm()?;
        self.state.phase = Phase::Ready;
        info!(
            "Motor controller initialized ({:?}), {} pulses per revolution",
            self.actuator.drive_mode(),
            self.constraints.pulses_per_revolution
        );
        Ok(())
    }

    /// Start a run for `request`.
    ///
    /// Accepted from Idle, Ready, Done and Stopped. Re-initializes every
    /// run-scoped field, arms the actuator and enters the running phase that
    /// matches the target.
    ///
    /// # Errors
    ///
    /// - `MotorError::InvalidState` while running or paused
    /// - `MotionError::InvalidSpeedLevel` for a preset outside 1-20
    /// - `MotorError::PinError` if the driver could not be armed
    ///
    /// The state is unchanged on every error.
    pub fn start(&mut self, request: MotionRequest) -> Result<()> {
        let phase = self.state.phase;
        if !phase.accepts_start() {
            warn!("Start refused: motor is {}", phase.name());
            return Err(MotorError::InvalidState(phase).into());
        }

        let profile = RunProfile::new(&request, &self.limits, &self.constraints)?;
        self.actuator.arm(profile.direction)?;

        let now = self.clock.now_micros();
        self.state.begin_run(profile, now, now.to_millis());
        self.pending.clear();

        match profile.target {
            RunTarget::Rotations(rotations) => info!(
                "Starting rotation: {} RPM, {} rotations, Direction: {}",
                profile.rpm,
                rotations,
                profile.direction.label()
            ),
            RunTarget::Duration(duration) => info!(
                "Starting time mode: {} RPM for {} ms, Direction: {}",
                profile.rpm,
                duration.value(),
                profile.direction.label()
            ),
        }
        Ok(())
    }

    /// Run for a number of full rotations.
    pub fn start_by_count(&mut self, speed: Speed, rotations: u32, direction: Direction) -> Result<()> {
        self.start(MotionRequest::rotations(speed, rotations, direction))
    }

    /// Run for an amount of active time.
    pub fn start_by_duration(&mut self, speed: Speed, duration: Millis, direction: Direction) -> Result<()> {
        self.start(MotionRequest::duration(speed, duration, direction))
    }

    /// Suspend the current run. The driver stays enabled.
    ///
    /// Returns `false` (and does nothing) unless running.
    pub fn pause(&mut self) -> bool {
        let phase = self.state.phase;
        if !phase.is_running() {
            return false;
        }

        self.state.run_clock.pause(self.clock.now_millis());
        self.state.phase_before_pause = Some(phase);
        self.state.phase = Phase::Paused;
        info!("Motor paused");
        true
    }

    /// Continue a paused run.
    ///
    /// The pause length is excluded from the active time, and pulse timing
    /// restarts from now so no burst of catch-up pulses is issued.
    /// Returns `false` (and does nothing) unless paused.
    pub fn resume(&mut self) -> bool {
        if self.state.phase != Phase::Paused {
            return false;
        }
        let Some(previous) = self.state.phase_before_pause.take() else {
            return false;
        };

        let now = self.clock.now_micros();
        let now_ms = now.to_millis();
        if let Some(span) = self.state.run_clock.resume(now_ms) {
            debug!("Paused for {} ms", span.value());
        }
        self.state.phase = previous;
        self.state.last_pulse_at = now;
        self.state.last_simulated_rotation = now_ms;
        info!("Motor resumed");
        true
    }

    /// Cancel whatever is going on and disable the driver.
    ///
    /// Always moves to Stopped and clears the run, even if disabling the
    /// driver fails.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if the driver could not be disabled.
    pub fn stop(&mut self) -> Result<()> {
        self.state.phase = Phase::Stopped;
        self.state.clear_run();
        self.pending.clear();
        info!("Motor stopped - driver disabled");
        self.actuator.disarm()
    }

    /// Advance the current run by at most one pulse.
    ///
    /// Does nothing unless running. Returns the events produced by this call.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if the actuator fails. Counters are left
    /// as they were before the failed pulse, and events already produced are
    /// returned by the next tick. A run that reached its target stays running
    /// until the driver is disabled, and issues no further pulses meanwhile.
    pub fn tick(&mut self) -> Result<TickEvents> {
        let mut events = core::mem::take(&mut self.pending);
        if !self.state.phase.is_running() {
            return Ok(events);
        }
        let Some(profile) = self.state.profile else {
            return Ok(events);
        };

        match self.advance(&profile, &mut events) {
            Ok(()) => Ok(events),
            Err(e) => {
                self.pending = events;
                Err(e)
            }
        }
    }

    fn advance(&mut self, profile: &RunProfile, events: &mut TickEvents) -> Result<()> {
        let now = self.clock.now_micros();
        let now_ms = now.to_millis();

        if let Some(sample) = self.load.poll(now_ms) {
            push_event(events, MotorEvent::Load(sample));
        }

        // Timed runs are checked every tick, not only when a pulse is due
        if self.target_reached(profile, now_ms) {
            return self.finish(now_ms, events);
        }

        match self.actuator.drive_mode() {
            DriveMode::Physical => self.advance_pulses(profile, now, events)?,
            DriveMode::Simulated => self.advance_simulation(profile, now_ms, events),
        }

        if matches!(profile.target, RunTarget::Rotations(_)) && self.target_reached(profile, now_ms) {
            self.finish(now_ms, events)?;
        }
        Ok(())
    }

    fn target_reached(&self, profile: &RunProfile, now: Millis) -> bool {
        match profile.target {
            RunTarget::Rotations(rotations) => match self.actuator.drive_mode() {
                DriveMode::Physical => self.state.total_pulses >= profile.target_pulses,
                DriveMode::Simulated => self.state.completed_rotations >= rotations,
            },
            RunTarget::Duration(target) => self.state.run_clock.elapsed_active(now) >= target,
        }
    }

    fn advance_pulses(&mut self, profile: &RunProfile, now: Micros, events: &mut TickEvents) -> Result<()> {
        if now.since(self.state.last_pulse_at) < profile.pulse_interval {
            return Ok(());
        }

        self.actuator.emit_pulse()?;
        self.state.last_pulse_at = now;
        self.state.total_pulses += 1;

        let pulses_per_revolution = self.constraints.pulses_per_revolution.max(1) as u64;
        if self.state.total_pulses % pulses_per_revolution == 0 {
            let rotations = u32::try_from(self.state.total_pulses / pulses_per_revolution).unwrap_or(u32::MAX);
            self.state.completed_rotations = rotations;
            push_event(events, MotorEvent::Progress { rotations });
        }
        Ok(())
    }

    fn advance_simulation(&mut self, profile: &RunProfile, now: Millis, events: &mut TickEvents) {
        if now.since(self.state.last_simulated_rotation) < profile.rotation_period {
            return;
        }

        self.state.completed_rotations = self.state.completed_rotations.saturating_add(1);
        self.state.last_simulated_rotation = now;
        push_event(
            events,
            MotorEvent::Progress {
                rotations: self.state.completed_rotations,
            },
        );
    }

    /// Disable the driver, then commit Done. On failure nothing changes.
    fn finish(&mut self, now: Millis, events: &mut TickEvents) -> Result<()> {
        self.actuator.disarm()?;
        self.state.phase = Phase::Done;
        self.state.run_clock.finish(now);
        push_event(events, MotorEvent::Completed);
        info!(
            "DONE: {} rotations, {} pulses",
            self.state.completed_rotations, self.state.total_pulses
        );
        Ok(())
    }

    /// Snapshot of phase and progress. Never changes state.
    pub fn status(&self) -> Status {
        let state = &self.state;
        let progress = match (state.phase, state.profile) {
            (Phase::Idle | Phase::Ready | Phase::Stopped, _) | (_, None) => Progress::None,
            (_, Some(profile)) => match profile.target {
                RunTarget::Rotations(target) => Progress::Rotations {
                    completed: state.completed_rotations,
                    target,
                },
                RunTarget::Duration(target) => Progress::Duration {
                    elapsed: state.run_clock.elapsed_active(self.clock.now_millis()),
                    target,
                    rotations: state.completed_rotations,
                },
            },
        };

        Status {
            phase: state.phase,
            rpm: state.current_rpm,
            direction: state.direction,
            progress,
            load: self.load.last(),
            drive_mode: self.actuator.drive_mode(),
        }
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Whether a run is issuing pulses.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.phase.is_running()
    }

    /// Whether a run is paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state.phase == Phase::Paused
    }

    /// Full motor state.
    #[inline]
    pub fn state(&self) -> &MotorState {
        &self.state
    }

    /// The actuator, for inspection.
    #[inline]
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// The clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mechanical constraints in effect.
    #[inline]
    pub fn constraints(&self) -> &MechanicalConstraints {
        &self.constraints
    }

    /// RPM limits in effect.
    #[inline]
    pub fn limits(&self) -> &RpmLimits {
        &self.limits
    }

    /// Tear down the controller, returning actuator and clock.
    pub fn release(self) -> (A, C) {
        (self.actuator, self.clock)
    }
}

fn push_event(events: &mut TickEvents, event: MotorEvent) {
    // Only the newest load sample is kept when a failed tick is carried over
    if let MotorEvent::Load(_) = event {
        if let Some(slot) = events.iter_mut().find(|e| matches!(e, MotorEvent::Load(_))) {
            *slot = event;
            return;
        }
    }
    // capacity covers the three event kinds a tick can produce
    let _ = events.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use core::cell::Cell;

    use crate::error::{Error, MotionError, MotorError};
    use crate::motor::SimulatedActuator;

    /// Counts pulses like hardware, failing a set number of pin writes.
    #[derive(Default)]
    struct FlakyActuator {
        inner: SimulatedActuator,
        disarm_failures: Cell<u32>,
        pulse_failures: Cell<u32>,
    }

    fn fail_once(counter: &Cell<u32>) -> bool {
        let left = counter.get();
        if left > 0 {
            counter.set(left - 1);
        }
        left > 0
    }

    impl Actuator for FlakyActuator {
        fn arm(&mut self, direction: Direction) -> Result<()> {
            self.inner.arm(direction)
        }

        fn disarm(&mut self) -> Result<()> {
            if fail_once(&self.disarm_failures) {
                return Err(MotorError::PinError.into());
            }
            self.inner.disarm()
        }

        fn emit_pulse(&mut self) -> Result<()> {
            if fail_once(&self.pulse_failures) {
                return Err(MotorError::PinError.into());
            }
            self.inner.emit_pulse()
        }
    }

    fn flaky_controller(clock: &ManualClock) -> MotorController<FlakyActuator, &ManualClock> {
        let mut controller =
            MotorController::new(FlakyActuator::default(), clock, &DriveConfig::default()).unwrap();
        controller.begin().unwrap();
        controller
    }

    fn controller(clock: &ManualClock) -> MotorController<SimulatedActuator, &ManualClock> {
        let mut controller = MotorController::new(
            SimulatedActuator::pulse_counting(),
            clock,
            &DriveConfig::default(),
        )
        .unwrap();
        controller.begin().unwrap();
        controller
    }

    #[test]
    fn test_begin_moves_to_ready() {
        let clock = ManualClock::new();
        let mut controller = MotorController::new(
            SimulatedActuator::pulse_counting(),
            &clock,
            &DriveConfig::default(),
        )
        .unwrap();

        assert_eq!(controller.phase(), Phase::Idle);
        controller.begin().unwrap();
        assert_eq!(controller.phase(), Phase::Ready);
        assert!(!controller.actuator().is_armed());
    }

    #[test]
    fn test_start_arms_actuator() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        controller
            .start_by_count(Speed::Rpm(60), 1, Direction::CounterClockwise)
            .unwrap();

        assert_eq!(controller.phase(), Phase::RunningByCount);
        assert!(controller.actuator().is_armed());
        assert_eq!(controller.actuator().direction(), Some(Direction::CounterClockwise));
        assert_eq!(controller.state().pulse_interval(), Some(Micros(312)));
    }

    #[test]
    fn test_no_pulse_before_interval() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        controller.start_by_count(Speed::Rpm(60), 1, Direction::Clockwise).unwrap();

        clock.advance(Micros(311));
        controller.tick().unwrap();
        assert_eq!(controller.actuator().pulses(), 0);

        clock.advance(Micros(1));
        controller.tick().unwrap();
        assert_eq!(controller.actuator().pulses(), 1);

        // One pulse per tick at most, however late the tick is
        clock.advance(Micros(10_000));
        controller.tick().unwrap();
        assert_eq!(controller.actuator().pulses(), 2);
    }

    #[test]
    fn test_invalid_level_leaves_state() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        let result = controller.start_by_count(Speed::Level(0), 1, Direction::Clockwise);
        assert_eq!(result, Err(Error::Motion(MotionError::InvalidSpeedLevel(0))));
        assert_eq!(controller.phase(), Phase::Ready);
        assert!(!controller.actuator().is_armed());
    }

    #[test]
    fn test_zero_rotations_complete_without_pulses() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        controller.start_by_count(Speed::Rpm(60), 0, Direction::Clockwise).unwrap();

        let events = controller.tick().unwrap();
        assert_eq!(events.as_slice(), &[MotorEvent::Completed]);
        assert_eq!(controller.phase(), Phase::Done);
        assert_eq!(controller.actuator().pulses(), 0);
    }

    #[test]
    fn test_tick_idle_is_noop() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        clock.advance_millis(5_000);
        assert!(controller.tick().unwrap().is_empty());
        assert_eq!(controller.status().load, None);
    }

    #[test]
    fn test_resume_restarts_pulse_timing() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);
        controller.start_by_count(Speed::Rpm(60), 1, Direction::Clockwise).unwrap();

        assert!(controller.pause());
        clock.advance_millis(500);
        controller.tick().unwrap();
        assert_eq!(controller.actuator().pulses(), 0);

        assert!(controller.resume());
        controller.tick().unwrap();
        assert_eq!(controller.actuator().pulses(), 0);

        clock.advance(Micros(312));
        controller.tick().unwrap();
        assert_eq!(controller.actuator().pulses(), 1);
    }

    #[test]
    fn test_completion_survives_disarm_failure() {
        let clock = ManualClock::new();
        let mut controller = flaky_controller(&clock);
        controller.start_by_count(Speed::Rpm(60), 1, Direction::Clockwise).unwrap();
        controller.actuator().disarm_failures.set(2);

        let (mut completed, mut progress, mut errors) = (0, 0, 0);
        for _ in 0..5_000 {
            clock.advance(Micros(312));
            match controller.tick() {
                Ok(events) => {
                    for event in events {
                        match event {
                            MotorEvent::Completed => completed += 1,
                            MotorEvent::Progress { .. } => progress += 1,
                            MotorEvent::Load(_) => {}
                        }
                    }
                }
                Err(e) => {
                    assert_eq!(e, Error::Motor(MotorError::PinError));
                    assert_eq!(controller.phase(), Phase::RunningByCount);
                    errors += 1;
                }
            }
        }

        assert_eq!((completed, progress, errors), (1, 1, 2));
        assert_eq!(controller.phase(), Phase::Done);
        assert_eq!(controller.actuator().inner.pulses(), 3200);
        assert!(!controller.actuator().inner.is_armed());
    }

    #[test]
    fn test_load_sample_survives_pulse_failure() {
        let clock = ManualClock::new();
        let mut controller = flaky_controller(&clock);
        controller.start_by_duration(Speed::Rpm(60), Millis(10_000), Direction::Clockwise).unwrap();
        controller.actuator().pulse_failures.set(1);

        clock.advance_millis(1_000);
        assert!(controller.tick().is_err());
        assert_eq!(controller.state().total_pulses(), 0);

        let events = controller.tick().unwrap();
        assert!(matches!(events.as_slice(), [MotorEvent::Load(_)]));
        assert_eq!(controller.state().total_pulses(), 1);
        assert!(controller.tick().unwrap().is_empty());
    }

    #[test]
    fn test_stop_drops_carried_events() {
        let clock = ManualClock::new();
        let mut controller = flaky_controller(&clock);
        controller.start_by_duration(Speed::Rpm(60), Millis(10_000), Direction::Clockwise).unwrap();
        controller.actuator().pulse_failures.set(1);

        clock.advance_millis(1_000);
        assert!(controller.tick().is_err());
        controller.stop().unwrap();
        assert!(controller.tick().unwrap().is_empty());
    }
}
