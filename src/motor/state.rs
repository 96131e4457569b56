//! Motor phase and per-run state.

use crate::config::{Micros, Millis, Rpm};
use crate::motion::{Direction, RunClock, RunProfile};

/// Lifecycle phase of the motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Constructed, driver not initialized.
    #[default]
    Idle,
    /// Driver initialized and disabled, waiting for a run.
    Ready,
    /// Running until a rotation count is reached.
    RunningByCount,
    /// Running until an active duration has elapsed.
    RunningByDuration,
    /// Run suspended; driver stays enabled.
    Paused,
    /// Run cancelled.
    Stopped,
    /// Run reached its target.
    Done,
}

impl Phase {
    /// Whether pulses may be issued in this phase.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Phase::RunningByCount | Phase::RunningByDuration)
    }

    /// Whether a new run may start from this phase.
    #[inline]
    pub fn accepts_start(self) -> bool {
        matches!(self, Phase::Idle | Phase::Ready | Phase::Done | Phase::Stopped)
    }

    /// Phase name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Ready => "Ready",
            Phase::RunningByCount => "RunningByCount",
            Phase::RunningByDuration => "RunningByDuration",
            Phase::Paused => "Paused",
            Phase::Stopped => "Stopped",
            Phase::Done => "Done",
        }
    }
}

/// Everything the controller knows about the current run.
///
/// Owned by a single controller; run-scoped fields are reset on every start
/// and cleared on stop.
#[derive(Debug, Clone, Default)]
pub struct MotorState {
    pub(crate) phase: Phase,
    /// Speed of the last accepted run, kept after stop.
    pub(crate) current_rpm: Option<Rpm>,
    pub(crate) direction: Direction,
    /// Present from start until stop; kept on Done for reporting.
    pub(crate) profile: Option<RunProfile>,
    pub(crate) completed_rotations: u32,
    pub(crate) total_pulses: u64,
    pub(crate) last_pulse_at: Micros,
    pub(crate) run_clock: RunClock,
    pub(crate) phase_before_pause: Option<Phase>,
    pub(crate) last_simulated_rotation: Millis,
}

impl MotorState {
    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Speed in effect for the last accepted run.
    #[inline]
    pub fn current_rpm(&self) -> Option<Rpm> {
        self.current_rpm
    }

    /// Direction of the last accepted run.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Parameters of the current run, if any.
    #[inline]
    pub fn profile(&self) -> Option<&RunProfile> {
        self.profile.as_ref()
    }

    /// Full rotations completed in the current run.
    #[inline]
    pub fn completed_rotations(&self) -> u32 {
        self.completed_rotations
    }

    /// Pulses issued in the current run.
    #[inline]
    pub fn total_pulses(&self) -> u64 {
        self.total_pulses
    }

    /// Pause accounting of the current run.
    #[inline]
    pub fn run_clock(&self) -> &RunClock {
        &self.run_clock
    }

    /// Pulse interval of the current run; `None` outside a run.
    #[inline]
    pub fn pulse_interval(&self) -> Option<Micros> {
        self.profile.map(|p| p.pulse_interval)
    }

    /// Phase a resume returns to.
    #[inline]
    pub fn phase_before_pause(&self) -> Option<Phase> {
        self.phase_before_pause
    }

    /// Reset every run-scoped field for a new run.
    pub(crate) fn begin_run(&mut self, profile: RunProfile, now_us: Micros, now_ms: Millis) {
        self.phase = match profile.target {
            crate::motion::RunTarget::Rotations(_) => Phase::RunningByCount,
            crate::motion::RunTarget::Duration(_) => Phase::RunningByDuration,
        };
        self.current_rpm = Some(profile.rpm);
        self.direction = profile.direction;
        self.profile = Some(profile);
        self.completed_rotations = 0;
        self.total_pulses = 0;
        self.last_pulse_at = now_us;
        self.run_clock = RunClock::start(now_ms);
        self.phase_before_pause = None;
        self.last_simulated_rotation = now_ms;
    }

    /// Drop every run-scoped field.
    pub(crate) fn clear_run(&mut self) {
        self.profile = None;
        self.completed_rotations = 0;
        self.total_pulses = 0;
        self.last_pulse_at = Micros(0);
        self.run_clock = RunClock::default();
        self.phase_before_pause = None;
        self.last_simulated_rotation = Millis(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_predicates() {
        assert!(Phase::RunningByCount.is_running());
        assert!(Phase::RunningByDuration.is_running());
        assert!(!Phase::Paused.is_running());

        for phase in [Phase::Idle, Phase::Ready, Phase::Done, Phase::Stopped] {
            assert!(phase.accepts_start(), "{}", phase.name());
        }
        for phase in [Phase::RunningByCount, Phase::RunningByDuration, Phase::Paused] {
            assert!(!phase.accepts_start(), "{}", phase.name());
        }
    }
}
