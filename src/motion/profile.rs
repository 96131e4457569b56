//! Motion requests and the run profile derived from them.

use crate::config::{MechanicalConstraints, Micros, Millis, Rpm, RpmLimits};
use crate::error::Result;

use super::speed_table::SpeedLevel;

/// Direction of motor rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise.
    #[default]
    Clockwise,
    /// Counter-clockwise.
    CounterClockwise,
}

impl Direction {
    /// Direction from a clockwise flag.
    #[inline]
    pub fn from_clockwise(clockwise: bool) -> Self {
        if clockwise {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Short label, `CW` or `CCW`.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Direction::Clockwise => "CW",
            Direction::CounterClockwise => "CCW",
        }
    }
}

/// Requested speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// Raw RPM; clamped into the configured limits.
    Rpm(i32),
    /// Speed preset; must be `1..=20` or the request is refused.
    Level(i32),
}

impl Speed {
    /// Resolve to a validated RPM.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidSpeedLevel` for a level outside `1..=20`.
    pub fn resolve(self, limits: &RpmLimits, constraints: &MechanicalConstraints) -> Result<Rpm> {
        let requested = match self {
            Speed::Rpm(rpm) => rpm,
            Speed::Level(level) => {
                let level = SpeedLevel::new(level)?;
                let rpm = level.rpm(constraints);
                log::info!("Speed level {} = {} RPM", level.value(), rpm);
                i32::try_from(rpm).unwrap_or(i32::MAX)
            }
        };
        Ok(limits.validate(requested))
    }
}

/// What ends a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunTarget {
    /// Stop after this many full rotations.
    Rotations(u32),
    /// Stop after this much active (unpaused) time.
    Duration(Millis),
}

/// A complete motion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionRequest {
    /// Requested speed.
    pub speed: Speed,
    /// Rotation count or duration.
    pub target: RunTarget,
    /// Rotation direction.
    pub direction: Direction,
}

impl MotionRequest {
    /// Request a fixed number of rotations.
    pub fn rotations(speed: Speed, rotations: u32, direction: Direction) -> Self {
        Self {
            speed,
            target: RunTarget::Rotations(rotations),
            direction,
        }
    }

    /// Request a timed run.
    pub fn duration(speed: Speed, duration: Millis, direction: Direction) -> Self {
        Self {
            speed,
            target: RunTarget::Duration(duration),
            direction,
        }
    }
}

/// Parameters of an accepted run, fixed until stop or restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunProfile {
    /// Validated speed.
    pub rpm: Rpm,
    /// Rotation direction.
    pub direction: Direction,
    /// Count or duration target.
    pub target: RunTarget,
    /// Time between two pulses, always > 0.
    pub pulse_interval: Micros,
    /// Pulses that complete a count run (0 for duration runs).
    pub target_pulses: u64,
    /// One revolution of wall-clock time, for simulated drives.
    pub rotation_period: Millis,
}

impl RunProfile {
    /// Derive the profile for a request.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidSpeedLevel` for an out-of-range preset.
    pub fn new(
        request: &MotionRequest,
        limits: &RpmLimits,
        constraints: &MechanicalConstraints,
    ) -> Result<Self> {
        let rpm = request.speed.resolve(limits, constraints)?;
        let target_pulses = match request.target {
            RunTarget::Rotations(rotations) => constraints.pulses_for_rotations(rotations),
            RunTarget::Duration(_) => 0,
        };

        Ok(Self {
            rpm,
            direction: request.direction,
            target: request.target,
            // above 60e6 pulses per minute the floor division reaches zero
            pulse_interval: Micros(constraints.pulse_interval(rpm).0.max(1)),
            target_pulses,
            rotation_period: constraints.rotation_period(rpm),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, MotionError};

    #[test]
    fn test_profile_for_rotations() {
        let request = MotionRequest::rotations(Speed::Rpm(60), 2, Direction::Clockwise);
        let profile = RunProfile::new(
            &request,
            &RpmLimits::default(),
            &MechanicalConstraints::default(),
        )
        .unwrap();

        assert_eq!(profile.rpm.value(), 60);
        assert_eq!(profile.target_pulses, 6400);
        assert_eq!(profile.pulse_interval, Micros(312));
        assert_eq!(profile.rotation_period, Millis(1000));
    }

    #[test]
    fn test_profile_clamps_raw_rpm() {
        let request = MotionRequest::duration(Speed::Rpm(0), Millis(1000), Direction::Clockwise);
        let profile = RunProfile::new(
            &request,
            &RpmLimits::default(),
            &MechanicalConstraints::default(),
        )
        .unwrap();

        assert_eq!(profile.rpm.value(), 1);
        assert_eq!(profile.target_pulses, 0);
    }

    #[test]
    fn test_profile_rejects_bad_level() {
        let request = MotionRequest::rotations(Speed::Level(21), 1, Direction::Clockwise);
        let result = RunProfile::new(
            &request,
            &RpmLimits::default(),
            &MechanicalConstraints::default(),
        );

        assert_eq!(
            result,
            Err(Error::Motion(MotionError::InvalidSpeedLevel(21)))
        );
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(Direction::from_clockwise(true).label(), "CW");
        assert_eq!(Direction::from_clockwise(false).label(), "CCW");
    }
}
