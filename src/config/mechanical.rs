//! Mechanical constraints derived from motor configuration.

use super::motor::MotorConfig;
use super::units::{Micros, Millis, Rpm};

/// Microseconds in one minute, the numerator of every speed conversion.
pub const MICROS_PER_MINUTE: u64 = 60 * 1_000_000;

/// Milliseconds in one minute.
pub const MILLIS_PER_MINUTE: u64 = 60 * 1_000;

/// Derived mechanical parameters computed from motor configuration.
///
/// These are computed once at initialization and used for every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanicalConstraints {
    /// Pulses per output revolution (steps × microsteps).
    pub pulses_per_revolution: u32,

    /// STEP high time.
    pub pulse_width: Micros,
}

impl MechanicalConstraints {
    /// Compute mechanical constraints from motor configuration.
    pub fn from_config(config: &MotorConfig) -> Self {
        Self {
            pulses_per_revolution: config.pulses_per_revolution(),
            pulse_width: config.pulse_width,
        }
    }

    /// Time between two pulses at `rpm`.
    ///
    /// `60_000_000 / (rpm × pulses_per_revolution)` with floor division. The
    /// truncation is part of the timing contract and must not be rounded.
    #[inline]
    pub fn pulse_interval(&self, rpm: Rpm) -> Micros {
        let pulses_per_minute = rpm.value() as u64 * self.pulses_per_revolution.max(1) as u64;
        Micros(MICROS_PER_MINUTE / pulses_per_minute)
    }

    /// RPM produced by a fixed pulse delay, floor division.
    ///
    /// Returns 0 when the delay is too long for a whole revolution per minute.
    #[inline]
    pub fn rpm_for_delay(&self, delay: Micros) -> u32 {
        let micros_per_revolution = delay.0.max(1) * self.pulses_per_revolution.max(1) as u64;
        (MICROS_PER_MINUTE / micros_per_revolution) as u32
    }

    /// Wall-clock period of one revolution at `rpm`, used by simulated drives.
    #[inline]
    pub fn rotation_period(&self, rpm: Rpm) -> Millis {
        Millis(MILLIS_PER_MINUTE / rpm.value() as u64)
    }

    /// Pulses needed for `rotations` full revolutions.
    #[inline]
    pub fn pulses_for_rotations(&self, rotations: u32) -> u64 {
        rotations as u64 * self.pulses_per_revolution as u64
    }
}

impl Default for MechanicalConstraints {
    fn default() -> Self {
        Self::from_config(&MotorConfig::default())
    }
}
