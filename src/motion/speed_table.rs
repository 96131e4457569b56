//! Discrete speed levels.
//!
//! Level 1 is the slowest preset, level 20 the fastest. Each level is a fixed
//! STEP delay tuned for 1/16 microstepping.

use crate::config::{MechanicalConstraints, Micros};
use crate::error::{MotionError, Result};

/// Number of speed presets.
pub const SPEED_LEVELS: u8 = 20;

/// STEP delay per level in microseconds, slowest first.
pub const SPEED_DELAY_TABLE_US: [u32; SPEED_LEVELS as usize] = [
    10000, 8000, 6500, 5000, 4000, 3200, 2600, 2100, 1700, 1400, //
    1150, 950, 800, 680, 580, 500, 430, 370, 320, 280,
];

/// A validated speed preset in `1..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    /// Slowest preset.
    pub const SLOWEST: Self = Self(1);
    /// Fastest preset.
    pub const FASTEST: Self = Self(SPEED_LEVELS);

    /// Create a speed level, rejecting anything outside `1..=20`.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidSpeedLevel` for out-of-range levels.
    pub fn new(level: i32) -> Result<Self> {
        if (1..=SPEED_LEVELS as i32).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(MotionError::InvalidSpeedLevel(level).into())
        }
    }

    /// Create a speed level, clamping into `1..=20`.
    pub fn clamped(level: i32) -> Self {
        Self(level.clamp(1, SPEED_LEVELS as i32) as u8)
    }

    /// Get the raw level.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// STEP delay of this level.
    #[inline]
    pub fn delay(self) -> Micros {
        Micros(SPEED_DELAY_TABLE_US[self.0 as usize - 1] as u64)
    }

    /// RPM of this level for the given mechanics, floor division.
    ///
    /// May be 0 for slow levels on high-resolution drives; the RPM validator
    /// raises it to the configured minimum.
    #[inline]
    pub fn rpm(self, constraints: &MechanicalConstraints) -> u32 {
        constraints.rpm_for_delay(self.delay())
    }
}

/// Convert a level to RPM, clamping the level into `1..=20` first.
pub fn level_to_rpm(level: i32, constraints: &MechanicalConstraints) -> u32 {
    SpeedLevel::clamped(level).rpm(constraints)
}
