//! Motor and driver configuration from TOML.

use serde::Deserialize;

use super::units::{Micros, Microsteps};

/// Physical motor and driver wiring configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Base steps per revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep setting of the driver (1, 2, 4, 8, 16, 32, etc.).
    pub microsteps: Microsteps,

    /// Invert direction pin logic (default: low = clockwise).
    pub invert_direction: bool,

    /// Driver enable input is active low (TB6600 ENA+).
    pub enable_active_low: bool,

    /// STEP high time, also used as the low settle time after each pulse.
    #[serde(rename = "pulse_width_us")]
    pub pulse_width: Micros,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: 200,
            microsteps: Microsteps::SIXTEENTH,
            invert_direction: false,
            enable_active_low: true,
            pulse_width: Micros(5),
        }
    }
}

impl MotorConfig {
    /// Pulses needed for one full output revolution (steps × microsteps).
    pub fn pulses_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulses_per_revolution() {
        let config = MotorConfig::default();

        // 200 * 16 = 3200
        assert_eq!(config.pulses_per_revolution(), 3200);

        let config = MotorConfig {
            microsteps: Microsteps::THIRTY_SECOND,
            ..MotorConfig::default()
        };
        assert_eq!(config.pulses_per_revolution(), 6400);
    }
}
