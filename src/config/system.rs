//! Drive configuration - root configuration structure.

use serde::Deserialize;

use super::motor::MotorConfig;
use super::units::Millis;

/// Root configuration structure from TOML.
///
/// Every section is optional; missing values fall back to the reference
/// TB6600 + NEMA23 setup.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct DriveConfig {
    /// Run without hardware: rotations are simulated from wall-clock time.
    pub simulate: bool,

    /// Motor and driver wiring.
    pub motor: MotorConfig,

    /// Speed limits.
    pub speed: SpeedConfig,

    /// Synthetic load telemetry.
    pub telemetry: TelemetryConfig,
}

/// RPM limits and the advisory optimal band.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    /// Lowest accepted RPM; requests below are raised to it.
    pub min_rpm: u16,

    /// Highest accepted RPM; requests above are lowered to it.
    pub max_rpm: u16,

    /// Start of the band where the motor has comfortable torque.
    pub optimal_rpm_low: u16,

    /// End of the optimal band.
    pub optimal_rpm_high: u16,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            min_rpm: 1,
            max_rpm: 1000,
            optimal_rpm_low: 50,
            optimal_rpm_high: 300,
        }
    }
}

/// Synthetic load sampling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Time between two load samples.
    #[serde(rename = "load_sample_interval_ms")]
    pub load_sample_interval: Millis,

    /// Lower edge of the reported load, percent.
    pub load_min_percent: f32,

    /// Upper edge of the reported load, percent (exclusive).
    pub load_max_percent: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            load_sample_interval: Millis(1000),
            load_min_percent: 10.0,
            load_max_percent: 50.0,
        }
    }
}

impl DriveConfig {
    /// Pulses needed for one full output revolution.
    #[inline]
    pub fn pulses_per_revolution(&self) -> u32 {
        self.motor.pulses_per_revolution()
    }
}
