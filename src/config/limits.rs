//! RPM limits and the speed validator.

use log::{debug, warn};

use crate::error::{ConfigError, Result};

use super::system::SpeedConfig;
use super::units::Rpm;

/// Where a requested speed falls relative to the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RpmBand {
    /// Below the minimum; raised to it.
    BelowMinimum,
    /// Above the maximum; lowered to it.
    AboveMaximum,
    /// Within limits and within the optimal band.
    Optimal,
    /// Within limits but outside the optimal band.
    OutsideOptimal,
}

/// Validated RPM limits (for runtime use).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpmLimits {
    /// Minimum RPM.
    pub min: Rpm,
    /// Maximum RPM.
    pub max: Rpm,
    /// Start of the optimal band.
    pub optimal_low: u16,
    /// End of the optimal band.
    pub optimal_high: u16,
}

impl RpmLimits {
    /// Create limits from speed configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRpmRange` if `min_rpm` is zero or above `max_rpm`.
    pub fn from_config(config: &SpeedConfig) -> Result<Self> {
        let range_error = ConfigError::InvalidRpmRange {
            min: config.min_rpm,
            max: config.max_rpm,
        };
        let min = Rpm::new(config.min_rpm).ok_or(range_error.clone())?;
        let max = Rpm::new(config.max_rpm).ok_or(range_error.clone())?;
        if min > max {
            return Err(range_error.into());
        }
        if config.optimal_rpm_low > config.optimal_rpm_high {
            return Err(ConfigError::InvalidOptimalBand {
                low: config.optimal_rpm_low,
                high: config.optimal_rpm_high,
            }
            .into());
        }

        Ok(Self {
            min,
            max,
            optimal_low: config.optimal_rpm_low,
            optimal_high: config.optimal_rpm_high,
        })
    }

    /// Classify a requested speed.
    pub fn classify(&self, rpm: i32) -> RpmBand {
        if rpm < self.min.value() as i32 {
            RpmBand::BelowMinimum
        } else if rpm > self.max.value() as i32 {
            RpmBand::AboveMaximum
        } else if rpm >= self.optimal_low as i32 && rpm <= self.optimal_high as i32 {
            RpmBand::Optimal
        } else {
            RpmBand::OutsideOptimal
        }
    }

    /// Clamp a requested speed into `[min, max]`.
    ///
    /// Out-of-range values are never an error; the classification is only
    /// logged.
    pub fn validate(&self, rpm: i32) -> Rpm {
        match self.classify(rpm) {
            RpmBand::BelowMinimum => {
                warn!("RPM {} too low, setting to minimum: {}", rpm, self.min);
                self.min
            }
            RpmBand::AboveMaximum => {
                warn!("RPM {} too high, setting to maximum: {}", rpm, self.max);
                self.max
            }
            band => {
                if band == RpmBand::Optimal {
                    debug!("RPM {} is in optimal range", rpm);
                } else {
                    debug!(
                        "RPM {} is outside optimal range ({}-{})",
                        rpm, self.optimal_low, self.optimal_high
                    );
                }
                // classify() guarantees min <= rpm <= max here
                Rpm::new(rpm as u16).unwrap_or(self.min)
            }
        }
    }
}

impl Default for RpmLimits {
    fn default() -> Self {
        let speed = SpeedConfig::default();
        Self {
            min: Rpm::new(speed.min_rpm).unwrap_or(Rpm::MIN),
            max: Rpm::new(speed.max_rpm).unwrap_or(Rpm::MIN),
            optimal_low: speed.optimal_rpm_low,
            optimal_high: speed.optimal_rpm_high,
        }
    }
}
