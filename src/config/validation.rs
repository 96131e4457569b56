//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::limits::RpmLimits;
use super::{DriveConfig, MotorConfig, TelemetryConfig};

/// Validate a drive configuration.
///
/// Checks:
/// - Motor has a non-zero step count
/// - RPM range is non-empty and starts above zero
/// - Optimal band is ordered
/// - Load band lies within 0-100 % and the sample interval is non-zero
pub fn validate_config(config: &DriveConfig) -> Result<()> {
    validate_motor(&config.motor)?;
    RpmLimits::from_config(&config.speed)?;
    validate_telemetry(&config.telemetry)?;

    Ok(())
}

fn validate_motor(config: &MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRevolution(
            config.steps_per_revolution,
        )));
    }

    Ok(())
}

fn validate_telemetry(config: &TelemetryConfig) -> Result<()> {
    if config.load_sample_interval.0 == 0 {
        return Err(Error::Config(ConfigError::InvalidSampleInterval));
    }

    let (min, max) = (config.load_min_percent, config.load_max_percent);
    // NaN fails every comparison below and is rejected too
    if !(min >= 0.0 && max <= 100.0 && min < max) {
        return Err(Error::Config(ConfigError::InvalidLoadBand { min, max }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&DriveConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_steps_rejected() {
        let mut config = DriveConfig::default();
        config.motor.steps_per_revolution = 0;

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidStepsPerRevolution(0)))
        ));
    }

    #[test]
    fn test_inverted_load_band_rejected() {
        let mut config = DriveConfig::default();
        config.telemetry.load_min_percent = 60.0;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidLoadBand { .. }))
        ));
    }

    #[test]
    fn test_zero_sample_interval_rejected() {
        let mut config = DriveConfig::default();
        config.telemetry.load_sample_interval = crate::config::units::Millis(0);

        assert_eq!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidSampleInterval))
        );
    }
}
