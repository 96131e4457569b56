//! Configuration module for stepper-runner.
//!
//! Provides types for loading and validating the motor, speed and telemetry
//! configuration from TOML files (with `std` feature) or built in code.

mod limits;
mod mechanical;
mod motor;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use limits::{RpmBand, RpmLimits};
pub use mechanical::{MechanicalConstraints, MICROS_PER_MINUTE};
pub use motor::MotorConfig;
pub use system::{DriveConfig, SpeedConfig, TelemetryConfig};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Micros, Microsteps, Millis, Rpm};
