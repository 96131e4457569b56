//! # stepper-runner
//!
//! Tick-driven single-axis stepper motor runner with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Two run modes**: a number of full rotations, or an amount of active time
//! - **Pause/resume**: paused time never counts toward a timed run
//! - **Non-blocking**: [`MotorController::tick`] emits at most one pulse per call
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR/ENABLE, `DelayNs` for the pulse width
//! - **Simulation**: a hardware-free actuator counts rotations from wall-clock time
//! - **Line protocol**: the serial command vocabulary (`RPM:60 ROT:2`, `STATUS`, ...)
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_runner::{DriveConfig, Direction, MotorController, PinActuator, Speed};
//!
//! let config: DriveConfig = stepper_runner::load_config("drive.toml")?;
//! let actuator = PinActuator::new(step_pin, dir_pin, enable_pin, delay, &config.motor);
//!
//! let mut motor = MotorController::new(actuator, clock, &config)?;
//! motor.begin()?;
//! motor.start_by_count(Speed::Rpm(60), 2, Direction::Clockwise)?;
//!
//! loop {
//!     for event in motor.tick()? {
//!         // TURN / DONE / LOAD
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and [`StdClock`]
//! - `defmt`: Enables defmt formatting for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Core modules
pub mod clock;
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod protocol;

// Re-exports for ergonomic API
pub use clock::{Clock, ManualClock};
pub use config::{validate_config, DriveConfig, MotorConfig, SpeedConfig, TelemetryConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionRequest, RunTarget, Speed};
pub use motor::{
    Actuator, DriveActuator, DriveMode, MotorController, MotorEvent, Phase, PinActuator,
    SimulatedActuator, Status,
};
pub use protocol::{Command, Reply};

#[cfg(feature = "std")]
pub use clock::StdClock;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Micros, Microsteps, Millis, Rpm};
