//! Motor module for stepper-runner.
//!
//! Provides the tick-driven controller, the actuator seam with its hardware
//! and simulated implementations, and the status/telemetry types.

mod actuator;
mod builder;
mod controller;
mod driver;
mod load;
pub mod state;
mod status;

pub use actuator::{Actuator, DriveActuator, DriveMode, SimulatedActuator};
pub use builder::{MotorControllerBuilder, DEFAULT_LOAD_SEED};
pub use controller::MotorController;
pub use driver::PinActuator;
pub use load::{LoadSample, LoadSampler};
pub use state::{MotorState, Phase};
pub use status::{MotorEvent, Progress, Status, TickEvents};
