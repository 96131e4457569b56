//! Motion module for stepper-runner.
//!
//! Provides motion requests, speed presets and run time accounting.

mod profile;
mod run_clock;
pub mod speed_table;

pub use profile::{Direction, MotionRequest, RunProfile, RunTarget, Speed};
pub use run_clock::RunClock;
pub use speed_table::{level_to_rpm, SpeedLevel, SPEED_DELAY_TABLE_US, SPEED_LEVELS};
