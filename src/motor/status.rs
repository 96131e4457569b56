//! Status snapshots and tick events.

use crate::config::{Millis, Rpm};
use crate::motion::Direction;

use super::actuator::DriveMode;
use super::load::LoadSample;
use super::state::Phase;

/// Something the controller reports from a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorEvent {
    /// A full rotation finished; carries the completed count.
    Progress {
        /// Rotations completed so far in this run.
        rotations: u32,
    },
    /// The run reached its target.
    Completed,
    /// Periodic load telemetry.
    Load(LoadSample),
}

/// Events produced by one tick (at most load, progress and completion).
pub type TickEvents = heapless::Vec<MotorEvent, 4>;

/// Run progress, by target mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// No run to report.
    None,
    /// Count run.
    Rotations {
        /// Rotations completed.
        completed: u32,
        /// Rotations requested.
        target: u32,
    },
    /// Timed run.
    Duration {
        /// Active time so far.
        elapsed: Millis,
        /// Requested active time.
        target: Millis,
        /// Rotations completed so far.
        rotations: u32,
    },
}

/// Read-only snapshot of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// Current phase.
    pub phase: Phase,
    /// Speed of the last accepted run.
    pub rpm: Option<Rpm>,
    /// Direction of the last accepted run.
    pub direction: Direction,
    /// Progress toward the target.
    pub progress: Progress,
    /// Last load sample.
    pub load: Option<LoadSample>,
    /// Hardware or simulated drive.
    pub drive_mode: DriveMode,
}

impl Status {
    /// Whether a run is active or paused.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase.is_running() || self.phase == Phase::Paused
    }
}
