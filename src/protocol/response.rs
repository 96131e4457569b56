//! Reply, event and status lines.

use core::fmt;

use crate::motor::{DriveMode, LoadSample, MotorEvent, Phase, Progress, Status};

/// Direct answer to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// `READY`
    Ready,
    /// `Hi_RECEIVED`
    HiReceived,
    /// `PAUSED`
    Paused,
    /// `RESUMED`
    Resumed,
    /// `CLOSED`
    Closed,
    /// A status line.
    Status(StatusLine),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ready => f.write_str("READY"),
            Reply::HiReceived => f.write_str("Hi_RECEIVED"),
            Reply::Paused => f.write_str("PAUSED"),
            Reply::Resumed => f.write_str("RESUMED"),
            Reply::Closed => f.write_str("CLOSED"),
            Reply::Status(line) => fmt::Display::fmt(line, f),
        }
    }
}

/// Line announcing a tick event: `TURN:3`, `DONE` or `LOAD:23.4%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLine(pub MotorEvent);

impl fmt::Display for EventLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            MotorEvent::Progress { rotations } => write!(f, "TURN:{}", rotations),
            MotorEvent::Completed => f.write_str("DONE"),
            MotorEvent::Load(sample) => write!(f, "LOAD:{}%", sample),
        }
    }
}

/// Status snapshot rendered as one line.
///
/// ```text
/// ROTATING RPM:60 COMPLETED:1/2 LOAD:23.4%
/// TIME_MODE RPM:60 ELAPSED:4s ROTATIONS:4 LOAD:23.4%
/// ```
///
/// A paused run keeps its line, with the elapsed time frozen. Simulated
/// drives append ` [TEST]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine(pub Status);

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = &self.0;
        let simulated = status.drive_mode == DriveMode::Simulated;
        let rpm = status.rpm.map_or(0, |rpm| rpm.value());
        let load = status.load.unwrap_or(LoadSample::from_tenths(0));

        // A paused run still reports under its run mode
        let label = match (status.phase, status.progress) {
            (Phase::RunningByCount, _) | (Phase::Paused, Progress::Rotations { .. }) => "ROTATING",
            (Phase::RunningByDuration, _) | (Phase::Paused, _) => "TIME_MODE",
            (Phase::Idle, _) => "IDLE",
            (Phase::Ready, _) if simulated => "TEST_MODE_READY",
            (Phase::Ready, _) => "READY",
            (Phase::Stopped, _) => "STOPPED",
            (Phase::Done, _) => "DONE",
        };
        f.write_str(label)?;

        if status.is_active() {
            match status.progress {
                Progress::Rotations { completed, target } => {
                    write!(f, " RPM:{} COMPLETED:{}/{}", rpm, completed, target)?;
                }
                Progress::Duration {
                    elapsed, rotations, ..
                } => {
                    write!(
                        f,
                        " RPM:{} ELAPSED:{}s ROTATIONS:{}",
                        rpm,
                        elapsed.as_secs(),
                        rotations
                    )?;
                }
                Progress::None => write!(f, " RPM:{}", rpm)?,
            }
            write!(f, " LOAD:{}%", load)?;
        }

        if simulated {
            f.write_str(" [TEST]")?;
        }
        Ok(())
    }
}
