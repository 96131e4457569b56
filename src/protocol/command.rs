//! Command parsing.

use crate::config::Millis;
use crate::error::{clipped, ProtocolError, Result};
use crate::motion::{Direction, MotionRequest, Speed};

/// One parsed command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `HELLO`: handshake.
    Hello,
    /// `HI`: acknowledge.
    Hi,
    /// `SPEED:`/`RPM:` with `ROT:` or `TIME:`: start a run.
    Run(MotionRequest),
    /// `STOP`: pause, always answered.
    Pause,
    /// `STOPPED`: pause, answered only if a run was paused.
    PauseIfRunning,
    /// `RELOAD`: resume a paused run.
    Resume,
    /// `CLOSE`: stop and disable the driver.
    Close,
    /// `STATUS`: report a status line.
    Status,
}

impl Command {
    /// Parse a line. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownCommand` for anything outside the vocabulary
    /// - `ProtocolError::InvalidNumber` for a malformed numeric field
    /// - `ProtocolError::MissingField` for a run without `ROT:` or `TIME:`
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        match line {
            "HELLO" => return Ok(Command::Hello),
            "HI" => return Ok(Command::Hi),
            "STOP" => return Ok(Command::Pause),
            "STOPPED" => return Ok(Command::PauseIfRunning),
            "RELOAD" => return Ok(Command::Resume),
            "CLOSE" => return Ok(Command::Close),
            "STATUS" => return Ok(Command::Status),
            _ => {}
        }

        if let Some(rest) = line.strip_prefix("SPEED:") {
            parse_run(rest, Speed::Level).map(Command::Run)
        } else if let Some(rest) = line.strip_prefix("RPM:") {
            parse_run(rest, Speed::Rpm).map(Command::Run)
        } else {
            Err(ProtocolError::UnknownCommand(clipped(line)).into())
        }
    }
}

enum Target {
    Rotations(u32),
    Seconds(u64),
}

/// Parse `<speed> ROT:<n>|TIME:<s> [DIR:<d>]`, the part after the speed tag.
fn parse_run(rest: &str, speed: fn(i32) -> Speed) -> Result<MotionRequest> {
    let mut fields = rest.split_whitespace();
    let speed = speed(number(fields.next().unwrap_or(""))?);

    let mut target = None;
    let mut direction = Direction::Clockwise;
    for field in fields {
        if let Some(value) = field.strip_prefix("ROT:") {
            target = Some(Target::Rotations(number(value)?));
        } else if let Some(value) = field.strip_prefix("TIME:") {
            target = Some(Target::Seconds(number(value)?));
        } else if let Some(value) = field.strip_prefix("DIR:") {
            direction = Direction::from_clockwise(value == "CW");
        } else {
            return Err(ProtocolError::UnknownCommand(clipped(field)).into());
        }
    }

    match target {
        Some(Target::Rotations(rotations)) => Ok(MotionRequest::rotations(speed, rotations, direction)),
        Some(Target::Seconds(secs)) => Ok(MotionRequest::duration(
            speed,
            Millis::from_secs(secs),
            direction,
        )),
        None => Err(ProtocolError::MissingField("ROT or TIME").into()),
    }
}

fn number<T: core::str::FromStr>(field: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(clipped(field)).into())
}
