//! Command dispatch onto a controller.

use crate::clock::Clock;
use crate::error::Result;
use crate::motor::{Actuator, MotorController};

use super::command::Command;
use super::response::{Reply, StatusLine};

/// Apply `command` to `controller`.
///
/// Returns the line to send back, if the command has one. Starting a run has
/// no direct reply; its progress arrives later as tick events.
///
/// # Errors
///
/// Propagates start and stop failures from the controller.
pub fn dispatch<A, C>(controller: &mut MotorController<A, C>, command: Command) -> Result<Option<Reply>>
where
    A: Actuator,
    C: Clock,
{
    let reply = match command {
        Command::Hello => Some(Reply::Ready),
        Command::Hi => Some(Reply::HiReceived),
        Command::Run(request) => {
            controller.start(request)?;
            None
        }
        Command::Pause => {
            controller.pause();
            Some(Reply::Paused)
        }
        Command::PauseIfRunning => controller.pause().then_some(Reply::Paused),
        Command::Resume => controller.resume().then_some(Reply::Resumed),
        Command::Close => {
            controller.stop()?;
            Some(Reply::Closed)
        }
        Command::Status => Some(Reply::Status(StatusLine(controller.status()))),
    };
    Ok(reply)
}

/// Parse one input line and dispatch it.
///
/// # Errors
///
/// Returns a `ProtocolError` for an unparsable line, or whatever
/// [`dispatch`] returns.
pub fn handle_line<A, C>(controller: &mut MotorController<A, C>, line: &str) -> Result<Option<Reply>>
where
    A: Actuator,
    C: Clock,
{
    let command = Command::parse(line)?;
    log::debug!("Command: {:?}", command);
    dispatch(controller, command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::DriveConfig;
    use crate::motor::{Phase, SimulatedActuator};

    fn controller(clock: &ManualClock) -> MotorController<SimulatedActuator, &ManualClock> {
        let mut controller =
            MotorController::new(SimulatedActuator::new(), clock, &DriveConfig::default()).unwrap();
        controller.begin().unwrap();
        controller
    }

    #[test]
    fn test_handshake() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        assert_eq!(handle_line(&mut controller, "HELLO").unwrap(), Some(Reply::Ready));
        assert_eq!(handle_line(&mut controller, "HI").unwrap(), Some(Reply::HiReceived));
    }

    #[test]
    fn test_stop_always_replies() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        assert_eq!(handle_line(&mut controller, "STOP").unwrap(), Some(Reply::Paused));
        assert_eq!(handle_line(&mut controller, "STOPPED").unwrap(), None);
        assert_eq!(handle_line(&mut controller, "RELOAD").unwrap(), None);
    }

    #[test]
    fn test_run_pause_resume_close() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        assert_eq!(handle_line(&mut controller, "SPEED:16 ROT:2").unwrap(), None);
        assert_eq!(controller.phase(), Phase::RunningByCount);

        assert_eq!(handle_line(&mut controller, "STOPPED").unwrap(), Some(Reply::Paused));
        assert_eq!(handle_line(&mut controller, "STOPPED").unwrap(), None);
        assert_eq!(handle_line(&mut controller, "RELOAD").unwrap(), Some(Reply::Resumed));
        assert_eq!(handle_line(&mut controller, "CLOSE").unwrap(), Some(Reply::Closed));
        assert_eq!(controller.phase(), Phase::Stopped);

        let status = handle_line(&mut controller, "STATUS").unwrap().unwrap();
        assert_eq!(format!("{}", status), "STOPPED [TEST]");
    }

    #[test]
    fn test_run_refused_while_running() {
        let clock = ManualClock::new();
        let mut controller = controller(&clock);

        handle_line(&mut controller, "RPM:60 TIME:5").unwrap();
        assert!(handle_line(&mut controller, "RPM:60 ROT:1").is_err());
        assert_eq!(controller.phase(), Phase::RunningByDuration);
    }
}
