//! Example: serial-style console on stdin/stdout.
//!
//! Announces itself with `ESP32 READY` every 200 ms for the first 3 s, then
//! reads command lines (`HELLO`, `RPM:60 ROT:2 DIR:CW`, `STOP`, `RELOAD`,
//! `CLOSE`, `STATUS`) from stdin and prints replies and run events, the same
//! way the firmware answers over its serial port.
//!
//! Run with: `cargo run --example serial_console -- [drive.toml]`
//!
//! Without a config file the drive runs simulated. Set `RUST_LOG=debug` to see
//! controller diagnostics on stderr.

use std::io::BufRead;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use stepper_runner::{
    config::{load_config, DriveConfig},
    error::Result,
    protocol::{handle_line, EventLine},
    Clock, DriveActuator, Millis, MotorController, PinActuator, StdClock,
};

const BANNER: &str = "ESP32 READY";
const BANNER_WINDOW: Millis = Millis::from_secs(3);
const BANNER_PERIOD: Millis = Millis::new(200);

/// Output pin that only exists on the host.
struct HostPin;

impl embedded_hal::digital::ErrorType for HostPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for HostPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Busy-wait delay; the pulse width is only a few microseconds.
struct SpinDelay;

impl embedded_hal::delay::DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let until = std::time::Instant::now() + std::time::Duration::from_nanos(ns as u64);
        while std::time::Instant::now() < until {
            std::hint::spin_loop();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => DriveConfig {
            simulate: true,
            ..DriveConfig::default()
        },
    };

    let actuator = DriveActuator::select(config.simulate, || {
        PinActuator::new(HostPin, HostPin, HostPin, SpinDelay, &config.motor)
    });
    let mut motor = MotorController::new(actuator, StdClock::new(), &config)?;
    motor.begin()?;

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut last_banner: Option<Millis> = None;
    loop {
        let now = motor.clock().now_millis();
        if now < BANNER_WINDOW && last_banner.map_or(true, |t| now.since(t) >= BANNER_PERIOD) {
            println!("{}", BANNER);
            last_banner = Some(now);
        }

        for event in motor.tick()? {
            println!("{}", EventLine(event));
        }

        match rx.try_recv() {
            Ok(line) => match handle_line(&mut motor, &line) {
                Ok(Some(reply)) => println!("{}", reply),
                Ok(None) => {}
                Err(e) => eprintln!("{}", e),
            },
            Err(TryRecvError::Empty) => thread::yield_now(),
            Err(TryRecvError::Disconnected) => break,
        }
    }

    motor.stop()
}
