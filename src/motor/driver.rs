//! STEP/DIR/ENABLE pin actuator.
//!
//! Generic over embedded-hal 1.0 pin types, suited to TB6600-style drivers.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::{Micros, MotorConfig};
use crate::error::{MotorError, Result};
use crate::motion::Direction;

use super::actuator::Actuator;

/// Stepper driver wired through three output pins.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `EN`: ENABLE pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for the pulse width (must implement `DelayNs`)
pub struct PinActuator<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    /// STEP pin (pulse to move one microstep).
    step_pin: STEP,

    /// DIR pin (low = CW, high = CCW, or inverted).
    dir_pin: DIR,

    /// ENABLE pin.
    enable_pin: EN,

    /// Delay provider for pulse timing.
    delay: DELAY,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Whether the driver is enabled by a low level.
    enable_active_low: bool,

    /// STEP high time and trailing low time.
    pulse_width: Micros,
}

impl<STEP, DIR, EN, DELAY> PinActuator<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    /// Create an actuator with pin polarity and pulse width from `config`.
    ///
    /// Pins are not touched until the first `arm`/`disarm`.
    pub fn new(step_pin: STEP, dir_pin: DIR, enable_pin: EN, delay: DELAY, config: &MotorConfig) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            delay,
            current_direction: None,
            invert_direction: config.invert_direction,
            enable_active_low: config.enable_active_low,
            pulse_width: config.pulse_width,
        }
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (STEP, DIR, EN, DELAY) {
        (self.step_pin, self.dir_pin, self.enable_pin, self.delay)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Clockwise => self.invert_direction,
            Direction::CounterClockwise => !self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let pin_high = enabled != self.enable_active_low;
        if pin_high {
            self.enable_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.enable_pin.set_low().map_err(|_| MotorError::PinError)?;
        }
        Ok(())
    }
}

impl<STEP, DIR, EN, DELAY> Actuator for PinActuator<STEP, DIR, EN, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
    DELAY: DelayNs,
{
    fn arm(&mut self, direction: Direction) -> Result<()> {
        self.set_direction(direction)?;
        self.set_enabled(true)
    }

    fn disarm(&mut self) -> Result<()> {
        self.set_enabled(false)
    }

    fn emit_pulse(&mut self) -> Result<()> {
        let width = u32::try_from(self.pulse_width.0).unwrap_or(u32::MAX);

        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        // TB6600 needs at least 2.5 µs high
        self.delay.delay_us(width);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(width);

        Ok(())
    }
}
