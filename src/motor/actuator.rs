//! Actuator interface consumed by the controller.

use crate::error::Result;
use crate::motion::Direction;

/// How an actuator turns pulses into rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    /// Real pulses at the computed interval.
    #[default]
    Physical,
    /// No hardware: rotations are counted from wall-clock time.
    Simulated,
}

/// The only path from the controller to the motor driver.
pub trait Actuator {
    /// Set direction and enable the driver.
    fn arm(&mut self, direction: Direction) -> Result<()>;

    /// Disable the driver.
    fn disarm(&mut self) -> Result<()>;

    /// Emit one STEP pulse (one microstep).
    fn emit_pulse(&mut self) -> Result<()>;

    /// Which tick path the controller runs for this actuator.
    fn drive_mode(&self) -> DriveMode {
        DriveMode::Physical
    }
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    fn arm(&mut self, direction: Direction) -> Result<()> {
        (**self).arm(direction)
    }

    fn disarm(&mut self) -> Result<()> {
        (**self).disarm()
    }

    fn emit_pulse(&mut self) -> Result<()> {
        (**self).emit_pulse()
    }

    fn drive_mode(&self) -> DriveMode {
        (**self).drive_mode()
    }
}

/// Hardware-free actuator that records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct SimulatedActuator {
    mode: DriveMode,
    armed: bool,
    direction: Option<Direction>,
    pulses: u64,
    arm_count: u32,
}

impl SimulatedActuator {
    /// Actuator for hardware-free runs (coarse rotation simulation).
    pub fn new() -> Self {
        Self {
            mode: DriveMode::Simulated,
            ..Self::default()
        }
    }

    /// Actuator that takes part in pulse timing like real hardware, counting
    /// every pulse instead of driving a pin.
    pub fn pulse_counting() -> Self {
        Self {
            mode: DriveMode::Physical,
            ..Self::default()
        }
    }

    /// Whether the driver is currently enabled.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Direction of the last `arm`.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Pulses emitted since construction.
    #[inline]
    pub fn pulses(&self) -> u64 {
        self.pulses
    }

    /// How many times the driver was enabled.
    #[inline]
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }
}

impl Actuator for SimulatedActuator {
    fn arm(&mut self, direction: Direction) -> Result<()> {
        self.armed = true;
        self.direction = Some(direction);
        self.arm_count += 1;
        Ok(())
    }

    fn disarm(&mut self) -> Result<()> {
        self.armed = false;
        Ok(())
    }

    fn emit_pulse(&mut self) -> Result<()> {
        self.pulses += 1;
        Ok(())
    }

    fn drive_mode(&self) -> DriveMode {
        self.mode
    }
}

/// Actuator chosen once at startup: real hardware or simulation.
#[derive(Debug)]
pub enum DriveActuator<H> {
    /// Hardware actuator.
    Hardware(H),
    /// Simulated actuator.
    Simulated(SimulatedActuator),
}

impl<H: Actuator> DriveActuator<H> {
    /// Pick the simulated actuator when `simulate` is set, otherwise build
    /// the hardware one.
    pub fn select(simulate: bool, hardware: impl FnOnce() -> H) -> Self {
        if simulate {
            DriveActuator::Simulated(SimulatedActuator::new())
        } else {
            DriveActuator::Hardware(hardware())
        }
    }
}

impl<H: Actuator> Actuator for DriveActuator<H> {
    fn arm(&mut self, direction: Direction) -> Result<()> {
        match self {
            DriveActuator::Hardware(h) => h.arm(direction),
            DriveActuator::Simulated(s) => s.arm(direction),
        }
    }

    fn disarm(&mut self) -> Result<()> {
        match self {
            DriveActuator::Hardware(h) => h.disarm(),
            DriveActuator::Simulated(s) => s.disarm(),
        }
    }

    fn emit_pulse(&mut self) -> Result<()> {
        match self {
            DriveActuator::Hardware(h) => h.emit_pulse(),
            DriveActuator::Simulated(s) => s.emit_pulse(),
        }
    }

    fn drive_mode(&self) -> DriveMode {
        match self {
            DriveActuator::Hardware(h) => h.drive_mode(),
            DriveActuator::Simulated(s) => s.drive_mode(),
        }
    }
}
