//! Error types for stepper-runner.
//!
//! Provides unified error handling across configuration, motor control, motion
//! requests and the line protocol.

use core::fmt;

use crate::motor::Phase;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-runner operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor operation error
    Motor(MotorError),
    /// Motion request error
    Motion(MotionError),
    /// Line protocol error
    Protocol(ProtocolError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Steps per revolution must be non-zero
    InvalidStepsPerRevolution(u16),
    /// RPM range is empty or starts at zero
    InvalidRpmRange {
        /// Configured minimum RPM
        min: u16,
        /// Configured maximum RPM
        max: u16,
    },
    /// Optimal band is inverted
    InvalidOptimalBand {
        /// Lower edge of the band
        low: u16,
        /// Upper edge of the band
        high: u16,
    },
    /// Load band must satisfy 0 <= min < max <= 100
    InvalidLoadBand {
        /// Lower edge in percent
        min: f32,
        /// Upper edge in percent
        max: f32,
    },
    /// Load sample interval must be non-zero
    InvalidSampleInterval,
    /// A builder field was not provided
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// Motor is in wrong phase for requested operation
    InvalidState(Phase),
}

/// Motion request errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Speed level outside 1..=20
    InvalidSpeedLevel(i32),
}

/// Line protocol errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolError {
    /// Line did not match any known command
    UnknownCommand(heapless::String<32>),
    /// A numeric field could not be parsed
    InvalidNumber(heapless::String<32>),
    /// A required field is absent
    MissingField(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidRpmRange { min, max } => {
                write!(f, "Invalid RPM range: min ({}) must be > 0 and <= max ({})", min, max)
            }
            ConfigError::InvalidOptimalBand { low, high } => {
                write!(f, "Invalid optimal band: low ({}) must be <= high ({})", low, high)
            }
            ConfigError::InvalidLoadBand { min, max } => {
                write!(f, "Invalid load band: {}% - {}%", min, max)
            }
            ConfigError::InvalidSampleInterval => write!(f, "Load sample interval must be > 0"),
            ConfigError::MissingField(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::InvalidState(phase) => write!(f, "Invalid motor state: {}", phase.name()),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidSpeedLevel(level) => {
                write!(f, "Invalid speed level {}. Must be 1-20", level)
            }
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownCommand(line) => write!(f, "Unknown command: {}", line),
            ProtocolError::InvalidNumber(field) => write!(f, "Invalid number: {}", field),
            ProtocolError::MissingField(name) => write!(f, "Missing field: {}", name),
        }
    }
}

/// Copy `text` into a fixed-capacity string, dropping whatever does not fit.
pub(crate) fn clipped<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}
