//! Builder for [`MotorController`].

use crate::clock::Clock;
use crate::config::{validate_config, DriveConfig, MechanicalConstraints, RpmLimits};
use crate::error::{ConfigError, Result};

use super::actuator::Actuator;
use super::controller::MotorController;
use super::load::LoadSampler;

/// Seed used for load telemetry when none is given.
pub const DEFAULT_LOAD_SEED: u64 = 0x5EED_0F_10AD;

/// Builder for creating MotorController instances.
pub struct MotorControllerBuilder<A, C>
where
    A: Actuator,
    C: Clock,
{
    actuator: Option<A>,
    clock: Option<C>,
    config: DriveConfig,
    seed: u64,
}

impl<A, C> Default for MotorControllerBuilder<A, C>
where
    A: Actuator,
    C: Clock,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, C> MotorControllerBuilder<A, C>
where
    A: Actuator,
    C: Clock,
{
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            actuator: None,
            clock: None,
            config: DriveConfig::default(),
            seed: DEFAULT_LOAD_SEED,
        }
    }

    /// Set the actuator.
    pub fn actuator(mut self, actuator: A) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// Set the clock.
    pub fn clock(mut self, clock: C) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a configuration (motor, speed limits, telemetry).
    pub fn config(mut self, config: &DriveConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Seed the load telemetry generator.
    pub fn load_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the controller in the Idle phase.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the actuator or clock is
    /// missing, or a validation error for an inconsistent configuration.
    pub fn build(self) -> Result<MotorController<A, C>> {
        let actuator = self.actuator.ok_or(ConfigError::MissingField("actuator"))?;
        let clock = self.clock.ok_or(ConfigError::MissingField("clock"))?;

        validate_config(&self.config)?;
        let limits = RpmLimits::from_config(&self.config.speed)?;
        let constraints = MechanicalConstraints::from_config(&self.config.motor);
        let load = LoadSampler::new(&self.config.telemetry, self.seed);

        Ok(MotorController::from_parts(actuator, clock, constraints, limits, load))
    }
}
