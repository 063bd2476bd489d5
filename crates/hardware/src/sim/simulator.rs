//! Simulator: owns the core and drives the outer run loop.

use crate::common::{ConfigError, SimError};
use crate::config::Config;
use crate::core::Core;
use crate::host::LaunchRequest;
use crate::sim::program::ProgramSpec;

/// Top-level simulator wrapping one execution core.
#[derive(Debug)]
pub struct Simulator {
    /// The execution core (stages, memory fabric, counters).
    pub core: Core,
}

impl Simulator {
    /// Elaborates a simulator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            core: Core::new(config)?,
        })
    }

    /// Places a program description and launches it.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if an image does not fit or the core is not
    /// idle.
    pub fn launch_program(&mut self, program: &ProgramSpec) -> Result<(), SimError> {
        program.load_into(self.core.mem_mut())?;
        self.core.launch(&program.launch_request())
    }

    /// Launches a pre-loaded program.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotIdle`] while a run is in flight.
    pub fn launch(&mut self, req: &LaunchRequest) -> Result<(), SimError> {
        self.core.launch(req)
    }

    /// Advances the simulation by one clock cycle.
    pub fn tick(&mut self) {
        self.core.tick();
    }

    /// Runs until the host-visible finish flag asserts.
    ///
    /// Returns the number of cycles simulated by this call.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CycleBudgetExhausted`] if finish does not assert
    /// within `max_cycles`. This is the observable form of a permanently stalled
    /// token protocol or a program with no finish instruction.
    pub fn run_to_finish(&mut self, max_cycles: u64) -> Result<u64, SimError> {
        for elapsed in 1..=max_cycles {
            self.core.tick();
            if self.core.finished() {
                return Ok(elapsed);
            }
        }
        Err(SimError::CycleBudgetExhausted { cycles: max_cycles })
    }
}
