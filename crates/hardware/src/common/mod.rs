//! Common types and constants shared across the simulator.
//!
//! This module provides:
//! 1. **Constants:** Port indices, word and record widths.
//! 2. **Errors:** Elaboration-time and harness-level error types.
//! 3. **Stage identity:** The [`StageId`] tag used for port ownership and telemetry.

/// Fixed hardware parameters (port indices, record widths).
pub mod constants;
/// Configuration and simulation error types.
pub mod error;

pub use error::{ConfigError, SimError};

/// Discrete simulation time, counted in core clock cycles.
pub type Cycle = u64;

/// Identifies one of the four pipeline stages.
///
/// Used for static port ownership, counter attribution, and trace tagging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Instruction fetch and demultiplex.
    Fetch,
    /// Operand transfers from external memory.
    Load,
    /// Micro-op execution over the scratchpad.
    Compute,
    /// Result transfers to external memory.
    Store,
}

impl StageId {
    /// Short lowercase name for telemetry and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Load => "load",
            Self::Compute => "compute",
            Self::Store => "store",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
