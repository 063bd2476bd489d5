//! Simulation harness: loader, program descriptions, and the run loop.

/// Program and data image placement.
pub mod loader;
/// Serde-deserializable program descriptions.
pub mod program;
/// The top-level simulator and run loop.
pub mod simulator;

pub use program::ProgramSpec;
pub use simulator::Simulator;
