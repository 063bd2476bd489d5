//! The execution core: orchestrator, stages, streams, tokens, scratchpad.
//!
//! Control flow of one run: the host launches with a set of base addresses;
//! Fetch produces the typed instruction streams; Load, Compute, and Store
//! consume them under the dependency-token protocol; when Compute processes
//! the finish-marked instruction, the orchestrator registers the condition
//! and exposes it to the host one cycle later.

/// Orchestrator: wiring, tick order, launch/finish handshake.
pub mod engine;
/// On-core scratchpad regions.
pub mod scratchpad;
/// Pipeline stage state machines.
pub mod stages;
/// Typed bounded instruction streams.
pub mod stream;
/// Dependency-token channels.
pub mod tokens;

pub use engine::{Core, CoreState};
