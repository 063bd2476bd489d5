//! Tensor-accelerator execution core simulator library.
//!
//! This crate implements a cycle-level functional simulation of a tensor
//! accelerator's execution core with the following:
//! 1. **Core:** Four pipeline stages (fetch, load, compute, store) wired by a
//!    dependency-token protocol, with a launch/finish host handshake.
//! 2. **Memory:** Five read channels and one write channel, statically bound
//!    to stages, with pluggable fixed or row-buffer latency models.
//! 3. **ISA:** 128-bit instruction records with per-instruction dependency
//!    flags, stage-class demultiplexing, and a trace disassembler.
//! 4. **Simulation:** Loader, JSON program descriptions, configuration, and
//!    event/cycle counter collection.

/// Common types and constants (cycles, stage identity, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// The execution core (orchestrator, stages, streams, tokens, scratchpad).
pub mod core;
/// Host-facing control surface (base addresses, launch requests).
pub mod host;
/// Instruction set (record encoding, demultiplex, disassembly).
pub mod isa;
/// External memory surface (backing store, latency models, port channels).
pub mod mem;
/// Loader, program descriptions, and the run loop.
pub mod sim;
/// Event and cycle counter aggregation.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The execution core; holds stages, memory fabric, and counters.
pub use crate::core::Core;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
