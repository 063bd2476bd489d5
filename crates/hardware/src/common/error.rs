//! Error types for elaboration and simulation control.
//!
//! The core itself has no recoverable runtime failures: an instruction either
//! completes deterministically or its stage stalls forever on an unsatisfied
//! dependency token, which surfaces as the finish signal never asserting.
//! Errors therefore split into two families:
//! 1. **[`ConfigError`]:** Malformed configuration, rejected once at build time.
//! 2. **[`SimError`]:** Harness-level conditions (bad launch, cycle budget, image placement).

use thiserror::Error;

/// Fatal configuration error detected at core elaboration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A size or depth field that the core requires to be non-zero.
    #[error("configuration field `{field}` must be non-zero")]
    ZeroField {
        /// Dotted path of the offending field.
        field: &'static str,
    },

    /// Memory latency of zero would make a response visible in its own
    /// request cycle, which the registered port protocol does not allow.
    #[error("memory latency must be at least one cycle")]
    ZeroLatency,

    /// Two stages were bound to the same read port.
    #[error("read port {port} bound to both `{first}` and `{second}`")]
    ReadPortConflict {
        /// The contested port index.
        port: usize,
        /// Stage already owning the port.
        first: &'static str,
        /// Stage attempting to claim it again.
        second: &'static str,
    },

    /// Two stages were bound to the same write port.
    #[error("write port {port} bound to both `{first}` and `{second}`")]
    WritePortConflict {
        /// The contested port index.
        port: usize,
        /// Stage already owning the port.
        first: &'static str,
        /// Stage attempting to claim it again.
        second: &'static str,
    },

    /// A port binding referenced a port index the memory fabric does not have.
    #[error("{dir} port {port} does not exist (fabric has {count})")]
    PortOutOfRange {
        /// `"read"` or `"write"`.
        dir: &'static str,
        /// The out-of-range index.
        port: usize,
        /// Number of ports the fabric provides.
        count: usize,
    },
}

/// Simulation harness error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// Launch was requested while a previous run is still in flight.
    #[error("launch requested while the core is {state}")]
    NotIdle {
        /// Human-readable core state at the time of the request.
        state: &'static str,
    },

    /// `run_to_finish` exhausted its cycle budget. This is how a permanently
    /// stalled token protocol (or a program without a finish instruction)
    /// becomes observable to the harness.
    #[error("no finish after {cycles} cycles (dependency stall or missing finish op)")]
    CycleBudgetExhausted {
        /// Cycles simulated before giving up.
        cycles: u64,
    },

    /// A program or data image does not fit in external memory.
    #[error("image of {words} words at word offset {base} exceeds memory of {mem_words} words")]
    ImageOutOfRange {
        /// Word offset where placement was attempted.
        base: u64,
        /// Image length in words.
        words: u64,
        /// Total memory size in words.
        mem_words: u64,
    },
}
