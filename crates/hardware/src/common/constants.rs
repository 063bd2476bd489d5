//! Fixed hardware parameters of the execution core.
//!
//! These describe the physical shape of the core (port counts, record widths)
//! and are not configurable: the memory fabric exposes exactly five read
//! channels and one write channel, statically bound to stages.

/// Width of one external memory word in bytes.
pub const WORD_BYTES: u64 = 8;

/// Number of 64-bit words in one instruction record.
pub const INSN_WORDS: u64 = 2;

/// Number of independent external read channels.
pub const NUM_READ_PORTS: usize = 5;

/// Number of independent external write channels.
pub const NUM_WRITE_PORTS: usize = 1;

/// Read port carrying the instruction stream (owned by Fetch).
pub const PORT_INSN: usize = 0;

/// Read port carrying micro-op transfers (owned by Compute).
pub const PORT_UOP: usize = 1;

/// Read port carrying operand-input transfers (owned by Load).
pub const PORT_INP: usize = 2;

/// Read port carrying operand-weight transfers (owned by Load).
pub const PORT_WGT: usize = 3;

/// Read port carrying accumulator reloads (owned by Compute).
pub const PORT_ACC: usize = 4;

/// Write port carrying result transfers (owned by Store).
pub const PORT_OUT: usize = 0;
