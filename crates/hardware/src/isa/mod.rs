//! Instruction set for the execution core.
//!
//! Instructions are fixed-width 128-bit records produced by the host-side
//! program author, fetched by the core, and consumed exactly once by one of
//! the Load, Compute, or Store stages. This module provides:
//! 1. **Record:** Encoding, decoding, and constructors ([`Instruction`]).
//! 2. **Demultiplex:** Mapping a record to its consuming stage ([`StageClass`]).
//! 3. **Disassembly:** One-line rendering for debug tracing and diagnostics.

/// One-line instruction rendering for trace output.
pub mod disasm;
/// The 128-bit instruction record and its field layout.
pub mod instruction;

pub use instruction::{DepFlags, Instruction, Opcode, Region, StageClass};
