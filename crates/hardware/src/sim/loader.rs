//! Program and data image placement.
//!
//! Places encoded instruction records and operand images into the external
//! memory fabric before launch. Placement is checked against the memory
//! size once, here; stages trust the host-programmed windows afterwards.

use crate::common::SimError;
use crate::isa::Instruction;
use crate::mem::MemorySystem;

/// Encodes a program and places it at the given word offset.
///
/// # Errors
///
/// Returns [`SimError::ImageOutOfRange`] if the encoded program does not fit.
pub fn load_program(
    mem: &mut MemorySystem,
    base: u64,
    insns: &[Instruction],
) -> Result<(), SimError> {
    let words: Vec<u64> = insns.iter().flat_map(|insn| insn.raw()).collect();
    mem.load_words(base, &words)
}

/// Places a data image at the given word offset.
///
/// # Errors
///
/// Returns [`SimError::ImageOutOfRange`] if the image does not fit.
pub fn load_data(mem: &mut MemorySystem, base: u64, words: &[u64]) -> Result<(), SimError> {
    mem.load_words(base, words)
}
