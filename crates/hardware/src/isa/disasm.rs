//! Instruction disassembler.
//!
//! Renders one instruction record as a compact one-line string for debug
//! tracing, logging, and test diagnostics. Output is best-effort: reserved
//! encodings render as `.word`.

use crate::isa::instruction::{DepFlags, Instruction, Opcode};

fn dep_suffix(deps: DepFlags) -> String {
    let mut parts = Vec::new();
    if deps.pop_prev {
        parts.push("pop_prev");
    }
    if deps.pop_next {
        parts.push("pop_next");
    }
    if deps.push_prev {
        parts.push("push_prev");
    }
    if deps.push_next {
        parts.push("push_next");
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(","))
    }
}

/// Renders an instruction as a one-line string.
pub fn disasm(insn: &Instruction) -> String {
    let deps = dep_suffix(insn.deps());
    match insn.opcode() {
        Some(Opcode::Load) => {
            let region = insn.region().map_or("?", |r| r.name());
            format!(
                "load.{region} sram={} dram={} len={}{deps}",
                insn.sram_base(),
                insn.dram_offset(),
                insn.len()
            )
        }
        Some(Opcode::Store) => format!(
            "store sram={} dram={} len={}{deps}",
            insn.sram_base(),
            insn.dram_offset(),
            insn.len()
        ),
        Some(Opcode::Gemm) => format!("gemm uop={} n={}{deps}", insn.sram_base(), insn.len()),
        Some(Opcode::Alu) => format!(
            "alu dst={} src={} len={} imm={}{deps}",
            insn.sram_base(),
            insn.alu_src(),
            insn.len(),
            insn.alu_imm()
        ),
        Some(Opcode::Finish) => format!("finish{deps}"),
        None => {
            let raw = insn.raw();
            format!(".word {:#018x}:{:#018x}", raw[1], raw[0])
        }
    }
}
