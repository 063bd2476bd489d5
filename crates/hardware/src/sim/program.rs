//! Serde-deserializable program descriptions.
//!
//! A [`ProgramSpec`] is the JSON-facing form of one run: base-address
//! registers, optional operand/micro-op preloads, and the instruction list.
//! The CLI and integration tests assemble it into encoded records and a
//! launch request.

use serde::Deserialize;

use crate::common::SimError;
use crate::host::{BaseAddrs, LaunchRequest};
use crate::isa::instruction::pack_uop;
use crate::isa::{DepFlags, Instruction, Region};
use crate::mem::MemorySystem;
use crate::sim::loader;

/// One micro-op: accumulator, input, and weight element indices.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UopSpec {
    /// Accumulator element updated by this micro-op.
    pub acc: u16,
    /// Input element multiplied.
    pub inp: u16,
    /// Weight element multiplied.
    pub wgt: u16,
}

/// Operand and micro-op images preloaded into their memory windows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSpec {
    /// Micro-ops placed in the micro-op window.
    #[serde(default)]
    pub uop: Vec<UopSpec>,
    /// Words placed in the operand-input window.
    #[serde(default)]
    pub inp: Vec<u64>,
    /// Words placed in the operand-weight window.
    #[serde(default)]
    pub wgt: Vec<u64>,
    /// Words placed in the accumulator window.
    #[serde(default)]
    pub acc: Vec<u64>,
}

/// One instruction in JSON form.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InsnSpec {
    /// Transfer into a scratchpad region.
    Load {
        /// Target region.
        region: Region,
        /// Scratchpad base index.
        #[serde(default)]
        sram: u16,
        /// Word offset into the region window.
        #[serde(default)]
        dram: u32,
        /// Transfer length in words.
        len: u16,
        /// Dependency-token actions.
        #[serde(default)]
        deps: DepFlags,
    },
    /// Transfer from the result region to external memory.
    Store {
        /// Scratchpad base index.
        #[serde(default)]
        sram: u16,
        /// Word offset into the output window.
        #[serde(default)]
        dram: u32,
        /// Transfer length in words.
        len: u16,
        /// Dependency-token actions.
        #[serde(default)]
        deps: DepFlags,
    },
    /// Micro-op-driven accumulate.
    Gemm {
        /// Micro-op buffer base index.
        #[serde(default)]
        uop_base: u16,
        /// Micro-op count.
        uops: u16,
        /// Dependency-token actions.
        #[serde(default)]
        deps: DepFlags,
    },
    /// Element-wise result production.
    Alu {
        /// Result buffer destination base.
        #[serde(default)]
        dst: u16,
        /// Accumulator source base.
        #[serde(default)]
        src: u16,
        /// Element count.
        len: u16,
        /// Signed immediate added to each element.
        #[serde(default)]
        imm: i16,
        /// Dependency-token actions.
        #[serde(default)]
        deps: DepFlags,
    },
    /// Program completion marker.
    Finish {
        /// Dependency-token actions.
        #[serde(default)]
        deps: DepFlags,
    },
}

impl InsnSpec {
    /// Assembles this description into an encoded record.
    pub fn assemble(&self) -> Instruction {
        match *self {
            Self::Load {
                region,
                sram,
                dram,
                len,
                deps,
            } => Instruction::load(region, sram, dram, len, deps),
            Self::Store { sram, dram, len, deps } => Instruction::store(sram, dram, len, deps),
            Self::Gemm { uop_base, uops, deps } => Instruction::gemm(uop_base, uops, deps),
            Self::Alu {
                dst,
                src,
                len,
                imm,
                deps,
            } => Instruction::alu(dst, src, len, imm, deps),
            Self::Finish { deps } => Instruction::finish(deps),
        }
    }
}

/// A complete program description: windows, preloads, instructions.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramSpec {
    /// Base-address register values (defaults: disjoint windows).
    #[serde(default)]
    pub base: BaseAddrs,
    /// Data images preloaded before launch.
    #[serde(default)]
    pub data: DataSpec,
    /// The instruction list, in program order.
    #[serde(default)]
    pub insns: Vec<InsnSpec>,
}

impl ProgramSpec {
    /// Parses a JSON program description.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error for malformed JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Assembles the instruction list into encoded records.
    pub fn assemble(&self) -> Vec<Instruction> {
        self.insns.iter().map(InsnSpec::assemble).collect()
    }

    /// The launch request corresponding to this program.
    pub fn launch_request(&self) -> LaunchRequest {
        LaunchRequest {
            base: self.base,
            insn_count: self.insns.len() as u32,
        }
    }

    /// Places the program and all data images into the memory fabric.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ImageOutOfRange`] if any image does not fit.
    pub fn load_into(&self, mem: &mut MemorySystem) -> Result<(), SimError> {
        loader::load_program(mem, self.base.insn, &self.assemble())?;
        if !self.data.uop.is_empty() {
            let words: Vec<u64> = self
                .data
                .uop
                .iter()
                .map(|u| pack_uop(u.acc, u.inp, u.wgt))
                .collect();
            loader::load_data(mem, self.base.uop, &words)?;
        }
        if !self.data.inp.is_empty() {
            loader::load_data(mem, self.base.inp, &self.data.inp)?;
        }
        if !self.data.wgt.is_empty() {
            loader::load_data(mem, self.base.wgt, &self.data.wgt)?;
        }
        if !self.data.acc.is_empty() {
            loader::load_data(mem, self.base.acc, &self.data.acc)?;
        }
        Ok(())
    }
}
