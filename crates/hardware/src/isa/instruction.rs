//! The 128-bit instruction record.
//!
//! Layout (two little-endian 64-bit words):
//!
//! ```text
//! word0  [2:0]   opcode           load / store / gemm / finish / alu
//!        [3]     pop_prev         consume a token from the upstream neighbor
//!        [4]     pop_next         consume a token from the downstream neighbor
//!        [5]     push_prev        post a token to the upstream neighbor
//!        [6]     push_next        post a token to the downstream neighbor
//!        [9:7]   region           scratchpad/memory region (load/store only)
//!        [25:10] sram base        scratchpad element index
//!        [57:26] dram offset      word offset into the region's memory window
//! word1  [15:0]  len              transfer words / micro-op count / element count
//!        [31:16] src              alu: accumulator source base index
//!        [63:48] imm              alu: signed immediate
//! ```
//!
//! Everything outside these fields is reserved and ignored. The record is
//! immutable once built; stages never interpret fields that do not belong to
//! their class.

use serde::Deserialize;

/// Opcode field values.
pub mod opcodes {
    /// Operand or micro-op transfer from external memory.
    pub const LOAD: u64 = 0;
    /// Result transfer to external memory.
    pub const STORE: u64 = 1;
    /// Micro-op-driven multiply-accumulate over the scratchpad.
    pub const GEMM: u64 = 2;
    /// Marks program completion; at most one per program.
    pub const FINISH: u64 = 3;
    /// Element-wise operation producing the result region.
    pub const ALU: u64 = 4;
}

const OPCODE_MASK: u64 = 0x7;
const POP_PREV_BIT: u64 = 1 << 3;
const POP_NEXT_BIT: u64 = 1 << 4;
const PUSH_PREV_BIT: u64 = 1 << 5;
const PUSH_NEXT_BIT: u64 = 1 << 6;
const REGION_SHIFT: u64 = 7;
const REGION_MASK: u64 = 0x7;
const SRAM_SHIFT: u64 = 10;
const SRAM_MASK: u64 = 0xFFFF;
const DRAM_SHIFT: u64 = 26;
const DRAM_MASK: u64 = 0xFFFF_FFFF;
const LEN_MASK: u64 = 0xFFFF;
const SRC_SHIFT: u64 = 16;
const SRC_MASK: u64 = 0xFFFF;
const IMM_SHIFT: u64 = 48;

/// Decoded opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// Transfer into a scratchpad region.
    Load,
    /// Transfer out of the result region.
    Store,
    /// Micro-op-driven accumulate.
    Gemm,
    /// Program completion marker.
    Finish,
    /// Element-wise result production.
    Alu,
}

impl Opcode {
    /// Decodes the opcode field; `None` for reserved encodings.
    pub const fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            opcodes::LOAD => Some(Self::Load),
            opcodes::STORE => Some(Self::Store),
            opcodes::GEMM => Some(Self::Gemm),
            opcodes::FINISH => Some(Self::Finish),
            opcodes::ALU => Some(Self::Alu),
            _ => None,
        }
    }

    const fn to_bits(self) -> u64 {
        match self {
            Self::Load => opcodes::LOAD,
            Self::Store => opcodes::STORE,
            Self::Gemm => opcodes::GEMM,
            Self::Finish => opcodes::FINISH,
            Self::Alu => opcodes::ALU,
        }
    }
}

/// Scratchpad/memory region addressed by a transfer instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Micro-op buffer (consumed by Compute).
    Uop,
    /// Operand-weight buffer.
    Wgt,
    /// Operand-input buffer.
    Inp,
    /// Accumulator buffer.
    Acc,
    /// Result buffer (drained by Store).
    Out,
}

impl Region {
    /// Decodes the region field; `None` for reserved encodings.
    pub const fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(Self::Uop),
            1 => Some(Self::Wgt),
            2 => Some(Self::Inp),
            3 => Some(Self::Acc),
            4 => Some(Self::Out),
            _ => None,
        }
    }

    const fn to_bits(self) -> u64 {
        match self {
            Self::Uop => 0,
            Self::Wgt => 1,
            Self::Inp => 2,
            Self::Acc => 3,
            Self::Out => 4,
        }
    }

    /// Short lowercase name for disassembly and traces.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uop => "uop",
            Self::Wgt => "wgt",
            Self::Inp => "inp",
            Self::Acc => "acc",
            Self::Out => "out",
        }
    }
}

/// The stage that consumes an instruction.
///
/// Loads targeting the micro-op or accumulator buffers belong to Compute:
/// those transfers use Compute's own read ports and must interleave with its
/// execution, not with operand staging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageClass {
    /// Consumed by the Load stage.
    Load,
    /// Consumed by the Compute stage.
    Compute,
    /// Consumed by the Store stage.
    Store,
}

/// Per-instruction dependency-token actions.
///
/// `prev`/`next` are relative to the Load -> Compute -> Store chain: for Load
/// the downstream neighbor is Compute; for Compute the upstream neighbor is
/// Load and the downstream neighbor is Store; for Store the upstream
/// neighbor is Compute. Pops happen before the instruction body, pushes
/// after it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DepFlags {
    /// Consume a token from the upstream neighbor before executing.
    #[serde(default)]
    pub pop_prev: bool,
    /// Consume a token from the downstream neighbor before executing.
    #[serde(default)]
    pub pop_next: bool,
    /// Post a token to the upstream neighbor after executing.
    #[serde(default)]
    pub push_prev: bool,
    /// Post a token to the downstream neighbor after executing.
    #[serde(default)]
    pub push_next: bool,
}

/// One fixed-width instruction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    raw: [u64; 2],
}

impl Instruction {
    /// Wraps two raw memory words as an instruction record.
    pub const fn from_raw(raw: [u64; 2]) -> Self {
        Self { raw }
    }

    /// The raw record, as stored in external memory.
    pub const fn raw(&self) -> [u64; 2] {
        self.raw
    }

    fn encode(opcode: Opcode, deps: DepFlags) -> u64 {
        let mut w = opcode.to_bits();
        if deps.pop_prev {
            w |= POP_PREV_BIT;
        }
        if deps.pop_next {
            w |= POP_NEXT_BIT;
        }
        if deps.push_prev {
            w |= PUSH_PREV_BIT;
        }
        if deps.push_next {
            w |= PUSH_NEXT_BIT;
        }
        w
    }

    /// Builds a transfer into a scratchpad region.
    pub fn load(region: Region, sram: u16, dram: u32, len: u16, deps: DepFlags) -> Self {
        let word0 = Self::encode(Opcode::Load, deps)
            | (region.to_bits() << REGION_SHIFT)
            | (u64::from(sram) << SRAM_SHIFT)
            | (u64::from(dram) << DRAM_SHIFT);
        Self {
            raw: [word0, u64::from(len)],
        }
    }

    /// Builds a transfer from the result region to external memory.
    pub fn store(sram: u16, dram: u32, len: u16, deps: DepFlags) -> Self {
        let word0 = Self::encode(Opcode::Store, deps)
            | (Region::Out.to_bits() << REGION_SHIFT)
            | (u64::from(sram) << SRAM_SHIFT)
            | (u64::from(dram) << DRAM_SHIFT);
        Self {
            raw: [word0, u64::from(len)],
        }
    }

    /// Builds a micro-op-driven accumulate over `uops` micro-ops starting at
    /// micro-op buffer index `uop_base`.
    pub fn gemm(uop_base: u16, uops: u16, deps: DepFlags) -> Self {
        let word0 = Self::encode(Opcode::Gemm, deps) | (u64::from(uop_base) << SRAM_SHIFT);
        Self {
            raw: [word0, u64::from(uops)],
        }
    }

    /// Builds an element-wise result production:
    /// `out[dst + i] = acc[src + i] + imm` for `i in 0..len`.
    pub fn alu(dst: u16, src: u16, len: u16, imm: i16, deps: DepFlags) -> Self {
        let word0 = Self::encode(Opcode::Alu, deps) | (u64::from(dst) << SRAM_SHIFT);
        let word1 = u64::from(len)
            | (u64::from(src) << SRC_SHIFT)
            | ((imm as u16 as u64) << IMM_SHIFT);
        Self { raw: [word0, word1] }
    }

    /// Builds the program completion marker.
    pub fn finish(deps: DepFlags) -> Self {
        Self {
            raw: [Self::encode(Opcode::Finish, deps), 0],
        }
    }

    /// Returns the same record with its dependency flags replaced.
    pub const fn with_deps(self, deps: DepFlags) -> Self {
        let cleared =
            self.raw[0] & !(POP_PREV_BIT | POP_NEXT_BIT | PUSH_PREV_BIT | PUSH_NEXT_BIT);
        let mut word0 = cleared;
        if deps.pop_prev {
            word0 |= POP_PREV_BIT;
        }
        if deps.pop_next {
            word0 |= POP_NEXT_BIT;
        }
        if deps.push_prev {
            word0 |= PUSH_PREV_BIT;
        }
        if deps.push_next {
            word0 |= PUSH_NEXT_BIT;
        }
        Self {
            raw: [word0, self.raw[1]],
        }
    }

    /// Decoded opcode; `None` for reserved encodings.
    pub const fn opcode(&self) -> Option<Opcode> {
        Opcode::from_bits(self.raw[0] & OPCODE_MASK)
    }

    /// Decoded region field; `None` for reserved encodings.
    pub const fn region(&self) -> Option<Region> {
        Region::from_bits((self.raw[0] >> REGION_SHIFT) & REGION_MASK)
    }

    /// Dependency-token actions carried by this record.
    pub const fn deps(&self) -> DepFlags {
        DepFlags {
            pop_prev: self.raw[0] & POP_PREV_BIT != 0,
            pop_next: self.raw[0] & POP_NEXT_BIT != 0,
            push_prev: self.raw[0] & PUSH_PREV_BIT != 0,
            push_next: self.raw[0] & PUSH_NEXT_BIT != 0,
        }
    }

    /// Scratchpad element index (transfer base, micro-op base, or ALU dest).
    pub const fn sram_base(&self) -> u16 {
        ((self.raw[0] >> SRAM_SHIFT) & SRAM_MASK) as u16
    }

    /// Word offset into the instruction's memory region window.
    pub const fn dram_offset(&self) -> u32 {
        ((self.raw[0] >> DRAM_SHIFT) & DRAM_MASK) as u32
    }

    /// Transfer length, micro-op count, or element count.
    pub const fn len(&self) -> u16 {
        (self.raw[1] & LEN_MASK) as u16
    }

    /// ALU accumulator source base index.
    pub const fn alu_src(&self) -> u16 {
        ((self.raw[1] >> SRC_SHIFT) & SRC_MASK) as u16
    }

    /// ALU signed immediate.
    pub const fn alu_imm(&self) -> i16 {
        (self.raw[1] >> IMM_SHIFT) as u16 as i16
    }

    /// The stage that consumes this record; `None` if the opcode (or, for a
    /// load, the region) is a reserved encoding.
    pub fn class(&self) -> Option<StageClass> {
        match self.opcode()? {
            Opcode::Store => Some(StageClass::Store),
            Opcode::Gemm | Opcode::Alu | Opcode::Finish => Some(StageClass::Compute),
            Opcode::Load => match self.region()? {
                Region::Uop | Region::Acc => Some(StageClass::Compute),
                Region::Inp | Region::Wgt | Region::Out => Some(StageClass::Load),
            },
        }
    }

    /// Whether this record carries the program finish marker.
    pub fn is_finish(&self) -> bool {
        self.opcode() == Some(Opcode::Finish)
    }
}

/// Packs a micro-op word: accumulator, input, and weight element indices.
pub const fn pack_uop(acc: u16, inp: u16, wgt: u16) -> u64 {
    acc as u64 | ((inp as u64) << 16) | ((wgt as u64) << 32)
}

/// Unpacks a micro-op word into (accumulator, input, weight) indices.
pub const fn unpack_uop(word: u64) -> (u16, u16, u16) {
    (word as u16, (word >> 16) as u16, (word >> 32) as u16)
}
