use tacsim_core::isa::{DepFlags, Instruction, Region};

/// Fluent builder for instruction programs.
///
/// Dependency-flag modifiers (`pop_prev`, `push_next`, ...) apply to the
/// most recently appended instruction.
pub struct ProgramBuilder {
    insns: Vec<Instruction>,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self { insns: Vec::new() }
    }

    pub fn push(mut self, insn: Instruction) -> Self {
        self.insns.push(insn);
        self
    }

    // --- Instruction constructors ---

    pub fn load_inp(self, sram: u16, dram: u32, len: u16) -> Self {
        self.push(Instruction::load(Region::Inp, sram, dram, len, DepFlags::default()))
    }

    pub fn load_wgt(self, sram: u16, dram: u32, len: u16) -> Self {
        self.push(Instruction::load(Region::Wgt, sram, dram, len, DepFlags::default()))
    }

    pub fn load_uop(self, sram: u16, dram: u32, len: u16) -> Self {
        self.push(Instruction::load(Region::Uop, sram, dram, len, DepFlags::default()))
    }

    pub fn load_acc(self, sram: u16, dram: u32, len: u16) -> Self {
        self.push(Instruction::load(Region::Acc, sram, dram, len, DepFlags::default()))
    }

    pub fn gemm(self, uop_base: u16, uops: u16) -> Self {
        self.push(Instruction::gemm(uop_base, uops, DepFlags::default()))
    }

    pub fn alu(self, dst: u16, src: u16, len: u16, imm: i16) -> Self {
        self.push(Instruction::alu(dst, src, len, imm, DepFlags::default()))
    }

    pub fn store(self, sram: u16, dram: u32, len: u16) -> Self {
        self.push(Instruction::store(sram, dram, len, DepFlags::default()))
    }

    pub fn finish(self) -> Self {
        self.push(Instruction::finish(DepFlags::default()))
    }

    // --- Dependency-flag modifiers for the last instruction ---

    fn map_last(mut self, f: impl FnOnce(&mut DepFlags)) -> Self {
        if let Some(last) = self.insns.pop() {
            let mut deps = last.deps();
            f(&mut deps);
            self.insns.push(last.with_deps(deps));
        }
        self
    }

    pub fn pop_prev(self) -> Self {
        self.map_last(|d| d.pop_prev = true)
    }

    pub fn pop_next(self) -> Self {
        self.map_last(|d| d.pop_next = true)
    }

    pub fn push_prev(self) -> Self {
        self.map_last(|d| d.push_prev = true)
    }

    pub fn push_next(self) -> Self {
        self.map_last(|d| d.push_next = true)
    }

    pub fn build(self) -> Vec<Instruction> {
        self.insns
    }
}
