//! Compute stage.
//!
//! Consumes the compute-typed instruction stream: micro-op and accumulator
//! reloads (on its own two read channels), micro-op-driven accumulation,
//! element-wise result production, and the program finish marker.
//!
//! Dependency gating is symmetric toward both neighbors: `pop_prev` takes
//! Load's operands-ready credit, `pop_next` takes Store's slot-free credit;
//! after the body, `push_prev` posts the operand-buffer-reuse credit and
//! `push_next` the result-ready credit. Both pops must be satisfiable in
//! the same cycle before either is consumed.

use crate::common::{Cycle, StageId};
use crate::core::scratchpad::Scratchpad;
use crate::core::stream::InsnQueue;
use crate::core::tokens::TokenSet;
use crate::isa::instruction::unpack_uop;
use crate::isa::{Instruction, Opcode, Region, StageClass};
use crate::mem::MemorySystem;
use crate::stats::EventCounters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Transfer(Region),
    Exec,
    Push,
}

/// Compute stage state.
#[derive(Debug)]
pub struct ComputeStage {
    uop_port: usize,
    acc_port: usize,
    uop_base: u64,
    acc_base: u64,
    phase: Phase,
    current: Option<Instruction>,
    step: u16,
    finish: bool,
    /// Start edge emitted this cycle (diagnostics only).
    pub start_pulse: bool,
    /// Done edge emitted this cycle (diagnostics only).
    pub done_pulse: bool,
}

impl ComputeStage {
    /// Creates an idle compute stage bound to its two read channels.
    pub fn new(uop_port: usize, acc_port: usize) -> Self {
        Self {
            uop_port,
            acc_port,
            uop_base: 0,
            acc_base: 0,
            phase: Phase::Idle,
            current: None,
            step: 0,
            finish: false,
            start_pulse: false,
            done_pulse: false,
        }
    }

    /// Latches the micro-op and accumulator region bases at launch and
    /// clears the finish condition.
    pub fn launch(&mut self, uop_base: u64, acc_base: u64) {
        self.uop_base = uop_base;
        self.acc_base = acc_base;
        self.phase = Phase::Idle;
        self.current = None;
        self.step = 0;
        self.finish = false;
        self.start_pulse = false;
        self.done_pulse = false;
    }

    /// Whether the finish-marked instruction has been processed.
    pub const fn finished(&self) -> bool {
        self.finish
    }

    /// Advances the stage by one cycle.
    pub fn tick(
        &mut self,
        now: Cycle,
        mem: &mut MemorySystem,
        queue: &mut InsnQueue,
        tokens: &mut TokenSet,
        spad: &mut Scratchpad,
        counters: &mut EventCounters,
    ) {
        self.start_pulse = false;
        self.done_pulse = false;

        match self.phase {
            Phase::Idle => self.dispatch(now, mem, queue, tokens, counters),
            Phase::Transfer(region) => {
                counters.count_active(StageId::Compute);
                let port = if region == Region::Uop {
                    self.uop_port
                } else {
                    self.acc_port
                };
                if let Some(words) = mem.poll_read(port, now) {
                    let base = self.current.map_or(0, |insn| usize::from(insn.sram_base()));
                    spad.write_burst(region, base, &words);
                    self.done_pulse = true;
                    self.phase = Phase::Push;
                }
            }
            Phase::Exec => {
                counters.count_active(StageId::Compute);
                self.exec_step(spad, counters);
            }
            Phase::Push => self.retire(tokens, counters),
        }
    }

    /// Pops dependencies and starts the instruction at the stream head.
    fn dispatch(
        &mut self,
        now: Cycle,
        mem: &mut MemorySystem,
        queue: &mut InsnQueue,
        tokens: &mut TokenSet,
        counters: &mut EventCounters,
    ) {
        let Some(insn) = queue.front().copied() else {
            return;
        };
        let deps = insn.deps();
        // Both pops must be available before either credit is consumed.
        if deps.pop_prev && !tokens.l2g.available() {
            return;
        }
        if deps.pop_next && !tokens.s2g.available() {
            return;
        }
        if deps.pop_prev {
            let _ = tokens.l2g.try_take();
        }
        if deps.pop_next {
            let _ = tokens.s2g.try_take();
        }
        let _ = queue.pop();
        self.current = Some(insn);
        self.step = 0;
        self.start_pulse = true;
        counters.count_active(StageId::Compute);

        match insn.opcode() {
            Some(Opcode::Load) => {
                let (region, port, base) = if insn.region() == Some(Region::Acc) {
                    (Region::Acc, self.acc_port, self.acc_base)
                } else {
                    (Region::Uop, self.uop_port, self.uop_base)
                };
                let issued =
                    mem.issue_read(port, now, base + u64::from(insn.dram_offset()), insn.len());
                debug_assert!(issued, "compute channel busy at dispatch");
                self.phase = Phase::Transfer(region);
            }
            Some(Opcode::Gemm | Opcode::Alu) => {
                if insn.len() == 0 {
                    self.done_pulse = true;
                    self.phase = Phase::Push;
                } else {
                    self.phase = Phase::Exec;
                }
            }
            Some(Opcode::Finish) | Some(Opcode::Store) | None => {
                // Finish asserts the completion condition; anything else
                // reaching this stream is retired without effect. Retire in
                // the dispatch cycle; the core freezes one cycle later.
                if insn.is_finish() {
                    self.finish = true;
                    tracing::debug!(target: "tacsim", cycle = now, "finish op observed");
                }
                self.done_pulse = true;
                self.phase = Phase::Push;
                self.retire(tokens, counters);
            }
        }
    }

    /// Executes one micro-op or one element per cycle.
    fn exec_step(&mut self, spad: &mut Scratchpad, counters: &mut EventCounters) {
        let Some(insn) = self.current else {
            self.phase = Phase::Idle;
            return;
        };
        match insn.opcode() {
            Some(Opcode::Gemm) => {
                let uop_index = usize::from(insn.sram_base()) + usize::from(self.step);
                let (acc, inp, wgt) = unpack_uop(spad.read(Region::Uop, uop_index));
                let product = spad
                    .read(Region::Inp, usize::from(inp))
                    .wrapping_mul(spad.read(Region::Wgt, usize::from(wgt)));
                let sum = spad.read(Region::Acc, usize::from(acc)).wrapping_add(product);
                spad.write(Region::Acc, usize::from(acc), sum);
                counters.count_acc_write();
            }
            Some(Opcode::Alu) => {
                let src = usize::from(insn.alu_src()) + usize::from(self.step);
                let dst = usize::from(insn.sram_base()) + usize::from(self.step);
                let value = spad
                    .read(Region::Acc, src)
                    .wrapping_add_signed(i64::from(insn.alu_imm()));
                spad.write(Region::Out, dst, value);
            }
            _ => {}
        }
        self.step += 1;
        if self.step >= insn.len() {
            self.done_pulse = true;
            self.phase = Phase::Push;
        }
    }

    /// Posts outgoing credits and retires the current instruction.
    fn retire(&mut self, tokens: &mut TokenSet, counters: &mut EventCounters) {
        let Some(insn) = self.current else {
            self.phase = Phase::Idle;
            return;
        };
        let deps = insn.deps();
        // Both pushes must land in the same cycle; stall until there is room.
        if deps.push_prev && !tokens.g2l.can_post() {
            return;
        }
        if deps.push_next && !tokens.g2s.can_post() {
            return;
        }
        if deps.push_prev {
            tokens.g2l.post();
        }
        if deps.push_next {
            tokens.g2s.post();
        }
        counters.count_retired(StageClass::Compute);
        self.current = None;
        self.phase = Phase::Idle;
    }
}
