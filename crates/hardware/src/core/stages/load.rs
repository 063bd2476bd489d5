//! Operand load stage.
//!
//! Consumes the load-typed instruction stream and fills the operand-input
//! and operand-weight scratchpad regions from external memory, one burst
//! per instruction. Dependency gating: `pop_next` takes a Compute credit
//! (the previous operand generation was consumed) before the transfer
//! begins; `push_next` posts the operands-ready credit after the data has
//! landed.

use crate::common::{Cycle, StageId};
use crate::core::scratchpad::Scratchpad;
use crate::core::stream::InsnQueue;
use crate::core::tokens::TokenSet;
use crate::isa::{Instruction, Region, StageClass};
use crate::mem::MemorySystem;
use crate::stats::EventCounters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Transfer,
    Push,
}

/// Load stage state.
#[derive(Debug)]
pub struct LoadStage {
    inp_port: usize,
    wgt_port: usize,
    inp_base: u64,
    wgt_base: u64,
    phase: Phase,
    current: Option<Instruction>,
    /// Start edge emitted this cycle (diagnostics only).
    pub start_pulse: bool,
    /// Done edge emitted this cycle (diagnostics only).
    pub done_pulse: bool,
}

impl LoadStage {
    /// Creates an idle load stage bound to its two read channels.
    pub fn new(inp_port: usize, wgt_port: usize) -> Self {
        Self {
            inp_port,
            wgt_port,
            inp_base: 0,
            wgt_base: 0,
            phase: Phase::Idle,
            current: None,
            start_pulse: false,
            done_pulse: false,
        }
    }

    /// Latches the operand region base addresses at launch.
    pub fn launch(&mut self, inp_base: u64, wgt_base: u64) {
        self.inp_base = inp_base;
        self.wgt_base = wgt_base;
        self.phase = Phase::Idle;
        self.current = None;
        self.start_pulse = false;
        self.done_pulse = false;
    }

    fn channel(&self, region: Region) -> (usize, u64) {
        if region == Region::Wgt {
            (self.wgt_port, self.wgt_base)
        } else {
            (self.inp_port, self.inp_base)
        }
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
            Phase::Idle => {
                let Some(insn) = queue.front().copied() else {
                    return;
                };
                // Dependency pop: wait for Compute's buffer-reuse credit.
                if insn.deps().pop_next && !tokens.g2l.available() {
                    return;
                }
                let region = match insn.region() {
                    Some(region @ (Region::Inp | Region::Wgt)) => region,
                    // A load-class record naming any other region has no
                    // target here; retire it without a transfer.
                    _ => {
                        if insn.deps().pop_next {
                            let _ = tokens.g2l.try_take();
                        }
                        let _ = queue.pop();
                        self.current = Some(insn);
                        self.phase = Phase::Push;
                        return;
                    }
                };
                if insn.deps().pop_next {
                    let _ = tokens.g2l.try_take();
                }
                let _ = queue.pop();
                let (port, base) = self.channel(region);
                let issued = mem.issue_read(port, now, base + u64::from(insn.dram_offset()), insn.len());
                debug_assert!(issued, "load channel busy at dispatch");
                self.current = Some(insn);
                self.phase = Phase::Transfer;
                self.start_pulse = true;
                counters.count_active(StageId::Load);
            }
            Phase::Transfer => {
                counters.count_active(StageId::Load);
                let Some(insn) = self.current else {
                    self.phase = Phase::Idle;
                    return;
                };
                let (port, _) = self.channel(insn.region().unwrap_or(Region::Inp));
                if let Some(words) = mem.poll_read(port, now) {
                    if let Some(region) = insn.region() {
                        spad.write_burst(region, usize::from(insn.sram_base()), &words);
                    }
                    self.done_pulse = true;
                    self.phase = Phase::Push;
                }
            }
            Phase::Push => {
                let Some(insn) = self.current else {
                    self.phase = Phase::Idle;
                    return;
                };
                // Dependency push: operands-ready credit toward Compute.
                if insn.deps().push_next {
                    if !tokens.l2g.can_post() {
                        return;
                    }
                    tokens.l2g.post();
                }
                counters.count_retired(StageClass::Load);
                self.current = None;
                self.phase = Phase::Idle;
            }
        }
    }
}
