//! Result store stage.
//!
//! Consumes the store-typed instruction stream and drains the result
//! scratchpad region to external memory, one burst per instruction.
//! Dependency gating: `pop_prev` takes Compute's result-ready credit before
//! the transfer begins; `push_prev` posts the slot-free credit back to
//! Compute once the write has been acknowledged.

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

/// Store stage state.
#[derive(Debug)]
pub struct StoreStage {
    port: usize,
    out_base: u64,
    phase: Phase,
    current: Option<Instruction>,
    /// Start edge emitted this cycle (diagnostics only).
    pub start_pulse: bool,
    /// Done edge emitted this cycle (diagnostics only).
    pub done_pulse: bool,
}

impl StoreStage {
    /// Creates an idle store stage bound to the write channel.
    pub fn new(port: usize) -> Self {
        Self {
            port,
            out_base: 0,
            phase: Phase::Idle,
            current: None,
            start_pulse: false,
            done_pulse: false,
        }
    }

    /// Latches the result region base address at launch.
    pub fn launch(&mut self, out_base: u64) {
        self.out_base = out_base;
        self.phase = Phase::Idle;
        self.current = None;
        self.start_pulse = false;
        self.done_pulse = false;
    }

    /// Advances the stage by one cycle.
    pub fn tick(
        &mut self,
        now: Cycle,
        mem: &mut MemorySystem,
        queue: &mut InsnQueue,
        tokens: &mut TokenSet,
        spad: &Scratchpad,
        counters: &mut EventCounters,
    ) {
        self.start_pulse = false;
        self.done_pulse = false;

        match self.phase {
            Phase::Idle => {
                let Some(insn) = queue.front().copied() else {
                    return;
                };
                // Dependency pop: wait for Compute's result-ready credit.
                if insn.deps().pop_prev && !tokens.g2s.available() {
                    return;
                }
                if insn.deps().pop_prev {
                    let _ = tokens.g2s.try_take();
                }
                let _ = queue.pop();
                let words = spad.read_burst(Region::Out, usize::from(insn.sram_base()), usize::from(insn.len()));
                let issued = mem.issue_write(
                    self.port,
                    now,
                    self.out_base + u64::from(insn.dram_offset()),
                    &words,
                );
                debug_assert!(issued, "store channel busy at dispatch");
                self.current = Some(insn);
                self.phase = Phase::Transfer;
                self.start_pulse = true;
                counters.count_active(StageId::Store);
            }
            Phase::Transfer => {
                counters.count_active(StageId::Store);
                if mem.poll_write_ack(self.port, now) {
                    self.done_pulse = true;
                    self.phase = Phase::Push;
                }
            }
            Phase::Push => {
                let Some(insn) = self.current else {
                    self.phase = Phase::Idle;
                    return;
                };
                // Dependency push: slot-free credit back toward Compute.
                if insn.deps().push_prev {
                    if !tokens.s2g.can_post() {
                        return;
                    }
                    tokens.s2g.post();
                }
                counters.count_retired(StageClass::Store);
                self.current = None;
                self.phase = Phase::Idle;
            }
        }
    }
}
