//! Instruction fetch stage.
//!
//! Pulls the bounded instruction stream from external memory on its
//! statically assigned read channel, decodes the consuming stage of each
//! record, and pushes it into the matching typed queue. A full target queue
//! holds the head record in place (head-of-line blocking on the single
//! shared source channel); order within each stream is never disturbed.

use std::collections::VecDeque;

use crate::common::constants::INSN_WORDS;
use crate::common::{Cycle, StageId};
use crate::core::stream::StreamSet;
use crate::isa::disasm::disasm;
use crate::isa::{Instruction, StageClass};
use crate::mem::MemorySystem;
use crate::stats::EventCounters;

/// Fetch stage state.
#[derive(Debug)]
pub struct FetchStage {
    port: usize,
    burst: u16,
    base: u64,
    next_index: u32,
    remaining: u32,
    awaiting: bool,
    pending: VecDeque<Instruction>,
}

impl FetchStage {
    /// Creates an idle fetch stage bound to the given read channel.
    pub fn new(port: usize, burst: u16) -> Self {
        Self {
            port,
            burst,
            base: 0,
            next_index: 0,
            remaining: 0,
            awaiting: false,
            pending: VecDeque::new(),
        }
    }

    /// Latches the instruction-stream base address and count at launch.
    pub fn launch(&mut self, base: u64, count: u32) {
        self.base = base;
        self.next_index = 0;
        self.remaining = count;
        self.awaiting = false;
        self.pending.clear();
    }

    /// Advances the stage by one cycle.
    pub fn tick(
        &mut self,
        now: Cycle,
        mem: &mut MemorySystem,
        queues: &mut StreamSet,
        counters: &mut EventCounters,
    ) {
        let mut active = false;

        // Receive an outstanding burst.
        if self.awaiting {
            if let Some(words) = mem.poll_read(self.port, now) {
                for record in words.chunks_exact(INSN_WORDS as usize) {
                    let insn = Instruction::from_raw([record[0], record[1]]);
                    if insn.class().is_some() {
                        tracing::trace!(target: "tacsim", insn = %disasm(&insn), "fetched");
                        self.pending.push_back(insn);
                    } else {
                        tracing::warn!(
                            target: "tacsim",
                            raw0 = format_args!("{:#x}", record[0]),
                            "dropping reserved instruction encoding"
                        );
                    }
                }
                self.awaiting = false;
            }
            active = true;
        }

        // Demultiplex decoded records into the typed streams, in order.
        while let Some(insn) = self.pending.front() {
            let queue = match insn.class() {
                Some(StageClass::Load) => &mut queues.load,
                Some(StageClass::Compute) => &mut queues.compute,
                Some(StageClass::Store) => &mut queues.store,
                None => {
                    let _ = self.pending.pop_front();
                    continue;
                }
            };
            if !queue.push(*insn) {
                break;
            }
            let _ = self.pending.pop_front();
            active = true;
        }

        // Request the next burst once the previous one is fully dispatched.
        if !self.awaiting && self.pending.is_empty() && self.remaining > 0 {
            let count = u32::from(self.burst).min(self.remaining);
            let addr = self.base + u64::from(self.next_index) * INSN_WORDS;
            let issued = mem.issue_read(self.port, now, addr, (count as u16) * (INSN_WORDS as u16));
            debug_assert!(issued, "fetch channel busy with no burst outstanding");
            if issued {
                self.awaiting = true;
                self.next_index += count;
                self.remaining -= count;
                active = true;
            }
        }

        if active {
            counters.count_active(StageId::Fetch);
        }
    }
}
