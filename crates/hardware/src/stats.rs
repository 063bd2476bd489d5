//! Event and cycle counter aggregation.
//!
//! This module tracks the host-visible performance telemetry of one run. It
//! provides:
//! 1. **Arming and latching:** Counters reset and start at launch, freeze at finish.
//! 2. **Stage activity:** Per-stage active-cycle counts and total running cycles.
//! 3. **Events:** Accumulator-write pulses and retired-instruction mix.
//! 4. **Reporting:** A formatted summary printer.

use std::time::Instant;

use crate::common::StageId;
use crate::isa::StageClass;

/// Aggregated event and cycle counters for one run.
///
/// All counters are monotonically non-decreasing while armed, reset to zero
/// at each launch, and frozen from the latch edge until the next launch.
/// Host reads are valid at any time.
#[derive(Clone, Debug)]
pub struct EventCounters {
    armed: bool,
    start_time: Instant,

    /// Cycles elapsed while the core was running.
    pub cycles: u64,

    /// Cycles the fetch stage spent requesting or draining instructions.
    pub fetch_active: u64,
    /// Cycles the load stage spent actively transferring operands.
    pub load_active: u64,
    /// Cycles the compute stage spent transferring or executing micro-ops.
    pub compute_active: u64,
    /// Cycles the store stage spent actively transferring results.
    pub store_active: u64,

    /// Accumulator-write event pulses from the compute stage.
    pub acc_writes: u64,

    /// Instructions retired by the load stage.
    pub insn_load: u64,
    /// Instructions retired by the compute stage.
    pub insn_compute: u64,
    /// Instructions retired by the store stage.
    pub insn_store: u64,
}

impl Default for EventCounters {
    fn default() -> Self {
        Self {
            armed: false,
            start_time: Instant::now(),
            cycles: 0,
            fetch_active: 0,
            load_active: 0,
            compute_active: 0,
            store_active: 0,
            acc_writes: 0,
            insn_load: 0,
            insn_compute: 0,
            insn_store: 0,
        }
    }
}

impl EventCounters {
    /// Arms the counters: resets everything to zero and starts counting.
    pub fn arm(&mut self) {
        *self = Self {
            armed: true,
            start_time: Instant::now(),
            ..Self::default()
        };
    }

    /// Latches the counters: freezes all values until the next arm.
    pub fn latch(&mut self) {
        self.armed = false;
    }

    /// Whether the counters are currently armed (counting).
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Counts one running cycle.
    pub fn count_cycle(&mut self) {
        if self.armed {
            self.cycles += 1;
        }
    }

    /// Counts one active cycle for the given stage.
    pub fn count_active(&mut self, stage: StageId) {
        if !self.armed {
            return;
        }
        match stage {
            StageId::Fetch => self.fetch_active += 1,
            StageId::Load => self.load_active += 1,
            StageId::Compute => self.compute_active += 1,
            StageId::Store => self.store_active += 1,
        }
    }

    /// Counts one accumulator-write event pulse.
    pub fn count_acc_write(&mut self) {
        if self.armed {
            self.acc_writes += 1;
        }
    }

    /// Counts one retired instruction for the given consumer class.
    pub fn count_retired(&mut self, class: StageClass) {
        if !self.armed {
            return;
        }
        match class {
            StageClass::Load => self.insn_load += 1,
            StageClass::Compute => self.insn_compute += 1,
            StageClass::Store => self.insn_store += 1,
        }
    }

    /// Total retired instructions across all stages.
    pub const fn insns_retired(&self) -> u64 {
        self.insn_load + self.insn_compute + self.insn_store
    }

    /// Prints a formatted summary of all counters to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        println!("\n==========================================================");
        println!("TENSOR CORE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("sim_insts                {}", self.insns_retired());
        println!("----------------------------------------------------------");
        println!("STAGE ACTIVITY");
        let pct = |active: u64| (active as f64 / cyc as f64) * 100.0;
        println!(
            "  fetch.active           {} ({:.2}%)",
            self.fetch_active,
            pct(self.fetch_active)
        );
        println!(
            "  load.active            {} ({:.2}%)",
            self.load_active,
            pct(self.load_active)
        );
        println!(
            "  compute.active         {} ({:.2}%)",
            self.compute_active,
            pct(self.compute_active)
        );
        println!(
            "  store.active           {} ({:.2}%)",
            self.store_active,
            pct(self.store_active)
        );
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        let instr = if self.insns_retired() == 0 {
            1
        } else {
            self.insns_retired()
        };
        let mix = |n: u64| (n as f64 / instr as f64) * 100.0;
        println!(
            "  op.load                {} ({:.2}%)",
            self.insn_load,
            mix(self.insn_load)
        );
        println!(
            "  op.compute             {} ({:.2}%)",
            self.insn_compute,
            mix(self.insn_compute)
        );
        println!(
            "  op.store               {} ({:.2}%)",
            self.insn_store,
            mix(self.insn_store)
        );
        println!("----------------------------------------------------------");
        println!("EVENTS");
        println!("  acc.writes             {}", self.acc_writes);
        println!("==========================================================");
    }
}
