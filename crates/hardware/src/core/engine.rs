//! Core orchestrator.
//!
//! Instantiates the four stages, the token channels, the typed streams, the
//! scratchpad, and the memory fabric; wires every dependency signal and
//! memory port; and drives the outer launch/finish handshake. The port
//! binding table is validated once at elaboration and never mutated.
//!
//! One [`Core::tick`] is one clock cycle. Stages advance in
//! consumer-before-producer order (Store, Compute, Load, Fetch) so a queue
//! push lands strictly after the same-cycle pops; the token channels are
//! registered and commit at the end of the cycle, so a credit posted in
//! cycle N is observable no earlier than N+1. The finish condition is
//! itself registered: the host sees it one cycle after Compute raises it,
//! after the cycle's counter updates have committed.

use crate::common::constants::{PORT_ACC, PORT_INP, PORT_INSN, PORT_OUT, PORT_UOP, PORT_WGT};
use crate::common::{ConfigError, Cycle, SimError};
use crate::config::Config;
use crate::core::scratchpad::Scratchpad;
use crate::core::stages::{ComputeStage, FetchStage, LoadStage, StoreStage};
use crate::core::stream::StreamSet;
use crate::core::tokens::TokenSet;
use crate::host::LaunchRequest;
use crate::mem::ports::PortMap;
use crate::mem::MemorySystem;
use crate::stats::EventCounters;

/// Outer execution state of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreState {
    /// No run in flight; launch accepted.
    Idle,
    /// A launched program is executing.
    Running,
    /// Finish has been exposed to the host; awaiting acknowledgment.
    Done,
}

impl CoreState {
    /// Short lowercase name for errors and traces.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

/// The execution core: four stages, token channels, streams, scratchpad,
/// memory fabric, and counters.
#[derive(Debug)]
pub struct Core {
    state: CoreState,
    cycle: Cycle,
    trace_edges: bool,

    mem: MemorySystem,
    ports: PortMap,
    queues: StreamSet,
    tokens: TokenSet,
    spad: Scratchpad,

    fetch: FetchStage,
    load: LoadStage,
    compute: ComputeStage,
    store: StoreStage,

    counters: EventCounters,

    /// Finish condition registered last cycle, exposed to the host this one.
    finish_pending: bool,
    finish_seen: bool,
    host_finish: bool,
}

impl Core {
    /// Elaborates the core from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration or the port binding
    /// table fails validation. This is the only point at which malformed
    /// configuration is reported; nothing is re-checked at runtime.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let ports = PortMap::core_default();
        ports.validate()?;

        Ok(Self {
            state: CoreState::Idle,
            cycle: 0,
            trace_edges: config.general.trace_edges,
            mem: MemorySystem::new(&config.memory),
            ports,
            queues: StreamSet::new(config.core.queue_depth),
            tokens: TokenSet::new(config.core.token_depth),
            spad: Scratchpad::new(&config.scratchpad),
            fetch: FetchStage::new(PORT_INSN, config.core.fetch_burst),
            load: LoadStage::new(PORT_INP, PORT_WGT),
            compute: ComputeStage::new(PORT_UOP, PORT_ACC),
            store: StoreStage::new(PORT_OUT),
            counters: EventCounters::default(),
            finish_pending: false,
            finish_seen: false,
            host_finish: false,
        })
    }

    /// Launches one program run.
    ///
    /// Forwards the base-address registers to their stages, resets streams,
    /// token channels, and scratchpad, and arms the counters. A degenerate
    /// launch with zero instructions completes on the next cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotIdle`] while a run is in flight.
    pub fn launch(&mut self, req: &LaunchRequest) -> Result<(), SimError> {
        if self.state == CoreState::Running {
            return Err(SimError::NotIdle {
                state: self.state.name(),
            });
        }
        self.queues.clear_all();
        self.tokens.reset_all();
        self.spad.reset();
        self.mem.reset_channels();

        self.fetch.launch(req.base.insn, req.insn_count);
        self.load.launch(req.base.inp, req.base.wgt);
        self.compute.launch(req.base.uop, req.base.acc);
        self.store.launch(req.base.out);

        self.counters.arm();
        self.host_finish = false;
        self.finish_seen = false;
        self.finish_pending = req.insn_count == 0;
        self.state = CoreState::Running;

        tracing::debug!(
            target: "tacsim",
            cycle = self.cycle,
            insn_count = req.insn_count,
            "launch"
        );
        Ok(())
    }

    /// Advances the core by one clock cycle.
    pub fn tick(&mut self) {
        self.cycle += 1;
        if self.state != CoreState::Running {
            return;
        }

        // Registered finish: expose to the host one cycle after the internal
        // condition, with all counter updates already committed.
        if self.finish_pending {
            self.finish_pending = false;
            self.host_finish = true;
            self.state = CoreState::Done;
            self.counters.latch();
            tracing::debug!(target: "tacsim", cycle = self.cycle, "finish");
            return;
        }

        let now = self.cycle;
        self.store.tick(
            now,
            &mut self.mem,
            &mut self.queues.store,
            &mut self.tokens,
            &self.spad,
            &mut self.counters,
        );
        self.compute.tick(
            now,
            &mut self.mem,
            &mut self.queues.compute,
            &mut self.tokens,
            &mut self.spad,
            &mut self.counters,
        );
        self.load.tick(
            now,
            &mut self.mem,
            &mut self.queues.load,
            &mut self.tokens,
            &mut self.spad,
            &mut self.counters,
        );
        self.fetch.tick(now, &mut self.mem, &mut self.queues, &mut self.counters);

        self.counters.count_cycle();
        self.forward_edges();
        self.tokens.commit_all();

        if self.compute.finished() && !self.finish_seen {
            self.finish_seen = true;
            self.finish_pending = true;
        }
    }

    /// Forwards stage start/done edges to the diagnostic surface.
    fn forward_edges(&self) {
        if !self.trace_edges {
            return;
        }
        let cycle = self.counters.cycles;
        for (stage, start, done) in [
            ("load", self.load.start_pulse, self.load.done_pulse),
            ("compute", self.compute.start_pulse, self.compute.done_pulse),
            ("store", self.store.start_pulse, self.store.done_pulse),
        ] {
            if start {
                tracing::debug!(target: "tacsim", stage, cycle, edge = "start");
            }
            if done {
                tracing::debug!(target: "tacsim", stage, cycle, edge = "done");
            }
        }
    }

    /// Current outer state.
    pub const fn state(&self) -> CoreState {
        self.state
    }

    /// Free-running cycle counter (not reset by launch).
    pub const fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Host-visible finish flag.
    pub const fn finished(&self) -> bool {
        self.host_finish
    }

    /// Host acknowledgment of finish; returns the core to idle.
    pub fn ack_finish(&mut self) {
        if self.state == CoreState::Done {
            self.state = CoreState::Idle;
            self.host_finish = false;
        }
    }

    /// Read-only counter access (valid at any time; frozen after finish).
    pub const fn counters(&self) -> &EventCounters {
        &self.counters
    }

    /// The validated static port binding table.
    pub const fn ports(&self) -> &PortMap {
        &self.ports
    }

    /// Memory fabric access, for loaders and result inspection.
    pub fn mem(&self) -> &MemorySystem {
        &self.mem
    }

    /// Mutable memory fabric access, for loaders.
    pub fn mem_mut(&mut self) -> &mut MemorySystem {
        &mut self.mem
    }

    /// Load-stage start/done pulses from the last cycle (diagnostics).
    pub const fn load_pulses(&self) -> (bool, bool) {
        (self.load.start_pulse, self.load.done_pulse)
    }

    /// Compute-stage start/done pulses from the last cycle (diagnostics).
    pub const fn compute_pulses(&self) -> (bool, bool) {
        (self.compute.start_pulse, self.compute.done_pulse)
    }

    /// Store-stage start/done pulses from the last cycle (diagnostics).
    pub const fn store_pulses(&self) -> (bool, bool) {
        (self.store.start_pulse, self.store.done_pulse)
    }
}
