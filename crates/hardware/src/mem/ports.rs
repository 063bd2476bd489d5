//! Memory port channels and the static port binding table.
//!
//! Each external memory channel is a request/response pair with one
//! outstanding transaction: a stage issues `(address, burst)` and the data
//! (or write ack) becomes visible after the channel's latency, never in the
//! issuing cycle. Ports are statically owned: the [`PortMap`] records which
//! stage drives which channel and is validated exactly once at elaboration,
//! then never mutated.

use crate::common::constants::{NUM_READ_PORTS, NUM_WRITE_PORTS};
use crate::common::{ConfigError, Cycle, StageId};
use crate::mem::dram::LatencyModel;

/// Direction of a port binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortDir {
    /// External memory read channel.
    Read,
    /// External memory write channel.
    Write,
}

/// One entry of the static port binding table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortBinding {
    /// Stage owning the port for the lifetime of every launch.
    pub stage: StageId,
    /// Port direction.
    pub dir: PortDir,
    /// Port index within its direction.
    pub port: usize,
}

/// The static port-to-stage binding table.
///
/// The canonical table is fixed by the core design; [`PortMap::validate`]
/// rejects any table in which a port has more than one owner or references
/// a channel the fabric does not have.
#[derive(Clone, Debug)]
pub struct PortMap {
    bindings: Vec<PortBinding>,
}

impl PortMap {
    /// The canonical binding table of this core:
    /// read 0 ← Fetch, read 1 ← Compute (micro-ops), reads 2,3 ← Load
    /// (input, weight), read 4 ← Compute (accumulator reload),
    /// write 0 ← Store.
    pub fn core_default() -> Self {
        use crate::common::constants::{PORT_ACC, PORT_INP, PORT_INSN, PORT_OUT, PORT_UOP, PORT_WGT};
        Self {
            bindings: vec![
                PortBinding { stage: StageId::Fetch, dir: PortDir::Read, port: PORT_INSN },
                PortBinding { stage: StageId::Compute, dir: PortDir::Read, port: PORT_UOP },
                PortBinding { stage: StageId::Load, dir: PortDir::Read, port: PORT_INP },
                PortBinding { stage: StageId::Load, dir: PortDir::Read, port: PORT_WGT },
                PortBinding { stage: StageId::Compute, dir: PortDir::Read, port: PORT_ACC },
                PortBinding { stage: StageId::Store, dir: PortDir::Write, port: PORT_OUT },
            ],
        }
    }

    /// Builds a table from explicit bindings (used by elaboration tests).
    pub const fn with_bindings(bindings: Vec<PortBinding>) -> Self {
        Self { bindings }
    }

    /// Validates single ownership and port ranges.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first conflicting or
    /// out-of-range binding.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut read_owner: [Option<StageId>; NUM_READ_PORTS] = [None; NUM_READ_PORTS];
        let mut write_owner: [Option<StageId>; NUM_WRITE_PORTS] = [None; NUM_WRITE_PORTS];

        for binding in &self.bindings {
            match binding.dir {
                PortDir::Read => {
                    if binding.port >= NUM_READ_PORTS {
                        return Err(ConfigError::PortOutOfRange {
                            dir: "read",
                            port: binding.port,
                            count: NUM_READ_PORTS,
                        });
                    }
                    if let Some(first) = read_owner[binding.port] {
                        return Err(ConfigError::ReadPortConflict {
                            port: binding.port,
                            first: first.name(),
                            second: binding.stage.name(),
                        });
                    }
                    read_owner[binding.port] = Some(binding.stage);
                }
                PortDir::Write => {
                    if binding.port >= NUM_WRITE_PORTS {
                        return Err(ConfigError::PortOutOfRange {
                            dir: "write",
                            port: binding.port,
                            count: NUM_WRITE_PORTS,
                        });
                    }
                    if let Some(first) = write_owner[binding.port] {
                        return Err(ConfigError::WritePortConflict {
                            port: binding.port,
                            first: first.name(),
                            second: binding.stage.name(),
                        });
                    }
                    write_owner[binding.port] = Some(binding.stage);
                }
            }
        }
        Ok(())
    }

    /// Stage owning the given read port, if bound.
    pub fn read_owner(&self, port: usize) -> Option<StageId> {
        self.bindings
            .iter()
            .find(|b| b.dir == PortDir::Read && b.port == port)
            .map(|b| b.stage)
    }

    /// Stage owning the given write port, if bound.
    pub fn write_owner(&self, port: usize) -> Option<StageId> {
        self.bindings
            .iter()
            .find(|b| b.dir == PortDir::Write && b.port == port)
            .map(|b| b.stage)
    }

    /// All bindings, in table order.
    pub fn bindings(&self) -> &[PortBinding] {
        &self.bindings
    }
}

#[derive(Debug)]
struct PendingRead {
    ready_at: Cycle,
    data: Vec<u64>,
}

/// One external read channel with a single outstanding transaction.
#[derive(Debug)]
pub struct ReadChannel {
    model: Box<dyn LatencyModel>,
    pending: Option<PendingRead>,
}

impl ReadChannel {
    /// Creates a read channel with the given latency model.
    pub fn new(model: Box<dyn LatencyModel>) -> Self {
        Self { model, pending: None }
    }

    /// Whether a transaction is in flight.
    pub const fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Accepts a request whose data was sampled from the backing store.
    /// Returns `false` without side effects if the channel is busy.
    pub fn issue(&mut self, now: Cycle, addr: u64, data: Vec<u64>) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let latency = self.model.access_latency(addr).max(1) + data.len() as u64;
        self.pending = Some(PendingRead {
            ready_at: now + latency,
            data,
        });
        true
    }

    /// Returns the response data once its ready cycle has been reached.
    pub fn poll(&mut self, now: Cycle) -> Option<Vec<u64>> {
        if self.pending.as_ref().is_some_and(|p| p.ready_at <= now) {
            self.pending.take().map(|p| p.data)
        } else {
            None
        }
    }

    /// Drops any in-flight transaction.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

/// One external write channel with a single outstanding transaction.
///
/// Data is committed to the backing store at issue; the ack models the
/// cycles until the transfer has drained.
#[derive(Debug)]
pub struct WriteChannel {
    model: Box<dyn LatencyModel>,
    ack_at: Option<Cycle>,
}

impl WriteChannel {
    /// Creates a write channel with the given latency model.
    pub fn new(model: Box<dyn LatencyModel>) -> Self {
        Self { model, ack_at: None }
    }

    /// Whether a transaction is in flight.
    pub const fn busy(&self) -> bool {
        self.ack_at.is_some()
    }

    /// Accepts a write of `words` words at the given address. Returns
    /// `false` without side effects if the channel is busy.
    pub fn issue(&mut self, now: Cycle, addr: u64, words: u64) -> bool {
        if self.ack_at.is_some() {
            return false;
        }
        let latency = self.model.access_latency(addr).max(1) + words;
        self.ack_at = Some(now + latency);
        true
    }

    /// Consumes the ack once its ready cycle has been reached.
    pub fn poll_ack(&mut self, now: Cycle) -> bool {
        if self.ack_at.is_some_and(|at| at <= now) {
            self.ack_at = None;
            true
        } else {
            false
        }
    }

    /// Drops any in-flight transaction.
    pub fn reset(&mut self) {
        self.ack_at = None;
    }
}
