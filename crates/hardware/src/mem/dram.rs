//! Latency models for the external memory channels.
//!
//! This module provides:
//! 1. **`FixedLatency`:** Constant cycles per access (no row-buffer modeling).
//! 2. **`RowBuffer`:** Row-buffer-aware latency (CAS, RAS, precharge) for DRAM-style timing.

use crate::config::{MemoryConfig, MemoryModel};

/// Trait for memory latency models reporting per-access latency in cycles.
pub trait LatencyModel: Send + Sync + std::fmt::Debug {
    /// Returns the number of cycles before the first word of an access at
    /// the given word address is available.
    fn access_latency(&mut self, addr: u64) -> u64;
}

/// Fixed-latency model; every access takes the same number of cycles.
#[derive(Debug)]
pub struct FixedLatency {
    latency: u64,
}

impl FixedLatency {
    /// Creates a fixed-latency model with the given cycles per access.
    pub const fn new(latency: u64) -> Self {
        Self { latency }
    }
}

impl LatencyModel for FixedLatency {
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.latency
    }
}

/// Row-buffer model; accesses to the open row pay CAS only, row changes pay
/// precharge plus activation.
#[derive(Debug)]
pub struct RowBuffer {
    last_row: Option<u64>,
    t_cas: u64,
    t_ras: u64,
    t_pre: u64,
    row_mask: u64,
}

impl RowBuffer {
    /// Creates a row-buffer model with the given timing parameters (cycles).
    pub const fn new(t_cas: u64, t_ras: u64, t_pre: u64) -> Self {
        Self {
            last_row: None,
            t_cas,
            t_ras,
            t_pre,
            // 256-word (2 KiB) rows.
            row_mask: !255,
        }
    }
}

impl LatencyModel for RowBuffer {
    fn access_latency(&mut self, addr: u64) -> u64 {
        let row = addr & self.row_mask;
        match self.last_row {
            Some(open_row) if open_row == row => self.t_cas,
            Some(_) => {
                self.last_row = Some(row);
                self.t_pre + self.t_ras + self.t_cas
            }
            None => {
                self.last_row = Some(row);
                self.t_ras + self.t_cas
            }
        }
    }
}

/// Builds the latency model selected by the configuration.
pub fn build_model(config: &MemoryConfig) -> Box<dyn LatencyModel> {
    match config.model {
        MemoryModel::Fixed => Box::new(FixedLatency::new(config.latency)),
        MemoryModel::RowBuffer => Box::new(RowBuffer::new(config.t_cas, config.t_ras, config.t_pre)),
    }
}
